//! Nanopublication discovery
//!
//! Finds nanopublications related to a bibliographic record. Given a DOI and/or
//! title, it queries public SPARQL endpoints of the nanopublication network, with
//! legacy REST endpoints as a fallback, and returns a deduplicated list ordered
//! most recent first.
//!
//! # Features
//!
//! - **First-success fallback**: endpoints are tried one at a time in priority order
//! - **Fail soft**: endpoint errors are logged and skipped, never returned
//! - **Two payload shapes**: SPARQL JSON results and ad-hoc legacy arrays
//! - **Injection-safe queries**: search terms are escaped SPARQL literals
//!
//! # Example
//!
//! ```no_run
//! use nanopub_discovery::{Config, Discovery, ItemRef};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let discovery = Discovery::new(&config)?;
//!
//!     let item = ItemRef::new(Some("10.1038/sdata.2016.18".into()), None);
//!     for np in discovery.discover(&item).await {
//!         println!("{}", np.uri);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod dedupe;
pub mod discovery;
pub mod error;
pub mod formatters;
pub mod models;
pub mod normalize;
pub mod query;

pub use client::{EndpointClient, EndpointTransport};
pub use config::Config;
pub use discovery::{Discovery, DiscoveryReport};
pub use error::{ConfigError, EndpointError, ErrorKind};
pub use models::{BibliographicItem, Endpoint, ItemRef, NanopubResult, Protocol, SearchTerm};
pub use query::{QueryBuilder, QueryRequest};
