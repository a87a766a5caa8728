//! Data models for items, endpoints and nanopublication results.
//!
//! Wire-facing models use `#[serde(default)]` for optional fields and
//! `camelCase` names to match the JSON emitted by the CLI.

mod endpoint;
mod enums;
mod item;
mod nanopub;

pub use endpoint::{Endpoint, in_priority_order};
pub use enums::{Protocol, ResponseFormat, TermKind};
pub use item::{BibliographicItem, ItemRef, SearchTerm, strip_doi_prefix};
pub use nanopub::{NanopubResult, RawResult, short_iri};
