//! Fuzzing library for nanopub-discovery.
//!
//! Targets cover the two places untrusted text enters the crate: endpoint
//! payloads on their way to results, and item fields on their way into a query.
//!
//! # Usage
//!
//! ```bash
//! cd crates/nanopub-fuzz
//! cargo +nightly fuzz run fuzz_normalize -- -max_total_time=60
//! ```

pub use nanopub_discovery::{normalize, query};
