//! Endpoint descriptors.

use serde::{Deserialize, Serialize};

use super::Protocol;

/// One remote endpoint a query can be sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Endpoint URL. Legacy endpoints may carry a `{term}` placeholder.
    pub url: String,

    /// Wire protocol.
    #[serde(default)]
    pub protocol: Protocol,

    /// Lower values are tried first.
    #[serde(default)]
    pub priority: u32,
}

impl Endpoint {
    /// Create an endpoint.
    #[must_use]
    pub fn new(url: impl Into<String>, protocol: Protocol, priority: u32) -> Self {
        Self { url: url.into(), protocol, priority }
    }

    /// SPARQL endpoint queried with POST.
    #[must_use]
    pub fn sparql_post(url: impl Into<String>, priority: u32) -> Self {
        Self::new(url, Protocol::SparqlPost, priority)
    }

    /// SPARQL endpoint queried with GET.
    #[must_use]
    pub fn sparql_get(url: impl Into<String>, priority: u32) -> Self {
        Self::new(url, Protocol::SparqlGet, priority)
    }

    /// Legacy REST search endpoint.
    #[must_use]
    pub fn legacy(url: impl Into<String>, priority: u32) -> Self {
        Self::new(url, Protocol::LegacyRest, priority)
    }
}

/// Endpoints in the order they must be tried.
///
/// Ascending priority; ties keep their declared order.
#[must_use]
pub fn in_priority_order(endpoints: &[Endpoint]) -> Vec<&Endpoint> {
    let mut ordered: Vec<&Endpoint> = endpoints.iter().collect();
    ordered.sort_by_key(|e| e.priority);
    ordered
}
