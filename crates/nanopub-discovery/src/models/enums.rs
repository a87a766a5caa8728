//! Enumeration types for endpoints, terms and output.

use serde::{Deserialize, Serialize};

/// Output format for discovery results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Human-readable Markdown format.
    #[default]
    Markdown,
    /// Machine-readable JSON format.
    Json,
}

/// How a request is put on the wire for an endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Protocol {
    /// SPARQL 1.1 query via form-encoded POST.
    #[default]
    SparqlPost,
    /// SPARQL 1.1 query via GET `?query=`.
    SparqlGet,
    /// Ad-hoc REST search taking the plain term.
    LegacyRest,
}

/// Which kind of search term a query was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TermKind {
    /// DOI search.
    Identifier,
    /// Title / keyword search.
    FreeText,
}

impl std::fmt::Display for TermKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier => f.write_str("identifier"),
            Self::FreeText => f.write_str("free-text"),
        }
    }
}
