//! SPARQL query construction for nanopublication search.
//!
//! The generated query scans the assertion graph of every nanopublication for a
//! subject, predicate or object whose lowercase string form contains the
//! lowercase search term, then joins optional provenance (creation date, creator
//! name) and the admin-graph signature key. The term is only ever embedded as an
//! escaped double-quoted literal.

use crate::config::{Config, api};
use crate::models::{SearchTerm, TermKind};

const PREFIXES: &str = "\
PREFIX np: <http://www.nanopub.org/nschema#>
PREFIX dct: <http://purl.org/dc/terms/>
PREFIX foaf: <http://xmlns.com/foaf/0.1/>
PREFIX npa: <http://purl.org/nanopub/admin/>
";

/// A ready-to-send query for one search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    kind: TermKind,
    text: String,
    sparql: String,
    limit: usize,
}

impl QueryRequest {
    /// SPARQL text for SPARQL endpoints.
    #[must_use]
    pub fn sparql(&self) -> &str {
        &self.sparql
    }

    /// Plain search text for legacy REST endpoints.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Kind of term this request was built from.
    #[must_use]
    pub const fn kind(&self) -> TermKind {
        self.kind
    }

    /// Row limit embedded in the query.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}

/// Builds [`QueryRequest`]s from search terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryBuilder {
    min_free_text_len: usize,
    identifier_limit: usize,
    free_text_limit: usize,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            min_free_text_len: api::MIN_FREE_TEXT_LEN,
            identifier_limit: api::IDENTIFIER_LIMIT,
            free_text_limit: api::FREE_TEXT_LIMIT,
        }
    }
}

impl QueryBuilder {
    /// Builder using the limits from `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_free_text_len: config.min_free_text_len,
            identifier_limit: config.identifier_limit.max(1),
            free_text_limit: config.free_text_limit.max(1),
        }
    }

    /// Build the request for `term`.
    ///
    /// Returns `None` when the term must not be searched: free text shorter than
    /// the minimum length, or an identifier that is empty once its resolver prefix
    /// is gone.
    #[must_use]
    pub fn build(&self, term: &SearchTerm) -> Option<QueryRequest> {
        let (text, limit) = match term {
            SearchTerm::Identifier(_) => {
                // Terms built by hand may still carry a resolver prefix.
                let doi = crate::models::strip_doi_prefix(term.text());
                if doi.is_empty() {
                    return None;
                }
                (doi.to_string(), self.identifier_limit)
            }
            SearchTerm::FreeText(text) => {
                let text = text.trim();
                if text.chars().count() < self.min_free_text_len {
                    return None;
                }
                (text.to_string(), self.free_text_limit)
            }
        };

        let sparql = assertion_search_query(&text.to_lowercase(), limit);
        Some(QueryRequest { kind: term.kind(), text, sparql, limit })
    }
}

/// Escape `value` for use inside a double-quoted SPARQL string literal.
///
/// Follows the `ECHAR` production; other control characters are dropped.
#[must_use]
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn assertion_search_query(needle: &str, limit: usize) -> String {
    let literal = format!("\"{}\"", escape_literal(needle));
    format!(
        "{PREFIXES}\
SELECT DISTINCT ?np ?assertion ?provenance ?date ?creatorName ?pubkey ?subj ?pred ?obj WHERE {{
  GRAPH ?head {{
    ?np np:hasAssertion ?assertion ;
        np:hasProvenance ?provenance ;
        np:hasPublicationInfo ?pubinfo .
  }}
  GRAPH ?assertion {{
    ?subj ?pred ?obj .
    FILTER(
      CONTAINS(LCASE(STR(?subj)), {literal}) ||
      CONTAINS(LCASE(STR(?pred)), {literal}) ||
      CONTAINS(LCASE(STR(?obj)), {literal})
    )
  }}
  OPTIONAL {{ GRAPH ?pubinfo {{ ?np dct:created ?date . }} }}
  OPTIONAL {{
    GRAPH ?pubinfo {{ ?np dct:creator ?creator . }}
    OPTIONAL {{ ?creator foaf:name ?creatorName . }}
  }}
  OPTIONAL {{ GRAPH npa:graph {{ ?np npa:hasValidSignatureForPublicKey ?pubkey . }} }}
}}
ORDER BY DESC(?date)
LIMIT {limit}
"
    )
}
