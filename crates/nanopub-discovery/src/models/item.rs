//! Bibliographic items and the search terms derived from them.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::TermKind;

static DOI_RESOLVER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(https?://)?(dx\.)?doi\.org/").expect("valid DOI resolver regex")
});

static DOI_SCHEME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^doi:\s*").expect("valid DOI scheme regex"));

/// What a host application exposes about a record.
pub trait BibliographicItem {
    /// DOI (possibly with a resolver prefix).
    fn identifier(&self) -> Option<&str>;

    /// Title of the work.
    fn title(&self) -> Option<&str>;
}

/// Owned item fields, e.g. read from CLI flags or JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    /// DOI.
    #[serde(default, alias = "doi", alias = "DOI")]
    pub identifier: Option<String>,

    /// Title.
    #[serde(default)]
    pub title: Option<String>,
}

impl ItemRef {
    /// Create an item from optional DOI and title.
    #[must_use]
    pub fn new(identifier: Option<String>, title: Option<String>) -> Self {
        Self { identifier, title }
    }

    /// Item known only by DOI.
    #[must_use]
    pub fn with_doi(doi: impl Into<String>) -> Self {
        Self { identifier: Some(doi.into()), title: None }
    }

    /// Item known only by title.
    #[must_use]
    pub fn with_title(title: impl Into<String>) -> Self {
        Self { identifier: None, title: Some(title.into()) }
    }
}

impl BibliographicItem for ItemRef {
    fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref().filter(|s| !s.trim().is_empty())
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// A normalized search term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "kebab-case")]
pub enum SearchTerm {
    /// DOI with any resolver prefix removed.
    Identifier(String),
    /// Title or keywords.
    FreeText(String),
}

impl SearchTerm {
    /// Build an identifier term, stripping `https://doi.org/`, `dx.doi.org/` and `doi:`.
    #[must_use]
    pub fn identifier(raw: &str) -> Self {
        Self::Identifier(strip_doi_prefix(raw).to_string())
    }

    /// Build a free-text term with whitespace collapsed.
    #[must_use]
    pub fn free_text(raw: &str) -> Self {
        Self::FreeText(raw.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    /// The text to search for.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Identifier(s) | Self::FreeText(s) => s,
        }
    }

    /// Term kind.
    #[must_use]
    pub const fn kind(&self) -> TermKind {
        match self {
            Self::Identifier(_) => TermKind::Identifier,
            Self::FreeText(_) => TermKind::FreeText,
        }
    }
}

impl std::fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.text())
    }
}

/// Remove a DOI resolver URL or `doi:` scheme from the front of `raw`.
#[must_use]
pub fn strip_doi_prefix(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_resolver = match DOI_RESOLVER_PREFIX.find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    };
    match DOI_SCHEME_PREFIX.find(without_resolver) {
        Some(m) => without_resolver[m.end()..].trim(),
        None => without_resolver.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_resolver_prefixes() {
        assert_eq!(strip_doi_prefix("https://doi.org/10.1/abc"), "10.1/abc");
        assert_eq!(strip_doi_prefix("http://dx.doi.org/10.1/abc"), "10.1/abc");
        assert_eq!(strip_doi_prefix("doi.org/10.1/abc"), "10.1/abc");
        assert_eq!(strip_doi_prefix("HTTPS://DOI.ORG/10.1/ABC"), "10.1/ABC");
        assert_eq!(strip_doi_prefix("  doi: 10.1/abc "), "10.1/abc");
        assert_eq!(strip_doi_prefix("10.1/abc"), "10.1/abc");
    }

    #[test]
    fn test_prefix_only_stripped_at_start() {
        assert_eq!(
            strip_doi_prefix("10.1/see-https://doi.org/inside"),
            "10.1/see-https://doi.org/inside"
        );
    }

    #[test]
    fn test_free_text_collapses_whitespace() {
        let term = SearchTerm::free_text("  Deep\tlearning \n in  biology ");
        assert_eq!(term.text(), "Deep learning in biology");
        assert_eq!(term.kind(), TermKind::FreeText);
    }

    #[test]
    fn test_item_ignores_blank_fields() {
        let item = ItemRef::new(Some("  ".to_string()), Some("A title".to_string()));
        assert_eq!(item.identifier(), None);
        assert_eq!(item.title(), Some("A title"));
    }

    #[test]
    fn test_item_deserializes_doi_alias() {
        let item: ItemRef =
            serde_json::from_value(serde_json::json!({"DOI": "10.1/x", "title": "T"})).unwrap();
        assert_eq!(item.identifier(), Some("10.1/x"));
    }
}
