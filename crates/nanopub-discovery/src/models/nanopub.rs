//! Normalized nanopublication records and raw endpoint payloads.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Trusty URI artifact code at the end of a nanopub URI (`RA` + 43 base64url chars).
static ARTIFACT_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[/.#:])(RA[A-Za-z0-9_\-]{43})(?:[#/].*)?$").expect("valid artifact code regex")
});

/// Undecoded body of one successful endpoint call.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResult {
    /// URL of the endpoint that produced the payload.
    pub endpoint: String,

    /// Parsed JSON body.
    pub payload: serde_json::Value,
}

impl RawResult {
    /// Wrap a payload.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, payload: serde_json::Value) -> Self {
        Self { endpoint: endpoint.into(), payload }
    }
}

/// A nanopublication related to a bibliographic item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NanopubResult {
    /// Nanopublication URI.
    pub uri: String,

    /// Assertion graph URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertion_graph_uri: Option<String>,

    /// Provenance graph URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance_graph_uri: Option<String>,

    /// Creation date as reported by the endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Public key the nanopub was signed with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_key: Option<String>,

    /// Matched assertion subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Matched assertion predicate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,

    /// Matched assertion object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    /// Creator name from the provenance graph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_name: Option<String>,
}

impl NanopubResult {
    /// Create a result with only a URI.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into(), ..Default::default() }
    }

    /// Key used to detect duplicates.
    ///
    /// The trusty URI artifact code when present, so that the same nanopub served
    /// under `purl.org/np/` and `w3id.org/np/` collapses. Otherwise the URI, then
    /// the subject.
    #[must_use]
    pub fn identity_key(&self) -> Option<String> {
        let uri = self.uri.trim();
        if !uri.is_empty() {
            if let Some(caps) = ARTIFACT_CODE.captures(uri) {
                return Some(caps[1].to_string());
            }
            return Some(uri.to_string());
        }
        self.subject.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
    }

    /// Trusty URI artifact code, if the URI carries one.
    #[must_use]
    pub fn artifact_code(&self) -> Option<&str> {
        ARTIFACT_CODE.captures(self.uri.trim()).and_then(|c| c.get(1)).map(|m| m.as_str())
    }

    /// Parsed creation date.
    ///
    /// Accepts RFC 3339, a bare `YYYY-MM-DDTHH:MM:SS[.f]` (taken as UTC) or `YYYY-MM-DD`.
    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.date.as_deref()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Short label for display: the matched triple, else the URI.
    #[must_use]
    pub fn label(&self) -> String {
        match (&self.subject, &self.predicate, &self.object) {
            (Some(s), Some(p), Some(o)) => format!("{} {} {}", short_iri(s), short_iri(p), short_iri(o)),
            _ => self.uri.clone(),
        }
    }
}

/// Last path or fragment segment of an IRI; literals pass through unchanged.
#[must_use]
pub fn short_iri(iri: &str) -> &str {
    if !iri.starts_with("http://") && !iri.starts_with("https://") {
        return iri;
    }
    let trimmed = iri.trim_end_matches(['/', '#']);
    trimmed.rsplit(['/', '#']).next().filter(|s| !s.is_empty()).unwrap_or(iri)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODE: &str = "RAbcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQR";

    #[test]
    fn test_artifact_code_identity() {
        assert_eq!(CODE.len(), 45);
        let a = NanopubResult::new(format!("http://purl.org/np/{CODE}"));
        let b = NanopubResult::new(format!("https://w3id.org/np/{CODE}"));
        assert_eq!(a.identity_key(), b.identity_key());
        assert_eq!(a.artifact_code(), Some(CODE));
    }

    #[test]
    fn test_artifact_code_with_graph_suffix() {
        let r = NanopubResult::new(format!("https://w3id.org/np/{CODE}#assertion"));
        assert_eq!(r.identity_key().as_deref(), Some(CODE));
    }

    #[test]
    fn test_identity_falls_back_to_uri_then_subject() {
        let r = NanopubResult::new("https://example.org/np/1");
        assert_eq!(r.identity_key().as_deref(), Some("https://example.org/np/1"));

        let r = NanopubResult { subject: Some("ex:s".to_string()), ..Default::default() };
        assert_eq!(r.identity_key().as_deref(), Some("ex:s"));

        assert_eq!(NanopubResult::default().identity_key(), None);
    }

    #[test]
    fn test_published_at_formats() {
        let mut r = NanopubResult::new("x");

        r.date = Some("2024-01-01T10:00:00Z".to_string());
        assert!(r.published_at().is_some());

        r.date = Some("2024-01-01T10:00:00.123".to_string());
        assert!(r.published_at().is_some());

        r.date = Some("2024-01-01".to_string());
        assert_eq!(r.published_at().unwrap().to_rfc3339(), "2024-01-01T00:00:00+00:00");

        r.date = Some("yesterday".to_string());
        assert!(r.published_at().is_none());
    }

    #[test]
    fn test_label_and_short_iri() {
        let r = NanopubResult {
            uri: "https://w3id.org/np/X".to_string(),
            subject: Some("https://example.org/gene/BRCA1".to_string()),
            predicate: Some("http://www.w3.org/2000/01/rdf-schema#label".to_string()),
            object: Some("breast cancer 1".to_string()),
            ..Default::default()
        };
        assert_eq!(r.label(), "BRCA1 label breast cancer 1");
        assert_eq!(NanopubResult::new("u").label(), "u");
    }

    #[test]
    fn test_serialization_skips_missing_fields() {
        let r = NanopubResult { date: Some("2024-01-01".to_string()), ..NanopubResult::new("u") };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json, serde_json::json!({"uri": "u", "date": "2024-01-01"}));
    }
}
