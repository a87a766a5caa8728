//! Duplicate removal and recency ordering for result sets.

use std::cmp::Reverse;
use std::collections::HashSet;

use crate::models::NanopubResult;

/// Remove duplicates, keeping the first occurrence of each identity key.
///
/// Order of the survivors is unchanged. Records without any identity key are
/// dropped. Idempotent.
#[must_use]
pub fn dedupe(results: Vec<NanopubResult>) -> Vec<NanopubResult> {
    let mut seen = HashSet::with_capacity(results.len());
    results
        .into_iter()
        .filter(|r| r.identity_key().is_some_and(|key| seen.insert(key)))
        .collect()
}

/// Order most recent first.
///
/// Stable: records with equal dates keep their order, and records whose date is
/// missing or unparseable follow all dated records in their original order.
pub fn sort_by_recency(results: &mut [NanopubResult]) {
    results.sort_by_cached_key(|r| Reverse(r.published_at()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn np(uri: &str, date: Option<&str>) -> NanopubResult {
        NanopubResult { date: date.map(str::to_string), ..NanopubResult::new(uri) }
    }

    fn uris(results: &[NanopubResult]) -> Vec<&str> {
        results.iter().map(|r| r.uri.as_str()).collect()
    }

    #[test]
    fn test_first_occurrence_wins() {
        let a1 = np("a", Some("2020-01-01"));
        let a2 = np("a", Some("2024-01-01"));
        let out = dedupe(vec![a1.clone(), np("b", None), a2]);
        assert_eq!(uris(&out), vec!["a", "b"]);
        assert_eq!(out[0], a1);
    }

    #[test]
    fn test_subject_fallback_key() {
        let s1 = NanopubResult { subject: Some("s".to_string()), ..Default::default() };
        let out = dedupe(vec![s1.clone(), s1, NanopubResult::default()]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_dedupe_idempotent() {
        let input = vec![np("a", None), np("b", None), np("a", None), np("c", None), np("b", None)];
        let once = dedupe(input);
        assert_eq!(dedupe(once.clone()), once);
    }

    #[test]
    fn test_sort_by_recency() {
        let mut results = vec![
            np("undated-1", None),
            np("old", Some("2019-03-01")),
            np("bad", Some("not a date")),
            np("new", Some("2024-06-01T12:00:00Z")),
            np("mid", Some("2022-01-01")),
            np("undated-2", None),
        ];
        sort_by_recency(&mut results);
        assert_eq!(uris(&results), vec!["new", "mid", "old", "undated-1", "bad", "undated-2"]);
    }
}
