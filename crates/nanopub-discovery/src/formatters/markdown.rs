//! Markdown output formatting.

use crate::models::{NanopubResult, short_iri};

/// Format a list of nanopublications as Markdown.
#[must_use]
pub fn format_nanopubs_markdown(results: &[NanopubResult]) -> String {
    if results.is_empty() {
        return "No related nanopublications found.".to_string();
    }

    let mut output = format!("# Nanopublications ({} results)\n\n", results.len());

    for (i, np) in results.iter().enumerate() {
        output.push_str(&format_nanopub_markdown(np, i + 1));
        output.push_str("\n---\n\n");
    }

    output
}

/// Format a single nanopublication as Markdown.
#[must_use]
pub fn format_nanopub_markdown(np: &NanopubResult, index: usize) -> String {
    let mut output = format!("## {}. {}\n\n", index, np.label());

    // Date and creator
    let mut meta = Vec::new();
    if let Some(date) = &np.date {
        meta.push(format!("**Date**: {date}"));
    }
    if let Some(creator) = &np.creator_name {
        meta.push(format!("**Creator**: {creator}"));
    }
    if np.publisher_key.is_some() {
        meta.push("**Signed**: yes".to_string());
    }
    if !meta.is_empty() {
        output.push_str(&format!("{}\n\n", meta.join(" | ")));
    }

    // Matched statement
    if let (Some(s), Some(p), Some(o)) = (&np.subject, &np.predicate, &np.object) {
        output.push_str(&format!("**Statement**: `{}` `{}` `{}`\n\n", short_iri(s), short_iri(p), o));
    }

    // Links
    let mut links = vec![format!("[Nanopub]({})", np.uri)];
    if let Some(assertion) = &np.assertion_graph_uri {
        links.push(format!("[Assertion]({assertion})"));
    }
    if let Some(provenance) = &np.provenance_graph_uri {
        links.push(format!("[Provenance]({provenance})"));
    }
    output.push_str(&format!("**Links**: {}\n", links.join(" | ")));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_results_message() {
        assert_eq!(format_nanopubs_markdown(&[]), "No related nanopublications found.");
    }

    #[test]
    fn test_format_nanopub_markdown() {
        let np = NanopubResult {
            uri: "https://w3id.org/np/X".to_string(),
            assertion_graph_uri: Some("https://w3id.org/np/X#assertion".to_string()),
            date: Some("2024-01-01".to_string()),
            creator_name: Some("Ada Lovelace".to_string()),
            ..Default::default()
        };

        let md = format_nanopubs_markdown(&[np]);

        assert!(md.starts_with("# Nanopublications (1 results)"));
        assert!(md.contains("## 1. https://w3id.org/np/X"));
        assert!(md.contains("**Date**: 2024-01-01 | **Creator**: Ada Lovelace"));
        assert!(md.contains("[Assertion](https://w3id.org/np/X#assertion)"));
        assert!(!md.contains("Provenance"));
    }
}
