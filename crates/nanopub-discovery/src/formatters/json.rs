//! JSON output formatting.

use serde_json::{Value, json};

use crate::discovery::DiscoveryReport;
use crate::models::NanopubResult;

/// Compact nanopub representation: only fields that are present.
#[must_use]
pub fn compact_nanopub(np: &NanopubResult) -> Value {
    let mut obj = json!({ "uri": np.uri });

    if let Some(code) = np.artifact_code() {
        obj["artifactCode"] = json!(code);
    }

    if let Some(date) = &np.date {
        obj["date"] = json!(date);
    }

    if let Some(creator) = &np.creator_name {
        obj["creator"] = json!(creator);
    }

    if let (Some(s), Some(p), Some(o)) = (&np.subject, &np.predicate, &np.object) {
        obj["triple"] = json!([s, p, o]);
    } else if let Some(s) = &np.subject {
        obj["subject"] = json!(s);
    }

    if let Some(key) = &np.publisher_key {
        obj["signed"] = json!(true);
        obj["publicKey"] = json!(key);
    }

    obj
}

/// Results as a JSON array of compact records.
#[must_use]
pub fn format_nanopubs_json(results: &[NanopubResult]) -> Value {
    Value::Array(results.iter().map(compact_nanopub).collect())
}

/// Full report: compact results plus every endpoint call.
#[must_use]
pub fn format_report_json(report: &DiscoveryReport) -> Value {
    json!({
        "count": report.results.len(),
        "results": format_nanopubs_json(&report.results),
        "attempts": report.attempts,
    })
}
