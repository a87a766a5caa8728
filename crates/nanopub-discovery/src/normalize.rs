//! Mapping of endpoint payloads to [`NanopubResult`]s.
//!
//! Endpoints answer in one of two shapes: SPARQL JSON results
//! (`results.bindings`, each variable bound to `{type, value}`) or a flat array
//! of objects whose field names vary between deployments. The shape is decided
//! once per payload by [`classify`] and then dispatched statically.

use serde_json::{Map, Value};

use crate::error::{EndpointError, EndpointResult};
use crate::models::{NanopubResult, RawResult};

/// Field-name fallback chains for legacy array rows.
mod legacy_fields {
    pub const URI: &[&str] = &["np", "nanopub", "uri"];
    pub const SUBJECT: &[&str] = &["subj", "s"];
    pub const PREDICATE: &[&str] = &["pred", "p"];
    pub const OBJECT: &[&str] = &["obj", "o", "v"];
    pub const DATE: &[&str] = &["date", "created"];
    pub const PUBLISHER_KEY: &[&str] = &["pubkey", "creator"];
    pub const GRAPH: &[&str] = &["graph", "g"];
    pub const PROVENANCE: &[&str] = &["provenance"];
    pub const CREATOR_NAME: &[&str] = &["creatorName"];
}

/// The recognized payload shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseShape<'a> {
    /// SPARQL 1.1 JSON results.
    SparqlBindings(&'a [Value]),
    /// Ad-hoc array of flat objects.
    LegacyArray(&'a [Value]),
    /// Anything else.
    Unrecognized,
}

/// Decide which shape `payload` has.
#[must_use]
pub fn classify(payload: &Value) -> ResponseShape<'_> {
    match payload {
        Value::Object(obj) => obj
            .get("results")
            .and_then(|r| r.get("bindings"))
            .and_then(Value::as_array)
            .map_or(ResponseShape::Unrecognized, |b| ResponseShape::SparqlBindings(b)),
        Value::Array(rows) => ResponseShape::LegacyArray(rows),
        _ => ResponseShape::Unrecognized,
    }
}

/// Normalize a payload, reporting an unrecognized shape as a format error.
pub fn try_normalize(raw: &RawResult) -> EndpointResult<Vec<NanopubResult>> {
    let results: Vec<NanopubResult> = match classify(&raw.payload) {
        ResponseShape::SparqlBindings(bindings) => bindings.iter().map(from_binding).collect(),
        ResponseShape::LegacyArray(rows) => rows.iter().map(from_legacy_row).collect(),
        ResponseShape::Unrecognized => {
            return Err(EndpointError::format(
                "unrecognized result shape",
                &raw.payload.to_string(),
            ));
        }
    };

    Ok(results.into_iter().filter(|r| !r.uri.trim().is_empty()).collect())
}

/// Normalize a payload; an unrecognized shape is logged and yields no results.
#[must_use]
pub fn normalize(raw: &RawResult) -> Vec<NanopubResult> {
    match try_normalize(raw) {
        Ok(results) => results,
        Err(e) => {
            tracing::warn!(endpoint = %raw.endpoint, error = %e, "Discarding unusable payload");
            Vec::new()
        }
    }
}

fn from_binding(binding: &Value) -> NanopubResult {
    let Some(vars) = binding.as_object() else {
        return NanopubResult::default();
    };
    let var = |name: &str| vars.get(name).and_then(scalar);

    NanopubResult {
        uri: var("np").unwrap_or_default(),
        assertion_graph_uri: var("assertion"),
        provenance_graph_uri: var("provenance"),
        date: var("date"),
        publisher_key: var("pubkey"),
        subject: var("subj"),
        predicate: var("pred"),
        object: var("obj"),
        creator_name: var("creatorName"),
    }
}

fn from_legacy_row(row: &Value) -> NanopubResult {
    let Some(fields) = row.as_object() else {
        return NanopubResult::default();
    };

    NanopubResult {
        uri: first_of(fields, legacy_fields::URI).unwrap_or_default(),
        assertion_graph_uri: first_of(fields, legacy_fields::GRAPH),
        provenance_graph_uri: first_of(fields, legacy_fields::PROVENANCE),
        date: first_of(fields, legacy_fields::DATE),
        publisher_key: first_of(fields, legacy_fields::PUBLISHER_KEY),
        subject: first_of(fields, legacy_fields::SUBJECT),
        predicate: first_of(fields, legacy_fields::PREDICATE),
        object: first_of(fields, legacy_fields::OBJECT),
        creator_name: first_of(fields, legacy_fields::CREATOR_NAME),
    }
}

/// First non-empty value among `names`, in order.
fn first_of(fields: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| fields.get(*name).and_then(scalar))
}

/// Text of a JSON value: strings, `{ "value": ... }` cells, numbers and booleans.
///
/// Empty strings count as missing.
fn scalar(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(obj) => return obj.get("value").and_then(scalar),
        Value::Null | Value::Array(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}
