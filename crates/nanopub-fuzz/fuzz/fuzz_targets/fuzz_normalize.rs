#![no_main]

use libfuzzer_sys::fuzz_target;
use nanopub_discovery::dedupe::{dedupe, sort_by_recency};
use nanopub_discovery::models::RawResult;
use nanopub_discovery::normalize::normalize;

fuzz_target!(|data: &[u8]| {
    // Bodies that are not JSON are rejected by the client before this point
    let Ok(payload) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    let mut results = normalize(&RawResult::new("fuzz", payload));
    assert!(results.iter().all(|r| !r.uri.trim().is_empty()));

    sort_by_recency(&mut results);
    let once = dedupe(results);
    assert_eq!(dedupe(once.clone()), once);
});
