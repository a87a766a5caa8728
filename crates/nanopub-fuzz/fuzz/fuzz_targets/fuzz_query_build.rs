#![no_main]

use libfuzzer_sys::fuzz_target;
use nanopub_discovery::{QueryBuilder, SearchTerm};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let builder = QueryBuilder::default();
    for term in [SearchTerm::identifier(text), SearchTerm::free_text(text)] {
        if let Some(request) = builder.build(&term) {
            // The needle must stay inside its literal
            assert_eq!(request.sparql().matches("LIMIT ").count(), 1);
        }
    }
});
