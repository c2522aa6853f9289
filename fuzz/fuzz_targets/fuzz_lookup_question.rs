#![no_main]

use libfuzzer_sys::fuzz_target;
use overlay_lookup::{LookupQuestion, TemplateQuery};

// Host JSON of any shape parses or fails cleanly, and query validation
// never panics.
fuzz_target!(|data: &[u8]| {
    if let Ok(question) = serde_json::from_slice::<LookupQuestion>(data) {
        let _ = TemplateQuery::parse(&question);
    }
});
