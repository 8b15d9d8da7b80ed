#![no_main]

use std::path::Path;

use envschema::config::SchemaFileLoader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml) = std::str::from_utf8(data) {
        // Only panics matter here
        let _ = SchemaFileLoader::default().load_str(yaml, Path::new("fuzz.yaml"));
    }
});
