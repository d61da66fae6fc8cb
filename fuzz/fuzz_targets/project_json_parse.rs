//! Fuzz target for project JSON parsing.
//!
//! Feeds arbitrary UTF-8 to the project parser and re-validates whatever
//! parses, checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use segset::project::io_json::from_json_str;
use segset::PipelineConfig;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(mut project) = from_json_str(text) {
        let config = PipelineConfig::default();
        for record in &mut project.annotations {
            let _ = record.revalidate(&config);
        }
    }
});
