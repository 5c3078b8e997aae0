#![no_main]

use libfuzzer_sys::fuzz_target;
use snipcov_coverage::parse_lcov;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // The parser is total: malformed records are skipped, never a panic.
        let _ = parse_lcov(text);
    }
});
