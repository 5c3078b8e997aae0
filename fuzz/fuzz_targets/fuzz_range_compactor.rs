#![no_main]

use libfuzzer_sys::fuzz_target;
use snipcov_report::{compact_ranges, extract_snippet, group_lines};

fuzz_target!(|lines: Vec<u32>| {
    let mut lines = lines;
    lines.sort_unstable();
    lines.dedup();

    // Sorted input must never panic, whatever the values.
    let _ = compact_ranges(&lines);

    let source: Vec<String> = (1..=32).map(|n| format!("line {n}")).collect();
    for group in group_lines(&lines, 3) {
        let _ = extract_snippet(&source, &group, 3);
    }
});
