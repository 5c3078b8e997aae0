//! LCOV coverage file parsing for snipcov.
//!
//! This crate turns LCOV-format coverage text into a map from source file
//! identifier to the line numbers that were never executed. Only the records
//! the report needs are recognized (`SF:`, `DA:`, `end_of_record`);
//! everything else is ignored.

use std::collections::BTreeMap;

// ============================================================================
// Types
// ============================================================================

/// A map of source file identifiers to their uncovered line numbers.
///
/// Keys are the `SF:` paths exactly as they appear in the coverage data
/// (relative or absolute). Values are 1-indexed line numbers in input order;
/// they may contain duplicates when the same `DA:` line is recorded more
/// than once, and are sorted downstream by the report generator.
pub type UncoveredMap = BTreeMap<String, Vec<u32>>;

/// Substring marking a source path as outside the project tree.
///
/// Paths materialized under the store are dependency sources; their coverage
/// records are dropped wholesale.
pub const STORE_MARKER: &str = "/nix/store";

// ============================================================================
// Line Classification
// ============================================================================

/// A single classified line of LCOV input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record<'a> {
    /// `SF:<path>` — begins a file section.
    SectionStart(&'a str),
    /// `DA:<line>,<hits>` — execution data for one source line.
    Data {
        /// 1-indexed source line number.
        line: u32,
        /// Number of times the line was executed.
        hits: u32,
    },
    /// `end_of_record` — ends the current file section.
    EndOfRecord,
    /// Any other line, including malformed `DA:` data.
    Other,
}

/// Classify one line of LCOV text.
///
/// A `DA:` line must start with two comma-separated unsigned integers;
/// trailing content (such as the optional LCOV checksum field) is ignored.
/// A `DA:` line that does not match classifies as [`Record::Other`].
///
/// # Examples
///
/// ```
/// use snipcov_coverage::{Record, classify};
///
/// assert_eq!(classify("SF:src/lib.rs"), Record::SectionStart("src/lib.rs"));
/// assert_eq!(classify("DA:12,0"), Record::Data { line: 12, hits: 0 });
/// assert_eq!(classify("end_of_record"), Record::EndOfRecord);
/// assert_eq!(classify("BRDA:1,0,0,1"), Record::Other);
/// ```
pub fn classify(line: &str) -> Record<'_> {
    if let Some(path) = line.strip_prefix("SF:") {
        return Record::SectionStart(path);
    }
    if let Some(data) = line.strip_prefix("DA:") {
        return match parse_data(data) {
            Some((line, hits)) => Record::Data { line, hits },
            None => Record::Other,
        };
    }
    if line == "end_of_record" {
        return Record::EndOfRecord;
    }
    Record::Other
}

/// Parse the `<line>,<hits>` prefix of a `DA:` payload.
fn parse_data(data: &str) -> Option<(u32, u32)> {
    let (line, rest) = leading_u32(data)?;
    let rest = rest.strip_prefix(',')?;
    let (hits, _) = leading_u32(rest)?;
    Some((line, hits))
}

/// Consume a run of ASCII digits from the front of `s`.
///
/// Returns the parsed value and the unconsumed remainder, or `None` when
/// the run is empty or does not fit in `u32`.
fn leading_u32(s: &str) -> Option<(u32, &str)> {
    let end = s.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let value: u32 = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

// ============================================================================
// LCOV Parsing
// ============================================================================

/// Parse LCOV text into a map of uncovered lines per in-scope file.
///
/// Parse state is the identifier of the current `SF:` section and whether
/// that section is in scope (its path does not contain [`STORE_MARKER`]).
/// Data lines with a zero hit count append to the current section's list;
/// nonzero hits are dropped. Repeated sections for the same identifier
/// accumulate into one entry, while out-of-scope sections contribute
/// nothing even when the same identifier reappears later in the input.
///
/// The function is total: malformed lines are skipped, never reported.
///
/// # Examples
///
/// ```
/// use snipcov_coverage::parse_lcov;
///
/// let lcov = "SF:src/lib.rs\nDA:1,1\nDA:2,0\nend_of_record\n";
/// let uncovered = parse_lcov(lcov);
/// assert_eq!(uncovered["src/lib.rs"], vec![2]);
/// ```
pub fn parse_lcov(text: &str) -> UncoveredMap {
    let mut uncovered: UncoveredMap = BTreeMap::new();
    let mut current_file: Option<String> = None;
    let mut in_scope = false;

    for raw in text.lines() {
        match classify(raw) {
            Record::SectionStart(path) => {
                in_scope = !path.contains(STORE_MARKER);
                if in_scope {
                    uncovered.entry(path.to_string()).or_default();
                }
                current_file = Some(path.to_string());
            }
            Record::Data { line, hits } => {
                if hits == 0
                    && in_scope
                    && let Some(file) = &current_file
                    && let Some(lines) = uncovered.get_mut(file)
                {
                    lines.push(line);
                }
            }
            Record::EndOfRecord => {
                current_file = None;
                in_scope = false;
            }
            Record::Other => {}
        }
    }

    uncovered
}

// ============================================================================
// Tests
// ============================================================================


// ============================================================================
// Property Tests
// ============================================================================
