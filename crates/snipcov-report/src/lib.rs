//! Report generation for snipcov.
//!
//! This crate turns the parser's uncovered-line map into a markdown
//! document: compacted line ranges per file, nearby uncovered lines merged
//! into groups, and one fenced snippet per group with a few lines of
//! surrounding context.

use std::fs;
use std::path::{Path, PathBuf};

use snipcov_coverage::UncoveredMap;

/// Default number of context lines shown before/after each uncovered line.
pub const DEFAULT_CONTEXT: u32 = 3;

// ============================================================================
// Range Compaction
// ============================================================================

/// Format sorted line numbers into compact range notation.
///
/// Maximal consecutive runs render as `start-end`, isolated values as the
/// bare number, joined by `", "`. The input must be sorted ascending.
///
/// # Examples
///
/// ```
/// use snipcov_report::compact_ranges;
///
/// assert_eq!(
///     compact_ranges(&[213, 214, 215, 216, 222, 223, 224, 225, 232]),
///     "213-216, 222-225, 232"
/// );
/// assert_eq!(compact_ranges(&[1, 3, 5]), "1, 3, 5");
/// assert_eq!(compact_ranges(&[]), "");
/// ```
pub fn compact_ranges(lines: &[u32]) -> String {
    let Some((&first, rest)) = lines.split_first() else {
        return String::new();
    };

    let mut ranges: Vec<String> = Vec::new();
    let mut start = first;
    let mut end = first;

    for &line in rest {
        if end.checked_add(1) == Some(line) {
            end = line;
        } else {
            ranges.push(render_range(start, end));
            start = line;
            end = line;
        }
    }
    ranges.push(render_range(start, end));

    ranges.join(", ")
}

fn render_range(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

// ============================================================================
// Grouping
// ============================================================================

/// Partition sorted line numbers into snippet groups.
///
/// A new group starts whenever the gap to the current group's maximum
/// exceeds `2 * context`; closer lines extend the group, so context windows
/// that would overlap or touch render as a single snippet.
pub fn group_lines(lines: &[u32], context: u32) -> Vec<Vec<u32>> {
    let threshold = context.saturating_mul(2);
    let mut groups: Vec<Vec<u32>> = Vec::new();

    for &line in lines {
        if let Some(group) = groups.last_mut()
            && let Some(&prev) = group.last()
            && line.saturating_sub(prev) <= threshold
        {
            group.push(line);
        } else {
            groups.push(vec![line]);
        }
    }

    groups
}

// ============================================================================
// Snippet Extraction
// ============================================================================

/// One line of a snippet window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetLine {
    /// 1-indexed line number in the source file.
    pub number: u32,
    /// Line content, without trailing newline.
    pub text: String,
    /// Whether this line belongs to the uncovered group (vs. context).
    pub uncovered: bool,
}

/// A contiguous window of source lines around one uncovered group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// 1-indexed first line of the window.
    pub start_line: u32,
    /// 1-indexed last line of the window.
    pub end_line: u32,
    /// The window's lines, annotated with group membership.
    pub lines: Vec<SnippetLine>,
}

/// Extract the snippet window for one group of uncovered lines.
///
/// The window spans `[min(group) - context, max(group) + context]`, clamped
/// to the file's actual line bounds. A group lying entirely past the end of
/// the file yields an empty window. The group must be sorted ascending.
pub fn extract_snippet(source: &[String], group: &[u32], context: u32) -> Snippet {
    let (Some(&min), Some(&max)) = (group.first(), group.last()) else {
        return Snippet {
            start_line: 1,
            end_line: 0,
            lines: Vec::new(),
        };
    };

    let context = context as usize;
    let start_idx = (min as usize)
        .saturating_sub(1)
        .saturating_sub(context)
        .min(source.len());
    let end_idx = (max as usize).saturating_add(context).min(source.len());

    let lines: Vec<SnippetLine> = source[start_idx..end_idx]
        .iter()
        .enumerate()
        .map(|(offset, text)| {
            let number = (start_idx + offset) as u32 + 1;
            SnippetLine {
                number,
                text: text.clone(),
                uncovered: group.binary_search(&number).is_ok(),
            }
        })
        .collect();

    Snippet {
        start_line: start_idx as u32 + 1,
        end_line: (start_idx + lines.len()) as u32,
        lines,
    }
}

// ============================================================================
// Source Access
// ============================================================================

/// Read access to the source files referenced by coverage data.
///
/// The report generator only needs whole-file line access; the trait keeps
/// rendering testable without disk fixtures.
pub trait SourceReader {
    /// Return all lines of `identifier`, or `None` when unreadable.
    fn read_source(&self, identifier: &str) -> Option<Vec<String>>;
}

/// Filesystem-backed reader rooted at the project source root.
pub struct FsSourceReader {
    root: PathBuf,
}

impl FsSourceReader {
    /// Create a reader resolving relative identifiers against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a coverage-data identifier to an on-disk path.
    ///
    /// Absolute identifiers are used directly. Relative identifiers resolve
    /// against the root first, falling back to the identifier as given
    /// (relative to the working directory) when the rooted path does not
    /// exist.
    pub fn resolve(&self, identifier: &str) -> PathBuf {
        let path = Path::new(identifier);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        let rooted = self.root.join(path);
        if rooted.exists() {
            rooted
        } else {
            path.to_path_buf()
        }
    }
}

impl SourceReader for FsSourceReader {
    fn read_source(&self, identifier: &str) -> Option<Vec<String>> {
        let bytes = fs::read(self.resolve(identifier)).ok()?;
        // Best-effort decoding: undecodable sequences become replacement
        // characters rather than failing the file.
        let text = String::from_utf8_lossy(&bytes);
        Some(text.lines().map(str::to_owned).collect())
    }
}

// ============================================================================
// Report Rendering
// ============================================================================

/// Generate the full markdown report for an uncovered-line map.
///
/// Files are rendered in sorted-identifier order. Per-file line numbers are
/// sorted and de-duplicated before compaction, grouping, and counting, so
/// repeated zero-hit records in the input never distort the output. A file
/// whose source cannot be read degrades to a warning block with the
/// compacted ranges.
///
/// # Examples
///
/// ```
/// use snipcov_report::{FsSourceReader, generate_report};
/// use std::collections::BTreeMap;
///
/// let mut uncovered = BTreeMap::new();
/// uncovered.insert("src/missing.rs".to_string(), vec![3, 4]);
///
/// let reader = FsSourceReader::new(".");
/// let report = generate_report(&uncovered, &reader, 3);
/// assert!(report.contains("- **Total Files**: 1"));
/// ```
pub fn generate_report<R: SourceReader>(
    uncovered: &UncoveredMap,
    reader: &R,
    context: u32,
) -> String {
    let mut out = String::new();

    out.push_str("# Uncovered Code Snippets\n\n");
    out.push_str("This document contains all code snippets that are not covered by tests.\n\n");
    out.push_str(&format!(
        "Context: {context} lines before/after each uncovered line.\n\n"
    ));

    // Fully covered files carry an empty list; they get no section.
    let files: Vec<(&str, Vec<u32>)> = uncovered
        .iter()
        .filter(|(_, lines)| !lines.is_empty())
        .map(|(file, lines)| (file.as_str(), sorted_unique(lines)))
        .collect();
    let total_uncovered: usize = files.iter().map(|(_, lines)| lines.len()).sum();

    out.push_str("## Summary\n\n");
    out.push_str(&format!("- **Total Files**: {}\n", files.len()));
    out.push_str(&format!("- **Total Uncovered Lines**: {total_uncovered}\n\n"));

    for (file, lines) in &files {
        render_file_section(&mut out, file, lines, reader, context);
    }

    out.push_str("---\n\n");
    out.push_str("*Report generated by snipcov*\n");

    out
}

fn sorted_unique(lines: &[u32]) -> Vec<u32> {
    let mut sorted = lines.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}

fn render_file_section<R: SourceReader>(
    out: &mut String,
    file: &str,
    lines: &[u32],
    reader: &R,
    context: u32,
) {
    out.push_str(&format!("## {file}\n\n"));

    let Some(source) = reader.read_source(file) else {
        out.push_str("\u{26A0}\u{FE0F} **Unable to read source file**\n\n");
        out.push_str(&format!("Uncovered lines: {}\n\n", compact_ranges(lines)));
        return;
    };

    out.push_str(&format!("**Uncovered Lines**: {}\n\n", compact_ranges(lines)));

    for (index, group) in group_lines(lines, context).iter().enumerate() {
        let snippet = extract_snippet(&source, group, context);
        out.push_str(&format!(
            "### Snippet {} (Lines {}-{})\n\n",
            index + 1,
            snippet.start_line,
            snippet.end_line
        ));
        out.push_str("```rust\n");
        for line in &snippet.lines {
            let marker = if line.uncovered { "\u{274C}" } else { "  " };
            out.push_str(&format!("{} {:>4} | {}\n", marker, line.number, line.text));
        }
        out.push_str("```\n\n");
    }
}

// ============================================================================
// Tests
// ============================================================================


// ============================================================================
// Property Tests
// ============================================================================
