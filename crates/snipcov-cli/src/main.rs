//! snipcov extracts uncovered code snippets from LCOV coverage data.
//!
//! The CLI reads an LCOV file, collects the lines that were never executed
//! for every in-scope source file, and writes a markdown report grouping
//! those lines into contextual snippets.

use clap::Parser;
use snipcov_coverage::parse_lcov;
use snipcov_report::{DEFAULT_CONTEXT, FsSourceReader, generate_report};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extract uncovered code snippets from LCOV coverage data.
#[derive(Parser)]
#[command(name = "snipcov")]
#[command(about = "Extract uncovered code snippets from LCOV coverage data")]
#[command(version)]
struct Cli {
    /// Path to the LCOV coverage data file
    lcov_file: PathBuf,

    /// Path the markdown report is written to
    output_file: PathBuf,

    /// Source root used to resolve relative file paths (default: working directory)
    src_root: Option<PathBuf>,

    /// Number of context lines shown around each uncovered line
    #[arg(long, default_value_t = DEFAULT_CONTEXT)]
    context: u32,
}

/// CLI errors
#[derive(Debug, Error)]
enum CliError {
    #[error("LCOV file not found: {path}")]
    LcovNotFound { path: String },

    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirCreate {
        path: String,
        #[source]
        source: io::Error,
    },
}

const EXIT_CODE_ERROR: i32 = 1;

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_CODE_ERROR
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<(), CliError> {
    if !cli.lcov_file.exists() {
        return Err(CliError::LcovNotFound {
            path: cli.lcov_file.display().to_string(),
        });
    }

    println!("Parsing LCOV file: {}", cli.lcov_file.display());
    let lcov_text = fs::read_to_string(&cli.lcov_file).map_err(|e| CliError::FileRead {
        path: cli.lcov_file.display().to_string(),
        source: e,
    })?;
    let uncovered = parse_lcov(&lcov_text);

    println!("Found {} files with uncovered lines", uncovered.len());
    println!("Generating report...");

    let src_root = cli
        .src_root
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let reader = FsSourceReader::new(src_root);
    let report = generate_report(&uncovered, &reader, cli.context);

    ensure_parent_dir(&cli.output_file)?;
    fs::write(&cli.output_file, &report).map_err(|e| CliError::FileWrite {
        path: cli.output_file.display().to_string(),
        source: e,
    })?;

    println!("Report written to: {}", cli.output_file.display());
    Ok(())
}

/// Ensure the parent directory of a path exists.
fn ensure_parent_dir(path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| CliError::DirCreate {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    Ok(())
}
