// Declare modules
pub mod bucket;
pub mod cli;
pub mod config;
pub mod encoding;
pub mod error;
pub mod models;
pub mod scanner;
pub mod writer;

use anyhow::{Context, Result};
use log::info;
use std::env;
use std::path::{Path, MAIN_SEPARATOR};

use self::bucket::collect_sources;
use self::cli::Cli;
use self::config::resolve_config;
use self::scanner::{FilesetResolver, Scanner};
use self::writer::ConcatenationWriter;

/// Width the output directory is abbreviated to in the summary line.
const SUMMARY_PATH_WIDTH: usize = 64;

/// Initializes components and orchestrates data flow.
pub fn run(args: Cli) -> Result<()> {
    // 1. Identify working directory & project name
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let project_name = current_dir.file_name().and_then(|n| n.to_str());

    // 2. Resolve configuration
    let config = resolve_config(args, &current_dir, project_name)?;
    let job = &config.job;

    // 3. Resolve and merge filesets
    let resolver = FilesetResolver::new(Scanner);
    let sources = collect_sources(
        &resolver,
        &job.filesets,
        job.repeated_file_policy,
        job.allow_empty_result,
    )?;

    if config.list_only {
        for source in &sources {
            println!("{}", source.display());
        }
        return Ok(());
    }

    // 4. Write output
    let summary = ConcatenationWriter::new(job.divider.bytes())
        .write(&sources, &job.output)
        .with_context(|| format!("failed to copy source files to destination {}", job.output.display()))?;

    info!(
        "concatenated {} file(s) to {}",
        summary.files,
        describe_output(&job.output)
    );
    log::debug!(
        "wrote {} byte(s), divider encoded as {}",
        summary.bytes,
        job.divider.encoding()
    );

    Ok(())
}

fn describe_output(output: &Path) -> String {
    let name = output.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    match output.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => format!(
            "{}{}{}",
            abbreviate_middle(&parent.to_string_lossy(), SUMMARY_PATH_WIDTH),
            MAIN_SEPARATOR,
            name
        ),
        None => name.into_owned(),
    }
}

/// Shortens `text` to `width` chars by replacing its middle with `...`.
fn abbreviate_middle(text: &str, width: usize) -> String {
    const MARKER: &str = "...";
    let len = text.chars().count();
    if len <= width || width <= MARKER.len() {
        return text.to_string();
    }
    let keep = width - MARKER.len();
    let head = keep.div_ceil(2);
    let tail = keep / 2;
    let start: String = text.chars().take(head).collect();
    let end: String = text.chars().skip(len - tail).collect();
    format!("{start}{MARKER}{end}")
}
