use crate::app::models::{OrderingStrategy, RepeatedFilePolicy, SortStrategy};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Concatenate files selected by ordered filesets into a single output file"
)]
pub struct Cli {
    /// TOML job file describing filesets and output
    #[arg(long)]
    pub job: Option<PathBuf>,

    /// Use a predefined job from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// Base directory of a fileset appended after any configured ones
    #[arg(short = 'd', long)]
    pub directory: Option<PathBuf>,

    /// Include patterns for that fileset (e.g., 'src/**/*.js'), in order
    #[arg(short = 'i', long, num_args = 1.., requires = "directory")]
    pub include: Vec<String>,

    /// Exclude patterns for that fileset
    #[arg(short = 'e', long, num_args = 1.., requires = "directory")]
    pub exclude: Vec<String>,

    /// How that fileset orders its files
    #[arg(long, value_enum, requires = "directory")]
    pub ordering: Option<OrderingStrategy>,

    /// Sort that fileset's files after ordering
    #[arg(long, value_enum, requires = "directory")]
    pub sort: Option<SortStrategy>,

    /// Do not fail when that fileset matches nothing
    #[arg(long, requires = "directory")]
    pub allow_empty_match: bool,

    /// Do not skip VCS metadata and editor backup files in that fileset
    #[arg(long, requires = "directory")]
    pub no_default_excludes: bool,

    /// Output file
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Text inserted between concatenated files
    #[arg(long, allow_hyphen_values = true)]
    pub divider: Option<String>,

    /// Encoding label used to turn the divider into bytes (e.g., 'UTF-8')
    #[arg(long)]
    pub divider_encoding: Option<String>,

    /// What to do with a file selected more than once
    #[arg(long, value_enum)]
    pub repeated_file_policy: Option<RepeatedFilePolicy>,

    /// Succeed with an empty output when no file is selected
    #[arg(long)]
    pub allow_empty_result: bool,

    /// Print the resolved files in order instead of writing the output
    #[arg(long)]
    pub list: bool,

    /// Log every included file
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}
