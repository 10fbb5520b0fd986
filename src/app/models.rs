use crate::app::encoding::Divider;
use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// How the files of one fileset are ordered before any sort pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OrderingStrategy {
    /// Whatever order the matcher yields for all patterns evaluated jointly.
    Traditional,
    /// Files appear in the order their defining include pattern was declared.
    #[default]
    Strict,
}

/// Optional final pass over a fileset's resolved paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortStrategy {
    Alphabetical,
}

impl SortStrategy {
    /// Alphabetical order compares the raw path text, not path components.
    pub fn apply(self, paths: &mut [PathBuf]) {
        match self {
            SortStrategy::Alphabetical => paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str())),
        }
    }
}

/// What happens when the same file is selected more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RepeatedFilePolicy {
    #[default]
    Repeat,
    Ignore,
    Fail,
}

/// One selection unit: a base directory plus include/exclude patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesetSpec {
    pub directory: PathBuf,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub ordering: OrderingStrategy,
    pub sort: Option<SortStrategy>,
    pub allow_empty_match: bool,
    pub use_default_excludes: bool,
    pub follow_symlinks: bool,
}

impl FilesetSpec {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            includes: Vec::new(),
            excludes: Vec::new(),
            ordering: OrderingStrategy::default(),
            sort: None,
            allow_empty_match: false,
            use_default_excludes: true,
            follow_symlinks: true,
        }
    }

    /// A copy of this fileset selecting only through `pattern`.
    pub fn with_single_include(&self, pattern: &str) -> Self {
        Self {
            includes: vec![pattern.to_string()],
            ..self.clone()
        }
    }

    pub fn describe(&self) -> String {
        describe_fileset(Some(&self.directory), &self.includes, &self.excludes)
    }
}

pub fn describe_fileset(directory: Option<&Path>, includes: &[String], excludes: &[String]) -> String {
    let directory = directory.map_or_else(|| "null".to_string(), |d| d.display().to_string());
    format!(
        "FileSet{{directory={}, includes=[{}], excludes=[{}]}}",
        directory,
        includes.join(", "),
        excludes.join(", ")
    )
}

/// Validated description of one concatenation job.
#[derive(Debug, Clone)]
pub struct ConcatenationConfig {
    pub filesets: Vec<FilesetSpec>,
    pub output: PathBuf,
    pub repeated_file_policy: RepeatedFilePolicy,
    pub allow_empty_result: bool,
    pub divider: Divider,
}

/// Represents the final configuration after merging presets, job file and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub job: ConcatenationConfig,
    pub list_only: bool,
}
