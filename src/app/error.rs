//! Failure kinds for a concatenation run.
//!
//! Every variant is fatal. Nothing is retried; the host maps the variant to
//! an exit code through [`ConcatError::exit_code`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConcatError {
    /// Missing or inconsistent configuration.
    #[error("{0}")]
    Configuration(String),

    /// A glob pattern that does not compile.
    #[error("invalid glob pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// The matcher selected directories; only plain files can be concatenated.
    #[error(
        "fileset at index {index} selects directories [{}], which is not supported: {description}",
        .directories.join(", ")
    )]
    DirectoryInclusionUnsupported {
        index: usize,
        description: String,
        directories: Vec<String>,
    },

    #[error("fileset at index {index} did not yield any files: {description}")]
    EmptyFileset { index: usize, description: String },

    #[error("filesets did not yield any files; set allow_empty_result if this should be ignored")]
    EmptyResult,

    #[error("file selected more than once: {}", .path.display())]
    RepeatedPath { path: PathBuf },

    #[error("failed to walk {}", .directory.display())]
    Walk {
        directory: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("{action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConcatError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| ConcatError::Io {
            action,
            path,
            source,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            ConcatError::Configuration(_) | ConcatError::InvalidPattern { .. } => 2,
            ConcatError::DirectoryInclusionUnsupported { .. } => 3,
            ConcatError::EmptyFileset { .. } | ConcatError::EmptyResult => 4,
            ConcatError::RepeatedPath { .. } => 5,
            ConcatError::Walk { .. } | ConcatError::Io { .. } => 6,
        }
    }
}
