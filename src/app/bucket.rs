use crate::app::error::ConcatError;
use crate::app::models::{FilesetSpec, RepeatedFilePolicy};
use crate::app::scanner::{FilesetResolver, GlobMatcher};
use log::debug;
use std::collections::HashSet;
use std::path::PathBuf;

/// Ordered accumulator of absolute source paths.
///
/// The variant decides what a repeated path does: `Repeat` keeps it,
/// `Ignore` drops it, `Fail` aborts.
#[derive(Debug)]
pub enum Bucket {
    Repeat(Vec<PathBuf>),
    Ignore { paths: Vec<PathBuf>, seen: HashSet<PathBuf> },
    Fail { paths: Vec<PathBuf>, seen: HashSet<PathBuf> },
}

impl Bucket {
    pub fn new(policy: RepeatedFilePolicy) -> Self {
        match policy {
            RepeatedFilePolicy::Repeat => Bucket::Repeat(Vec::new()),
            RepeatedFilePolicy::Ignore => Bucket::Ignore {
                paths: Vec::new(),
                seen: HashSet::new(),
            },
            RepeatedFilePolicy::Fail => Bucket::Fail {
                paths: Vec::new(),
                seen: HashSet::new(),
            },
        }
    }

    /// Returns whether the path was appended.
    pub fn add(&mut self, path: PathBuf) -> Result<bool, ConcatError> {
        match self {
            Bucket::Repeat(paths) => {
                paths.push(path);
                Ok(true)
            }
            Bucket::Ignore { paths, seen } => {
                if !seen.insert(path.clone()) {
                    return Ok(false);
                }
                paths.push(path);
                Ok(true)
            }
            Bucket::Fail { paths, seen } => {
                if !seen.insert(path.clone()) {
                    return Err(ConcatError::RepeatedPath { path });
                }
                paths.push(path);
                Ok(true)
            }
        }
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        match self {
            Bucket::Repeat(paths) | Bucket::Ignore { paths, .. } | Bucket::Fail { paths, .. } => paths,
        }
    }
}

/// Resolves every fileset in declaration order and merges the results.
pub fn collect_sources<M: GlobMatcher>(
    resolver: &FilesetResolver<M>,
    filesets: &[FilesetSpec],
    policy: RepeatedFilePolicy,
    allow_empty_result: bool,
) -> Result<Vec<PathBuf>, ConcatError> {
    debug!("{} fileset(s) specified", filesets.len());
    let mut bucket = Bucket::new(policy);

    for (index, fileset) in filesets.iter().enumerate() {
        for relative in resolver.resolve(index, fileset)? {
            let file = fileset.directory.join(relative);
            debug!("included file {}", file.display());
            if !bucket.add(file.clone())? {
                debug!("skipped repeated file {}", file.display());
            }
        }
    }

    let sources = bucket.into_paths();
    if sources.is_empty() && !allow_empty_result {
        return Err(ConcatError::EmptyResult);
    }
    Ok(sources)
}
