use crate::app::error::ConcatError;
use crate::app::models::{FilesetSpec, OrderingStrategy};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use log::{debug, warn};
use pathdiff::diff_paths;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Patterns skipped in every fileset unless `use_default_excludes` is off.
const DEFAULT_EXCLUDES: &[&str] = &[
    "**/*~",
    "**/#*#",
    "**/.#*",
    "**/%*%",
    "**/._*",
    "**/CVS",
    "**/CVS/**",
    "**/.cvsignore",
    "**/SCCS",
    "**/SCCS/**",
    "**/vssver.scc",
    "**/.svn",
    "**/.svn/**",
    "**/.git",
    "**/.git/**",
    "**/.gitignore",
    "**/.gitattributes",
    "**/.gitmodules",
    "**/.hg",
    "**/.hg/**",
    "**/.hgignore",
    "**/.bzr",
    "**/.bzr/**",
    "**/.bzrignore",
    "**/.DS_Store",
];

/// What a matcher selected, relative to the fileset directory.
///
/// Files keep their exact on-disk names; directories are only reported, so
/// they are kept as display text with `/` separators.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub files: Vec<PathBuf>,
    pub included_directories: Vec<String>,
    pub excluded_directories: Vec<String>,
}

/// Evaluates all include and exclude patterns of a fileset jointly.
pub trait GlobMatcher {
    fn scan(&self, fileset: &FilesetSpec) -> Result<MatchResult, ConcatError>;
}

/// Walks the fileset directory and matches ANT-style patterns against each entry.
///
/// Entries are visited sorted by file name within each directory, so the
/// yielded order is stable between runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct Scanner;

impl GlobMatcher for Scanner {
    fn scan(&self, fileset: &FilesetSpec) -> Result<MatchResult, ConcatError> {
        let root = fileset.directory.as_path();
        if !root.is_dir() {
            warn!("fileset directory {} does not exist", root.display());
            return Ok(MatchResult::default());
        }

        let includes = PatternSet::compile(&fileset.includes)?;
        let excludes = PatternSet::compile(&fileset.excludes)?;
        let defaults = if fileset.use_default_excludes {
            PatternSet::compile(DEFAULT_EXCLUDES)?.all
        } else {
            GlobSet::empty()
        };

        let prune_root = root.to_path_buf();
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(fileset.follow_symlinks)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                entry.depth() == 0
                    || !diff_paths(entry.path(), &prune_root).is_some_and(|rel| defaults.is_match(match_name(&rel)))
            })
            .build();

        let mut found = MatchResult::default();
        for result in walker {
            let entry = result.map_err(|source| ConcatError::Walk {
                directory: root.to_path_buf(),
                source,
            })?;
            if entry.depth() == 0 {
                continue;
            }
            let Some(relative) = diff_paths(entry.path(), root) else {
                continue;
            };
            let name = match_name(&relative);

            let excluded = excludes.all.is_match(&name);
            if entry.file_type().is_some_and(|t| t.is_dir()) {
                if excludes.naming_dirs.is_match(&name) {
                    found.excluded_directories.push(name);
                } else if !excluded && includes.naming_dirs.is_match(&name) {
                    found.included_directories.push(name);
                }
                continue;
            }

            if !excluded && (includes.all.is_empty() || includes.all.is_match(&name)) {
                found.files.push(relative);
            }
        }

        Ok(found)
    }
}

/// Turns each fileset into an ordered list of relative file paths.
pub struct FilesetResolver<M> {
    matcher: M,
}

impl<M: GlobMatcher> FilesetResolver<M> {
    pub fn new(matcher: M) -> Self {
        Self { matcher }
    }

    /// Resolves the fileset declared at position `index`.
    ///
    /// Under strict ordering each include pattern is matched on its own and
    /// the results are appended in declaration order, first occurrence
    /// winning. The sort pass, when set, runs last and may override that order.
    pub fn resolve(&self, index: usize, fileset: &FilesetSpec) -> Result<Vec<PathBuf>, ConcatError> {
        if fileset.directory.as_os_str().is_empty() {
            return Err(ConcatError::Configuration(format!(
                "fileset directory not set on fileset at index {}: {}",
                index,
                fileset.describe()
            )));
        }

        let mut files = match fileset.ordering {
            OrderingStrategy::Strict if !fileset.includes.is_empty() => {
                self.resolve_in_includes_order(index, fileset)?
            }
            OrderingStrategy::Strict | OrderingStrategy::Traditional => self.scan_files(index, fileset)?,
        };

        if files.is_empty() && !fileset.allow_empty_match {
            return Err(ConcatError::EmptyFileset {
                index,
                description: fileset.describe(),
            });
        }

        if let Some(sort) = fileset.sort {
            sort.apply(&mut files);
        }

        debug!("fileset at index {} resolved to {} file(s)", index, files.len());
        Ok(files)
    }

    fn resolve_in_includes_order(&self, index: usize, fileset: &FilesetSpec) -> Result<Vec<PathBuf>, ConcatError> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for pattern in &fileset.includes {
            let single = fileset.with_single_include(pattern);
            for file in self.scan_files(index, &single)? {
                if seen.insert(file.clone()) {
                    ordered.push(file);
                }
            }
        }
        Ok(ordered)
    }

    fn scan_files(&self, index: usize, fileset: &FilesetSpec) -> Result<Vec<PathBuf>, ConcatError> {
        let found = self.matcher.scan(fileset)?;
        if !found.included_directories.is_empty() || !found.excluded_directories.is_empty() {
            let mut directories = found.included_directories;
            directories.extend(found.excluded_directories);
            return Err(ConcatError::DirectoryInclusionUnsupported {
                index,
                description: fileset.describe(),
                directories,
            });
        }
        Ok(found.files)
    }
}

struct PatternSet {
    all: GlobSet,
    /// Patterns that can select a directory itself, i.e. not ending in `**`.
    naming_dirs: GlobSet,
}

impl PatternSet {
    fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConcatError> {
        let mut all = GlobSetBuilder::new();
        let mut naming_dirs = GlobSetBuilder::new();
        for raw in patterns {
            let pattern = normalize_pattern(raw.as_ref());
            let glob = GlobBuilder::new(&pattern)
                .literal_separator(true)
                .build()
                .map_err(|source| ConcatError::InvalidPattern {
                    pattern: raw.as_ref().to_string(),
                    source,
                })?;
            if !pattern.ends_with("**") {
                naming_dirs.add(glob.clone());
            }
            all.add(glob);
        }
        Ok(Self {
            all: build_globset(all, patterns)?,
            naming_dirs: build_globset(naming_dirs, patterns)?,
        })
    }
}

fn build_globset<S: AsRef<str>>(builder: GlobSetBuilder, patterns: &[S]) -> Result<GlobSet, ConcatError> {
    builder.build().map_err(|source| ConcatError::InvalidPattern {
        pattern: patterns.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", "),
        source,
    })
}

/// ANT conventions: either slash separates, and a trailing slash means everything below.
fn normalize_pattern(pattern: &str) -> String {
    let mut normalized = pattern.replace('\\', "/");
    if normalized.ends_with('/') {
        normalized.push_str("**");
    }
    normalized
}

/// Text the globs are matched against; lossy for names that are not UTF-8.
fn match_name(relative: &Path) -> String {
    relative.to_string_lossy().replace('\\', "/")
}
