use crate::app::cli::Cli;
use crate::app::encoding::Divider;
use crate::app::error::ConcatError;
use crate::app::models::{
    describe_fileset, ConcatenationConfig, FilesetSpec, OrderingStrategy, RepeatedFilePolicy, RuntimeConfig,
    SortStrategy,
};
use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, JobConfig>,
}

/// Shape shared by job files and preset entries.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
struct JobConfig {
    output: Option<PathBuf>,
    repeated_file_policy: Option<RepeatedFilePolicy>,
    allow_empty_result: Option<bool>,
    divider: Option<String>,
    divider_encoding: Option<String>,
    #[serde(default)]
    filesets: Vec<FilesetConfig>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct FilesetConfig {
    directory: Option<PathBuf>,
    #[serde(default)]
    includes: Vec<String>,
    #[serde(default)]
    excludes: Vec<String>,
    #[serde(default)]
    ordering: OrderingStrategy,
    sort: Option<SortStrategy>,
    #[serde(default)]
    allow_empty_match: bool,
    #[serde(default = "default_true")]
    use_default_excludes: bool,
    #[serde(default = "default_true")]
    follow_symlinks: bool,
}

fn default_true() -> bool {
    true
}

impl JobConfig {
    /// Anchors relative directories and output path at `base`.
    fn rebased(mut self, base: &Path) -> Self {
        self.output = self.output.map(|p| base.join(p));
        for fileset in &mut self.filesets {
            fileset.directory = fileset.directory.take().map(|d| base.join(d));
        }
        self
    }

    /// Layers `other` on top: scalars it sets win, filesets are appended.
    fn merge(mut self, other: JobConfig) -> Self {
        self.output = other.output.or(self.output);
        self.repeated_file_policy = other.repeated_file_policy.or(self.repeated_file_policy);
        self.allow_empty_result = other.allow_empty_result.or(self.allow_empty_result);
        self.divider = other.divider.or(self.divider);
        self.divider_encoding = other.divider_encoding.or(self.divider_encoding);
        self.filesets.extend(other.filesets);
        self
    }

    fn validate(self) -> Result<ConcatenationConfig, ConcatError> {
        if self.filesets.is_empty() {
            return Err(ConcatError::Configuration(
                "no filesets configured; pass --directory, --job or --preset".to_string(),
            ));
        }

        let filesets = self
            .filesets
            .into_iter()
            .enumerate()
            .map(|(index, fileset)| fileset.validate(index))
            .collect::<Result<Vec<_>, _>>()?;

        let output = self
            .output
            .ok_or_else(|| ConcatError::Configuration("output file not set".to_string()))?;

        let divider = self.divider.unwrap_or_default();
        Ok(ConcatenationConfig {
            filesets,
            output,
            repeated_file_policy: self.repeated_file_policy.unwrap_or_default(),
            allow_empty_result: self.allow_empty_result.unwrap_or(false),
            divider: Divider::resolve(&divider, self.divider_encoding.as_deref())?,
        })
    }
}

impl FilesetConfig {
    fn validate(self, index: usize) -> Result<FilesetSpec, ConcatError> {
        let directory = match self.directory {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            other => {
                return Err(ConcatError::Configuration(format!(
                    "fileset directory not set on fileset at index {}: {}",
                    index,
                    describe_fileset(other.as_deref(), &self.includes, &self.excludes)
                )))
            }
        };
        Ok(FilesetSpec {
            includes: self.includes,
            excludes: self.excludes,
            ordering: self.ordering,
            sort: self.sort,
            allow_empty_match: self.allow_empty_match,
            use_default_excludes: self.use_default_excludes,
            follow_symlinks: self.follow_symlinks,
            ..FilesetSpec::new(directory)
        })
    }
}

fn presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("filecat").join("presets.toml"))
}

fn load_presets_file(path: &Path) -> Result<HashMap<String, JobConfig>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(path).context(format!("Failed to read presets at {:?}", path))?;
    let parsed: PresetsFile =
        toml::from_str(&content).context(format!("Failed to parse presets at {:?}", path))?;

    Ok(parsed.presets)
}

fn load_job_file(path: &Path) -> Result<JobConfig> {
    let content = fs::read_to_string(path).context(format!("Failed to read job file {:?}", path))?;
    let job: JobConfig = toml::from_str(&content).context(format!("Failed to parse job file {:?}", path))?;
    Ok(job)
}

/// The CLI flags as one more configuration layer.
fn cli_layer(cli: &Cli) -> JobConfig {
    let filesets = cli
        .directory
        .as_ref()
        .map(|directory| FilesetConfig {
            directory: Some(directory.clone()),
            includes: cli.include.clone(),
            excludes: cli.exclude.clone(),
            ordering: cli.ordering.unwrap_or_default(),
            sort: cli.sort,
            allow_empty_match: cli.allow_empty_match,
            use_default_excludes: !cli.no_default_excludes,
            follow_symlinks: true,
        })
        .into_iter()
        .collect();

    JobConfig {
        output: cli.output.clone(),
        repeated_file_policy: cli.repeated_file_policy,
        allow_empty_result: cli.allow_empty_result.then_some(true),
        divider: cli.divider.clone(),
        divider_encoding: cli.divider_encoding.clone(),
        filesets,
    }
}

pub fn resolve_config(cli: Cli, current_dir: &Path, project_name: Option<&str>) -> Result<RuntimeConfig> {
    let presets = load_presets_file(&presets_path()?)?;
    resolve_with_presets(cli, presets, current_dir, project_name)
}

fn resolve_with_presets(
    cli: Cli,
    presets: HashMap<String, JobConfig>,
    current_dir: &Path,
    project_name: Option<&str>,
) -> Result<RuntimeConfig> {
    // Determine preset to use: CLI flag > Auto-detect > None
    let preset = match cli.preset.as_deref() {
        Some(name) => presets
            .get(name)
            .cloned()
            .with_context(|| format!("Unknown preset: {}", name))?,
        None => project_name
            .and_then(|name| presets.get(name))
            .cloned()
            .unwrap_or_default(),
    };

    let mut job = preset.rebased(current_dir);
    if let Some(path) = &cli.job {
        let path = current_dir.join(path);
        let base = path.parent().unwrap_or(current_dir).to_path_buf();
        job = job.merge(load_job_file(&path)?.rebased(&base));
    }
    job = job.merge(cli_layer(&cli).rebased(current_dir));
    debug!("merged configuration: {:?}", job);

    Ok(RuntimeConfig {
        job: job.validate()?,
        list_only: cli.list,
    })
}
