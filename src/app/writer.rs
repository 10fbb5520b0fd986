//! Byte-exact concatenation of source files into one output file.
//!
//! A failure partway through leaves the partially written output on disk;
//! nothing is staged in a temporary file.

use crate::app::error::ConcatError;
use log::debug;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

const BUFFER_SIZE: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub files: usize,
    pub bytes: u64,
}

pub struct ConcatenationWriter<'a> {
    divider: &'a [u8],
}

impl<'a> ConcatenationWriter<'a> {
    pub fn new(divider: &'a [u8]) -> Self {
        Self { divider }
    }

    /// Truncates `output` and writes every source into it, the divider between each pair.
    pub fn write(&self, sources: &[PathBuf], output: &Path) -> Result<WriteSummary, ConcatError> {
        create_parent_dirs(output)?;
        let file = File::create(output).map_err(ConcatError::io("failed to open output file", output))?;
        let mut out = BufWriter::with_capacity(BUFFER_SIZE, file);

        let mut summary = WriteSummary { files: 0, bytes: 0 };
        for source in sources {
            if summary.files > 0 && !self.divider.is_empty() {
                out.write_all(self.divider)
                    .map_err(ConcatError::io("failed to write divider to", output))?;
                summary.bytes += self.divider.len() as u64;
            }
            let mut input = File::open(source).map_err(ConcatError::io("failed to open source file", source))?;
            let copied = io::copy(&mut input, &mut out).map_err(ConcatError::io("failed to copy source file", source))?;
            debug!("copied {} byte(s) from {}", copied, source.display());
            summary.files += 1;
            summary.bytes += copied;
        }

        out.flush().map_err(ConcatError::io("failed to write output file", output))?;
        Ok(summary)
    }
}

fn create_parent_dirs(output: &Path) -> Result<(), ConcatError> {
    let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    fs::create_dir_all(parent).map_err(ConcatError::io("unable to create parent directories of", output))?;
    if !parent.is_dir() {
        return Err(ConcatError::Io {
            action: "unable to create parent directories of",
            path: output.to_path_buf(),
            source: io::Error::other(format!("{} is not a directory", parent.display())),
        });
    }
    Ok(())
}
