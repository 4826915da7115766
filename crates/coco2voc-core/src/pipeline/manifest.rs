//! Append-only manifest of converted image ids.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult};

/// One image id per line, flushed after every line.
///
/// Existing content is kept; a rerun appends duplicates.
pub struct Manifest {
    path: PathBuf,
    writer: BufWriter<File>,
    lines_written: usize,
}

impl Manifest {
    /// Open (or create) the manifest for appending.
    pub fn open(path: &Path) -> PipelineResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| PipelineError::Manifest {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            lines_written: 0,
        })
    }

    /// Record a converted image.
    pub fn record(&mut self, image_id: u64) -> PipelineResult<()> {
        writeln!(self.writer, "{image_id}")
            .and_then(|()| self.writer.flush())
            .map_err(|source| PipelineError::Manifest {
                path: self.path.clone(),
                source,
            })?;
        self.lines_written += 1;
        Ok(())
    }

    /// Lines appended by this handle.
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }
}
