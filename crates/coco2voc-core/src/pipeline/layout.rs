//! Output directory layout.

use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::error::{PipelineError, PipelineResult};

/// Where every output file of a run goes.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    class_dir: PathBuf,
    instance_dir: PathBuf,
    id_dir: PathBuf,
    manifest: PathBuf,
}

impl OutputLayout {
    /// Layout rooted at `root`, with subdirectory names from `config`.
    pub fn new(root: &Path, config: &OutputConfig) -> Self {
        Self {
            class_dir: root.join(&config.class_dir),
            instance_dir: root.join(&config.instance_dir),
            id_dir: root.join(&config.id_dir),
            manifest: root.join(&config.manifest),
        }
    }

    /// Create the three mask directories (existing ones are kept).
    pub fn create_dirs(&self) -> PipelineResult<()> {
        for dir in [&self.class_dir, &self.instance_dir, &self.id_dir] {
            std::fs::create_dir_all(dir).map_err(|source| PipelineError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest
    }

    /// `<class_dir>/<image_id>.png`
    pub fn class_path(&self, image_id: u64) -> PathBuf {
        self.class_dir.join(format!("{image_id}.png"))
    }

    /// `<instance_dir>/<image_id>.png`
    pub fn instance_path(&self, image_id: u64) -> PathBuf {
        self.instance_dir.join(format!("{image_id}.png"))
    }

    /// `<id_dir>/<image_id>.npz`, or `.npy` when uncompressed.
    pub fn id_path(&self, image_id: u64, compress: bool) -> PathBuf {
        let ext = if compress { "npz" } else { "npy" };
        self.id_dir.join(format!("{image_id}.{ext}"))
    }
}
