//! Sub-configuration structs with their defaults.

use crate::pipeline::colormap::Colormap;
use serde::{Deserialize, Serialize};

/// Conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Maximum number of images to convert. `None` converts every image
    /// that has annotations.
    pub limit: Option<usize>,

    /// Write unique-id masks as compressed `.npz` instead of `.npy`
    pub compress: bool,

    /// First unique instance id handed out by the id counter
    pub start_id: u64,

    /// Keep `iscrowd = 1` annotations
    pub include_crowd: bool,

    /// Log a progress line every N converted images
    pub progress_interval: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            limit: None,
            compress: true,
            start_id: 1,
            include_crowd: true,
            progress_interval: 100,
        }
    }
}

/// Output layout and rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Subdirectory for class masks
    pub class_dir: String,

    /// Subdirectory for colour-mapped instance masks
    pub instance_dir: String,

    /// Subdirectory for unique-id arrays
    pub id_dir: String,

    /// Manifest file name (one converted image id per line)
    pub manifest: String,

    /// Colour map applied to instance masks
    pub colormap: Colormap,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            class_dir: "class_labels".to_string(),
            instance_dir: "instance_labels".to_string(),
            id_dir: "id_labels".to_string(),
            manifest: "images_ids.txt".to_string(),
            colormap: Colormap::default(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
