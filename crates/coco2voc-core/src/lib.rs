//! coco2voc Core - COCO annotations to VOC-style label rasters.
//!
//! coco2voc reads a COCO annotation file and writes, for every annotated
//! image, a class mask, an instance-rank mask and a unique-instance-id mask.
//!
//! # Architecture
//!
//! Conversion is a single synchronous pass over the annotation index:
//!
//! ```text
//! JSON → Index → Decode (polygon / RLE / bbox) → Composite → PNG + NPZ → Manifest
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use coco2voc_core::{Coco2Voc, Config};
//!
//! fn main() -> coco2voc_core::Result<()> {
//!     let converter = Coco2Voc::new(Config::load()?);
//!     let stats = converter.convert("instances_val2017.json", "voc_out")?;
//!     println!("Converted {} images", stats.images_converted);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod dataset;
pub mod error;
pub mod mask;
pub mod pipeline;
pub mod types;

use std::path::Path;

// Re-exports for convenient access
pub use config::Config;
pub use dataset::{CocoIndex, DatasetSummary};
pub use error::{
    Coco2VocError, ConfigError, DatasetError, MaskError, PipelineError, PipelineResult, Result,
};
pub use mask::{BinaryMask, CocoMaskDecoder, MaskDecoder};
pub use pipeline::{Colormap, ConversionProgress, Converter, IdCounter};
pub use types::ConversionStats;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// coco2voc entry point: load an annotation file and convert it in one call.
pub struct Coco2Voc {
    config: Config,
}

impl Coco2Voc {
    /// Create a new instance with the given configuration.
    pub fn new(config: Config) -> Self {
        tracing::debug!("Initializing coco2voc v{}", VERSION);
        Self { config }
    }

    /// Convert every annotated image of `annotations` into `target`.
    pub fn convert(
        &self,
        annotations: impl AsRef<Path>,
        target: impl AsRef<Path>,
    ) -> Result<ConversionStats> {
        let index = CocoIndex::load(annotations.as_ref())?;
        let stats = Converter::new(&self.config).run(&index, target.as_ref())?;
        Ok(stats)
    }

    /// Load `annotations` and summarise its contents.
    pub fn inspect(&self, annotations: impl AsRef<Path>) -> Result<DatasetSummary> {
        Ok(CocoIndex::load(annotations.as_ref())?.summary())
    }
}
