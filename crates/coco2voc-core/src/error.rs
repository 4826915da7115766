//! Error types for the coco2voc conversion pipeline.
//!
//! Errors are organized by stage (config, dataset loading, mask decoding,
//! output writing) so messages carry the file path or image id involved.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for coco2voc operations.
#[derive(Error, Debug)]
pub enum Coco2VocError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Annotation file loading errors
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Conversion errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while loading a COCO annotation file.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The annotation file could not be opened or read
    #[error("Cannot read annotation file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The annotation file is not valid COCO JSON
    #[error("Cannot parse annotation file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while turning a shape encoding into a binary mask.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// RLE `size` does not match the image it is composited onto
    #[error("Mask is {found_height}x{found_width} but image is {height}x{width}")]
    DimensionMismatch {
        height: u32,
        width: u32,
        found_height: u32,
        found_width: u32,
    },

    /// RLE counts or string are malformed
    #[error("Invalid RLE: {0}")]
    InvalidRle(String),
}

/// Conversion errors, tagged with the image being converted.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An annotation could not be decoded
    #[error("Decode error for annotation {annotation_id} of image {image_id}: {source}")]
    Mask {
        image_id: u64,
        annotation_id: u64,
        #[source]
        source: MaskError,
    },

    /// The image has more pixels than a `u32` run length can count
    #[error("Image {image_id} is too large to encode: {height}x{width}")]
    ImageTooLarge {
        image_id: u64,
        height: u32,
        width: u32,
    },

    /// An output directory could not be created
    #[error("Cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A mask file could not be written
    #[error("Write failed for {path}: {message}")]
    Write { path: PathBuf, message: String },

    /// The manifest could not be opened or appended to
    #[error("Manifest error for {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for coco2voc results.
pub type Result<T> = std::result::Result<T, Coco2VocError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
