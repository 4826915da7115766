//! Conversion pipeline components.
//!
//! This module contains the stages that turn an indexed annotation file into
//! label files on disk:
//! - **compositor**: Paint an image's annotation masks into class, instance and id rasters
//! - **colormap**: Render instance rasters through a perceptual colour map
//! - **layout**: Output directory structure and file naming
//! - **writer**: PNG and NumPy encoding of the rasters
//! - **manifest**: Append-only list of converted image ids
//! - **converter**: Orchestrates the full batch run

pub mod colormap;
pub mod compositor;
pub mod converter;
pub mod layout;
pub mod manifest;
pub mod writer;

// Re-exports for convenient access
pub use colormap::Colormap;
pub use compositor::{composite, CompositeMasks, IdCounter};
pub use converter::{ConversionProgress, Converter};
pub use layout::OutputLayout;
pub use manifest::Manifest;
pub use writer::{MaskWriter, WrittenFiles};
