//! COCO annotation file model and index.

pub mod index;
pub mod types;

pub use index::{CocoIndex, DatasetSummary};
pub use types::{Annotation, Category, CocoFile, Image, RleCounts, RleObject, Segmentation, Shape};
