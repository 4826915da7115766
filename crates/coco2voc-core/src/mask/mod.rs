//! Mask codec: COCO RLE, polygon rasterisation and the pluggable decoder.

pub mod decoder;
pub mod polygon;
pub mod rle;

pub use decoder::{BinaryMask, CocoMaskDecoder, MaskDecoder};
pub use polygon::{rle_from_bbox, rle_from_polygon};
pub use rle::Rle;
