//! Shape decoding: annotation geometry in, binary pixel mask out.

use ndarray::{Array2, ShapeBuilder};

use crate::dataset::{RleCounts, RleObject, Segmentation, Shape};
use crate::error::MaskError;

use super::polygon::{rle_from_bbox, rle_from_polygon};
use super::rle::Rle;

/// A binary `height × width` mask, indexed `[row, col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    pixels: Array2<bool>,
}

impl BinaryMask {
    /// An all-false mask.
    pub fn empty(height: u32, width: u32) -> Self {
        Self {
            pixels: Array2::from_elem((height as usize, width as usize), false),
        }
    }

    /// Expand an RLE into a mask.
    pub fn from_rle(rle: &Rle) -> Result<Self, MaskError> {
        let data: Vec<bool> = rle.decode().into_iter().map(|v| v != 0).collect();
        // RLE pixels are column-major, so build with Fortran strides.
        let pixels = Array2::from_shape_vec((rle.h as usize, rle.w as usize).f(), data)
            .map_err(|e| MaskError::InvalidRle(e.to_string()))?;
        Ok(Self { pixels })
    }

    /// Set every pixel that is set in `other`.
    pub fn union_with(&mut self, other: &BinaryMask) {
        self.pixels.zip_mut_with(&other.pixels, |a, &b| *a |= b);
    }

    /// `(height, width)`.
    pub fn dims(&self) -> (u32, u32) {
        let (h, w) = self.pixels.dim();
        (h as u32, w as u32)
    }

    /// Number of foreground pixels.
    pub fn count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    /// Borrow the underlying array.
    pub fn pixels(&self) -> &Array2<bool> {
        &self.pixels
    }
}

/// Turns annotation shapes into binary masks.
///
/// The compositor only depends on this trait, so alternative rasterisers
/// (or test doubles) can be plugged in.
pub trait MaskDecoder {
    /// Decode `shape` into a `height × width` mask.
    fn decode(&self, shape: Shape<'_>, height: u32, width: u32) -> Result<BinaryMask, MaskError>;
}

/// Decoder for the COCO encodings: polygons, uncompressed and compressed
/// RLE, and bounding boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CocoMaskDecoder;

impl CocoMaskDecoder {
    pub fn new() -> Self {
        Self
    }

    fn decode_rle(rle: &RleObject, height: u32, width: u32) -> Result<Rle, MaskError> {
        let [rle_h, rle_w] = rle.size;
        if rle_h != height || rle_w != width {
            return Err(MaskError::DimensionMismatch {
                height,
                width,
                found_height: rle_h,
                found_width: rle_w,
            });
        }
        match &rle.counts {
            RleCounts::Uncompressed(counts) => Ok(Rle {
                h: rle_h,
                w: rle_w,
                counts: counts.clone(),
            }),
            RleCounts::Compressed(s) => Rle::from_compressed(s, rle_h, rle_w),
        }
    }
}

impl MaskDecoder for CocoMaskDecoder {
    fn decode(&self, shape: Shape<'_>, height: u32, width: u32) -> Result<BinaryMask, MaskError> {
        match shape {
            Shape::Segmentation(Segmentation::Polygons(polys)) => {
                // An object split into several polygons is their union.
                let mut mask = BinaryMask::empty(height, width);
                for poly in polys {
                    let part = BinaryMask::from_rle(&rle_from_polygon(poly, height, width))?;
                    mask.union_with(&part);
                }
                Ok(mask)
            }
            Shape::Segmentation(Segmentation::Rle(rle)) => {
                BinaryMask::from_rle(&Self::decode_rle(rle, height, width)?)
            }
            Shape::BoundingBox(bbox) => BinaryMask::from_rle(&rle_from_bbox(&bbox, height, width)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<f64> {
        vec![x0, y0, x1, y0, x1, y1, x0, y1]
    }

    #[test]
    fn test_from_rle_is_row_major() {
        // 2 rows x 3 cols, column-major: col 0 = [0, 1], col 1 = [0, 0], col 2 = [1, 1]
        let rle = Rle::encode(&[0, 1, 0, 0, 1, 1], 2, 3).unwrap();
        let mask = BinaryMask::from_rle(&rle).unwrap();
        assert_eq!(mask.dims(), (2, 3));
        assert!(!mask.pixels()[[0, 0]]);
        assert!(mask.pixels()[[1, 0]]);
        assert!(!mask.pixels()[[1, 1]]);
        assert!(mask.pixels()[[0, 2]]);
        assert!(mask.pixels()[[1, 2]]);
        assert_eq!(mask.count(), 3);
    }

    #[test]
    fn test_decode_polygon() {
        let segm = Segmentation::Polygons(vec![square(1.0, 1.0, 4.0, 4.0)]);
        let mask = CocoMaskDecoder
            .decode(Shape::Segmentation(&segm), 6, 6)
            .unwrap();
        assert_eq!(mask.count(), 9);
        for row in 0..6 {
            for col in 0..6 {
                let inside = (1..4).contains(&row) && (1..4).contains(&col);
                assert_eq!(mask.pixels()[[row, col]], inside, "pixel ({row}, {col})");
            }
        }
    }

    #[test]
    fn test_decode_multi_polygon_is_union() {
        let segm = Segmentation::Polygons(vec![
            square(0.0, 0.0, 2.0, 2.0),
            square(4.0, 4.0, 6.0, 6.0),
        ]);
        let mask = CocoMaskDecoder
            .decode(Shape::Segmentation(&segm), 6, 6)
            .unwrap();
        assert_eq!(mask.count(), 8);
        assert!(mask.pixels()[[0, 0]]);
        assert!(mask.pixels()[[5, 5]]);
        assert!(!mask.pixels()[[3, 3]]);
    }

    #[test]
    fn test_decode_uncompressed_rle() {
        let segm = Segmentation::Rle(RleObject {
            counts: RleCounts::Uncompressed(vec![7, 3, 3, 3, 3, 3, 14]),
            size: [6, 6],
        });
        let mask = CocoMaskDecoder
            .decode(Shape::Segmentation(&segm), 6, 6)
            .unwrap();
        assert_eq!(mask.count(), 9);
        assert!(mask.pixels()[[1, 1]]);
        assert!(mask.pixels()[[3, 3]]);
        assert!(!mask.pixels()[[4, 4]]);
    }

    #[test]
    fn test_decode_compressed_rle_matches_polygon() {
        let rle = Segmentation::Rle(RleObject {
            counts: RleCounts::Compressed("733000;".to_string()),
            size: [6, 6],
        });
        let poly = Segmentation::Polygons(vec![square(1.0, 1.0, 4.0, 4.0)]);
        let from_rle = CocoMaskDecoder.decode(Shape::Segmentation(&rle), 6, 6).unwrap();
        let from_poly = CocoMaskDecoder.decode(Shape::Segmentation(&poly), 6, 6).unwrap();
        assert_eq!(from_rle, from_poly);
    }

    #[test]
    fn test_decode_rle_dimension_mismatch() {
        let segm = Segmentation::Rle(RleObject {
            counts: RleCounts::Uncompressed(vec![36]),
            size: [6, 6],
        });
        let err = CocoMaskDecoder
            .decode(Shape::Segmentation(&segm), 6, 8)
            .unwrap_err();
        assert_eq!(
            err,
            MaskError::DimensionMismatch {
                height: 6,
                width: 8,
                found_height: 6,
                found_width: 6,
            }
        );
    }

    #[test]
    fn test_decode_bbox() {
        let mask = CocoMaskDecoder
            .decode(Shape::BoundingBox([2.0, 1.0, 3.0, 2.0]), 6, 8)
            .unwrap();
        assert_eq!(mask.count(), 6);
        assert!(mask.pixels()[[1, 2]]);
        assert!(mask.pixels()[[2, 4]]);
        assert!(!mask.pixels()[[3, 2]]);
        assert!(!mask.pixels()[[1, 5]]);
    }
}
