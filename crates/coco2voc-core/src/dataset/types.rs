//! COCO annotation file structures.
//!
//! Only the fields the converter reads are modelled; `info`, `licenses`
//! and any extra keys are ignored on load.

use serde::{Deserialize, Serialize};

/// A whole COCO annotation file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CocoFile {
    pub images: Vec<Image>,
    pub annotations: Vec<Annotation>,
    pub categories: Vec<Category>,
}

/// COCO image record.
///
/// Masks are run-length encoded with `u32` counts, so `width * height` must
/// not exceed `u32::MAX`; larger images are rejected at conversion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// COCO category record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supercategory: Option<String>,
}

/// COCO annotation record: one labelled region of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u64,
    pub image_id: u64,
    pub category_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segmentation: Option<Segmentation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>, // [x, y, width, height]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default)]
    pub iscrowd: u8,
}

impl Annotation {
    /// Whether this annotation marks a crowd region (`iscrowd = 1`).
    pub fn is_crowd(&self) -> bool {
        self.iscrowd != 0
    }

    /// The shape to rasterise for this annotation.
    ///
    /// Falls back to the bounding box when the segmentation is missing or an
    /// empty polygon list.
    pub fn shape(&self) -> Option<Shape<'_>> {
        match &self.segmentation {
            Some(Segmentation::Polygons(polys)) if polys.is_empty() => {
                self.bbox.map(Shape::BoundingBox)
            }
            Some(segm) => Some(Shape::Segmentation(segm)),
            None => self.bbox.map(Shape::BoundingBox),
        }
    }
}

/// Shape encoding of a COCO segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segmentation {
    /// One or more flat `[x0, y0, x1, y1, ...]` polygons
    Polygons(Vec<Vec<f64>>),
    /// Run-length encoded bitmap
    Rle(RleObject),
}

/// RLE segmentation as stored in the annotation file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RleObject {
    pub counts: RleCounts,
    /// `[height, width]`
    pub size: [u32; 2],
}

/// RLE counts, either a plain list or the COCO compressed string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RleCounts {
    Uncompressed(Vec<u32>),
    Compressed(String),
}

/// A shape handed to a mask decoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    Segmentation(&'a Segmentation),
    /// `[x, y, width, height]`
    BoundingBox([f64; 4]),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(segmentation: Option<Segmentation>, bbox: Option<[f64; 4]>) -> Annotation {
        Annotation {
            id: 1,
            image_id: 1,
            category_id: 3,
            segmentation,
            bbox,
            area: None,
            iscrowd: 0,
        }
    }

    #[test]
    fn test_parse_polygon_segmentation() {
        let json = r#"{"id": 5, "image_id": 2, "category_id": 18,
            "segmentation": [[1.0, 1.0, 4.0, 1.0, 4.0, 4.0]], "bbox": [1, 1, 3, 3]}"#;
        let ann: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(ann.category_id, 18);
        assert!(!ann.is_crowd());
        assert!(matches!(ann.segmentation, Some(Segmentation::Polygons(ref p)) if p.len() == 1));
    }

    #[test]
    fn test_parse_uncompressed_rle() {
        let json = r#"{"id": 5, "image_id": 2, "category_id": 1, "iscrowd": 1,
            "segmentation": {"counts": [7, 3, 26], "size": [6, 6]}}"#;
        let ann: Annotation = serde_json::from_str(json).unwrap();
        assert!(ann.is_crowd());
        match ann.segmentation {
            Some(Segmentation::Rle(rle)) => {
                assert_eq!(rle.size, [6, 6]);
                assert_eq!(rle.counts, RleCounts::Uncompressed(vec![7, 3, 26]));
            }
            other => panic!("expected RLE, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_compressed_rle() {
        let json = r#"{"id": 5, "image_id": 2, "category_id": 1,
            "segmentation": {"counts": "733000;", "size": [6, 6]}}"#;
        let ann: Annotation = serde_json::from_str(json).unwrap();
        match ann.segmentation {
            Some(Segmentation::Rle(rle)) => {
                assert_eq!(rle.counts, RleCounts::Compressed("733000;".to_string()));
            }
            other => panic!("expected RLE, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_file_ignores_extra_sections() {
        let json = r#"{"info": {"year": 2017}, "licenses": [],
            "images": [{"id": 1, "width": 4, "height": 3, "file_name": "a.jpg", "license": 2}]}"#;
        let file: CocoFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.images.len(), 1);
        assert!(file.annotations.is_empty());
        assert!(file.categories.is_empty());
    }

    #[test]
    fn test_shape_prefers_segmentation() {
        let segm = Segmentation::Polygons(vec![vec![0.0, 0.0, 2.0, 0.0, 2.0, 2.0]]);
        let ann = annotation(Some(segm.clone()), Some([0.0, 0.0, 2.0, 2.0]));
        assert_eq!(ann.shape(), Some(Shape::Segmentation(&segm)));
    }

    #[test]
    fn test_shape_falls_back_to_bbox() {
        let ann = annotation(None, Some([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(ann.shape(), Some(Shape::BoundingBox([1.0, 2.0, 3.0, 4.0])));

        let ann = annotation(
            Some(Segmentation::Polygons(vec![])),
            Some([1.0, 2.0, 3.0, 4.0]),
        );
        assert_eq!(ann.shape(), Some(Shape::BoundingBox([1.0, 2.0, 3.0, 4.0])));
    }

    #[test]
    fn test_shape_none_without_geometry() {
        let ann = annotation(None, None);
        assert_eq!(ann.shape(), None);
    }
}
