//! In-memory index over a COCO annotation file.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Serialize;

use crate::error::DatasetError;

use super::types::{Annotation, Category, CocoFile, Image};

/// Lookup tables built once from a [`CocoFile`].
///
/// Images keep file order. Annotations are grouped per image in file order,
/// which is the order the compositor paints them in.
#[derive(Debug, Clone, Default)]
pub struct CocoIndex {
    images: Vec<Image>,
    annotations: Vec<Annotation>,
    categories: Vec<Category>,
    image_pos: HashMap<u64, usize>,
    ann_pos: HashMap<u64, usize>,
    anns_by_image: HashMap<u64, Vec<u64>>,
    category_pos: HashMap<u32, usize>,
}

/// Counts describing an annotation file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub images: usize,
    pub images_with_annotations: usize,
    pub annotations: usize,
    pub crowd_annotations: usize,
    pub orphan_annotations: usize,
    pub categories: usize,
    /// `(category id, name, annotation count)`, ordered by category id
    pub per_category: Vec<(u32, String, usize)>,
}

impl CocoIndex {
    /// Read and index an annotation file.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let start = std::time::Instant::now();
        tracing::info!("Loading annotations from {:?}", path);

        let file = File::open(path).map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset: CocoFile = serde_json::from_reader(BufReader::new(file)).map_err(
            |source| DatasetError::Parse {
                path: path.to_path_buf(),
                source,
            },
        )?;
        tracing::debug!("Parsed annotation file in {:?}", start.elapsed());

        let index = Self::from_dataset(dataset);
        tracing::info!(
            "Index created: {} images, {} annotations, {} categories ({:.2}s)",
            index.images.len(),
            index.annotations.len(),
            index.categories.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(index)
    }

    /// Index an already parsed annotation file.
    pub fn from_dataset(dataset: CocoFile) -> Self {
        let mut images: Vec<Image> = Vec::with_capacity(dataset.images.len());
        let mut image_pos = HashMap::with_capacity(dataset.images.len());
        for image in dataset.images {
            // Same id twice: the later record wins but keeps the first slot.
            match image_pos.get(&image.id) {
                Some(&pos) => {
                    tracing::warn!("Duplicate image id {} in annotation file", image.id);
                    images[pos] = image;
                }
                None => {
                    image_pos.insert(image.id, images.len());
                    images.push(image);
                }
            }
        }

        let mut ann_pos = HashMap::with_capacity(dataset.annotations.len());
        let mut anns_by_image: HashMap<u64, Vec<u64>> = HashMap::new();
        for (pos, ann) in dataset.annotations.iter().enumerate() {
            ann_pos.insert(ann.id, pos);
            anns_by_image.entry(ann.image_id).or_default().push(ann.id);
        }

        let category_pos = dataset
            .categories
            .iter()
            .enumerate()
            .map(|(pos, cat)| (cat.id, pos))
            .collect();

        Self {
            images,
            annotations: dataset.annotations,
            categories: dataset.categories,
            image_pos,
            ann_pos,
            anns_by_image,
            category_pos,
        }
    }

    /// All images, in file order.
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Look up an image by id.
    pub fn image(&self, id: u64) -> Option<&Image> {
        self.image_pos.get(&id).map(|&pos| &self.images[pos])
    }

    /// Ids of the annotations on an image, in file order.
    pub fn ann_ids(&self, image_id: u64) -> &[u64] {
        self.anns_by_image
            .get(&image_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resolve annotation ids to records, skipping unknown ids.
    pub fn load_anns(&self, ids: &[u64]) -> Vec<&Annotation> {
        ids.iter()
            .filter_map(|id| self.ann_pos.get(id).map(|&pos| &self.annotations[pos]))
            .collect()
    }

    /// Look up a category by id.
    pub fn category(&self, id: u32) -> Option<&Category> {
        self.category_pos.get(&id).map(|&pos| &self.categories[pos])
    }

    /// All categories, in file order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Compute counts for `coco2voc info`.
    pub fn summary(&self) -> DatasetSummary {
        let images_with_annotations = self
            .images
            .iter()
            .filter(|img| !self.ann_ids(img.id).is_empty())
            .count();
        let orphan_annotations = self
            .annotations
            .iter()
            .filter(|ann| !self.image_pos.contains_key(&ann.image_id))
            .count();
        let crowd_annotations = self.annotations.iter().filter(|a| a.is_crowd()).count();

        let mut per_category: HashMap<u32, usize> = HashMap::new();
        for ann in &self.annotations {
            *per_category.entry(ann.category_id).or_default() += 1;
        }
        let mut per_category: Vec<(u32, String, usize)> = per_category
            .into_iter()
            .map(|(id, count)| {
                let name = self
                    .category(id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "<unknown>".to_string());
                (id, name, count)
            })
            .collect();
        per_category.sort_by_key(|(id, _, _)| *id);

        DatasetSummary {
            images: self.images.len(),
            images_with_annotations,
            annotations: self.annotations.len(),
            crowd_annotations,
            orphan_annotations,
            categories: self.categories.len(),
            per_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::types::Segmentation;

    fn image(id: u64) -> Image {
        Image {
            id,
            width: 8,
            height: 6,
            file_name: Some(format!("{id:012}.jpg")),
        }
    }

    fn annotation(id: u64, image_id: u64, category_id: u32) -> Annotation {
        Annotation {
            id,
            image_id,
            category_id,
            segmentation: Some(Segmentation::Polygons(vec![vec![
                0.0, 0.0, 2.0, 0.0, 2.0, 2.0,
            ]])),
            bbox: None,
            area: None,
            iscrowd: 0,
        }
    }

    fn sample() -> CocoIndex {
        CocoIndex::from_dataset(CocoFile {
            images: vec![image(30), image(10), image(20)],
            annotations: vec![
                annotation(101, 10, 1),
                annotation(102, 30, 2),
                annotation(103, 10, 2),
                annotation(104, 99, 1),
            ],
            categories: vec![
                Category {
                    id: 1,
                    name: "person".into(),
                    supercategory: None,
                },
                Category {
                    id: 2,
                    name: "dog".into(),
                    supercategory: Some("animal".into()),
                },
            ],
        })
    }

    #[test]
    fn test_images_keep_file_order() {
        let index = sample();
        let ids: Vec<u64> = index.images().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn test_ann_ids_keep_file_order() {
        let index = sample();
        assert_eq!(index.ann_ids(10), &[101, 103]);
        assert_eq!(index.ann_ids(30), &[102]);
        assert!(index.ann_ids(20).is_empty());
    }

    #[test]
    fn test_load_anns_skips_unknown_ids() {
        let index = sample();
        let anns = index.load_anns(&[103, 555, 101]);
        let ids: Vec<u64> = anns.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![103, 101]);
    }

    #[test]
    fn test_duplicate_image_keeps_first_position() {
        let mut replacement = image(10);
        replacement.width = 99;
        let index = CocoIndex::from_dataset(CocoFile {
            images: vec![image(10), image(20), replacement],
            ..Default::default()
        });
        assert_eq!(index.images().len(), 2);
        assert_eq!(index.images()[0].id, 10);
        assert_eq!(index.image(10).unwrap().width, 99);
    }

    #[test]
    fn test_summary_counts() {
        let summary = sample().summary();
        assert_eq!(summary.images, 3);
        assert_eq!(summary.images_with_annotations, 2);
        assert_eq!(summary.annotations, 4);
        assert_eq!(summary.orphan_annotations, 1);
        assert_eq!(summary.crowd_annotations, 0);
        assert_eq!(
            summary.per_category,
            vec![(1, "person".to_string(), 2), (2, "dog".to_string(), 2)]
        );
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = CocoIndex::load(&path).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { .. }));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CocoIndex::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Read { .. }));
    }
}
