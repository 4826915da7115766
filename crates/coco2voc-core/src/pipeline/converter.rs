//! Batch driver - walks the index and writes every image's label rasters.

use std::path::Path;
use std::time::Instant;

use crate::config::{Config, ConversionConfig, OutputConfig};
use crate::dataset::{Annotation, CocoIndex, Image};
use crate::error::PipelineResult;
use crate::mask::{CocoMaskDecoder, MaskDecoder};
use crate::types::ConversionStats;

use super::compositor::{composite, IdCounter};
use super::layout::OutputLayout;
use super::manifest::Manifest;
use super::writer::MaskWriter;

/// Reported after each converted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionProgress {
    /// Image that was just written
    pub image_id: u64,
    /// Images converted so far, including this one
    pub converted: usize,
    /// Images the run will convert in total
    pub total: usize,
}

/// Converts a COCO index into class, instance and id label files.
pub struct Converter<D: MaskDecoder = CocoMaskDecoder> {
    conversion: ConversionConfig,
    output: OutputConfig,
    decoder: D,
}

impl Converter<CocoMaskDecoder> {
    /// Create a converter using the built-in COCO decoder.
    pub fn new(config: &Config) -> Self {
        Self::with_decoder(config, CocoMaskDecoder::new())
    }
}

impl<D: MaskDecoder> Converter<D> {
    /// Create a converter with a custom mask decoder.
    pub fn with_decoder(config: &Config, decoder: D) -> Self {
        Self {
            conversion: config.conversion.clone(),
            output: config.output.clone(),
            decoder,
        }
    }

    /// Number of images a run over `index` will convert.
    ///
    /// Images left without annotations are not counted; the cap applies on top.
    pub fn planned(&self, index: &CocoIndex) -> usize {
        let convertible = index
            .images()
            .iter()
            .filter(|image| !self.annotations_for(index, image).0.is_empty())
            .count();
        match self.conversion.limit {
            Some(limit) => convertible.min(limit),
            None => convertible,
        }
    }

    /// Convert `index` into `target`, numbering instances from the configured
    /// start id.
    pub fn run(&self, index: &CocoIndex, target: &Path) -> PipelineResult<ConversionStats> {
        let mut counter = IdCounter::new(self.conversion.start_id);
        self.run_with(index, target, &mut counter, |_| {})
    }

    /// Convert `index` into `target`, drawing unique ids from `counter` and
    /// calling `on_progress` after every converted image.
    ///
    /// The first error aborts the run. Files and manifest lines already
    /// written are left in place.
    pub fn run_with<F>(
        &self,
        index: &CocoIndex,
        target: &Path,
        counter: &mut IdCounter,
        mut on_progress: F,
    ) -> PipelineResult<ConversionStats>
    where
        F: FnMut(&ConversionProgress),
    {
        let start = Instant::now();
        let layout = OutputLayout::new(target, &self.output);
        layout.create_dirs()?;
        let mut manifest = Manifest::open(layout.manifest_path())?;
        let writer = MaskWriter::new(layout, self.output.colormap, self.conversion.compress);

        let total = self.planned(index);
        tracing::info!(
            "Converting {} of {} images into {:?}",
            total,
            index.images().len(),
            target
        );

        let interval = self.conversion.progress_interval.max(1);
        let mut stats = ConversionStats {
            first_id: counter.peek(),
            ..Default::default()
        };

        for image in index.images() {
            if self
                .conversion
                .limit
                .is_some_and(|limit| stats.images_converted >= limit)
            {
                tracing::debug!("Reached limit of {} images", stats.images_converted);
                break;
            }
            stats.images_seen += 1;

            let (annotations, crowd_dropped) = self.annotations_for(index, image);
            stats.crowd_dropped += crowd_dropped;
            if annotations.is_empty() {
                tracing::debug!("Image {} has no annotations, skipping", image.id);
                stats.images_skipped += 1;
                continue;
            }

            let masks = composite(image, &annotations, &self.decoder, counter)?;
            writer.write(image.id, &masks)?;
            manifest.record(image.id)?;

            stats.images_converted += 1;
            stats.annotations_composited += masks.composited;
            stats.annotations_skipped += masks.skipped;

            on_progress(&ConversionProgress {
                image_id: image.id,
                converted: stats.images_converted,
                total,
            });

            if stats.images_converted % interval == 0 {
                tracing::info!(
                    "{} images converted in {:.2} seconds",
                    stats.images_converted,
                    start.elapsed().as_secs_f64()
                );
            }
        }

        stats.next_id = counter.peek();
        stats.finish(start.elapsed().as_secs_f64());
        tracing::info!(
            "Done: {} images converted, {} skipped, ids {}..{} ({:.2}s)",
            stats.images_converted,
            stats.images_skipped,
            stats.first_id,
            stats.next_id,
            stats.total_seconds
        );
        tracing::debug!("Appended {} ids to the manifest", manifest.lines_written());
        Ok(stats)
    }

    /// The image's annotations in file order, minus crowd regions when those
    /// are excluded. Also returns how many crowd annotations were dropped.
    fn annotations_for<'a>(
        &self,
        index: &'a CocoIndex,
        image: &Image,
    ) -> (Vec<&'a Annotation>, usize) {
        let mut annotations = index.load_anns(index.ann_ids(image.id));
        if self.conversion.include_crowd {
            return (annotations, 0);
        }
        let before = annotations.len();
        annotations.retain(|ann| !ann.is_crowd());
        let dropped = before - annotations.len();
        (annotations, dropped)
    }
}
