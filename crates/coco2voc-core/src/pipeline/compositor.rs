//! Compositing per-annotation masks into the three label rasters.

use ndarray::{Array2, Zip};

use crate::dataset::{Annotation, Image};
use crate::error::{MaskError, PipelineError, PipelineResult};
use crate::mask::MaskDecoder;

/// Hands out unique instance ids for a whole run.
///
/// Ids increase by one per annotation and are never reused, so the counter
/// must be shared across every image of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdCounter {
    next: u64,
}

impl IdCounter {
    /// Start counting at `start` (0 is reserved for background).
    pub fn new(start: u64) -> Self {
        Self { next: start }
    }

    /// Take the next id.
    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to [`allocate`](Self::allocate) returns.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for IdCounter {
    fn default() -> Self {
        Self::new(1)
    }
}

/// The three label rasters for one image, all `height × width`.
#[derive(Debug, Clone)]
pub struct CompositeMasks {
    /// Category id of the topmost annotation, 0 for background
    pub class: Array2<u32>,
    /// 1-based rank of the topmost annotation, 0 for background
    pub instance: Array2<u32>,
    /// Unique instance id of the topmost annotation, 0 for background
    pub ids: Array2<u64>,
    /// Unique ids allocated for this image, in annotation order
    pub allocated_ids: Vec<u64>,
    /// Annotations painted onto the rasters
    pub composited: usize,
    /// Annotations without any geometry
    pub skipped: usize,
}

/// Paint `annotations` onto zeroed rasters in list order.
///
/// Each annotation gets rank `position + 1` and a fresh id from `counter`;
/// where masks overlap the later annotation wins.
pub fn composite<D: MaskDecoder + ?Sized>(
    image: &Image,
    annotations: &[&Annotation],
    decoder: &D,
    counter: &mut IdCounter,
) -> PipelineResult<CompositeMasks> {
    if u64::from(image.height) * u64::from(image.width) > u64::from(u32::MAX) {
        return Err(PipelineError::ImageTooLarge {
            image_id: image.id,
            height: image.height,
            width: image.width,
        });
    }

    let dims = (image.height as usize, image.width as usize);
    let mut class = Array2::<u32>::zeros(dims);
    let mut instance = Array2::<u32>::zeros(dims);
    let mut ids = Array2::<u64>::zeros(dims);
    let mut allocated_ids = Vec::with_capacity(annotations.len());
    let mut composited = 0;
    let mut skipped = 0;

    for (pos, ann) in annotations.iter().enumerate() {
        let rank = pos as u32 + 1;
        let unique_id = counter.allocate();
        allocated_ids.push(unique_id);

        let Some(shape) = ann.shape() else {
            tracing::warn!(
                "Annotation {} of image {} has no segmentation or bbox, skipping",
                ann.id,
                image.id
            );
            skipped += 1;
            continue;
        };

        let mask_err = |source: MaskError| PipelineError::Mask {
            image_id: image.id,
            annotation_id: ann.id,
            source,
        };
        let mask = decoder
            .decode(shape, image.height, image.width)
            .map_err(mask_err)?;
        let (mask_h, mask_w) = mask.dims();
        if (mask_h, mask_w) != (image.height, image.width) {
            return Err(mask_err(MaskError::DimensionMismatch {
                height: image.height,
                width: image.width,
                found_height: mask_h,
                found_width: mask_w,
            }));
        }

        Zip::from(&mut class)
            .and(&mut instance)
            .and(&mut ids)
            .and(mask.pixels())
            .for_each(|c, r, id, &on| {
                if on {
                    *c = ann.category_id;
                    *r = rank;
                    *id = unique_id;
                }
            });
        composited += 1;
    }

    Ok(CompositeMasks {
        class,
        instance,
        ids,
        allocated_ids,
        composited,
        skipped,
    })
}
