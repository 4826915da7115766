//! Writing label rasters to disk: PNG for class and instance masks,
//! NumPy `.npy` / `.npz` for unique-id masks.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use ndarray::Array2;
use ndarray_npy::NpzWriter;

use crate::error::{PipelineError, PipelineResult};

use super::colormap::Colormap;
use super::compositor::CompositeMasks;
use super::layout::OutputLayout;

/// Array name used inside `.npz` archives (NumPy's default for positional arrays).
pub const NPZ_ARRAY_NAME: &str = "arr_0";

/// Paths written for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub class: PathBuf,
    pub instance: PathBuf,
    pub ids: PathBuf,
}

/// Writes the three rasters of an image into an [`OutputLayout`].
pub struct MaskWriter {
    layout: OutputLayout,
    colormap: Colormap,
    compress: bool,
}

impl MaskWriter {
    pub fn new(layout: OutputLayout, colormap: Colormap, compress: bool) -> Self {
        Self {
            layout,
            colormap,
            compress,
        }
    }

    /// Write class, instance and id masks for `image_id`.
    pub fn write(&self, image_id: u64, masks: &CompositeMasks) -> PipelineResult<WrittenFiles> {
        let class = self.layout.class_path(image_id);
        save_png(&class_image(image_id, &masks.class), &class)?;

        let instance = self.layout.instance_path(image_id);
        save_png(&self.colormap.apply(&masks.instance), &instance)?;

        let ids = self.layout.id_path(image_id, self.compress);
        if self.compress {
            write_npz(&ids, &masks.ids)?;
        } else {
            write_npy(&ids, &masks.ids)?;
        }

        Ok(WrittenFiles {
            class,
            instance,
            ids,
        })
    }
}

/// Grey 3-channel rendering of the class raster.
///
/// Channels hold the category id cast to a byte, so ids above 255 wrap.
pub fn class_image(image_id: u64, class: &Array2<u32>) -> RgbImage {
    if class.iter().any(|&c| c > u8::MAX as u32) {
        tracing::warn!(
            "Image {} has category ids above 255; class mask values wrap modulo 256",
            image_id
        );
    }
    let (height, width) = class.dim();
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let v = class[[y as usize, x as usize]] as u8;
        Rgb([v, v, v])
    })
}

fn save_png(img: &RgbImage, path: &Path) -> PipelineResult<()> {
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| PipelineError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

fn write_npy(path: &Path, ids: &Array2<u64>) -> PipelineResult<()> {
    ndarray_npy::write_npy(path, ids).map_err(|e| PipelineError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn write_npz(path: &Path, ids: &Array2<u64>) -> PipelineResult<()> {
    let write_err = |message: String| PipelineError::Write {
        path: path.to_path_buf(),
        message,
    };
    let file = File::create(path).map_err(|e| write_err(e.to_string()))?;
    let mut npz = NpzWriter::new_compressed(BufWriter::new(file));
    npz.add_array(NPZ_ARRAY_NAME, ids)
        .map_err(|e| write_err(e.to_string()))?;
    npz.finish().map_err(|e| write_err(e.to_string()))?;
    Ok(())
}
