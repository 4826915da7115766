//! Perceptual colour maps for rendering instance masks.

use image::{Rgb, RgbImage};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Lookup table resolution; values are quantised to this many colours.
const LUT_SIZE: usize = 256;

/// Available colour maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Inferno,
    Magma,
    Plasma,
    Viridis,
    Cividis,
    Turbo,
}

impl Colormap {
    /// Every supported colour map, in display order.
    pub const ALL: [Colormap; 6] = [
        Colormap::Inferno,
        Colormap::Magma,
        Colormap::Plasma,
        Colormap::Viridis,
        Colormap::Cividis,
        Colormap::Turbo,
    ];

    /// Lower-case name, as used in config files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Colormap::Inferno => "inferno",
            Colormap::Magma => "magma",
            Colormap::Plasma => "plasma",
            Colormap::Viridis => "viridis",
            Colormap::Cividis => "cividis",
            Colormap::Turbo => "turbo",
        }
    }

    /// Parse a colour map name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|c| c.name() == s)
    }

    fn gradient(&self) -> colorous::Gradient {
        match self {
            Colormap::Inferno => colorous::INFERNO,
            Colormap::Magma => colorous::MAGMA,
            Colormap::Plasma => colorous::PLASMA,
            Colormap::Viridis => colorous::VIRIDIS,
            Colormap::Cividis => colorous::CIVIDIS,
            Colormap::Turbo => colorous::TURBO,
        }
    }

    /// The 256-entry colour table, darkest value first.
    pub fn lookup_table(&self) -> Vec<[u8; 3]> {
        let gradient = self.gradient();
        (0..LUT_SIZE)
            .map(|i| {
                let c = gradient.eval_rational(i, LUT_SIZE);
                [c.r, c.g, c.b]
            })
            .collect()
    }

    /// Render a label raster through the colour map.
    ///
    /// Values are normalised to `[0, 1]` against the raster's own min and max
    /// (a constant raster maps to the first colour), then quantised to the
    /// lookup table.
    pub fn apply(&self, values: &Array2<u32>) -> RgbImage {
        let lut = self.lookup_table();
        let (height, width) = values.dim();
        let min = values.iter().copied().min().unwrap_or(0) as f64;
        let max = values.iter().copied().max().unwrap_or(0) as f64;
        let span = max - min;

        RgbImage::from_fn(width as u32, height as u32, |x, y| {
            let v = values[[y as usize, x as usize]] as f64;
            let t = if span > 0.0 { (v - min) / span } else { 0.0 };
            let idx = ((t * LUT_SIZE as f64) as usize).min(LUT_SIZE - 1);
            Rgb(lut[idx])
        })
    }
}

impl std::fmt::Display for Colormap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
