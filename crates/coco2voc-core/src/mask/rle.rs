//! COCO run-length encoding.
//!
//! Runs are column-major (pixel `(row, col)` is at offset `row + h * col`),
//! alternate between 0 and 1, and always start with a (possibly empty) run
//! of zeros.

use crate::error::MaskError;

/// A run-length encoded binary mask.
///
/// `h * w` must fit in a `u32`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rle {
    pub h: u32,
    pub w: u32,
    pub counts: Vec<u32>,
}

impl Rle {
    /// An all-zero mask.
    pub fn empty(h: u32, w: u32) -> Self {
        Self {
            h,
            w,
            counts: vec![h * w],
        }
    }

    /// Number of pixels covered by the mask.
    pub fn pixel_count(&self) -> usize {
        self.h as usize * self.w as usize
    }

    /// Encode a column-major mask (nonzero = foreground).
    pub fn encode(mask: &[u8], h: u32, w: u32) -> Result<Self, MaskError> {
        let n = h as usize * w as usize;
        if mask.len() != n {
            return Err(MaskError::InvalidRle(format!(
                "mask has {} pixels, expected {h}x{w}",
                mask.len()
            )));
        }

        let mut counts = Vec::new();
        let mut prev = false;
        let mut run = 0u32;
        for &v in mask {
            let v = v != 0;
            if v != prev {
                counts.push(run);
                run = 0;
                prev = v;
            }
            run += 1;
        }
        counts.push(run);
        Ok(Self { h, w, counts })
    }

    /// Decode into a column-major 0/1 mask of `h * w` bytes.
    ///
    /// Runs past the end of the image are clipped; a short encoding leaves
    /// the remainder as background.
    pub fn decode(&self) -> Vec<u8> {
        let n = self.pixel_count();
        let mut mask = vec![0u8; n];
        let mut idx = 0usize;
        let mut value = 0u8;
        for &count in &self.counts {
            let end = (idx + count as usize).min(n);
            if value == 1 {
                mask[idx..end].fill(1);
            }
            idx = end;
            value ^= 1;
        }
        mask
    }

    /// Foreground pixel count (sum of the odd-indexed runs).
    pub fn area(&self) -> u64 {
        self.counts.iter().skip(1).step_by(2).map(|&c| c as u64).sum()
    }

    /// Parse the COCO compressed counts string.
    ///
    /// Each count is a little-endian sequence of 5-bit groups offset by 48,
    /// bit 5 flagging continuation and bit 4 of the last group carrying the
    /// sign. From the fourth count on, values are deltas against the count
    /// two positions back.
    pub fn from_compressed(s: &str, h: u32, w: u32) -> Result<Self, MaskError> {
        let bytes = s.as_bytes();
        let mut counts: Vec<u32> = Vec::new();
        let mut p = 0usize;

        while p < bytes.len() {
            let mut x: i64 = 0;
            let mut k = 0u32;
            let mut more = true;
            while more {
                let Some(&byte) = bytes.get(p) else {
                    return Err(MaskError::InvalidRle(
                        "compressed counts end mid-value".to_string(),
                    ));
                };
                if !(48..48 + 64).contains(&byte) {
                    return Err(MaskError::InvalidRle(format!(
                        "invalid character {:?} in compressed counts",
                        byte as char
                    )));
                }
                if k >= 12 {
                    return Err(MaskError::InvalidRle(
                        "compressed count is too long".to_string(),
                    ));
                }
                let c = (byte - 48) as i64;
                x |= (c & 0x1f) << (5 * k);
                more = c & 0x20 != 0;
                p += 1;
                k += 1;
                if !more && c & 0x10 != 0 {
                    x |= -1i64 << (5 * k);
                }
            }
            if counts.len() > 2 {
                x += counts[counts.len() - 2] as i64;
            }
            let count = u32::try_from(x).map_err(|_| {
                MaskError::InvalidRle(format!("count {x} out of range"))
            })?;
            counts.push(count);
        }

        Ok(Self { h, w, counts })
    }

    /// Serialize counts to the COCO compressed string.
    pub fn to_compressed(&self) -> String {
        let mut s = String::new();
        for (i, &count) in self.counts.iter().enumerate() {
            let mut x = count as i64;
            if i > 2 {
                x -= self.counts[i - 2] as i64;
            }
            loop {
                let mut c = (x & 0x1f) as u8;
                x >>= 5;
                let more = if c & 0x10 != 0 { x != -1 } else { x != 0 };
                if more {
                    c |= 0x20;
                }
                s.push((c + 48) as char);
                if !more {
                    break;
                }
            }
        }
        s
    }
}
