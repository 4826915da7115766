//! Polygon and bounding-box rasterisation to RLE.
//!
//! Uses the COCO scan-line scheme so masks match what the reference
//! annotation tooling produces pixel for pixel: vertices are upsampled ×5,
//! every edge is walked densely, the points where the boundary crosses a
//! pixel column are downsampled back to pixel space, and the sorted
//! crossings become run boundaries.

use super::rle::Rle;

const SCALE: f64 = 5.0;

/// Bound on upsampled coordinates, so edge lengths always fit in `i64`.
const COORD_LIMIT: i64 = i32::MAX as i64;

/// Upsample one coordinate onto the integer grid.
fn upsample(c: f64) -> i64 {
    ((SCALE * c + 0.5) as i64).clamp(-COORD_LIMIT, COORD_LIMIT)
}

/// Rasterise one flat `[x0, y0, x1, y1, ...]` polygon.
///
/// Coordinates outside the image are clipped. Fewer than one vertex gives
/// an empty mask.
pub fn rle_from_polygon(xy: &[f64], h: u32, w: u32) -> Rle {
    let k = xy.len() / 2;
    if k == 0 || h == 0 || w == 0 {
        return Rle::empty(h, w);
    }

    // Upsampled integer vertices, closed back onto the first one.
    let mut x: Vec<i64> = (0..k).map(|j| upsample(xy[2 * j])).collect();
    let mut y: Vec<i64> = (0..k).map(|j| upsample(xy[2 * j + 1])).collect();
    x.push(x[0]);
    y.push(y[0]);

    // Dense boundary points along every edge.
    let dense: usize = (0..k)
        .map(|j| (x[j] - x[j + 1]).abs().max((y[j] - y[j + 1]).abs()) as usize + 1)
        .sum();
    let mut u: Vec<i64> = Vec::with_capacity(dense);
    let mut v: Vec<i64> = Vec::with_capacity(dense);
    for j in 0..k {
        let (mut xs, mut xe, mut ys, mut ye) = (x[j], x[j + 1], y[j], y[j + 1]);
        let dx = (xe - xs).abs();
        let dy = (ys - ye).abs();
        let flip = (dx >= dy && xs > xe) || (dx < dy && ys > ye);
        if flip {
            std::mem::swap(&mut xs, &mut xe);
            std::mem::swap(&mut ys, &mut ye);
        }
        if dx >= dy {
            let s = if dx == 0 {
                0.0
            } else {
                (ye - ys) as f64 / dx as f64
            };
            for d in 0..=dx {
                let t = if flip { dx - d } else { d };
                u.push(t + xs);
                v.push((ys as f64 + s * t as f64 + 0.5) as i64);
            }
        } else {
            let s = (xe - xs) as f64 / dy as f64;
            for d in 0..=dy {
                let t = if flip { dy - d } else { d };
                v.push(t + ys);
                u.push((xs as f64 + s * t as f64 + 0.5) as i64);
            }
        }
    }

    // Column crossings, downsampled to pixel coordinates.
    let max_col = w as f64 - 1.0;
    let mut crossings: Vec<u64> = Vec::new();
    for j in 1..u.len() {
        if u[j] == u[j - 1] {
            continue;
        }
        let xd = if u[j] < u[j - 1] { u[j] } else { u[j] - 1 } as f64;
        let xd = (xd + 0.5) / SCALE - 0.5;
        if xd.floor() != xd || xd < 0.0 || xd > max_col {
            continue;
        }
        let yd = v[j].min(v[j - 1]) as f64;
        let yd = ((yd + 0.5) / SCALE - 0.5).clamp(0.0, h as f64).ceil();
        crossings.push(xd as u64 * h as u64 + yd as u64);
    }

    // Sorted crossings are run boundaries; zero-length runs fold into the
    // following run.
    crossings.push(h as u64 * w as u64);
    crossings.sort_unstable();
    let mut prev = 0u64;
    for c in crossings.iter_mut() {
        let t = *c;
        *c -= prev;
        prev = t;
    }

    let mut counts: Vec<u32> = Vec::with_capacity(crossings.len());
    counts.push(crossings[0] as u32);
    let mut j = 1;
    while j < crossings.len() {
        if crossings[j] > 0 {
            counts.push(crossings[j] as u32);
            j += 1;
        } else {
            j += 1;
            if j < crossings.len() {
                if let Some(last) = counts.last_mut() {
                    *last += crossings[j] as u32;
                }
                j += 1;
            }
        }
    }

    Rle { h, w, counts }
}

/// Rasterise a `[x, y, width, height]` box as the equivalent polygon.
pub fn rle_from_bbox(bbox: &[f64; 4], h: u32, w: u32) -> Rle {
    let [x, y, bw, bh] = *bbox;
    let (xe, ye) = (x + bw, y + bh);
    rle_from_polygon(&[x, y, x, ye, xe, ye, xe, y], h, w)
}
