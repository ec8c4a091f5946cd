// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-channel f32 planes and the border-aware correlation primitives the
// rest of the pipeline is built on.

use image::{ImageBuffer, Luma};

/// A single-channel floating-point image. Pipeline values live in [0, 1]
/// unless a stage says otherwise.
pub type Plane = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Dynamic ranges below this are treated as flat.
pub const FLAT_RANGE: f32 = 1e-6;

/// Value substituted for every pixel of a flat plane.
pub const FLAT_FILL: f32 = 0.5;

/// A plane of the given size with every sample set to `value`.
pub fn filled(width: u32, height: u32, value: f32) -> Plane {
    ImageBuffer::from_pixel(width, height, Luma([value]))
}

pub fn is_empty(plane: &Plane) -> bool {
    plane.width() == 0 || plane.height() == 0
}

/// Smallest and largest sample, or `None` for an empty plane.
pub fn min_max(plane: &Plane) -> Option<(f32, f32)> {
    let mut iter = plane.as_raw().iter().copied();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// Result of [`normalize_min_max`].
#[derive(Debug, Clone)]
pub struct Normalized {
    pub plane: Plane,
    /// The input range was below [`FLAT_RANGE`] and the plane was replaced
    /// by [`FLAT_FILL`].
    pub flat: bool,
}

/// Rescale to [0, 1] by the observed range.
///
/// `(v - min) / (max - min + 1e-6)`; a flat plane becomes a constant
/// [`FLAT_FILL`] instead of dividing by (almost) zero.
pub fn normalize_min_max(plane: &Plane) -> Normalized {
    let (lo, hi) = match min_max(plane) {
        Some(range) => range,
        None => {
            return Normalized {
                plane: plane.clone(),
                flat: false,
            };
        }
    };

    let range = hi - lo;
    if range.is_nan() || range < FLAT_RANGE {
        return Normalized {
            plane: filled(plane.width(), plane.height(), FLAT_FILL),
            flat: true,
        };
    }

    let scale = 1.0 / (range + FLAT_RANGE);
    let mut out = plane.clone();
    for v in out.iter_mut() {
        *v = (*v - lo) * scale;
    }
    Normalized { plane: out, flat: false }
}

/// Map a possibly out-of-range coordinate back into `0..len` by mirroring
/// without repeating the edge sample (`dcb|abcd|cba`).
#[inline]
pub(crate) fn reflect_101(i: isize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let m = i.rem_euclid(period);
    if m >= len as isize {
        (period - m) as usize
    } else {
        m as usize
    }
}

/// Precomputed reflected source indices for every output position and tap.
///
/// `table[pos * taps + k]` is the source index read by tap `k` at `pos`.
fn reflect_table(len: usize, taps: usize, anchor: usize) -> Vec<usize> {
    let mut table = Vec::with_capacity(len * taps);
    for pos in 0..len {
        for k in 0..taps {
            table.push(reflect_101(pos as isize + k as isize - anchor as isize, len));
        }
    }
    table
}

/// Dense 2-D correlation with a `ksize x ksize` kernel anchored at its
/// centre tap, reflect-101 borders. Output has the input's shape.
pub(crate) fn correlate(src: &Plane, kernel: &[f32], ksize: usize) -> Plane {
    debug_assert_eq!(kernel.len(), ksize * ksize);
    let (w, h) = (src.width() as usize, src.height() as usize);
    let anchor = ksize / 2;
    let xs = reflect_table(w, ksize, anchor);
    let ys = reflect_table(h, ksize, anchor);
    let data = src.as_raw();

    ImageBuffer::from_fn(src.width(), src.height(), |x, y| {
        let (x, y) = (x as usize, y as usize);
        let xi = &xs[x * ksize..(x + 1) * ksize];
        let yi = &ys[y * ksize..(y + 1) * ksize];
        let mut acc = 0.0f32;
        for (ky, &sy) in yi.iter().enumerate() {
            let row = &data[sy * w..(sy + 1) * w];
            let krow = &kernel[ky * ksize..(ky + 1) * ksize];
            for (&k, &sx) in krow.iter().zip(xi) {
                acc += k * row[sx];
            }
        }
        Luma([acc])
    })
}

/// Separable correlation: `kx` along rows, then `ky` along columns, both
/// anchored at their centre tap with reflect-101 borders.
pub(crate) fn correlate_separable(src: &Plane, kx: &[f32], ky: &[f32]) -> Plane {
    let (w, h) = (src.width() as usize, src.height() as usize);
    let xs = reflect_table(w, kx.len(), kx.len() / 2);
    let ys = reflect_table(h, ky.len(), ky.len() / 2);
    let data = src.as_raw();

    let horizontal: Plane = ImageBuffer::from_fn(src.width(), src.height(), |x, y| {
        let row = &data[y as usize * w..(y as usize + 1) * w];
        let xi = &xs[x as usize * kx.len()..(x as usize + 1) * kx.len()];
        Luma([kx.iter().zip(xi).map(|(&k, &sx)| k * row[sx]).sum::<f32>()])
    });

    let tmp = horizontal.as_raw();
    ImageBuffer::from_fn(src.width(), src.height(), |x, y| {
        let yi = &ys[y as usize * ky.len()..(y as usize + 1) * ky.len()];
        Luma([ky
            .iter()
            .zip(yi)
            .map(|(&k, &sy)| k * tmp[sy * w + x as usize])
            .sum::<f32>()])
    })
}
