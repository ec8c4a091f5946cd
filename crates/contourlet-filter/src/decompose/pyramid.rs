// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Gaussian-style reduction pyramid. Each level is a smoothed, half-size copy
// of the previous one; no band-pass residual is kept.

use image::{ImageBuffer, Luma};
use tracing::debug;

use crate::plane::{Plane, is_empty, reflect_101};

/// 5-tap binomial smoothing kernel applied before decimation.
const REDUCE_TAPS: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

/// Levels narrower or shorter than this are not built.
pub const MIN_LEVEL_SIZE: u32 = 2;

/// Build up to `num_levels` levels, level 0 being a copy of `base`.
///
/// Stops early when the next level would be smaller than
/// [`MIN_LEVEL_SIZE`] on either axis. An empty `base` yields no levels. A
/// request for zero levels is treated as one.
pub fn build_pyramid(base: &Plane, num_levels: usize) -> Vec<Plane> {
    if is_empty(base) {
        return Vec::new();
    }

    let mut levels = Vec::with_capacity(num_levels.max(1));
    levels.push(base.clone());

    while levels.len() < num_levels {
        let Some(prev) = levels.last() else { break };
        match reduce(prev) {
            Some(next) => levels.push(next),
            None => {
                debug!(
                    built = levels.len(),
                    requested = num_levels,
                    "pyramid truncated at minimum level size"
                );
                break;
            }
        }
    }

    levels
}

/// Blur with [`REDUCE_TAPS`] on both axes and keep every other sample.
///
/// Returns `None` if the result would be smaller than [`MIN_LEVEL_SIZE`].
/// The output is `floor(w/2) x floor(h/2)`.
pub fn reduce(src: &Plane) -> Option<Plane> {
    let (out_w, out_h) = (src.width() / 2, src.height() / 2);
    if out_w < MIN_LEVEL_SIZE || out_h < MIN_LEVEL_SIZE {
        return None;
    }

    let (w, h) = (src.width() as usize, src.height() as usize);
    let data = src.as_raw();
    let taps = REDUCE_TAPS.len() as isize;
    let anchor = taps / 2;

    // Horizontal pass, only at the even columns that survive decimation.
    let mut rows = vec![0.0f32; out_w as usize * h];
    for y in 0..h {
        let row = &data[y * w..(y + 1) * w];
        for ox in 0..out_w as usize {
            let cx = (2 * ox) as isize;
            rows[y * out_w as usize + ox] = (0..taps)
                .map(|k| REDUCE_TAPS[k as usize] * row[reflect_101(cx + k - anchor, w)])
                .sum();
        }
    }

    Some(ImageBuffer::from_fn(out_w, out_h, |ox, oy| {
        let cy = (2 * oy) as isize;
        Luma([(0..taps)
            .map(|k| {
                let sy = reflect_101(cy + k - anchor, h);
                REDUCE_TAPS[k as usize] * rows[sy * out_w as usize + ox as usize]
            })
            .sum::<f32>()])
    }))
}
