// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversions between the 8-bit images handed to the transform and the
// grayscale float plane the numeric core works on, plus the final colour
// re-projection.

use contourlet_core::error::{ContourletError, Result};
use image::{DynamicImage, GenericImageView, GrayImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};

use crate::plane::Plane;

/// Weight of the original colour image in the final blend.
pub const ORIGINAL_WEIGHT: f32 = 0.4;
/// Weight of the enhanced grayscale in the final blend.
pub const ENHANCED_WEIGHT: f32 = 0.6;

/// Pixel layouts the transform accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl Layout {
    pub fn of(image: &DynamicImage) -> Result<Self> {
        match image {
            DynamicImage::ImageLuma8(_) => Ok(Self::Gray),
            DynamicImage::ImageLumaA8(_) => Ok(Self::GrayAlpha),
            DynamicImage::ImageRgb8(_) => Ok(Self::Rgb),
            DynamicImage::ImageRgba8(_) => Ok(Self::Rgba),
            other => Err(ContourletError::UnsupportedPixelFormat(format!(
                "{:?}",
                other.color()
            ))),
        }
    }

    pub fn is_color(self) -> bool {
        matches!(self, Self::Rgb | Self::Rgba)
    }
}

/// BT.601 luma in 14-bit fixed point, rounded to the nearest 8-bit value.
#[inline]
pub fn luma_bt601(r: u8, g: u8, b: u8) -> u8 {
    const R: u32 = 4899; // 0.299 * 2^14
    const G: u32 = 9617; // 0.587 * 2^14
    const B: u32 = 1868; // 0.114 * 2^14
    ((r as u32 * R + g as u32 * G + b as u32 * B + (1 << 13)) >> 14) as u8
}

/// Grayscale plane in [0, 1] for any supported layout.
pub fn to_gray_plane(image: &DynamicImage) -> Result<Plane> {
    let (w, h) = (image.width(), image.height());
    let scale = |v: u8| v as f32 / 255.0;
    let plane = match image {
        DynamicImage::ImageLuma8(img) => {
            ImageBuffer::from_fn(w, h, |x, y| Luma([scale(img.get_pixel(x, y).0[0])]))
        }
        DynamicImage::ImageLumaA8(img) => {
            ImageBuffer::from_fn(w, h, |x, y| Luma([scale(img.get_pixel(x, y).0[0])]))
        }
        DynamicImage::ImageRgb8(img) => ImageBuffer::from_fn(w, h, |x, y| {
            let Rgb([r, g, b]) = *img.get_pixel(x, y);
            Luma([scale(luma_bt601(r, g, b))])
        }),
        DynamicImage::ImageRgba8(img) => ImageBuffer::from_fn(w, h, |x, y| {
            let Rgba([r, g, b, _]) = *img.get_pixel(x, y);
            Luma([scale(luma_bt601(r, g, b))])
        }),
        other => {
            return Err(ContourletError::UnsupportedPixelFormat(format!(
                "{:?}",
                other.color()
            )));
        }
    };
    Ok(plane)
}

/// Put the enhanced grayscale back into the layout of `original`.
///
/// Gray layouts take the enhanced values directly. Colour layouts replicate
/// the enhanced value across channels and blend it with the original as
/// `0.4 * original + 0.6 * enhanced`, rounded and saturated. Alpha is copied
/// through unchanged.
pub fn recombine(original: &DynamicImage, enhanced: GrayImage) -> Result<DynamicImage> {
    if enhanced.dimensions() != original.dimensions() {
        return Err(ContourletError::ShapeMismatch {
            expected: original.dimensions(),
            actual: enhanced.dimensions(),
        });
    }

    let (w, h) = enhanced.dimensions();
    let out = match original {
        DynamicImage::ImageLuma8(_) => DynamicImage::ImageLuma8(enhanced),
        DynamicImage::ImageLumaA8(img) => {
            DynamicImage::ImageLumaA8(ImageBuffer::from_fn(w, h, |x, y| {
                LumaA([enhanced.get_pixel(x, y).0[0], img.get_pixel(x, y).0[1]])
            }))
        }
        DynamicImage::ImageRgb8(img) => DynamicImage::ImageRgb8(ImageBuffer::from_fn(w, h, |x, y| {
            let e = enhanced.get_pixel(x, y).0[0];
            let Rgb([r, g, b]) = *img.get_pixel(x, y);
            Rgb([blend(r, e), blend(g, e), blend(b, e)])
        })),
        DynamicImage::ImageRgba8(img) => {
            DynamicImage::ImageRgba8(ImageBuffer::from_fn(w, h, |x, y| {
                let e = enhanced.get_pixel(x, y).0[0];
                let Rgba([r, g, b, a]) = *img.get_pixel(x, y);
                Rgba([blend(r, e), blend(g, e), blend(b, e), a])
            }))
        }
        other => {
            return Err(ContourletError::UnsupportedPixelFormat(format!(
                "{:?}",
                other.color()
            )));
        }
    };
    Ok(out)
}

#[inline]
fn blend(original: u8, enhanced: u8) -> u8 {
    (ORIGINAL_WEIGHT * original as f32 + ENHANCED_WEIGHT * enhanced as f32)
        .round()
        .clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, RgbImage};

    #[test]
    fn bt601_matches_known_values() {
        assert_eq!(luma_bt601(0, 0, 0), 0);
        assert_eq!(luma_bt601(255, 255, 255), 255);
        assert_eq!(luma_bt601(255, 0, 0), 76);
        assert_eq!(luma_bt601(0, 255, 0), 150);
        assert_eq!(luma_bt601(0, 0, 255), 29);
    }

    #[test]
    fn gray_plane_is_unit_scaled() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_fn(3, 1, |x, _| Luma([x as u8 * 127])));
        let plane = to_gray_plane(&img).expect("gray supported");
        assert_eq!(plane.get_pixel(0, 0).0[0], 0.0);
        assert!((plane.get_pixel(2, 0).0[0] - 254.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn sixteen_bit_is_unsupported() {
        let img = DynamicImage::new_luma16(4, 4);
        assert!(matches!(
            Layout::of(&img),
            Err(ContourletError::UnsupportedPixelFormat(_))
        ));
        assert!(to_gray_plane(&img).is_err());
    }

    #[test]
    fn colour_blend_weights_original_and_enhanced() {
        let original = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([10, 20, 30])));
        let enhanced = GrayImage::from_pixel(2, 2, Luma([127]));
        let out = recombine(&original, enhanced).expect("same shape");
        let rgb = out.as_rgb8().expect("stays rgb");
        assert_eq!(rgb.get_pixel(1, 1).0, [80, 84, 88]);
    }

    #[test]
    fn alpha_is_preserved() {
        let original = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(2, 1, Rgba([0, 0, 0, 42])));
        let out = recombine(&original, GrayImage::from_pixel(2, 1, Luma([255]))).expect("ok");
        let rgba = out.as_rgba8().expect("stays rgba");
        assert_eq!(rgba.get_pixel(0, 0).0, [153, 153, 153, 42]);
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let original = DynamicImage::new_luma8(4, 4);
        assert!(matches!(
            recombine(&original, GrayImage::new(2, 2)),
            Err(ContourletError::ShapeMismatch { .. })
        ));
    }
}
