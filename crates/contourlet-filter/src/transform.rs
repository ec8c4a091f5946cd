// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contourlet-style enhancement: pyramid decomposition, directional filtering
// and fusion per level, then recombination with a Sobel edge map and the
// original colour image.

use contourlet_core::error::{ContourletError, Result};
use contourlet_core::{CoefficientSource, EnhanceReport, EnhanceStatus, PassthroughReason, TransformConfig};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use tracing::{debug, info, instrument, warn};

use crate::color::{Layout, recombine, to_gray_plane};
use crate::decompose::{DirectionalFilterBank, build_pyramid, fuse_responses};
use crate::edge::gradient_magnitude;
use crate::plane::{Plane, is_empty, normalize_min_max};

/// Weight of the directional coefficients in the grayscale blend.
pub const COEFFICIENT_WEIGHT: f32 = 0.7;
/// Weight of the edge map in the grayscale blend.
pub const EDGE_WEIGHT: f32 = 0.3;

/// The output of [`ContourletTransform::apply`]: an image with the input's
/// shape and layout, and whether it was actually enhanced.
#[derive(Debug, Clone)]
pub struct Enhancement {
    pub image: DynamicImage,
    pub status: EnhanceStatus,
}

impl Enhancement {
    fn passthrough(image: &DynamicImage, reason: PassthroughReason) -> Self {
        Self {
            image: image.clone(),
            status: EnhanceStatus::Passthrough(reason),
        }
    }

    pub fn is_enhanced(&self) -> bool {
        self.status.is_enhanced()
    }

    pub fn report(&self) -> Option<&EnhanceReport> {
        match &self.status {
            EnhanceStatus::Enhanced(report) => Some(report),
            EnhanceStatus::Passthrough(_) => None,
        }
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

/// Immutable enhancement transform.
///
/// Construct once per configuration and share by reference; `apply` takes
/// `&self` and keeps no state between calls, so one instance can serve any
/// number of threads.
///
/// ```ignore
/// let transform = ContourletTransform::new(TransformConfig::default())?;
/// let out = transform.apply(&image::open("xray.png")?);
/// if !out.is_enhanced() {
///     tracing::warn!(status = ?out.status, "image passed through");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ContourletTransform {
    config: TransformConfig,
    bank: DirectionalFilterBank,
}

impl ContourletTransform {
    /// Validate `config` and build the directional kernels.
    pub fn new(config: TransformConfig) -> Result<Self> {
        config.validate()?;
        let bank = DirectionalFilterBank::new(config.num_directions);
        debug!(
            levels = config.num_levels,
            directions = config.num_directions,
            "contourlet transform ready"
        );
        Ok(Self { config, bank })
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Enhance `image`, never failing.
    ///
    /// Any error inside the pipeline hands back a copy of the input with a
    /// [`EnhanceStatus::Passthrough`] status naming the reason.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn apply(&self, image: &DynamicImage) -> Enhancement {
        match self.try_apply(image) {
            Ok(enhancement) => enhancement,
            Err(err) => {
                let reason = match err {
                    ContourletError::EmptyImage => PassthroughReason::EmptyImage,
                    ContourletError::UnsupportedPixelFormat(layout) => {
                        PassthroughReason::UnsupportedPixelFormat(layout)
                    }
                    other => PassthroughReason::Failure(other.to_string()),
                };
                warn!(%reason, "enhancement skipped; returning original image");
                Enhancement::passthrough(image, reason)
            }
        }
    }

    fn try_apply(&self, image: &DynamicImage) -> Result<Enhancement> {
        let layout = Layout::of(image)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(ContourletError::EmptyImage);
        }

        let gray = to_gray_plane(image)?;
        let Some((enhanced, report)) = self.enhance_gray(&gray)? else {
            warn!("pyramid is empty; returning original image");
            return Ok(Enhancement::passthrough(image, PassthroughReason::EmptyPyramid));
        };

        let image = recombine(image, enhanced)?;
        info!(
            color = layout.is_color(),
            levels = report.pyramid_levels,
            valid_levels = report.valid_levels,
            source = ?report.coefficient_source,
            "image enhanced"
        );
        Ok(Enhancement {
            image,
            status: EnhanceStatus::Enhanced(report),
        })
    }

    /// Run the grayscale core on a [0, 1] plane and return the 8-bit
    /// enhanced result.
    ///
    /// Returns `Ok(None)` when the pyramid comes back empty.
    pub fn enhance_gray(&self, gray: &Plane) -> Result<Option<(GrayImage, EnhanceReport)>> {
        let levels = build_pyramid(gray, self.config.num_levels);
        if levels.is_empty() {
            return Ok(None);
        }

        let mut valid = Vec::with_capacity(levels.len());
        let mut flat_levels = 0usize;
        let mut skipped_directions = 0usize;

        for (index, level) in levels.iter().enumerate() {
            let normalized = normalize_min_max(level);
            if normalized.flat {
                flat_levels += 1;
            }

            let bank = self.bank.filter(&normalized.plane);
            skipped_directions += bank.skipped;
            if bank.responses.is_empty() {
                debug!(level = index, "no directional responses; level skipped");
                continue;
            }

            let fusion = fuse_responses(&bank.responses);
            if is_empty(&fusion.combined) {
                debug!(level = index, "empty combined response; level skipped");
                continue;
            }
            debug!(
                level = index,
                width = fusion.combined.width(),
                height = fusion.combined.height(),
                fused = fusion.fused,
                "level combined"
            );
            valid.push(fusion.combined);
        }

        let valid_levels = valid.len();
        let (coefficients, averaged_levels, coefficient_source) = match average_levels(&valid) {
            Some((mean, averaged)) => (mean, averaged, CoefficientSource::Directional),
            None => {
                warn!("no level produced a directional response; using grayscale as coefficients");
                (gray.clone(), 0, CoefficientSource::GrayscaleFallback)
            }
        };

        let edges = gradient_magnitude(gray);
        if coefficients.dimensions() != edges.dimensions() {
            return Err(ContourletError::ShapeMismatch {
                expected: edges.dimensions(),
                actual: coefficients.dimensions(),
            });
        }

        let coefficients = normalize_min_max(&coefficients).plane;
        let edges = normalize_min_max(&edges).plane;
        let enhanced = blend_to_u8(&coefficients, &edges);

        let report = EnhanceReport {
            pyramid_levels: levels.len(),
            valid_levels,
            averaged_levels,
            skipped_directions,
            flat_levels,
            coefficient_source,
        };
        Ok(Some((enhanced, report)))
    }
}

/// Element-wise mean of the level responses that share the first one's
/// shape, and how many took part. `None` if there are no responses.
///
/// Coarser pyramid levels are smaller than level 0 and are not resized, so
/// in practice only same-size levels are averaged.
fn average_levels(responses: &[Plane]) -> Option<(Plane, usize)> {
    let (first, rest) = responses.split_first()?;
    let mut sum = first.clone();
    let mut count = 1usize;
    for response in rest {
        if response.dimensions() != first.dimensions() {
            debug!(
                expected = ?first.dimensions(),
                actual = ?response.dimensions(),
                "level excluded from average"
            );
            continue;
        }
        for (s, &v) in sum.iter_mut().zip(response.iter()) {
            *s += v;
        }
        count += 1;
    }
    if count > 1 {
        let inv = 1.0 / count as f32;
        for s in sum.iter_mut() {
            *s *= inv;
        }
    }
    Some((sum, count))
}

/// `0.7 * coefficients + 0.3 * edges`, scaled to [0, 255], clipped, and
/// truncated to 8 bits.
fn blend_to_u8(coefficients: &Plane, edges: &Plane) -> GrayImage {
    ImageBuffer::from_fn(coefficients.width(), coefficients.height(), |x, y| {
        let c = coefficients.get_pixel(x, y).0[0];
        let e = edges.get_pixel(x, y).0[0];
        let v = (COEFFICIENT_WEIGHT * c + EDGE_WEIGHT * e) * 255.0;
        Luma([v.clamp(0.0, 255.0) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::filled;
    use image::{GenericImageView, LumaA, Rgb, RgbImage, Rgba, RgbaImage};
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    fn transform() -> ContourletTransform {
        ContourletTransform::new(TransformConfig::default()).expect("default config is valid")
    }

    fn horizontal_gradient(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| {
            Luma([(x as f32 * 255.0 / (width - 1) as f32).round() as u8])
        })
    }

    fn mean(img: &GrayImage) -> f64 {
        img.as_raw().iter().map(|&v| v as f64).sum::<f64>() / img.as_raw().len() as f64
    }

    #[test]
    fn invalid_config_rejected() {
        let config = TransformConfig {
            num_levels: 2,
            num_directions: 0,
        };
        assert!(ContourletTransform::new(config).is_err());
    }

    #[test]
    fn gradient_keeps_shape_and_stays_near_input_mean() {
        let input = horizontal_gradient(64, 64);
        let out = transform().apply(&DynamicImage::ImageLuma8(input.clone()));

        let report = out.report().expect("gradient is enhanced").clone();
        assert_eq!(report.pyramid_levels, 2);
        assert_eq!(report.valid_levels, 2);
        // The 32x32 level cannot be averaged with the 64x64 one.
        assert_eq!(report.averaged_levels, 1);
        assert_eq!(report.coefficient_source, CoefficientSource::Directional);

        let gray = out.image.as_luma8().expect("gray in, gray out");
        assert_eq!(gray.dimensions(), (64, 64));
        let delta = (mean(gray) - mean(&input)).abs();
        assert!(delta <= 25.0, "mean moved by {delta}");
    }

    #[test]
    fn all_zero_image_maps_to_mid_gray() {
        let out = transform().apply(&DynamicImage::new_luma8(32, 32));
        assert!(out.is_enhanced());
        let gray = out.image.as_luma8().expect("gray");
        assert_eq!(gray.dimensions(), (32, 32));
        // Every stage hits the flat-range fallback: 0.7 * 0.5 + 0.3 * 0.5.
        assert!(gray.as_raw().iter().all(|&v| v == 127));
        assert_eq!(out.report().map(|r| r.flat_levels), Some(2));
    }

    #[test]
    fn constant_colour_image_is_finite_and_blended() {
        let input = RgbImage::from_pixel(24, 18, Rgb([10, 20, 30]));
        let out = transform().apply(&DynamicImage::ImageRgb8(input));
        let rgb = out.image.as_rgb8().expect("rgb in, rgb out");
        assert_eq!(rgb.dimensions(), (24, 18));
        assert!(rgb.pixels().all(|p| p.0 == [80, 84, 88]));
    }

    #[test]
    fn tiny_images_keep_their_shape() {
        for size in [1u32, 2] {
            let input = DynamicImage::ImageLuma8(GrayImage::from_pixel(size, size, Luma([90])));
            let out = transform().apply(&input);
            assert!(out.is_enhanced());
            assert_eq!(out.image.dimensions(), (size, size));
            assert_eq!(out.report().map(|r| r.pyramid_levels), Some(1));
        }
    }

    #[test]
    fn empty_image_passes_through() {
        let out = transform().apply(&DynamicImage::new_luma8(0, 5));
        assert_eq!(out.status, EnhanceStatus::Passthrough(PassthroughReason::EmptyImage));
        assert_eq!(out.image.dimensions(), (0, 5));
    }

    #[test]
    fn unsupported_layout_passes_through_unchanged() {
        let input = DynamicImage::new_rgb16(8, 8);
        let out = transform().apply(&input);
        assert!(matches!(
            out.status,
            EnhanceStatus::Passthrough(PassthroughReason::UnsupportedPixelFormat(_))
        ));
        assert_eq!(out.image, input);
    }

    #[test]
    fn colour_with_alpha_keeps_alpha_and_shape() {
        let mut input = RgbaImage::from_pixel(40, 30, Rgba([40, 60, 80, 200]));
        draw_filled_rect_mut(&mut input, Rect::at(10, 8).of_size(15, 12), Rgba([220, 210, 200, 200]));
        let out = transform().apply(&DynamicImage::ImageRgba8(input));
        let rgba = out.image.as_rgba8().expect("rgba in, rgba out");
        assert_eq!(rgba.dimensions(), (40, 30));
        assert!(rgba.pixels().all(|p| p.0[3] == 200));
    }

    #[test]
    fn gray_alpha_keeps_alpha() {
        let input = ImageBuffer::from_fn(16, 16, |x, y| LumaA([((x * y) % 256) as u8, 77]));
        let out = transform().apply(&DynamicImage::ImageLumaA8(input));
        let la = out.image.as_luma_alpha8().expect("luma-alpha in, luma-alpha out");
        assert!(la.pixels().all(|p| p.0[1] == 77));
    }

    #[test]
    fn edges_are_emphasised() {
        let mut input = GrayImage::from_pixel(48, 48, Luma([40]));
        draw_filled_rect_mut(&mut input, Rect::at(12, 12).of_size(24, 24), Luma([200]));
        let out = transform().apply(&DynamicImage::ImageLuma8(input));
        let gray = out.image.as_luma8().expect("gray");
        // The square's boundary responds more than the flat corner region.
        let boundary = gray.get_pixel(12, 24).0[0];
        let corner = gray.get_pixel(2, 2).0[0];
        assert!(boundary > corner, "boundary {boundary} <= corner {corner}");
    }

    #[test]
    fn output_is_not_required_to_be_a_fixed_point() {
        // Re-applying the transform is allowed to change the image again;
        // only shape and layout are guaranteed.
        let t = transform();
        let once = t.apply(&DynamicImage::ImageLuma8(horizontal_gradient(32, 32))).into_image();
        let twice = t.apply(&once).into_image();
        assert_eq!(once.dimensions(), twice.dimensions());
        assert_eq!(once.color(), twice.color());
    }

    #[test]
    fn average_only_includes_matching_shapes() {
        let responses = [filled(4, 4, 1.0), filled(2, 2, 9.0), filled(4, 4, 3.0)];
        let (mean, count) = average_levels(&responses).expect("non-empty");
        assert_eq!(count, 2);
        assert!(mean.iter().all(|&v| (v - 2.0).abs() < 1e-6));
        assert!(average_levels(&[]).is_none());
    }

    #[test]
    fn deeper_pyramid_reports_every_level() {
        let config = TransformConfig::new(4, 6).expect("valid");
        let t = ContourletTransform::new(config).expect("valid");
        let out = t.apply(&DynamicImage::ImageLuma8(horizontal_gradient(64, 40)));
        let report = out.report().expect("enhanced");
        assert_eq!(report.pyramid_levels, 4);
        assert_eq!(report.skipped_directions, 0);
    }
}
