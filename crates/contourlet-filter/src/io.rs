// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image file I/O around the transform: decode from disk, encode back by
// extension, and the one-call single-file helper.

use std::path::Path;

use contourlet_core::error::{ContourletError, Result};
use image::DynamicImage;
use tracing::{debug, info, instrument};

use crate::transform::{ContourletTransform, Enhancement};

/// Load and decode an image file.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn open_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let img = image::open(path.as_ref()).map_err(|err| {
        ContourletError::ImageError(format!(
            "failed to open {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    debug!(
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "Image loaded"
    );
    Ok(img)
}

/// Load an image the way the dataset tooling reads it: always 8-bit,
/// three-channel RGB. Gray input is replicated across channels, alpha is
/// dropped, and 16-bit samples are scaled down.
pub fn open_color_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let img = open_image(path)?;
    if matches!(img, DynamicImage::ImageRgb8(_)) {
        return Ok(img);
    }
    debug!(from = ?img.color(), "Normalising decoded image to Rgb8");
    Ok(DynamicImage::ImageRgb8(img.to_rgb8()))
}

/// Write an image to a file. The format is inferred from the file extension.
///
/// JPEG has no alpha channel, so alpha is dropped for `.jpg`/`.jpeg` targets.
pub fn save_image(image: &DynamicImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let is_jpeg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"));

    let result = match image {
        DynamicImage::ImageRgba8(_) if is_jpeg => {
            DynamicImage::ImageRgb8(image.to_rgb8()).save(path)
        }
        DynamicImage::ImageLumaA8(_) if is_jpeg => {
            DynamicImage::ImageLuma8(image.to_luma8()).save(path)
        }
        _ => image.save(path),
    };
    result.map_err(|err| {
        ContourletError::ImageError(format!(
            "failed to save image to {}: {}",
            path.display(),
            err
        ))
    })
}

/// Read `input` as 8-bit RGB, enhance it, and write the result to `output`
/// if given.
///
/// An unreadable input is an error; a transform that degrades to passthrough
/// is not (check [`Enhancement::status`]). Callers holding an image in memory
/// and wanting its layout kept use [`ContourletTransform::apply`] directly.
#[instrument(skip(transform), fields(input = %input.display()))]
pub fn enhance_file(
    transform: &ContourletTransform,
    input: &Path,
    output: Option<&Path>,
) -> Result<Enhancement> {
    let image = open_color_image(input)?;
    let enhancement = transform.apply(&image);
    if let Some(output) = output {
        save_image(&enhancement.image, output)?;
        info!(output = %output.display(), enhanced = enhancement.is_enhanced(), "Image written");
    }
    Ok(enhancement)
}
