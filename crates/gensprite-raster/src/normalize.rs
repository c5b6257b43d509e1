//! Canonical square canvas for multi-view generator input.
//!
//! An arbitrary input image (any size, with or without alpha) becomes an
//! opaque, square, white-backed canvas with the subject centered and padded by
//! 10% of its longest side, resampled to the generator's input resolution.
//!
//! Background removal is an external capability, so it is not called from
//! here: callers check [`needs_background_removal`] first and hand the cutout
//! result to [`normalize`].

use image::imageops::{self, FilterType};

use crate::raster::{Raster, RasterError};

/// Input resolution of the multi-view generator.
pub const DEFAULT_TARGET_SIZE: u32 = 576;

/// An image with no alpha sample below this is treated as opaque.
pub const OPAQUE_ALPHA_THRESHOLD: u8 = 250;

/// Pixels with alpha strictly above this count as content.
pub const CONTENT_ALPHA_THRESHOLD: u8 = 10;

/// Canvas color behind the subject.
pub const BACKGROUND: [u8; 3] = [255, 255, 255];

/// Whether the image is effectively opaque and needs a cutout pass before
/// normalizing.
///
/// Images without an alpha channel always do.
pub fn needs_background_removal(image: &Raster) -> bool {
    match image.alpha_mask() {
        Some(mask) => !mask.any_below(OPAQUE_ALPHA_THRESHOLD),
        None => true,
    }
}

/// Padding added on each side of content whose longest side is `max_dim`.
pub fn padding_for(max_dim: u32) -> u32 {
    max_dim / 10
}

/// Centers the subject of `image` on a padded square canvas and resamples it
/// to `target_size`×`target_size` RGB.
///
/// The alpha of `image` is used as-is to find and composite the subject; an
/// image with no pixel above [`CONTENT_ALPHA_THRESHOLD`] yields a flat
/// background canvas.
pub fn normalize(image: &Raster, target_size: u32) -> Result<Raster, RasterError> {
    if target_size == 0 {
        return Err(RasterError::EmptyDimensions {
            width: target_size,
            height: target_size,
        });
    }

    let rgba = image.to_rgba();
    let bounds = rgba
        .alpha_mask()
        .and_then(|mask| mask.bounding_box(CONTENT_ALPHA_THRESHOLD));
    let Some(bounds) = bounds else {
        return Raster::filled(target_size, target_size, &BACKGROUND);
    };

    let content = rgba.crop(&bounds);
    let (content_w, content_h) = (content.width(), content.height());
    let max_dim = content_w.max(content_h);
    let canvas_size = max_dim + 2 * padding_for(max_dim);

    let mut canvas = Raster::filled(canvas_size, canvas_size, &BACKGROUND)?;
    let y_offset = (canvas_size - content_h) / 2;
    let x_offset = (canvas_size - content_w) / 2;

    for y in 0..content_h {
        for x in 0..content_w {
            let src = content.pixel(x, y);
            let a = src[3] as f64 / 255.0;
            let dst = canvas.pixel_mut(x + x_offset, y + y_offset);
            for c in 0..3 {
                dst[c] = (src[c] as f64 * a + BACKGROUND[c] as f64 * (1.0 - a)) as u8;
            }
        }
    }

    if canvas_size == target_size {
        return Ok(canvas);
    }

    let resized = imageops::resize(
        &canvas.to_image().to_rgb8(),
        target_size,
        target_size,
        FilterType::Lanczos3,
    );
    Raster::new(
        target_size,
        target_size,
        crate::raster::Channels::Rgb,
        resized.into_raw(),
    )
}
