//! Single-channel PBR maps derived from luma.
//!
//! All three maps work in f32 and quantize by truncation.

use crate::raster::{Channels, Raster};

fn gray_raster(width: u32, height: u32, data: Vec<u8>) -> Raster {
    Raster::new(width, height, Channels::Gray, data)
        .unwrap_or_else(|_| unreachable!("one sample per luma value"))
}

/// Contrast-stretched luma: `(v - min) / (max - min + 1e-6) * 255`.
///
/// A flat input has a zero range and maps to all zeros.
pub(crate) fn luma_to_height(luma: &[u8], width: u32, height: u32) -> Raster {
    let min = luma.iter().copied().min().unwrap_or(0) as f32;
    let max = luma.iter().copied().max().unwrap_or(0) as f32;
    let range = max - min + 1e-6;

    let data = luma
        .iter()
        .map(|&v| ((v as f32 - min) / range * 255.0) as u8)
        .collect();
    gray_raster(width, height, data)
}

/// `clip(base + (luma - 0.5) * 0.5, 0, 1) * 255`, with luma in [0, 1].
pub(crate) fn luma_to_roughness(luma: &[u8], width: u32, height: u32, base: f32) -> Raster {
    let data = luma
        .iter()
        .map(|&v| {
            let g = v as f32 / 255.0;
            ((base + (g - 0.5) * 0.5).clamp(0.0, 1.0) * 255.0) as u8
        })
        .collect();
    gray_raster(width, height, data)
}

/// `luma * threshold * 255`, with luma in [0, 1].
pub(crate) fn luma_to_metallic(luma: &[u8], width: u32, height: u32, threshold: f32) -> Raster {
    let data = luma
        .iter()
        .map(|&v| {
            let g = v as f32 / 255.0;
            (g * threshold * 255.0) as u8
        })
        .collect();
    gray_raster(width, height, data)
}
