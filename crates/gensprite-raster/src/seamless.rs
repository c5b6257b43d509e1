//! Edge cross-fading for tileable textures.
//!
//! A band of `min(w, h) / 8` columns at each side is blended with the band at
//! the opposite side, then the same is done for rows. Columns and rows are
//! overwritten in place, one at a time, so later updates read earlier
//! blended values. The vertical pass reads horizontally blended rows.

use crate::raster::{Channels, Raster};

/// Width of the blended band for a `width`×`height` image.
pub fn blend_width(width: u32, height: u32) -> usize {
    (width.min(height) / 8) as usize
}

/// Returns a tileable RGB copy of `image` with the same dimensions.
///
/// Alpha is dropped. Images with a side shorter than 8 pixels come back
/// unchanged apart from the channel conversion.
pub fn make_seamless(image: &Raster) -> Raster {
    let rgb = image.to_rgb();
    let (w, h) = (rgb.width() as usize, rgb.height() as usize);
    let blend = blend_width(rgb.width(), rgb.height());
    if blend == 0 {
        return rgb;
    }

    let mut buf = FloatImage::from_raster(&rgb);

    for i in 0..blend {
        let (a, b) = weights(i, blend);
        for y in 0..h {
            buf.mix(y, i, y, w - blend + i, a, b);
        }
        for y in 0..h {
            buf.mix(y, w - 1 - i, y, blend - 1 - i, a, b);
        }
    }

    for i in 0..blend {
        let (a, b) = weights(i, blend);
        for x in 0..w {
            buf.mix(i, x, h - blend + i, x, a, b);
        }
        for x in 0..w {
            buf.mix(h - 1 - i, x, blend - 1 - i, x, a, b);
        }
    }

    buf.into_raster()
}

/// Weights for the kept and the mirrored sample at band offset `i`.
///
/// Computed in f64 and narrowed, so `alpha` and `1 - alpha` are each the
/// nearest f32 to their exact value.
fn weights(i: usize, blend: usize) -> (f32, f32) {
    let alpha = i as f64 / blend as f64;
    (alpha as f32, (1.0 - alpha) as f32)
}

/// Working RGB buffer in f32.
struct FloatImage {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl FloatImage {
    fn from_raster(raster: &Raster) -> Self {
        Self {
            width: raster.width() as usize,
            height: raster.height() as usize,
            data: raster.data().iter().map(|&v| v as f32).collect(),
        }
    }

    /// `dst = dst * a + src * b`, per channel.
    #[inline]
    fn mix(&mut self, dst_y: usize, dst_x: usize, src_y: usize, src_x: usize, a: f32, b: f32) {
        let dst = (dst_y * self.width + dst_x) * 3;
        let src = (src_y * self.width + src_x) * 3;
        for c in 0..3 {
            self.data[dst + c] = self.data[dst + c] * a + self.data[src + c] * b;
        }
    }

    fn into_raster(self) -> Raster {
        let data = self
            .data
            .into_iter()
            .map(|v| v.clamp(0.0, 255.0).round() as u8)
            .collect();
        // Same dimensions as the RGB source, so the size check cannot fail.
        Raster::new(self.width as u32, self.height as u32, Channels::Rgb, data)
            .unwrap_or_else(|_| unreachable!("float buffer keeps the source size"))
    }
}
