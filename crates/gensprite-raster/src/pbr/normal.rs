//! Luma to tangent-space normal map conversion.

use crate::raster::{Channels, Raster};

/// Reflect-101 border: `-1 -> 1`, `n -> n - 2`; the edge sample is not
/// repeated.
#[inline]
fn reflect_101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = i;
    while i < 0 || i > last {
        i = if i < 0 { -i } else { 2 * last - i };
    }
    i as usize
}

/// Converts a luma plane to an RGB normal map using 3×3 Sobel operators.
///
/// Luma is scaled to [0, 1] before differentiation. The normal is
/// `(-gx, -gy, 1)` after scaling both gradients by `strength`, normalized and
/// mapped from [-1, 1] to [0, 255] by truncation. A flat surface encodes as
/// (127, 127, 255).
#[allow(clippy::needless_range_loop)]
pub(crate) fn luma_to_normal(luma: &[u8], width: u32, height: u32, strength: f32) -> Raster {
    let (w, h) = (width as usize, height as usize);
    let plane: Vec<f32> = luma.iter().map(|&v| v as f32 / 255.0).collect();
    let mut data = Vec::with_capacity(w * h * 3);

    for y in 0..h {
        let rows = [
            reflect_101(y as isize - 1, h),
            y,
            reflect_101(y as isize + 1, h),
        ];
        for x in 0..w {
            let cols = [
                reflect_101(x as isize - 1, w),
                x,
                reflect_101(x as isize + 1, w),
            ];

            let mut s = [[0.0f32; 3]; 3];
            for dy in 0..3 {
                for dx in 0..3 {
                    s[dy][dx] = plane[rows[dy] * w + cols[dx]];
                }
            }

            // Gx = | -1  0  1 |    Gy = | -1 -2 -1 |
            //      | -2  0  2 |         |  0  0  0 |
            //      | -1  0  1 |         |  1  2  1 |
            let gx = (s[0][2] + 2.0 * s[1][2] + s[2][2]) - (s[0][0] + 2.0 * s[1][0] + s[2][0]);
            let gy = (s[2][0] + 2.0 * s[2][1] + s[2][2]) - (s[0][0] + 2.0 * s[0][1] + s[0][2]);

            let nx = -(gx * strength);
            let ny = -(gy * strength);
            let nz = 1.0f32;

            let len = (nx * nx + ny * ny + nz * nz).sqrt();
            data.push(encode_component(nx / len));
            data.push(encode_component(ny / len));
            data.push(encode_component(nz / len));
        }
    }

    Raster::new(width, height, Channels::Rgb, data)
        .unwrap_or_else(|_| unreachable!("one RGB triple per luma sample"))
}

/// Maps a unit-vector component from [-1, 1] to [0, 255], truncating.
#[inline]
fn encode_component(c: f32) -> u8 {
    ((c + 1.0) / 2.0 * 255.0) as u8
}
