//! 8-bit raster buffers.
//!
//! A [`Raster`] is an interleaved, row-major grid of 8-bit samples with one
//! (gray), three (RGB) or four (RGBA) channels. Every raster in the pipeline
//! is an owned value; nothing is shared between jobs.

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use thiserror::Error;

/// Errors from raster construction and conversion.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("raster dimensions must be positive, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },

    #[error("expected {expected} samples for the raster, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(usize),

    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),
}

/// Channel layout of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channels {
    Gray,
    Rgb,
    Rgba,
}

impl Channels {
    /// Number of samples per pixel.
    pub fn count(&self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }

    /// Layout for a samples-per-pixel count.
    pub fn from_count(count: usize) -> Result<Self, RasterError> {
        match count {
            1 => Ok(Channels::Gray),
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            other => Err(RasterError::UnsupportedChannels(other)),
        }
    }
}

/// An 8-bit raster image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<u8>,
}

impl Raster {
    /// Wraps a sample buffer, checking its size against the dimensions.
    pub fn new(
        width: u32,
        height: u32,
        channels: Channels,
        data: Vec<u8>,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyDimensions { width, height });
        }
        let expected = width as usize * height as usize * channels.count();
        if data.len() != expected {
            return Err(RasterError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// A raster where every pixel equals `pixel`; the channel count is
    /// `pixel.len()`.
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> Result<Self, RasterError> {
        let channels = Channels::from_count(pixel.len())?;
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyDimensions { width, height });
        }
        let data = pixel.repeat(width as usize * height as usize);
        Self::new(width, height, channels, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Raw interleaved samples, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels.count()
    }

    /// Samples of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = self.offset(x, y);
        &self.data[start..start + self.channels.count()]
    }

    /// Mutable samples of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let start = self.offset(x, y);
        let count = self.channels.count();
        &mut self.data[start..start + count]
    }

    /// Converts to RGBA; missing alpha becomes fully opaque.
    pub fn to_rgba(&self) -> Raster {
        let data = match self.channels {
            Channels::Rgba => self.data.clone(),
            Channels::Rgb => self
                .data
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
            Channels::Gray => self.data.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        };
        Raster {
            width: self.width,
            height: self.height,
            channels: Channels::Rgba,
            data,
        }
    }

    /// Converts to RGB. Alpha is dropped, not composited.
    pub fn to_rgb(&self) -> Raster {
        let data = match self.channels {
            Channels::Rgb => self.data.clone(),
            Channels::Rgba => self
                .data
                .chunks_exact(4)
                .flat_map(|p| [p[0], p[1], p[2]])
                .collect(),
            Channels::Gray => self.data.iter().flat_map(|&v| [v, v, v]).collect(),
        };
        Raster {
            width: self.width,
            height: self.height,
            channels: Channels::Rgb,
            data,
        }
    }

    /// ITU-R 601-2 luma per pixel, ignoring alpha.
    ///
    /// `L = (19595 R + 38470 G + 7471 B + 32768) >> 16`, the fixed-point form
    /// of `0.299 R + 0.587 G + 0.114 B` with round-half-up.
    pub fn luma(&self) -> Vec<u8> {
        match self.channels {
            Channels::Gray => self.data.clone(),
            Channels::Rgb | Channels::Rgba => self
                .data
                .chunks_exact(self.channels.count())
                .map(|p| luma8(p[0], p[1], p[2]))
                .collect(),
        }
    }

    /// Alpha channel view, if the raster has one.
    pub fn alpha_mask(&self) -> Option<AlphaMask<'_>> {
        match self.channels {
            Channels::Rgba => Some(AlphaMask { raster: self }),
            _ => None,
        }
    }

    /// Copies the pixels inside `bounds` (inclusive) into a new raster.
    pub fn crop(&self, bounds: &BoundingBox) -> Raster {
        let count = self.channels.count();
        let row_len = bounds.width() as usize * count;
        let mut data = Vec::with_capacity(row_len * bounds.height() as usize);
        for y in bounds.y_min..=bounds.y_max {
            let start = self.offset(bounds.x_min, y);
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        Raster {
            width: bounds.width(),
            height: bounds.height(),
            channels: self.channels,
            data,
        }
    }

    /// Converts a decoded image. Layouts other than L8/RGB8/RGBA8 become RGBA8.
    pub fn from_image(image: DynamicImage) -> Raster {
        let (width, height) = (image.width(), image.height());
        let (channels, data) = match image {
            DynamicImage::ImageLuma8(buf) => (Channels::Gray, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (Channels::Rgb, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (Channels::Rgba, buf.into_raw()),
            other => (Channels::Rgba, other.to_rgba8().into_raw()),
        };
        Raster {
            width,
            height,
            channels,
            data,
        }
    }

    /// Converts into an `image` crate buffer for resampling.
    pub fn to_image(&self) -> DynamicImage {
        let (w, h) = (self.width, self.height);
        // Sizes are checked on construction, so `from_raw` always succeeds.
        match self.channels {
            Channels::Gray => GrayImage::from_raw(w, h, self.data.clone())
                .map(DynamicImage::ImageLuma8),
            Channels::Rgb => RgbImage::from_raw(w, h, self.data.clone())
                .map(DynamicImage::ImageRgb8),
            Channels::Rgba => RgbaImage::from_raw(w, h, self.data.clone())
                .map(DynamicImage::ImageRgba8),
        }
        .unwrap_or_else(|| DynamicImage::new_rgba8(w, h))
    }
}

/// ITU-R 601-2 luma of one RGB sample triple.
#[inline]
pub fn luma8(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

/// Read-only view of a raster's alpha channel.
#[derive(Debug, Clone, Copy)]
pub struct AlphaMask<'a> {
    raster: &'a Raster,
}

impl<'a> AlphaMask<'a> {
    pub fn width(&self) -> u32 {
        self.raster.width
    }

    pub fn height(&self) -> u32 {
        self.raster.height
    }

    /// Alpha at `(x, y)`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.raster.pixel(x, y)[3]
    }

    /// All alpha samples, row-major.
    pub fn values(&self) -> impl Iterator<Item = u8> + 'a {
        self.raster.data.chunks_exact(4).map(|p| p[3])
    }

    /// Whether any alpha sample is strictly below `threshold`.
    pub fn any_below(&self, threshold: u8) -> bool {
        self.values().any(|a| a < threshold)
    }

    /// Bounding box of pixels whose alpha is strictly above `threshold`.
    ///
    /// A row (column) is content when any of its pixels passes the threshold;
    /// the box spans the first to last content row and column. Returns `None`
    /// when no pixel passes.
    pub fn bounding_box(&self, threshold: u8) -> Option<BoundingBox> {
        let (w, h) = (self.width() as usize, self.height() as usize);
        let mut rows = vec![false; h];
        let mut cols = vec![false; w];

        for (i, alpha) in self.values().enumerate() {
            if alpha > threshold {
                rows[i / w] = true;
                cols[i % w] = true;
            }
        }

        let y_min = rows.iter().position(|&r| r)?;
        let y_max = rows.iter().rposition(|&r| r)?;
        let x_min = cols.iter().position(|&c| c)?;
        let x_max = cols.iter().rposition(|&c| c)?;

        Some(BoundingBox {
            x_min: x_min as u32,
            y_min: y_min as u32,
            x_max: x_max as u32,
            y_max: y_max as u32,
        })
    }
}

/// Inclusive pixel bounds of the non-transparent region of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.x_max - self.x_min + 1
    }

    pub fn height(&self) -> u32 {
        self.y_max - self.y_min + 1
    }
}
