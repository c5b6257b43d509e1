//! Deterministic PNG encoding and image decoding.
//!
//! Encoding uses fixed compression and filter settings so the same raster
//! always produces byte-identical output.

use std::io::Write;
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::raster::{Channels, Raster, RasterError};

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),
}

/// PNG export configuration for deterministic output.
#[derive(Debug, Clone)]
pub struct PngConfig {
    pub compression: Compression,
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            // No filtering keeps the output independent of heuristics.
            filter: FilterType::NoFilter,
        }
    }
}

fn color_type(channels: Channels) -> ColorType {
    match channels {
        Channels::Gray => ColorType::Grayscale,
        Channels::Rgb => ColorType::Rgb,
        Channels::Rgba => ColorType::Rgba,
    }
}

/// Encodes a raster to any writer, keeping its channel layout.
pub fn write_to_writer<W: Write>(
    raster: &Raster,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    let mut encoder = Encoder::new(writer, raster.width(), raster.height());
    encoder.set_color(color_type(raster.channels()));
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(raster.data())?;

    Ok(())
}

/// Encodes a raster to PNG bytes.
pub fn encode_png(raster: &Raster, config: &PngConfig) -> Result<Vec<u8>, PngError> {
    let mut data = Vec::new();
    write_to_writer(raster, &mut data, config)?;
    Ok(data)
}

/// Compute the BLAKE3 hash of PNG data.
fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Encodes a raster and returns the bytes with their BLAKE3 hash.
pub fn encode_png_with_hash(
    raster: &Raster,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let data = encode_png(raster, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

/// Writes a raster to a PNG file.
pub fn write_png(raster: &Raster, path: &Path, config: &PngConfig) -> Result<(), PngError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    write_to_writer(raster, writer, config)
}

/// Decodes PNG, JPEG or any other enabled format into a raster.
pub fn decode_image(bytes: &[u8]) -> Result<Raster, RasterError> {
    let image = image::load_from_memory(bytes)?;
    Ok(Raster::from_image(image))
}
