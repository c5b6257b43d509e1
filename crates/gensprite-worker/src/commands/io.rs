//! File helpers shared by the image commands.

use std::fs;
use std::future::Future;
use std::path::Path;

use anyhow::{Context, Result};
use gensprite_raster::png::write_png;
use gensprite_raster::{decode_image, PngConfig, Raster};

/// Reads and decodes an image file.
pub(crate) fn read_image(path: &Path) -> Result<Raster> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read image: {}", path.display()))?;
    decode_image(&bytes).with_context(|| format!("Failed to decode image: {}", path.display()))
}

/// Writes a raster as PNG, creating parent directories as needed.
pub(crate) fn write_image(raster: &Raster, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    write_png(raster, path, &PngConfig::default())
        .with_context(|| format!("Failed to write PNG: {}", path.display()))
}

/// Runs a future to completion on a fresh current-thread runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    Ok(rt.block_on(future))
}
