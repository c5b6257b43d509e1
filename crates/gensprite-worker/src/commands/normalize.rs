//! Normalize command implementation
//!
//! Centers an image on a padded square white canvas, the same preparation the
//! rotation pipeline applies before multi-view generation. No background
//! removal is run, so opaque inputs keep their background.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use super::io::{read_image, write_image};

/// Run the normalize command
///
/// # Arguments
/// * `input` - Source image path
/// * `output` - Destination PNG path
/// * `size` - Canvas side length
pub fn run(input: &str, output: &str, size: u32) -> Result<ExitCode> {
    if size == 0 {
        bail!("--size must be at least 1");
    }

    println!("{} {}", "Normalizing:".cyan().bold(), input);

    let image = read_image(Path::new(input))?;
    let normalized = gensprite_raster::normalize(&image, size)
        .with_context(|| format!("Failed to normalize: {}", input))?;
    write_image(&normalized, Path::new(output))?;

    println!(
        "{} {}x{} -> {}x{} at {}",
        "SUCCESS".green().bold(),
        image.width(),
        image.height(),
        size,
        size,
        output
    );
    Ok(ExitCode::SUCCESS)
}
