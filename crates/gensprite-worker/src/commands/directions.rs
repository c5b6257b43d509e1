//! Directions command implementation
//!
//! Offline version of the rotation pipeline's last stage: picks the eight
//! compass frames out of an orbit on disk. Frames are taken in file name
//! order and kept as-is apart from RGBA conversion (no cutout).

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::inference::PassthroughCutout;
use crate::sampler::DirectionSampler;

use super::io::{block_on, read_image, write_image};

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Run the directions command
///
/// # Arguments
/// * `frames_dir` - Directory holding exactly `view_count` frames
/// * `view_count` - Orbit length (16, 21 or 25)
/// * `out_dir` - Directory receiving `{dir}.png` per direction
pub fn run(frames_dir: &str, view_count: usize, out_dir: &str) -> Result<ExitCode> {
    println!("{} {}", "Sampling directions:".cyan().bold(), frames_dir);

    let sampler = DirectionSampler::for_view_count(Arc::new(PassthroughCutout), view_count)?;

    let paths = list_frames(Path::new(frames_dir))?;
    if paths.len() != view_count {
        bail!(
            "expected {} frames in {}, found {}",
            view_count,
            frames_dir,
            paths.len()
        );
    }
    let frames = paths
        .iter()
        .map(|p| read_image(p))
        .collect::<Result<Vec<_>>>()?;

    let sampled = block_on(sampler.sample(&frames))??;

    let out_dir = Path::new(out_dir);
    for (direction, frame) in sampled.iter() {
        let path = out_dir.join(format!("{}.png", direction.slug()));
        write_image(frame, &path)?;
        println!(
            "  {:>2} <- frame {:>2}  {}",
            direction.label().bold(),
            sampler.table().frame_index(direction),
            path.display()
        );
    }

    println!("{} 8 directions written", "SUCCESS".green().bold());
    Ok(ExitCode::SUCCESS)
}

/// Image files in `dir`, sorted by file name.
fn list_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
            .path();
        let is_frame = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if path.is_file() && is_frame {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
