//! PBR command implementation
//!
//! Writes `{name}_{map}.png` for all five maps of a basecolor image. The
//! basecolor is written as RGB; alpha is dropped.

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use gensprite_raster::{PbrMapSet, PbrSettings};

use super::io::{read_image, write_image};

/// Run the pbr command
///
/// # Arguments
/// * `input` - Basecolor image path
/// * `out_dir` - Directory receiving the five maps
/// * `name` - File name prefix
/// * `strength` - Normal map strength
pub fn run(input: &str, out_dir: &str, name: &str, strength: f32) -> Result<ExitCode> {
    if !strength.is_finite() {
        bail!("--strength must be a finite number, got {}", strength);
    }

    println!("{} {}", "Synthesizing:".cyan().bold(), input);

    let basecolor = read_image(Path::new(input))?.to_rgb();
    let settings = PbrSettings {
        normal_strength: strength,
        ..PbrSettings::default()
    };
    let maps = PbrMapSet::synthesize(&basecolor, &settings);

    let out_dir = Path::new(out_dir);
    for (map, raster) in maps.iter() {
        let path = out_dir.join(format!("{}_{}.png", name, map.name()));
        write_image(raster, &path)?;
        println!("  {} {}", map.name().dimmed(), path.display());
    }

    println!(
        "{} {}x{} map set written to {}",
        "SUCCESS".green().bold(),
        basecolor.width(),
        basecolor.height(),
        out_dir.display()
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gensprite_raster::{Channels, PbrMap, Raster};

    #[test]
    fn test_writes_all_maps() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("brick.png");
        write_image(&Raster::filled(16, 16, &[140, 70, 50]).unwrap(), &input).unwrap();

        let out = dir.path().join("maps");
        run(input.to_str().unwrap(), out.to_str().unwrap(), "brick", 2.0).unwrap();

        for map in PbrMap::ALL {
            let path = out.join(format!("brick_{}.png", map.name()));
            assert!(path.exists(), "missing {}", path.display());
        }

        let normal = read_image(&out.join("brick_normal.png")).unwrap();
        assert_eq!(normal.channels(), Channels::Rgb);
        assert_eq!(normal.pixel(5, 5), &[127, 127, 255]);
        let height = read_image(&out.join("brick_height.png")).unwrap();
        assert_eq!(height.channels(), Channels::Gray);
    }

    #[test]
    fn test_rejects_nan_strength() {
        let dir = tempfile::tempdir().unwrap();
        let err = run("in.png", dir.path().to_str().unwrap(), "m", f32::NAN).unwrap_err();
        assert!(err.to_string().contains("--strength"));
    }
}
