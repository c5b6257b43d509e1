//! Seamless command implementation

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use gensprite_raster::{blend_width, make_seamless};

use super::io::{read_image, write_image};

/// Run the seamless command
pub fn run(input: &str, output: &str) -> Result<ExitCode> {
    println!("{} {}", "Tiling:".cyan().bold(), input);

    let image = read_image(Path::new(input))?;
    let tiled = make_seamless(&image);
    write_image(&tiled, Path::new(output))?;

    println!(
        "{} blended {}px edges -> {}",
        "SUCCESS".green().bold(),
        blend_width(image.width(), image.height()),
        output
    );
    Ok(ExitCode::SUCCESS)
}
