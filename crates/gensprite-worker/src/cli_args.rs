//! CLI argument definitions for the `gensprite` binary.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};

/// GenSprite - sprite, texture and rotation asset worker
#[derive(Parser)]
#[command(name = "gensprite")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Log debug detail to stderr (replaces the GENSPRITE_LOG filter)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Composite an image onto a square white canvas (no background removal)
    Normalize {
        /// Input image (PNG or JPEG)
        #[arg(short, long)]
        input: String,

        /// Output PNG path
        #[arg(short, long)]
        output: String,

        /// Canvas side length in pixels
        #[arg(long, default_value_t = 576)]
        size: u32,
    },

    /// Make an image tile seamlessly
    Seamless {
        /// Input image (PNG or JPEG)
        #[arg(short, long)]
        input: String,

        /// Output PNG path
        #[arg(short, long)]
        output: String,
    },

    /// Derive normal, height, roughness and metallic maps from a basecolor
    Pbr {
        /// Basecolor image (PNG or JPEG)
        #[arg(short, long)]
        input: String,

        /// Output directory
        #[arg(short, long)]
        output: String,

        /// File name prefix for the written maps
        #[arg(long, default_value = "material")]
        name: String,

        /// Normal map strength
        #[arg(long, default_value_t = 2.0)]
        strength: f32,
    },

    /// Pick the eight compass directions out of an orbit of frames
    Directions {
        /// Directory of frames, taken in file name order
        #[arg(long)]
        frames_dir: String,

        /// Number of frames in the orbit (16, 21 or 25)
        #[arg(long, default_value_t = 21)]
        view_count: usize,

        /// Output directory
        #[arg(short, long)]
        output: String,
    },

    /// Canonicalize a webhook payload and print its signature
    Sign {
        /// Webhook secret
        #[arg(long)]
        secret: String,

        /// Payload JSON file (default: stdin)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Process one job envelope with the configured HTTP collaborators
    Run {
        /// Job envelope JSON file (`{"input": {...}}`)
        #[arg(short, long)]
        job: String,

        /// Worker config JSON file (default: environment)
        #[arg(short, long)]
        config: Option<String>,
    },
}
