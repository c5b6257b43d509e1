//! GenSprite deterministic asset post-processing.
//!
//! Everything between the generative models and blob storage that must be
//! reproducible lives here: pure functions over owned [`Raster`] values, with
//! no I/O beyond byte buffers.
//!
//! # Features
//!
//! - **Normalizer**: centered, padded, square, opaque canvas for multi-view input
//! - **Seamless tiling**: in-place edge cross-fade so the texture wraps
//! - **PBR synthesis**: normal, height, roughness and metallic maps from luma
//! - **Direction sampling**: compass frame selection from an N-view orbit
//! - **Deterministic PNG**: fixed compression settings for byte-identical output
//!
//! # Example
//!
//! ```
//! use gensprite_raster::{make_seamless, PbrMapSet, PbrSettings, Raster};
//!
//! let basecolor = Raster::filled(64, 64, &[120, 90, 60]).unwrap();
//! let tiled = make_seamless(&basecolor);
//! let maps = PbrMapSet::synthesize(&tiled, &PbrSettings::default());
//!
//! assert_eq!(maps.normal().pixel(0, 0), &[127, 127, 255]);
//! assert_eq!(maps.height().pixel(0, 0), &[0]);
//! ```

pub mod directions;
pub mod normalize;
pub mod pbr;
pub mod png;
pub mod raster;
pub mod seamless;

pub use directions::{select_frames, DirectionError};
pub use normalize::{needs_background_removal, normalize, DEFAULT_TARGET_SIZE};
pub use pbr::{PbrMap, PbrMapSet, PbrSettings};
pub use png::{decode_image, encode_png, encode_png_with_hash, PngConfig, PngError};
pub use raster::{luma8, AlphaMask, BoundingBox, Channels, Raster, RasterError};
pub use seamless::{blend_width, make_seamless};
