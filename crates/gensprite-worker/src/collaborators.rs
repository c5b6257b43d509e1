//! External capabilities the pipelines depend on.
//!
//! Models, background removal and blob storage are reached only through the
//! traits in this module. Implementations are `Send + Sync` and shared
//! between concurrent jobs behind `Arc`; none of them hold per-job state.

use std::sync::Arc;

use async_trait::async_trait;
use gensprite_raster::{PngError, Raster, RasterError};
use serde::Serialize;
use thiserror::Error;

/// Failure of an external capability.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("invalid response from {service}: {message}")]
    InvalidResponse {
        service: &'static str,
        message: String,
    },

    #[error("image error: {0}")]
    Raster(#[from] RasterError),

    #[error("PNG encoding error: {0}")]
    Png(#[from] PngError),

    #[error("{0}")]
    Unavailable(String),
}

/// Which text-to-image model a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageModel {
    /// Few-step distilled model for isolated sprites.
    Sprite,
    /// Full diffusion model for material textures.
    Texture,
}

/// Text-to-image request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextToImageParams {
    pub model: ImageModel,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    pub width: u32,
    pub height: u32,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    pub seed: u32,
}

/// Image-to-multiview request: one camera pose per output frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiviewParams {
    pub width: u32,
    pub height: u32,
    pub num_frames: usize,
    pub polars_rad: Vec<f64>,
    pub azimuths_rad: Vec<f64>,
    pub num_inference_steps: u32,
    pub decode_chunk_size: u32,
    pub seed: u64,
}

impl MultiviewParams {
    /// Fixed seed for orbit generation.
    pub const SEED: u64 = 42;

    /// Evenly spaced full orbit of `view_count` frames at `elevation_deg`
    /// above the horizon, starting at the front view.
    pub fn orbit(view_count: usize, elevation_deg: f64, size: u32) -> Self {
        let polar = (90.0 - elevation_deg).to_radians();
        Self {
            width: size,
            height: size,
            num_frames: view_count,
            polars_rad: vec![polar; view_count],
            azimuths_rad: (0..view_count)
                .map(|i| (i as f64 * 360.0 / view_count as f64).to_radians())
                .collect(),
            num_inference_steps: 20,
            decode_chunk_size: 8,
            seed: Self::SEED,
        }
    }
}

/// Alpha matting thresholds for cutout edge refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MattingThresholds {
    pub foreground: u8,
    pub background: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erode_size: Option<u32>,
}

impl MattingThresholds {
    /// Generated sprites: soft edges, eroded fringe.
    pub const SPRITE: MattingThresholds = MattingThresholds {
        foreground: 200,
        background: 20,
        erode_size: Some(5),
    };

    /// Multi-view frames on a white background.
    pub const ROTATION: MattingThresholds = MattingThresholds {
        foreground: 240,
        background: 10,
        erode_size: None,
    };
}

#[async_trait]
pub trait TextToImage: Send + Sync {
    async fn generate(&self, params: &TextToImageParams) -> Result<Raster, CollaboratorError>;
}

#[async_trait]
pub trait MultiviewGenerator: Send + Sync {
    /// Number of frames one orbit produces.
    fn view_count(&self) -> usize;

    async fn generate(
        &self,
        image: &Raster,
        params: &MultiviewParams,
    ) -> Result<Vec<Raster>, CollaboratorError>;
}

/// Background removal.
#[async_trait]
pub trait Cutout: Send + Sync {
    /// Returns `image` with the background made transparent. Without
    /// thresholds the collaborator's default matting is used.
    async fn cutout(
        &self,
        image: &Raster,
        matting: Option<MattingThresholds>,
    ) -> Result<Raster, CollaboratorError>;
}

/// Blob storage bound to one access token.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` at `path` and returns the public URL.
    async fn put(
        &self,
        bytes: Vec<u8>,
        path: &str,
        content_type: &str,
    ) -> Result<String, CollaboratorError>;

    /// Fetches the bytes behind `url`.
    async fn get(&self, url: &str) -> Result<Vec<u8>, CollaboratorError>;
}

/// Builds a [`BlobStore`] for a job's token.
pub trait BlobStoreProvider: Send + Sync {
    fn store_for(&self, token: &str) -> Arc<dyn BlobStore>;
}

/// Every external capability a worker needs.
#[derive(Clone)]
pub struct Collaborators {
    pub text_to_image: Arc<dyn TextToImage>,
    pub multiview: Arc<dyn MultiviewGenerator>,
    pub cutout: Arc<dyn Cutout>,
    pub blobs: Arc<dyn BlobStoreProvider>,
}
