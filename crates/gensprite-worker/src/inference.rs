//! Client for the model inference sidecar.
//!
//! The sidecar runs next to the worker on the GPU host and exposes the
//! generative models and background removal over plain HTTP:
//!
//! - `POST /text-to-image`: JSON [`TextToImageParams`], PNG response body
//! - `POST /multiview`: JSON with a base64 PNG input, `{"frames": [...]}` response
//! - `POST /cutout`: JSON with a base64 PNG and optional thresholds, PNG response body

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use gensprite_raster::{decode_image, encode_png, PngConfig, Raster};
use serde::{Deserialize, Serialize};

use crate::blob::check_status;
use crate::collaborators::{
    CollaboratorError, Cutout, MattingThresholds, MultiviewGenerator, MultiviewParams,
    TextToImage, TextToImageParams,
};

const SERVICE: &str = "inference";

#[derive(Serialize)]
struct MultiviewRequest<'a> {
    image: String,
    #[serde(flatten)]
    params: &'a MultiviewParams,
}

#[derive(Deserialize)]
struct MultiviewResponse {
    frames: Vec<String>,
}

#[derive(Serialize)]
struct CutoutRequest {
    image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    matting: Option<MattingThresholds>,
}

/// HTTP client for the inference sidecar.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
    view_count: usize,
    timeout: Option<Duration>,
}

impl InferenceClient {
    /// `view_count` is the orbit length of the sidecar's multi-view model.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, view_count: usize) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            view_count,
            timeout: None,
        }
    }

    /// Per-request timeout. Generation has none by default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), route)
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        route: &str,
        body: &T,
    ) -> Result<reqwest::Response, CollaboratorError> {
        let url = self.endpoint(route);
        log::debug!("inference: POST {}", url);

        let mut request = self.client.post(&url).json(body);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        check_status(SERVICE, request.send().await?).await
    }

    async fn post_for_image<T: Serialize + ?Sized>(
        &self,
        route: &str,
        body: &T,
    ) -> Result<Raster, CollaboratorError> {
        let bytes = self.post_json(route, body).await?.bytes().await?;
        Ok(decode_image(&bytes)?)
    }
}

fn encode_base64_png(image: &Raster) -> Result<String, CollaboratorError> {
    Ok(STANDARD.encode(encode_png(image, &PngConfig::default())?))
}

#[async_trait]
impl TextToImage for InferenceClient {
    async fn generate(&self, params: &TextToImageParams) -> Result<Raster, CollaboratorError> {
        self.post_for_image("text-to-image", params).await
    }
}

#[async_trait]
impl MultiviewGenerator for InferenceClient {
    fn view_count(&self) -> usize {
        self.view_count
    }

    async fn generate(
        &self,
        image: &Raster,
        params: &MultiviewParams,
    ) -> Result<Vec<Raster>, CollaboratorError> {
        let request = MultiviewRequest {
            image: encode_base64_png(image)?,
            params,
        };
        let response: MultiviewResponse = self.post_json("multiview", &request).await?.json().await?;

        response
            .frames
            .iter()
            .enumerate()
            .map(|(i, frame)| -> Result<Raster, CollaboratorError> {
                let bytes = STANDARD
                    .decode(frame)
                    .map_err(|e| CollaboratorError::InvalidResponse {
                        service: SERVICE,
                        message: format!("frame {} is not valid base64: {}", i, e),
                    })?;
                Ok(decode_image(&bytes)?)
            })
            .collect()
    }
}

#[async_trait]
impl Cutout for InferenceClient {
    async fn cutout(
        &self,
        image: &Raster,
        matting: Option<MattingThresholds>,
    ) -> Result<Raster, CollaboratorError> {
        let request = CutoutRequest {
            image: encode_base64_png(image)?,
            matting,
        };
        let cut = self.post_for_image("cutout", &request).await?;
        Ok(cut.to_rgba())
    }
}

/// Cutout stand-in that keeps the image as-is, with opaque alpha added when
/// missing. Used by offline CLI commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCutout;

#[async_trait]
impl Cutout for PassthroughCutout {
    async fn cutout(
        &self,
        image: &Raster,
        _matting: Option<MattingThresholds>,
    ) -> Result<Raster, CollaboratorError> {
        Ok(image.to_rgba())
    }
}
