//! In-memory collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gensprite_raster::{encode_png, PngConfig, Raster};
use gensprite_spec::{JobStatus, JobType, WebhookPayload};
use gensprite_worker::collaborators::{
    BlobStore, BlobStoreProvider, CollaboratorError, Collaborators, Cutout, MattingThresholds,
    MultiviewGenerator, MultiviewParams, TextToImage, TextToImageParams,
};
use gensprite_worker::webhook::{DeliveryError, SignedPayload, WebhookSender, WebhookTarget};
use gensprite_worker::ProgressReporter;

pub const BLOB_BASE: &str = "https://blob.test";
pub const HOOK_URL: &str = "https://app.test/api/webhook";
pub const HOOK_SECRET: &str = "whsec_test";

/// One `put` call.
#[derive(Debug, Clone)]
pub struct Upload {
    pub path: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Blob store keeping uploads in memory. `get` serves seeded objects.
#[derive(Default)]
pub struct MemoryBlobs {
    pub uploads: Mutex<Vec<Upload>>,
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobs {
    pub fn seed(&self, url: &str, bytes: Vec<u8>) {
        self.objects.lock().unwrap().insert(url.to_string(), bytes);
    }

    pub fn paths(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.path.clone())
            .collect()
    }

    pub fn upload(&self, path: &str) -> Upload {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.path == path)
            .cloned()
            .unwrap_or_else(|| panic!("nothing uploaded at {}", path))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobs {
    async fn put(
        &self,
        bytes: Vec<u8>,
        path: &str,
        content_type: &str,
    ) -> Result<String, CollaboratorError> {
        self.uploads.lock().unwrap().push(Upload {
            path: path.to_string(),
            content_type: content_type.to_string(),
            bytes,
        });
        Ok(format!("{}/{}", BLOB_BASE, path))
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, CollaboratorError> {
        self.objects
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| CollaboratorError::Status {
                service: "blob storage",
                status: 404,
                body: format!("no object at {}", url),
            })
    }
}

/// Hands out one shared [`MemoryBlobs`] and records the tokens asked for.
#[derive(Default)]
pub struct MemoryBlobProvider {
    pub store: Arc<MemoryBlobs>,
    pub tokens: Mutex<Vec<String>>,
}

impl BlobStoreProvider for MemoryBlobProvider {
    fn store_for(&self, token: &str) -> Arc<dyn BlobStore> {
        self.tokens.lock().unwrap().push(token.to_string());
        self.store.clone()
    }
}

/// Text-to-image model returning a flat image of the requested size.
pub struct FakeTextToImage {
    pub color: [u8; 3],
    pub fail_with: Option<String>,
    pub calls: Mutex<Vec<TextToImageParams>>,
}

impl FakeTextToImage {
    pub fn new(color: [u8; 3]) -> Self {
        Self {
            color,
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new([0, 0, 0])
        }
    }
}

#[async_trait]
impl TextToImage for FakeTextToImage {
    async fn generate(&self, params: &TextToImageParams) -> Result<Raster, CollaboratorError> {
        self.calls.lock().unwrap().push(params.clone());
        if let Some(message) = &self.fail_with {
            return Err(CollaboratorError::Unavailable(message.clone()));
        }
        Ok(Raster::filled(params.width, params.height, &self.color)?)
    }
}

/// Multi-view model: frame `i` is flat red `i * 10`.
pub struct FakeMultiview {
    pub view_count: usize,
    pub frames_returned: usize,
    pub calls: Mutex<Vec<MultiviewParams>>,
}

impl FakeMultiview {
    pub fn new(view_count: usize) -> Self {
        Self {
            view_count,
            frames_returned: view_count,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MultiviewGenerator for FakeMultiview {
    fn view_count(&self) -> usize {
        self.view_count
    }

    async fn generate(
        &self,
        _image: &Raster,
        params: &MultiviewParams,
    ) -> Result<Vec<Raster>, CollaboratorError> {
        self.calls.lock().unwrap().push(params.clone());
        (0..self.frames_returned)
            .map(|i| {
                Raster::filled(params.width, params.height, &[(i * 10) as u8, 0, 0])
                    .map_err(CollaboratorError::from)
            })
            .collect()
    }
}

/// Cutout recording the thresholds it was called with.
#[derive(Default)]
pub struct FakeCutout {
    pub calls: Mutex<Vec<Option<MattingThresholds>>>,
}

#[async_trait]
impl Cutout for FakeCutout {
    async fn cutout(
        &self,
        image: &Raster,
        matting: Option<MattingThresholds>,
    ) -> Result<Raster, CollaboratorError> {
        self.calls.lock().unwrap().push(matting);
        Ok(image.to_rgba())
    }
}

/// Webhook sender keeping every delivery; optionally answers with an HTTP
/// error after recording.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<(String, SignedPayload)>>,
    pub respond_with: Option<u16>,
}

impl RecordingSender {
    pub fn failing(status: u16) -> Self {
        Self {
            respond_with: Some(status),
            ..Self::default()
        }
    }

    pub fn payloads(&self) -> Vec<WebhookPayload> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| serde_json::from_str(&p.body).unwrap())
            .collect()
    }

    /// `(status, progress, stage)` of every delivery.
    pub fn timeline(&self) -> Vec<(JobStatus, Option<u8>, Option<String>)> {
        self.payloads()
            .into_iter()
            .map(|p| (p.status, p.progress, p.current_stage))
            .collect()
    }

    pub fn percents(&self) -> Vec<u8> {
        self.payloads().iter().filter_map(|p| p.progress).collect()
    }
}

#[async_trait]
impl WebhookSender for RecordingSender {
    async fn send(&self, url: &str, payload: &SignedPayload) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        match self.respond_with {
            Some(status) => Err(DeliveryError::Status { status }),
            None => Ok(()),
        }
    }
}

/// Fakes wired into [`Collaborators`], with handles kept for assertions.
pub struct Harness {
    pub text_to_image: Arc<FakeTextToImage>,
    pub multiview: Arc<FakeMultiview>,
    pub cutout: Arc<FakeCutout>,
    pub blobs: Arc<MemoryBlobProvider>,
    pub webhooks: Arc<RecordingSender>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(FakeTextToImage::new([120, 90, 60]), FakeMultiview::new(21))
    }

    pub fn with(text_to_image: FakeTextToImage, multiview: FakeMultiview) -> Self {
        Self {
            text_to_image: Arc::new(text_to_image),
            multiview: Arc::new(multiview),
            cutout: Arc::new(FakeCutout::default()),
            blobs: Arc::new(MemoryBlobProvider::default()),
            webhooks: Arc::new(RecordingSender::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            text_to_image: self.text_to_image.clone(),
            multiview: self.multiview.clone(),
            cutout: self.cutout.clone(),
            blobs: self.blobs.clone(),
        }
    }

    pub fn store(&self) -> &MemoryBlobs {
        &self.blobs.store
    }

    pub fn reporter(&self, job_id: &str, job_type: JobType) -> ProgressReporter {
        ProgressReporter::new(
            job_id,
            job_type,
            WebhookTarget::new(HOOK_URL, HOOK_SECRET),
            self.webhooks.clone(),
        )
    }
}

pub fn png_bytes(raster: &Raster) -> Vec<u8> {
    encode_png(raster, &PngConfig::default()).unwrap()
}
