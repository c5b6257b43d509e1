//! Asset pipelines.
//!
//! [`AssetPipeline::run`] dispatches a validated job to its pipeline and is
//! the single place where job errors are caught, logged and reported. The
//! per-type pipelines only emit processing events; `Completed` and `Failed`
//! are reported here.

use gensprite_raster::{encode_png_with_hash, PbrSettings, PngConfig, Raster};
use gensprite_spec::{Job, JobKind, JobResult};
use log::{error, info};

use crate::collaborators::{BlobStore, Collaborators};
use crate::error::JobError;
use crate::reporter::ProgressReporter;

mod rotation;
mod sprite;
mod texture;

pub use rotation::ROTATION_INPUT_SIZE;

const PNG_CONTENT_TYPE: &str = "image/png";

/// Runs jobs against a set of collaborators.
#[derive(Clone)]
pub struct AssetPipeline {
    collaborators: Collaborators,
    pbr: PbrSettings,
    png: PngConfig,
}

impl AssetPipeline {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            pbr: PbrSettings::default(),
            png: PngConfig::default(),
        }
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Runs `job`, uploading through `blobs` and reporting through
    /// `reporter`, then reports the terminal event.
    pub async fn run(
        &self,
        job: &Job,
        blobs: &dyn BlobStore,
        reporter: &mut ProgressReporter,
    ) -> Result<JobResult, JobError> {
        info!("job {}: starting {} pipeline", job.id, job.job_type());

        let outcome = match &job.kind {
            JobKind::Sprite(params) => sprite::run(self, &job.id, params, blobs, reporter)
                .await
                .map(JobResult::Sprite),
            JobKind::Texture(params) => texture::run(self, &job.id, params, blobs, reporter)
                .await
                .map(JobResult::Texture),
            JobKind::Rotation(params) => rotation::run(self, &job.id, params, blobs, reporter)
                .await
                .map(JobResult::Rotation),
        };

        match outcome {
            Ok(result) => {
                reporter.complete(result.clone()).await?;
                info!("job {}: completed", job.id);
                Ok(result)
            }
            Err(err) => {
                if err.is_fault() {
                    error!("job {}: defect [{}]: {}", job.id, err.code(), err);
                } else {
                    error!("job {}: failed [{}]: {}", job.id, err.code(), err);
                }
                if let Err(e) = reporter.fail(err.to_string()).await {
                    error!("job {}: could not report failure: {}", job.id, e);
                }
                Err(err)
            }
        }
    }

    /// Encodes `raster` and stores it at `path`, returning the public URL.
    async fn upload(
        &self,
        blobs: &dyn BlobStore,
        raster: &Raster,
        path: &str,
    ) -> Result<String, JobError> {
        let (bytes, hash) = encode_png_with_hash(raster, &self.png)?;
        let size = bytes.len();
        let url = blobs.put(bytes, path, PNG_CONTENT_TYPE).await?;
        info!("uploaded {} ({} bytes, blake3 {})", path, size, hash);
        Ok(url)
    }
}

/// The job's seed, or a fresh random one.
fn resolve_seed(seed: Option<u32>) -> u32 {
    seed.unwrap_or_else(rand::random)
}
