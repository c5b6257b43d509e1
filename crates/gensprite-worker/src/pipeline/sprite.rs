//! Sprite: text-to-image, then background removal.

use gensprite_spec::{SpriteJob, SpriteResult};

use super::{resolve_seed, AssetPipeline};
use crate::collaborators::{BlobStore, ImageModel, MattingThresholds, TextToImageParams};
use crate::error::JobError;
use crate::reporter::ProgressReporter;

const PROMPT_SUFFIX: &str =
    ", game sprite, centered, isolated object, simple clean background, digital art, high quality";

pub(super) fn generation_params(job: &SpriteJob, seed: u32) -> TextToImageParams {
    TextToImageParams {
        model: ImageModel::Sprite,
        prompt: format!("{}{}", job.prompt, PROMPT_SUFFIX),
        negative_prompt: None,
        width: job.width,
        height: job.height,
        num_inference_steps: 4,
        guidance_scale: 0.0,
        seed,
    }
}

pub(super) async fn run(
    pipeline: &AssetPipeline,
    job_id: &str,
    job: &SpriteJob,
    blobs: &dyn BlobStore,
    reporter: &mut ProgressReporter,
) -> Result<SpriteResult, JobError> {
    let collaborators = pipeline.collaborators();

    reporter.progress(5, "Preparing sprite model...").await?;
    let seed = resolve_seed(job.seed);

    reporter.progress(10, "Generating sprite...").await?;
    let raw = collaborators
        .text_to_image
        .generate(&generation_params(job, seed))
        .await?;

    reporter.progress(60, "Uploading raw image...").await?;
    let raw_url = pipeline
        .upload(blobs, &raw, &format!("sprites/{}/raw.png", job_id))
        .await?;

    reporter.progress(70, "Removing background...").await?;
    let processed = collaborators
        .cutout
        .cutout(&raw, Some(MattingThresholds::SPRITE))
        .await?
        .to_rgba();

    reporter.progress(90, "Uploading processed image...").await?;
    let processed_url = pipeline
        .upload(blobs, &processed, &format!("sprites/{}/processed.png", job_id))
        .await?;

    Ok(SpriteResult {
        raw_url,
        processed_url,
        seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_params() {
        let job = SpriteJob {
            prompt: "a cute robot".to_string(),
            width: 512,
            height: 768,
            seed: None,
        };
        let params = generation_params(&job, 9);
        assert_eq!(
            params.prompt,
            "a cute robot, game sprite, centered, isolated object, simple clean background, digital art, high quality"
        );
        assert_eq!((params.width, params.height), (512, 768));
        assert_eq!(params.num_inference_steps, 4);
        assert_eq!(params.guidance_scale, 0.0);
        assert_eq!(params.seed, 9);
    }
}
