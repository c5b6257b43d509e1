//! Texture: text-to-image, seamless tiling, derived PBR maps.

use gensprite_raster::pbr::{height_map, metallic_map, normal_map, roughness_map};
use gensprite_raster::{make_seamless, PbrMap};
use gensprite_spec::{TextureJob, TextureResult};

use super::{resolve_seed, AssetPipeline};
use crate::collaborators::{BlobStore, ImageModel, TextToImageParams};
use crate::error::JobError;
use crate::reporter::ProgressReporter;

/// Side length of generated base colors.
pub const TEXTURE_SIZE: u32 = 1024;

const PROMPT_SUFFIX: &str = ", seamless tileable texture, photorealistic material, high quality, \
detailed surface, even lighting, no shadows, flat texture view, PBR material";

const NEGATIVE_PROMPT: &str = "3d render, perspective, depth, shadows, uneven lighting, \
objects, people, text, watermark, logo, border, frame";

pub(super) fn generation_params(job: &TextureJob, seed: u32) -> TextToImageParams {
    TextToImageParams {
        model: ImageModel::Texture,
        prompt: format!("{}{}", job.prompt, PROMPT_SUFFIX),
        negative_prompt: Some(NEGATIVE_PROMPT.to_string()),
        width: TEXTURE_SIZE,
        height: TEXTURE_SIZE,
        num_inference_steps: 30,
        guidance_scale: 7.5,
        seed,
    }
}

fn upload_path(job_id: &str, map: PbrMap) -> String {
    format!("textures/{}/{}.png", job_id, map.name())
}

pub(super) async fn run(
    pipeline: &AssetPipeline,
    job_id: &str,
    job: &TextureJob,
    blobs: &dyn BlobStore,
    reporter: &mut ProgressReporter,
) -> Result<TextureResult, JobError> {
    let settings = pipeline.pbr;

    reporter.progress(5, "Preparing texture model...").await?;
    let seed = resolve_seed(job.seed);

    reporter.progress(10, "Generating base texture...").await?;
    let generated = pipeline
        .collaborators()
        .text_to_image
        .generate(&generation_params(job, seed))
        .await?;

    reporter.progress(50, "Making texture seamless...").await?;
    let basecolor = make_seamless(&generated);

    reporter.progress(55, "Generating normal map...").await?;
    let normal = normal_map(&basecolor, settings.normal_strength);

    reporter.progress(60, "Generating height map...").await?;
    let height = height_map(&basecolor);

    reporter.progress(65, "Generating roughness map...").await?;
    let roughness = roughness_map(&basecolor, settings.base_roughness);

    reporter.progress(70, "Generating metallic map...").await?;
    let metallic = metallic_map(&basecolor, settings.metallic_threshold);

    reporter.progress(75, "Uploading textures...").await?;
    let basecolor_url = pipeline
        .upload(blobs, &basecolor, &upload_path(job_id, PbrMap::Basecolor))
        .await?;

    reporter.progress(80, "Uploading normal map...").await?;
    let normal_url = pipeline
        .upload(blobs, &normal, &upload_path(job_id, PbrMap::Normal))
        .await?;

    reporter.progress(85, "Uploading height map...").await?;
    let height_url = pipeline
        .upload(blobs, &height, &upload_path(job_id, PbrMap::Height))
        .await?;

    reporter.progress(90, "Uploading roughness map...").await?;
    let roughness_url = pipeline
        .upload(blobs, &roughness, &upload_path(job_id, PbrMap::Roughness))
        .await?;

    reporter.progress(95, "Uploading metallic map...").await?;
    let metallic_url = pipeline
        .upload(blobs, &metallic, &upload_path(job_id, PbrMap::Metallic))
        .await?;

    Ok(TextureResult {
        basecolor_url,
        normal_url,
        height_url,
        roughness_url,
        metallic_url,
        seed,
    })
}
