//! Rotation: normalize, multi-view orbit, eight cut-out directions.

use gensprite_raster::decode_image;
use gensprite_spec::{CompassDirection, DirectionSet, RotationJob, RotationResult};

use super::AssetPipeline;
use crate::collaborators::{BlobStore, MultiviewParams};
use crate::error::JobError;
use crate::normalizer::ImageNormalizer;
use crate::reporter::ProgressReporter;
use crate::sampler::DirectionSampler;

/// Input and output resolution of the multi-view generator.
pub const ROTATION_INPUT_SIZE: u32 = 576;

/// Percent reported before processing direction `i` of 8: spread over 60..95.
fn direction_percent(i: usize) -> u8 {
    (60 + i * 35 / CompassDirection::ALL.len()) as u8
}

pub(super) async fn run(
    pipeline: &AssetPipeline,
    job_id: &str,
    job: &RotationJob,
    blobs: &dyn BlobStore,
    reporter: &mut ProgressReporter,
) -> Result<RotationResult, JobError> {
    let collaborators = pipeline.collaborators();

    reporter.progress(5, "Downloading input image...").await?;
    let input = decode_image(&blobs.get(&job.input_image_url).await?)?;

    reporter.progress(10, "Preprocessing image...").await?;
    let normalizer =
        ImageNormalizer::new(collaborators.cutout.clone()).with_target_size(ROTATION_INPUT_SIZE);
    let prepared = normalizer.normalize(&input).await?;

    reporter.progress(15, "Preparing multiview model...").await?;
    let view_count = collaborators.multiview.view_count();
    let sampler = DirectionSampler::for_view_count(collaborators.cutout.clone(), view_count)?;
    let params = MultiviewParams::orbit(view_count, job.elevation, ROTATION_INPUT_SIZE);

    reporter.progress(20, "Generating orbital views...").await?;
    let frames = collaborators.multiview.generate(&prepared, &params).await?;
    log::debug!("job {}: {} frames generated", job_id, frames.len());

    reporter.progress(60, "Processing rotations...").await?;
    let selected = sampler.select(&frames)?;

    let mut urls = Vec::with_capacity(CompassDirection::ALL.len());
    for (i, (direction, frame)) in selected.iter().enumerate() {
        reporter
            .progress(
                direction_percent(i),
                format!("Processing {} direction...", direction),
            )
            .await?;
        let cut = sampler.sample_direction(frame).await?;
        let path = format!("rotations/{}/{}.png", job_id, direction.slug());
        urls.push(pipeline.upload(blobs, &cut, &path).await?);
    }

    let mut urls = urls.into_iter();
    let urls = DirectionSet::try_from_fn(|direction| {
        urls.next()
            .ok_or_else(|| JobError::Fault(format!("no upload for {}", direction)))
    })?;
    Ok(RotationResult::from_directions(urls))
}
