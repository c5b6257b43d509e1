//! End-to-end pipeline runs against in-memory collaborators.

mod common;

use common::*;
use gensprite_raster::{decode_image, Raster};
use gensprite_spec::{
    CompassDirection, Job, JobKind, JobResult, JobStatus, JobType, ProgressState, RotationJob,
    SpriteJob, TextureJob,
};
use gensprite_worker::collaborators::MattingThresholds;
use gensprite_worker::webhook::sign_payload;
use gensprite_worker::{AssetPipeline, JobError};
use pretty_assertions::assert_eq;

fn sprite_job(id: &str, seed: Option<u32>) -> Job {
    Job {
        id: id.to_string(),
        kind: JobKind::Sprite(SpriteJob {
            prompt: "a knight".to_string(),
            width: 64,
            height: 96,
            seed,
        }),
    }
}

fn rotation_job(id: &str, url: &str) -> Job {
    Job {
        id: id.to_string(),
        kind: JobKind::Rotation(RotationJob {
            input_image_url: url.to_string(),
            elevation: 20.0,
        }),
    }
}

fn processing(percent: u8, stage: &str) -> (JobStatus, Option<u8>, Option<String>) {
    (JobStatus::Processing, Some(percent), Some(stage.to_string()))
}

fn completed() -> (JobStatus, Option<u8>, Option<String>) {
    (JobStatus::Completed, Some(100), Some("Completed".to_string()))
}

#[tokio::test]
async fn sprite_reports_stages_and_uploads_both_images() {
    let harness = Harness::new();
    let pipeline = AssetPipeline::new(harness.collaborators());
    let mut reporter = harness.reporter("s1", JobType::Sprite);

    let result = pipeline
        .run(&sprite_job("s1", Some(7)), harness.store(), &mut reporter)
        .await
        .unwrap();

    let JobResult::Sprite(sprite) = result else {
        panic!("expected sprite result");
    };
    assert_eq!(sprite.raw_url, "https://blob.test/sprites/s1/raw.png");
    assert_eq!(sprite.processed_url, "https://blob.test/sprites/s1/processed.png");
    assert_eq!(sprite.seed, 7);

    assert_eq!(
        harness.webhooks.timeline(),
        vec![
            processing(5, "Preparing sprite model..."),
            processing(10, "Generating sprite..."),
            processing(60, "Uploading raw image..."),
            processing(70, "Removing background..."),
            processing(90, "Uploading processed image..."),
            completed(),
        ]
    );
    assert_eq!(reporter.state(), ProgressState::Completed);

    assert_eq!(
        harness.store().paths(),
        vec!["sprites/s1/raw.png", "sprites/s1/processed.png"]
    );
    let processed = harness.store().upload("sprites/s1/processed.png");
    assert_eq!(processed.content_type, "image/png");
    let processed = decode_image(&processed.bytes).unwrap();
    assert_eq!((processed.width(), processed.height()), (64, 96));
    assert_eq!(processed.pixel(0, 0), &[120, 90, 60, 255]);

    let params = harness.text_to_image.calls.lock().unwrap()[0].clone();
    assert_eq!((params.width, params.height, params.seed), (64, 96, 7));
    assert_eq!(
        *harness.cutout.calls.lock().unwrap(),
        vec![Some(MattingThresholds::SPRITE)]
    );
}

#[tokio::test]
async fn missing_seed_is_drawn_and_reported() {
    let harness = Harness::new();
    let pipeline = AssetPipeline::new(harness.collaborators());
    let mut reporter = harness.reporter("s2", JobType::Sprite);

    let result = pipeline
        .run(&sprite_job("s2", None), harness.store(), &mut reporter)
        .await
        .unwrap();

    let JobResult::Sprite(sprite) = result else {
        panic!("expected sprite result");
    };
    let used = harness.text_to_image.calls.lock().unwrap()[0].seed;
    assert_eq!(sprite.seed, used);
}

#[tokio::test]
async fn texture_uploads_five_maps_in_order() {
    let harness = Harness::new();
    let pipeline = AssetPipeline::new(harness.collaborators());
    let mut reporter = harness.reporter("t1", JobType::Texture);
    let job = Job {
        id: "t1".to_string(),
        kind: JobKind::Texture(TextureJob {
            prompt: "mossy stone".to_string(),
            seed: Some(3),
        }),
    };

    let result = pipeline.run(&job, harness.store(), &mut reporter).await.unwrap();

    let JobResult::Texture(texture) = result else {
        panic!("expected texture result");
    };
    assert_eq!(texture.normal_url, "https://blob.test/textures/t1/normal.png");
    assert_eq!(texture.metallic_url, "https://blob.test/textures/t1/metallic.png");
    assert_eq!(texture.seed, 3);

    assert_eq!(
        harness.webhooks.percents(),
        vec![5, 10, 50, 55, 60, 65, 70, 75, 80, 85, 90, 95, 100]
    );
    assert_eq!(
        harness.store().paths(),
        vec![
            "textures/t1/basecolor.png",
            "textures/t1/normal.png",
            "textures/t1/height.png",
            "textures/t1/roughness.png",
            "textures/t1/metallic.png",
        ]
    );

    // A flat base texture gives a flat normal map.
    let normal = decode_image(&harness.store().upload("textures/t1/normal.png").bytes).unwrap();
    assert_eq!((normal.width(), normal.height()), (1024, 1024));
    assert_eq!(normal.pixel(511, 700), &[127, 127, 255]);

    let params = harness.text_to_image.calls.lock().unwrap()[0].clone();
    assert!(params.prompt.starts_with("mossy stone, seamless tileable texture"));
    assert!(params.negative_prompt.is_some());
}

#[tokio::test]
async fn rotation_samples_eight_directions() {
    let harness = Harness::new();
    let input_url = "https://blob.test/uploads/knight.png";
    harness.store().seed(
        input_url,
        png_bytes(&Raster::filled(64, 48, &[30, 60, 90]).unwrap()),
    );
    let pipeline = AssetPipeline::new(harness.collaborators());
    let mut reporter = harness.reporter("r1", JobType::Rotation);

    let result = pipeline
        .run(&rotation_job("r1", input_url), harness.store(), &mut reporter)
        .await
        .unwrap();

    let JobResult::Rotation(rotation) = result else {
        panic!("expected rotation result");
    };
    assert_eq!(rotation.rotation_n, "https://blob.test/rotations/r1/n.png");
    assert_eq!(
        rotation.url(CompassDirection::SE),
        "https://blob.test/rotations/r1/se.png"
    );

    let timeline = harness.webhooks.timeline();
    assert_eq!(
        &timeline[..5],
        &[
            processing(5, "Downloading input image..."),
            processing(10, "Preprocessing image..."),
            processing(15, "Preparing multiview model..."),
            processing(20, "Generating orbital views..."),
            processing(60, "Processing rotations..."),
        ]
    );
    assert_eq!(timeline[5], processing(60, "Processing S direction..."));
    assert_eq!(timeline[9], processing(77, "Processing N direction..."));
    assert_eq!(
        harness.webhooks.percents(),
        vec![5, 10, 15, 20, 60, 60, 64, 68, 73, 77, 81, 86, 90, 100]
    );

    let expected_paths: Vec<String> = CompassDirection::ALL
        .iter()
        .map(|d| format!("rotations/r1/{}.png", d.slug()))
        .collect();
    assert_eq!(harness.store().paths(), expected_paths);

    // 21-view table: north is frame 10, north-west frame 8.
    let north = decode_image(&harness.store().upload("rotations/r1/n.png").bytes).unwrap();
    assert_eq!(north.pixel(0, 0), &[100, 0, 0, 255]);
    let north_west = decode_image(&harness.store().upload("rotations/r1/nw.png").bytes).unwrap();
    assert_eq!(north_west.pixel(0, 0), &[80, 0, 0, 255]);

    let params = harness.multiview.calls.lock().unwrap()[0].clone();
    assert_eq!(params.num_frames, 21);
    assert_eq!((params.width, params.height), (576, 576));
    assert!((params.polars_rad[0] - 70f64.to_radians()).abs() < 1e-12);

    // Opaque input goes through default cutout, then each frame with the
    // rotation thresholds.
    let cutouts = harness.cutout.calls.lock().unwrap().clone();
    assert_eq!(cutouts.len(), 9);
    assert_eq!(cutouts[0], None);
    assert!(cutouts[1..]
        .iter()
        .all(|c| *c == Some(MattingThresholds::ROTATION)));
}

#[tokio::test]
async fn collaborator_failure_reports_failed() {
    let harness = Harness::with(
        FakeTextToImage::failing("model offline"),
        FakeMultiview::new(21),
    );
    let pipeline = AssetPipeline::new(harness.collaborators());
    let mut reporter = harness.reporter("s3", JobType::Sprite);

    let err = pipeline
        .run(&sprite_job("s3", Some(1)), harness.store(), &mut reporter)
        .await
        .unwrap_err();

    assert!(matches!(err, JobError::Collaborator(_)));
    assert_eq!(err.to_string(), "model offline");
    assert_eq!(reporter.state(), ProgressState::Failed);

    let payloads = harness.webhooks.payloads();
    let last = payloads.last().unwrap();
    assert_eq!(last.status, JobStatus::Failed);
    assert_eq!(last.error.as_deref(), Some("model offline"));
    assert_eq!(harness.webhooks.percents(), vec![5, 10]);
    assert!(harness.store().paths().is_empty());
}

#[tokio::test]
async fn unsupported_view_count_is_a_fault() {
    let harness = Harness::with(FakeTextToImage::new([0, 0, 0]), FakeMultiview::new(12));
    let input_url = "https://blob.test/uploads/in.png";
    harness.store().seed(
        input_url,
        png_bytes(&Raster::filled(8, 8, &[1, 2, 3, 255]).unwrap()),
    );
    let pipeline = AssetPipeline::new(harness.collaborators());
    let mut reporter = harness.reporter("r2", JobType::Rotation);

    let err = pipeline
        .run(&rotation_job("r2", input_url), harness.store(), &mut reporter)
        .await
        .unwrap_err();

    assert!(err.is_fault());
    assert_eq!(err.code(), "JOB_005");
    assert!(err.to_string().starts_with("internal error: "));
    assert!(harness.multiview.calls.lock().unwrap().is_empty());

    let last = harness.webhooks.payloads().pop().unwrap();
    assert_eq!(last.status, JobStatus::Failed);
}

#[tokio::test]
async fn short_orbit_is_a_fault() {
    let mut multiview = FakeMultiview::new(21);
    multiview.frames_returned = 12;
    let harness = Harness::with(FakeTextToImage::new([0, 0, 0]), multiview);
    let input_url = "https://blob.test/uploads/in.png";
    harness.store().seed(
        input_url,
        png_bytes(&Raster::filled(8, 8, &[1, 2, 3]).unwrap()),
    );
    let pipeline = AssetPipeline::new(harness.collaborators());
    let mut reporter = harness.reporter("r3", JobType::Rotation);

    let err = pipeline
        .run(&rotation_job("r3", input_url), harness.store(), &mut reporter)
        .await
        .unwrap_err();

    assert!(err.is_fault());
    assert!(harness.store().paths().is_empty());
}

#[tokio::test]
async fn missing_input_image_fails_the_job() {
    let harness = Harness::new();
    let pipeline = AssetPipeline::new(harness.collaborators());
    let mut reporter = harness.reporter("r4", JobType::Rotation);

    let err = pipeline
        .run(
            &rotation_job("r4", "https://blob.test/uploads/missing.png"),
            harness.store(),
            &mut reporter,
        )
        .await
        .unwrap_err();

    assert!(!err.is_fault());
    assert!(err.to_string().contains("404"));
    assert_eq!(harness.webhooks.percents(), vec![5]);
}

#[tokio::test]
async fn webhook_errors_do_not_fail_the_job() {
    let harness = Harness {
        webhooks: std::sync::Arc::new(RecordingSender::failing(503)),
        ..Harness::new()
    };
    let pipeline = AssetPipeline::new(harness.collaborators());
    let mut reporter = harness.reporter("s4", JobType::Sprite);

    let result = pipeline
        .run(&sprite_job("s4", Some(2)), harness.store(), &mut reporter)
        .await;

    assert!(result.is_ok());
    assert_eq!(harness.webhooks.sent.lock().unwrap().len(), 6);
}

#[tokio::test]
async fn every_delivery_is_signed() {
    let harness = Harness::new();
    let pipeline = AssetPipeline::new(harness.collaborators());
    let mut reporter = harness.reporter("s5", JobType::Sprite);

    pipeline
        .run(&sprite_job("s5", Some(5)), harness.store(), &mut reporter)
        .await
        .unwrap();

    for (url, payload) in harness.webhooks.sent.lock().unwrap().iter() {
        assert_eq!(url, HOOK_URL);
        assert_eq!(
            payload.signature,
            sign_payload(HOOK_SECRET.as_bytes(), payload.body.as_bytes())
        );
        assert!(payload.body.starts_with(r#"{"current_stage":"#));
    }
}
