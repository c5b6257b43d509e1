//! Queue-facing job handler.
//!
//! Takes the `{"input": {...}}` envelope the queue delivers, resolves
//! per-job overrides against the worker configuration, validates the request
//! and runs it. The output is `{"status": "completed", "result": {...}}` or
//! `{"error": "..."}`.

use std::sync::Arc;

use gensprite_spec::{ErrorCode, JobRequest, JobResult, JobStatus, JobValidationError};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blob::VercelBlobProvider;
use crate::collaborators::Collaborators;
use crate::config::WorkerConfig;
use crate::error::JobError;
use crate::inference::InferenceClient;
use crate::pipeline::AssetPipeline;
use crate::reporter::ProgressReporter;
use crate::webhook::{HttpWebhookSender, WebhookSender, WebhookTarget};

/// What the handler returns to the queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HandlerOutput {
    Completed { status: JobStatus, result: JobResult },
    Error { error: String },
}

impl HandlerOutput {
    pub fn completed(result: JobResult) -> Self {
        HandlerOutput::Completed {
            status: JobStatus::Completed,
            result,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        HandlerOutput::Error {
            error: message.into(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, HandlerOutput::Completed { .. })
    }
}

/// Processes jobs with a fixed set of collaborators.
pub struct Worker {
    config: WorkerConfig,
    pipeline: AssetPipeline,
    webhooks: Arc<dyn WebhookSender>,
}

impl Worker {
    pub fn new(
        config: WorkerConfig,
        collaborators: Collaborators,
        webhooks: Arc<dyn WebhookSender>,
    ) -> Self {
        Self {
            config,
            pipeline: AssetPipeline::new(collaborators),
            webhooks,
        }
    }

    /// A worker talking to the configured inference sidecar, Vercel Blob and
    /// webhook endpoint over HTTP.
    pub fn from_config(config: WorkerConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;

        let inference = Arc::new(
            InferenceClient::new(
                client.clone(),
                config.inference_url.clone(),
                config.multiview_view_count,
            )
            .with_timeout(config.inference_timeout()),
        );
        let collaborators = Collaborators {
            text_to_image: inference.clone(),
            multiview: inference.clone(),
            cutout: inference,
            blobs: Arc::new(VercelBlobProvider::new(
                client.clone(),
                config.blob_api_url.clone(),
                config.upload_timeout(),
                config.download_timeout(),
            )),
        };
        let webhooks = Arc::new(HttpWebhookSender::new(client, config.webhook_timeout()));

        Ok(Self::new(config, collaborators, webhooks))
    }

    /// Processes a raw `{"input": {...}}` envelope.
    ///
    /// An input that does not deserialize is still reported as failed when
    /// its job id and type can be read.
    pub async fn process_json(&self, envelope: &str) -> HandlerOutput {
        let input = match serde_json::from_str::<Value>(envelope) {
            Ok(Value::Object(mut fields)) => fields.remove("input"),
            Ok(_) => {
                warn!("rejecting job envelope that is not an object");
                return HandlerOutput::error("Invalid job input: expected a JSON object");
            }
            Err(e) => {
                warn!("rejecting malformed job envelope: {}", e);
                return HandlerOutput::error(format!("Invalid job input: {}", e));
            }
        };
        let Some(input) = input else {
            return self.process(&JobRequest::default()).await;
        };

        match JobRequest::deserialize(&input) {
            Ok(request) => self.process(&request).await,
            Err(e) => {
                let message = format!("Invalid job input: {}", e);
                let request = readable_fields(&input);
                if let Ok(mut reporter) = self.reporter_for(&request) {
                    let job_id = reporter.job_id().to_string();
                    warn!("job {}: {}", job_id, message);
                    if let Err(e) = reporter.fail(message.clone()).await {
                        error!("job {}: could not report failure: {}", job_id, e);
                    }
                } else {
                    warn!("rejecting job input: {}", e);
                }
                HandlerOutput::error(message)
            }
        }
    }

    /// Processes one job request.
    pub async fn process(&self, request: &JobRequest) -> HandlerOutput {
        let mut reporter = match self.reporter_for(request) {
            Ok(reporter) => reporter,
            Err(output) => return output,
        };
        let job_id = reporter.job_id().to_string();

        let blob_token = request
            .blob_token
            .clone()
            .unwrap_or_else(|| self.config.blob_token.clone());

        let job = match request.validate().and_then(|job| {
            if blob_token.trim().is_empty() {
                Err(JobValidationError::new(
                    ErrorCode::MissingBlobToken,
                    "Missing blob_token",
                ))
            } else {
                Ok(job)
            }
        }) {
            Ok(job) => job,
            Err(e) => {
                let err = JobError::from(e);
                warn!("job {}: invalid request [{}]: {}", job_id, err.code(), err);
                if let Err(e) = reporter.fail(err.to_string()).await {
                    error!("job {}: could not report failure: {}", job_id, e);
                }
                return HandlerOutput::error(err.to_string());
            }
        };

        info!("job {}: accepted {} job", job.id, job.job_type());
        let blobs = self.pipeline.collaborators().blobs.store_for(&blob_token);
        match self.pipeline.run(&job, blobs.as_ref(), &mut reporter).await {
            Ok(result) => HandlerOutput::completed(result),
            Err(e) => HandlerOutput::error(e.to_string()),
        }
    }

    /// Builds the job's progress reporter. Webhook payloads need a job id and
    /// a known job type, so without them the error is only returned.
    fn reporter_for(&self, request: &JobRequest) -> Result<ProgressReporter, HandlerOutput> {
        let Some(job_id) = request.job_id() else {
            warn!("rejecting job without job_id");
            return Err(HandlerOutput::error("Missing job_id"));
        };
        let job_type = request.job_type().map_err(|e| {
            warn!("job {}: {}", job_id, e);
            HandlerOutput::error(e.message)
        })?;

        Ok(ProgressReporter::new(
            job_id,
            job_type,
            self.webhook_target(request),
            self.webhooks.clone(),
        ))
    }

    /// Per-job webhook override, else the configured one.
    fn webhook_target(&self, request: &JobRequest) -> Option<WebhookTarget> {
        let url = request
            .webhook_url
            .clone()
            .unwrap_or_else(|| self.config.webhook_url.clone());
        let secret = request
            .webhook_secret
            .clone()
            .unwrap_or_else(|| self.config.webhook_secret.clone());
        WebhookTarget::new(url, secret)
    }
}

/// The string fields of an input that failed to deserialize as a whole.
fn readable_fields(input: &Value) -> JobRequest {
    let text = |key: &str| input.get(key).and_then(Value::as_str).map(str::to_string);
    JobRequest {
        job_id: text("job_id"),
        job_type: text("job_type"),
        webhook_url: text("webhook_url"),
        webhook_secret: text("webhook_secret"),
        ..JobRequest::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gensprite_spec::SpriteResult;
    use serde_json::json;

    #[test]
    fn test_output_shapes() {
        let done = HandlerOutput::completed(JobResult::Sprite(SpriteResult {
            raw_url: "r".into(),
            processed_url: "p".into(),
            seed: 1,
        }));
        assert_eq!(
            serde_json::to_value(&done).unwrap(),
            json!({"status": "completed", "result": {"raw_url": "r", "processed_url": "p", "seed": 1}})
        );
        assert_eq!(
            serde_json::to_value(HandlerOutput::error("Missing job_id")).unwrap(),
            json!({"error": "Missing job_id"})
        );
    }

    #[test]
    fn test_readable_fields_keeps_strings_only() {
        let input = json!({
            "job_id": "j9",
            "job_type": "sprite",
            "webhook_url": "https://hooks.test/x",
            "width": "wide",
            "prompt": 3
        });
        let request = readable_fields(&input);
        assert_eq!(request.job_id(), Some("j9"));
        assert_eq!(request.job_type.as_deref(), Some("sprite"));
        assert_eq!(request.webhook_url.as_deref(), Some("https://hooks.test/x"));
        assert_eq!(request.width, None);
        assert_eq!(request.prompt, None);

        assert_eq!(readable_fields(&json!(5)), JobRequest::default());
    }
}
