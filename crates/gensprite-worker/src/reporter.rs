//! Per-job progress reporting.
//!
//! The reporter owns the job's [`ProgressTracker`]: an event is first checked
//! against the progress protocol, then delivered to the webhook. Protocol
//! violations are returned to the caller; delivery failures never are.

use std::sync::Arc;

use gensprite_spec::{
    JobEvent, JobResult, JobType, ProgressError, ProgressEvent, ProgressState, ProgressTracker,
    WebhookPayload,
};
use log::{debug, info, warn};

use crate::webhook::{SignedPayload, WebhookSender, WebhookTarget};

/// Reports one job's events, in order, to its webhook.
pub struct ProgressReporter {
    job_id: String,
    job_type: JobType,
    target: Option<WebhookTarget>,
    sender: Arc<dyn WebhookSender>,
    tracker: ProgressTracker,
}

impl ProgressReporter {
    /// A reporter for one job. Without a target, events are checked but not
    /// delivered.
    pub fn new(
        job_id: impl Into<String>,
        job_type: JobType,
        target: Option<WebhookTarget>,
        sender: Arc<dyn WebhookSender>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            job_type,
            target,
            sender,
            tracker: ProgressTracker::new(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn job_type(&self) -> JobType {
        self.job_type
    }

    pub fn state(&self) -> ProgressState {
        self.tracker.state()
    }

    /// Reports a processing stage.
    pub async fn progress(
        &mut self,
        percent: u8,
        stage: impl Into<String>,
    ) -> Result<(), ProgressError> {
        let event = ProgressEvent::new(percent, stage);
        info!("job {}: {}% {}", self.job_id, event.percent, event.stage);
        self.report(JobEvent::Processing(event)).await
    }

    /// Reports successful completion.
    pub async fn complete(&mut self, result: JobResult) -> Result<(), ProgressError> {
        self.report(JobEvent::Completed(result)).await
    }

    /// Reports failure.
    pub async fn fail(&mut self, error: impl Into<String>) -> Result<(), ProgressError> {
        self.report(JobEvent::Failed(error.into())).await
    }

    /// Applies `event` to the tracker and delivers it.
    pub async fn report(&mut self, event: JobEvent) -> Result<(), ProgressError> {
        self.tracker.apply(&event)?;
        self.deliver(&event).await;
        Ok(())
    }

    async fn deliver(&self, event: &JobEvent) {
        let Some(target) = &self.target else {
            debug!("job {}: no webhook configured, skipping {:?}", self.job_id, event.status());
            return;
        };

        let payload = WebhookPayload::for_event(self.job_id.as_str(), self.job_type, event);
        let result = match SignedPayload::new(&payload, &target.secret) {
            Ok(signed) => {
                debug!("job {}: webhook body {}", self.job_id, signed.body);
                self.sender.send(&target.url, &signed).await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            let kind = if e.is_transient() { "transient" } else { "permanent" };
            warn!(
                "job {}: {} webhook delivery failure ({:?}), continuing: {}",
                self.job_id,
                kind,
                event.status(),
                e
            );
        }
    }
}
