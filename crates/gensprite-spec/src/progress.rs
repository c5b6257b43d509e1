//! Job progress protocol.
//!
//! Every job moves through
//!
//! ```text
//! NotStarted -> Processing(0..=99) -> Completed(100)
//!                                  \-> Failed
//! ```
//!
//! and never backwards. [`ProgressTracker`] enforces that ordering; it never
//! reorders or clamps, it only accepts or rejects. [`WebhookPayload`] is the
//! JSON body each accepted event is reported with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canonical::to_canonical_string;
use crate::job::JobType;
use crate::result::JobResult;

/// Highest percent a `Processing` event may carry.
pub const MAX_PROCESSING_PERCENT: u8 = 99;

/// Percent carried by the terminal `Completed` event.
pub const COMPLETED_PERCENT: u8 = 100;

/// Stage label carried by the terminal `Completed` event.
pub const COMPLETED_STAGE: &str = "Completed";

/// Wire status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

/// A progress update emitted by a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Percent complete, 0..=99.
    pub percent: u8,
    /// Human-readable stage label.
    pub stage: String,
}

impl ProgressEvent {
    pub fn new(percent: u8, stage: impl Into<String>) -> Self {
        Self {
            percent,
            stage: stage.into(),
        }
    }
}

/// Anything a job reports over its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Processing(ProgressEvent),
    Completed(JobResult),
    Failed(String),
}

impl JobEvent {
    /// Wire status of this event.
    pub fn status(&self) -> JobStatus {
        match self {
            JobEvent::Processing(_) => JobStatus::Processing,
            JobEvent::Completed(_) => JobStatus::Completed,
            JobEvent::Failed(_) => JobStatus::Failed,
        }
    }
}

/// Where a job currently is in the progress protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    NotStarted,
    Processing { percent: u8 },
    Completed,
    Failed,
}

impl ProgressState {
    /// Whether no further events are valid.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressState::Completed | ProgressState::Failed)
    }
}

/// A rejected progress event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("job already finished ({state:?}); no further events are accepted")]
    AfterTerminal { state: ProgressState },

    #[error("progress went backwards from {previous}% to {attempted}%")]
    Regressed { previous: u8, attempted: u8 },

    #[error("processing progress must be at most {max}%, got {percent}%", max = MAX_PROCESSING_PERCENT)]
    OutOfRange { percent: u8 },
}

/// Forward-only state machine for one job's events.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    state: ProgressState,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            state: ProgressState::NotStarted,
        }
    }

    /// Current state.
    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Checks whether `event` may follow the current state, without applying it.
    pub fn check(&self, event: &JobEvent) -> Result<(), ProgressError> {
        if self.state.is_terminal() {
            return Err(ProgressError::AfterTerminal { state: self.state });
        }

        if let JobEvent::Processing(progress) = event {
            if progress.percent > MAX_PROCESSING_PERCENT {
                return Err(ProgressError::OutOfRange {
                    percent: progress.percent,
                });
            }
            if let ProgressState::Processing { percent } = self.state {
                if progress.percent < percent {
                    return Err(ProgressError::Regressed {
                        previous: percent,
                        attempted: progress.percent,
                    });
                }
            }
        }

        Ok(())
    }

    /// Applies `event` if it is a valid successor of the current state.
    pub fn apply(&mut self, event: &JobEvent) -> Result<ProgressState, ProgressError> {
        self.check(event)?;
        self.state = match event {
            JobEvent::Processing(progress) => ProgressState::Processing {
                percent: progress.percent,
            },
            JobEvent::Completed(_) => ProgressState::Completed,
            JobEvent::Failed(_) => ProgressState::Failed,
        };
        Ok(self.state)
    }
}

/// JSON body of a webhook notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub job_id: String,
    pub job_type: JobType,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WebhookPayload {
    /// Builds the payload reporting `event` for a job.
    pub fn for_event(job_id: impl Into<String>, job_type: JobType, event: &JobEvent) -> Self {
        let mut payload = Self {
            job_id: job_id.into(),
            job_type,
            status: event.status(),
            progress: None,
            current_stage: None,
            result: None,
            error: None,
        };

        match event {
            JobEvent::Processing(progress) => {
                payload.progress = Some(progress.percent);
                payload.current_stage = Some(progress.stage.clone());
            }
            JobEvent::Completed(result) => {
                payload.progress = Some(COMPLETED_PERCENT);
                payload.current_stage = Some(COMPLETED_STAGE.to_string());
                payload.result = Some(result.clone());
            }
            JobEvent::Failed(error) => {
                payload.error = Some(error.clone());
            }
        }

        payload
    }

    /// Canonical JSON body: sorted keys, no whitespace.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        to_canonical_string(self)
    }
}
