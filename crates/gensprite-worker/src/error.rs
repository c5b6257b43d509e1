//! Job-level errors.

use gensprite_raster::{DirectionError, PngError, RasterError};
use gensprite_spec::{JobValidationError, ProgressError};
use thiserror::Error;

use crate::collaborators::CollaboratorError;

/// Why a job did not complete.
#[derive(Debug, Error)]
pub enum JobError {
    /// The request was missing or had malformed fields.
    #[error("{}", .0.message)]
    Invalid(#[from] JobValidationError),

    /// A model, cutout or storage call failed.
    #[error("{0}")]
    Collaborator(#[from] CollaboratorError),

    #[error("image processing failed: {0}")]
    Raster(#[from] RasterError),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] PngError),

    /// A defect in the worker itself rather than in its inputs or
    /// collaborators.
    #[error("internal error: {0}")]
    Fault(String),
}

impl JobError {
    /// Stable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            JobError::Invalid(_) => "JOB_001",
            JobError::Collaborator(_) => "JOB_002",
            JobError::Raster(_) => "JOB_003",
            JobError::Png(_) => "JOB_004",
            JobError::Fault(_) => "JOB_005",
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, JobError::Fault(_))
    }
}

impl From<ProgressError> for JobError {
    fn from(e: ProgressError) -> Self {
        JobError::Fault(e.to_string())
    }
}

impl From<DirectionError> for JobError {
    fn from(e: DirectionError) -> Self {
        JobError::Fault(e.to_string())
    }
}
