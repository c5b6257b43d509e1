//! GenSprite Job Protocol Library
//!
//! This crate provides the pure data model shared by the GenSprite asset
//! worker: job requests and their validation, typed job results, the
//! compass direction tables used to index multi-view renders, and the
//! forward-only progress protocol reported over signed webhooks.
//!
//! Nothing in this crate performs I/O.
//!
//! # Example
//!
//! ```
//! use gensprite_spec::{JobKind, JobRequest};
//!
//! let request: JobRequest = serde_json::from_str(
//!     r#"{"job_id": "abc123", "job_type": "texture", "prompt": "mossy bricks"}"#,
//! )
//! .unwrap();
//!
//! let job = request.validate().unwrap();
//! assert_eq!(job.id, "abc123");
//! assert!(matches!(job.kind, JobKind::Texture(_)));
//! ```
//!
//! # Modules
//!
//! - [`canonical`]: canonical JSON serialization for signed payloads
//! - [`direction`]: compass directions and per-view-count index tables
//! - [`error`]: validation error codes
//! - [`job`]: job requests, job types and validated jobs
//! - [`progress`]: progress events, the progress state machine and webhook payloads
//! - [`result`]: typed job results

pub mod canonical;
pub mod direction;
pub mod error;
pub mod job;
pub mod progress;
pub mod result;

// Re-export commonly used types at the crate root
pub use canonical::canonicalize_json;
pub use direction::{CompassDirection, DirectionSet, DirectionTable, DirectionTableError};
pub use error::{ErrorCode, JobValidationError};
pub use job::{
    Job, JobKind, JobRequest, JobType, RotationJob, SpriteJob, TextureJob, DEFAULT_ELEVATION,
    DEFAULT_SPRITE_SIZE, MAX_DIMENSION,
};
pub use progress::{
    JobEvent, JobStatus, ProgressError, ProgressEvent, ProgressState, ProgressTracker,
    WebhookPayload, COMPLETED_PERCENT, COMPLETED_STAGE, MAX_PROCESSING_PERCENT,
};
pub use result::{JobResult, RotationResult, SpriteResult, TextureResult};
