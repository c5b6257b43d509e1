//! GenSprite worker library.
//!
//! This crate runs asset generation jobs: it validates queue payloads, drives
//! the sprite, texture and rotation pipelines against their external
//! collaborators (inference sidecar, blob storage), and reports signed
//! progress webhooks. The `gensprite` binary wraps it with offline commands
//! for the deterministic image stages.

pub mod blob;
pub mod collaborators;
pub mod commands;
pub mod config;
pub mod error;
pub mod handler;
pub mod inference;
pub mod logger;
pub mod normalizer;
pub mod pipeline;
pub mod reporter;
pub mod sampler;
pub mod webhook;

// Re-export commonly used types at the crate root
pub use collaborators::{
    BlobStore, BlobStoreProvider, CollaboratorError, Collaborators, Cutout, MultiviewGenerator,
    TextToImage,
};
pub use config::{ConfigError, WorkerConfig};
pub use error::JobError;
pub use handler::{HandlerOutput, Worker};
pub use pipeline::AssetPipeline;
pub use reporter::ProgressReporter;
pub use webhook::{sign_payload, WebhookSender, WebhookTarget};
