//! Worker configuration.
//!
//! Read from the environment, or from a JSON file with the same fields in
//! snake case. Missing values fall back to the defaults below; per-job
//! request fields override the webhook target and the blob token.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blob::DEFAULT_BLOB_API_URL;

/// Default address of the inference sidecar.
pub const DEFAULT_INFERENCE_URL: &str = "http://127.0.0.1:8188";

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub webhook_url: String,
    pub webhook_secret: String,
    pub blob_token: String,
    pub blob_api_url: String,
    pub inference_url: String,
    pub multiview_view_count: usize,
    pub download_timeout_secs: u64,
    pub upload_timeout_secs: u64,
    pub webhook_timeout_secs: u64,
    /// Upper bound on one inference sidecar request, generation included.
    pub inference_timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            webhook_secret: String::new(),
            blob_token: String::new(),
            blob_api_url: DEFAULT_BLOB_API_URL.to_string(),
            inference_url: DEFAULT_INFERENCE_URL.to_string(),
            multiview_view_count: 21,
            download_timeout_secs: 60,
            upload_timeout_secs: 120,
            webhook_timeout_secs: 30,
            inference_timeout_secs: 600,
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

impl WorkerConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("WEBHOOK_URL") {
            config.webhook_url = v;
        }
        if let Some(v) = lookup("WEBHOOK_SECRET") {
            config.webhook_secret = v;
        }
        if let Some(v) = lookup("BLOB_READ_WRITE_TOKEN") {
            config.blob_token = v;
        }
        if let Some(v) = lookup("BLOB_API_URL") {
            config.blob_api_url = v;
        }
        if let Some(v) = lookup("INFERENCE_URL") {
            config.inference_url = v;
        }
        if let Some(v) = lookup("MULTIVIEW_VIEW_COUNT") {
            config.multiview_view_count = parse_number("MULTIVIEW_VIEW_COUNT", v)?;
        }
        if let Some(v) = lookup("DOWNLOAD_TIMEOUT_SECS") {
            config.download_timeout_secs = parse_number("DOWNLOAD_TIMEOUT_SECS", v)?;
        }
        if let Some(v) = lookup("UPLOAD_TIMEOUT_SECS") {
            config.upload_timeout_secs = parse_number("UPLOAD_TIMEOUT_SECS", v)?;
        }
        if let Some(v) = lookup("WEBHOOK_TIMEOUT_SECS") {
            config.webhook_timeout_secs = parse_number("WEBHOOK_TIMEOUT_SECS", v)?;
        }
        if let Some(v) = lookup("INFERENCE_TIMEOUT_SECS") {
            config.inference_timeout_secs = parse_number("INFERENCE_TIMEOUT_SECS", v)?;
        }

        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }

    pub fn inference_timeout(&self) -> Duration {
        Duration::from_secs(self.inference_timeout_secs)
    }
}
