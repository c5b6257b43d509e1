//! Job requests and validated jobs.
//!
//! A [`JobRequest`] is the loosely-typed record the queue hands to the worker.
//! [`JobRequest::validate`] turns it into a [`Job`] whose [`JobKind`] variant
//! carries exactly the fields its pipeline needs, so a texture job without a
//! prompt cannot be constructed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, JobValidationError};

/// Default sprite width/height when the request omits them.
pub const DEFAULT_SPRITE_SIZE: u32 = 1024;

/// Largest accepted sprite width/height.
pub const MAX_DIMENSION: u32 = 4096;

/// Default camera elevation for rotation jobs, in degrees.
pub const DEFAULT_ELEVATION: f64 = 20.0;

/// The kind of asset a job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    /// Single sprite with cut-out alpha.
    Sprite,
    /// Tileable PBR texture set.
    Texture,
    /// 8-direction rotation sheet.
    Rotation,
}

impl JobType {
    /// Returns the wire name of the job type.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Sprite => "sprite",
            JobType::Texture => "texture",
            JobType::Rotation => "rotation",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = JobValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sprite" => Ok(JobType::Sprite),
            "texture" => Ok(JobType::Texture),
            "rotation" => Ok(JobType::Rotation),
            other => Err(JobValidationError::with_field(
                ErrorCode::UnknownJobType,
                format!("Unknown job type: {}", other),
                "job_type",
            )),
        }
    }
}

/// A job request as delivered by the queue.
///
/// Every field is optional on the wire; [`JobRequest::validate`] decides what
/// is required for the requested job type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    /// ID of the job in the front end's database.
    #[serde(default)]
    pub job_id: Option<String>,
    /// `sprite`, `texture` or `rotation`.
    #[serde(default)]
    pub job_type: Option<String>,
    /// Per-job override of the configured webhook URL.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Per-job override of the configured webhook secret.
    #[serde(default)]
    pub webhook_secret: Option<String>,
    /// Per-job override of the configured blob storage token.
    #[serde(default)]
    pub blob_token: Option<String>,
    /// Text prompt (sprite, texture).
    #[serde(default)]
    pub prompt: Option<String>,
    /// Output width (sprite). Range-checked by [`JobRequest::validate`].
    #[serde(default)]
    pub width: Option<i64>,
    /// Output height (sprite).
    #[serde(default)]
    pub height: Option<i64>,
    /// Generation seed (sprite, texture). Drawn at random when absent.
    #[serde(default)]
    pub seed: Option<i64>,
    /// Source image (rotation).
    #[serde(default)]
    pub input_image_url: Option<String>,
    /// Camera elevation in degrees (rotation).
    #[serde(default)]
    pub elevation: Option<f64>,
}

/// Parameters of a sprite job.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteJob {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub seed: Option<u32>,
}

/// Parameters of a texture job.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureJob {
    pub prompt: String,
    pub seed: Option<u32>,
}

/// Parameters of a rotation job.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationJob {
    pub input_image_url: String,
    /// Camera elevation in degrees above the horizon.
    pub elevation: f64,
}

/// Job-type-specific parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum JobKind {
    Sprite(SpriteJob),
    Texture(TextureJob),
    Rotation(RotationJob),
}

impl JobKind {
    /// Returns the job type of this variant.
    pub fn job_type(&self) -> JobType {
        match self {
            JobKind::Sprite(_) => JobType::Sprite,
            JobKind::Texture(_) => JobType::Texture,
            JobKind::Rotation(_) => JobType::Rotation,
        }
    }
}

/// A validated job.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    /// ID of the job in the front end's database.
    pub id: String,
    /// Job-type-specific parameters.
    pub kind: JobKind,
}

impl Job {
    /// Returns the job type.
    pub fn job_type(&self) -> JobType {
        self.kind.job_type()
    }
}

impl JobRequest {
    /// Returns the job id exactly as delivered, if it is non-empty.
    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Parses the requested job type.
    pub fn job_type(&self) -> Result<JobType, JobValidationError> {
        match non_empty(self.job_type.as_deref()) {
            Some(raw) => raw.parse(),
            None => Err(JobValidationError::with_field(
                ErrorCode::MissingJobType,
                "Missing job_type",
                "job_type",
            )),
        }
    }

    /// Validates the request and builds a typed [`Job`].
    pub fn validate(&self) -> Result<Job, JobValidationError> {
        let id = self.job_id().ok_or_else(|| {
            JobValidationError::with_field(ErrorCode::MissingJobId, "Missing job_id", "job_id")
        })?;

        let kind = match self.job_type()? {
            JobType::Sprite => {
                let width = validate_dimension("width", self.width)?;
                let height = validate_dimension("height", self.height)?;
                JobKind::Sprite(SpriteJob {
                    prompt: self.require_prompt()?,
                    width,
                    height,
                    seed: self.seed()?,
                })
            }
            JobType::Texture => JobKind::Texture(TextureJob {
                prompt: self.require_prompt()?,
                seed: self.seed()?,
            }),
            JobType::Rotation => {
                let url = non_empty(self.input_image_url.as_deref()).ok_or_else(|| {
                    JobValidationError::with_field(
                        ErrorCode::MissingInputImage,
                        "Rotation jobs require an input image",
                        "input_image_url",
                    )
                })?;
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    return Err(JobValidationError::with_field(
                        ErrorCode::MissingInputImage,
                        format!("input_image_url must be an http(s) URL, got '{}'", url),
                        "input_image_url",
                    ));
                }

                let elevation = self.elevation.unwrap_or(DEFAULT_ELEVATION);
                if !elevation.is_finite() || !(-90.0..=90.0).contains(&elevation) {
                    return Err(JobValidationError::with_field(
                        ErrorCode::InvalidElevation,
                        format!("elevation must be within [-90, 90] degrees, got {}", elevation),
                        "elevation",
                    ));
                }

                JobKind::Rotation(RotationJob {
                    input_image_url: url.to_string(),
                    elevation,
                })
            }
        };

        Ok(Job {
            id: id.to_string(),
            kind,
        })
    }

    fn require_prompt(&self) -> Result<String, JobValidationError> {
        non_empty(self.prompt.as_deref())
            .map(str::to_string)
            .ok_or_else(|| {
                JobValidationError::with_field(
                    ErrorCode::MissingPrompt,
                    "A non-empty prompt is required",
                    "prompt",
                )
            })
    }

    fn seed(&self) -> Result<Option<u32>, JobValidationError> {
        self.seed
            .map(|seed| {
                u32::try_from(seed).map_err(|_| {
                    JobValidationError::with_field(
                        ErrorCode::InvalidSeed,
                        format!("seed must be within 0..={}, got {}", u32::MAX, seed),
                        "seed",
                    )
                })
            })
            .transpose()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn validate_dimension(field: &str, value: Option<i64>) -> Result<u32, JobValidationError> {
    let Some(value) = value else {
        return Ok(DEFAULT_SPRITE_SIZE);
    };
    match u32::try_from(value) {
        Ok(v) if (1..=MAX_DIMENSION).contains(&v) => Ok(v),
        _ => Err(JobValidationError::with_field(
            ErrorCode::InvalidDimensions,
            format!("{} must be within 1..={}, got {}", field, MAX_DIMENSION, value),
            field,
        )),
    }
}
