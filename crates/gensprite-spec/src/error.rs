//! Error types for job request validation.

/// Validation error codes for job requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// V001: `job_id` is missing or empty
    MissingJobId,
    /// V002: `job_type` is missing
    MissingJobType,
    /// V003: `job_type` is not one of sprite, texture, rotation
    UnknownJobType,
    /// V004: Sprite or texture job without a prompt
    MissingPrompt,
    /// V005: Requested width/height out of range
    InvalidDimensions,
    /// V006: Rotation job without a usable `input_image_url`
    MissingInputImage,
    /// V007: Camera elevation out of range
    InvalidElevation,
    /// V008: No blob storage token for uploads
    MissingBlobToken,
    /// V009: `seed` does not fit an unsigned 32-bit integer
    InvalidSeed,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "V001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MissingJobId => "V001",
            ErrorCode::MissingJobType => "V002",
            ErrorCode::UnknownJobType => "V003",
            ErrorCode::MissingPrompt => "V004",
            ErrorCode::InvalidDimensions => "V005",
            ErrorCode::MissingInputImage => "V006",
            ErrorCode::InvalidElevation => "V007",
            ErrorCode::MissingBlobToken => "V008",
            ErrorCode::InvalidSeed => "V009",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A job validation error with code, message, and the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Request field that failed validation (e.g., "prompt").
    pub field: Option<String>,
}

impl JobValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    /// Creates a new validation error naming the request field.
    pub fn with_field(code: ErrorCode, message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl std::fmt::Display for JobValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref field) = self.field {
            write!(f, "{}: {} (field `{}`)", self.code, self.message, field)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for JobValidationError {}
