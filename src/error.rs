use std::fmt;
use std::time::Duration;

/// Which payload invariant a request violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    CfgScaleOutOfRange,
    StepsOutOfRange,
    SeedOutOfRange,
    UnsupportedResolution,
    PromptTooLong,
}

impl ValidationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationKind::CfgScaleOutOfRange => "cfg_scale out of range",
            ValidationKind::StepsOutOfRange => "steps out of range",
            ValidationKind::SeedOutOfRange => "seed out of range",
            ValidationKind::UnsupportedResolution => "unsupported resolution",
            ValidationKind::PromptTooLong => "prompt too long",
        }
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A client-input fault. Terminal for the request, never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ValidationKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            message: format!("{}: {}", kind, detail.into()),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, thiserror::Error)]
pub enum BedrockError {
    #[error(transparent)]
    ValidationError(#[from] ValidationError),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("AWS error: {0}")]
    AwsError(String),
    #[error("AWS service error: {0}")]
    AwsServiceError(String),
    #[error("Timeout error: model did not respond within {}s", .0.as_secs())]
    Timeout(Duration),
}

impl BedrockError {
    /// HTTP status the error maps to. Only client-input faults are 4xx.
    pub fn status_code(&self) -> u16 {
        match self {
            BedrockError::ValidationError(_) => 400,
            _ => 500,
        }
    }

    /// Client faults are expected traffic; everything else needs attention.
    pub fn log_level(&self) -> log::Level {
        match self {
            BedrockError::ValidationError(_) => log::Level::Warn,
            _ => log::Level::Error,
        }
    }
}

pub type Result<T> = std::result::Result<T, BedrockError>;
