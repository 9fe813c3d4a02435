//! Error types for the Intervo orchestration core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by the generator collaborator.
///
/// The generator is an external capability; its failures are strongly
/// typed so the orchestrator can decide whether to mask the failure
/// with fallback content or roll a transition back.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationError {
    /// The configured API credentials were rejected.
    #[error("Invalid API credentials")]
    Credential,

    /// The generator rate-limited the request.
    #[error("API rate limit exceeded. Please wait before retrying.")]
    RateLimited,

    /// The generator backend reported a server-side failure.
    #[error("Service temporarily unavailable")]
    Server,

    /// The prompt exceeded the generator's token budget.
    #[error("Input exceeds token limit ({estimated} > {limit}). Please shorten the resume or job description.")]
    InputTooLarge { estimated: usize, limit: usize },

    /// Any other transport or protocol failure.
    #[error("Generation failed: {0}")]
    Other(String),
}

impl GenerationError {
    /// Whether the failure must surface to the caller rather than be
    /// masked with fallback content.
    ///
    /// Credential, rate-limit, server and input-size failures are
    /// actionable by the user; everything else is substituted with a
    /// deterministic fallback so the interview can proceed.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

/// A shared error type for the interview orchestration core.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum InterviewError {
    /// A required input field is missing or unusable. Reported inline
    /// per field and never causes a status transition.
    #[error("Validation failed for {field}: {message}")]
    Validation { field: InputField, message: String },

    /// The generator collaborator failed during a milestone step.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// A record-store write failed. The pending transition has been
    /// rolled back and may be retried.
    #[error("Persistence failed: {0}")]
    Persistence(String),

    /// Reading an uploaded file failed.
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// Internal error (should not happen in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Input fields that can carry a validation or extraction error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Resume,
    JobDescription,
}

impl std::fmt::Display for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resume => write!(f, "resume"),
            Self::JobDescription => write!(f, "job_description"),
        }
    }
}

impl InterviewError {
    /// Creates a Validation error for the given field.
    pub fn validation(field: InputField, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Creates a Persistence error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Creates an Extraction error.
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a Persistence error.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

/// A type alias for `Result<T, InterviewError>`.
pub type Result<T> = std::result::Result<T, InterviewError>;
