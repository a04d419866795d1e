//! Error types for the Bondalayze backend.

use thiserror::Error;

use crate::plan::Plan;

/// User-facing message for an analyzer response that could not be parsed.
pub const INVALID_JSON_MESSAGE: &str = "AI response was not valid JSON";

/// User-facing message for any provider or network failure.
pub const ANALYSIS_FAILED_MESSAGE: &str = "AI analysis failed";

/// A shared error type for the entire analysis backend.
///
/// Variants are grouped by how the caller must treat them:
/// admission errors are rejected before any model call, hard analysis
/// failures surface after a model call, and the rest belong to the
/// collaborators around the pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BondaError {
    /// Neither typed text nor usable screenshot text was supplied.
    #[error("No text or screenshots provided")]
    NoInputProvided,

    /// More screenshots than the plan allows.
    #[error("Max {limit} screenshots allowed for the {plan} plan (got {requested})")]
    TooManyImages {
        plan: Plan,
        requested: usize,
        limit: usize,
    },

    /// Monthly analysis ceiling reached.
    #[error("{plan} plan limit reached ({used}/{limit} analyses this month)")]
    QuotaExceeded { plan: Plan, used: u32, limit: u32 },

    /// An uploaded image payload is not a usable data URL.
    #[error("Invalid image payload: {0}")]
    InvalidImage(String),

    /// Image bytes could not be decoded.
    #[error("Could not decode image: {0}")]
    ImageDecode(String),

    /// A request parameter outside the analysis pipeline is malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The analyzer model returned something that is not JSON.
    #[error("AI response was not valid JSON")]
    AnalysisSchema { raw_len: usize },

    /// The model provider failed (network, HTTP status, empty body).
    #[error("AI analysis failed: {0}")]
    Upstream(String),

    /// No signed-in user.
    #[error("Not signed in")]
    Unauthorized,

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Data access error (persistence collaborator)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BondaError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an Upstream error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Errors detected before any model call is made.
    pub fn is_admission(&self) -> bool {
        matches!(
            self,
            Self::NoInputProvided
                | Self::TooManyImages { .. }
                | Self::QuotaExceeded { .. }
                | Self::InvalidImage(_)
        )
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a hard analysis failure
    pub fn is_analysis_failure(&self) -> bool {
        matches!(self, Self::AnalysisSchema { .. } | Self::Upstream(_))
    }

    /// The message shown to the end user.
    ///
    /// Provider details stay in the logs; the user only sees the generic
    /// failure text for upstream errors.
    pub fn public_message(&self) -> String {
        match self {
            Self::AnalysisSchema { .. } => INVALID_JSON_MESSAGE.to_string(),
            Self::Upstream(_) => ANALYSIS_FAILED_MESSAGE.to_string(),
            Self::DataAccess(_) | Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

/// A type alias for `Result<T, BondaError>`.
pub type Result<T> = std::result::Result<T, BondaError>;
