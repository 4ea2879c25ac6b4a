//! Error types for the fittrack_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fittrack_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A draft was rejected by the normalizer
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The remote service could not be reached or timed out
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote service answered with a non-success status
    #[error("Remote service returned {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    /// The record was stored but the follow-up dashboard fetch failed
    #[error("Record saved, but the dashboard could not be refreshed: {0}")]
    RefreshFailed(#[source] Box<Error>),

    /// The advice service failed to produce an answer
    #[error("Advice unavailable: {0}")]
    AdviceUnavailable(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures talking to the remote service.
    ///
    /// These are the failures after which a draft is worth keeping for a
    /// manual retry.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::RemoteStatus { .. })
    }
}

/// A draft field that could not be turned into a record field
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("invalid field `{field}`: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: ValidationReason) -> Self {
        Self { field, reason }
    }

    pub fn missing(field: &'static str) -> Self {
        Self::new(field, ValidationReason::Missing)
    }
}

/// Why a draft field was rejected
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationReason {
    #[error("required field is missing")]
    Missing,

    #[error("`{0}` is not a number")]
    NotNumeric(String),

    #[error("value must be finite")]
    NotFinite,

    #[error("value must not be negative")]
    Negative,

    #[error("value must be greater than zero")]
    NotPositive,

    #[error("value must not be zero")]
    Zero,

    #[error("value must be a whole number")]
    NotWhole,

    #[error("value must be at most {max}")]
    TooLarge { max: u64 },

    #[error("unknown option `{0}`")]
    UnknownVariant(String),

    #[error("`{0}` is not a date")]
    InvalidDate(String),
}
