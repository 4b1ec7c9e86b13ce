//! Error types for cfgoverlay.
//!
//! Uses thiserror for derive macros. Absence of a document and filter vetoes
//! are ordinary return values; only faults end up here.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for storage and pipeline operations.
#[derive(Error, Debug)]
pub enum OverlayError {
    /// The backing store failed to read or write.
    #[error("storage I/O failed: {0}")]
    Io(String),

    /// A document could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A mutating operation reached a read-only storage view.
    #[error("storage is read-only: {0} is not permitted")]
    ReadOnly(String),

    /// A configuration name is not acceptable to the backing store.
    #[error("invalid configuration name '{0}'")]
    InvalidName(String),

    /// An ignore pattern could not be compiled.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// The overlay config cannot be read, parsed or validated.
    #[error("{0}")]
    Config(String),

    /// The overlay config references a filter id nobody registered.
    #[error("unknown filter '{0}'")]
    UnknownFilter(String),

    /// Bad arguments or missing input.
    #[error("{0}")]
    UserError(String),
}

impl OverlayError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            OverlayError::Io(_) => exit_codes::STORAGE_FAILURE,
            OverlayError::Serialization(_) => exit_codes::STORAGE_FAILURE,
            OverlayError::ReadOnly(_) => exit_codes::STORAGE_FAILURE,
            OverlayError::InvalidName(_) => exit_codes::USER_ERROR,
            OverlayError::InvalidPattern(_) => exit_codes::CONFIG_FAILURE,
            OverlayError::Config(_) => exit_codes::CONFIG_FAILURE,
            OverlayError::UnknownFilter(_) => exit_codes::CONFIG_FAILURE,
            OverlayError::UserError(_) => exit_codes::USER_ERROR,
        }
    }
}

/// Result type alias for cfgoverlay operations.
pub type Result<T> = std::result::Result<T, OverlayError>;
