//! Error handling module for the strainer selector
//!
//! Provides centralized error handling with proper error types using thiserror.
//! All errors in the application should use these types for consistency.

use thiserror::Error;

/// Main error type for the strainer selector
#[derive(Error, Debug)]
pub enum SelectorError {
    /// IO errors (catalog files, order log, terminal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog errors (loading, malformed product data)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Validation errors (customer details, order contents)
    ///
    /// Client-error category: the user can correct the input and retry
    /// without anything having been sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Submission errors from the order collaborator
    ///
    /// Server-error category: the request was well-formed but the
    /// collaborator failed. Retryable; cart and form are left intact.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// State errors (invalid wizard state for an operation)
    #[error("State error: {0}")]
    State(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General errors (catch-all for edge cases)
    #[error("{0}")]
    General(String),
}

/// Result type alias for selector operations
pub type Result<T> = std::result::Result<T, SelectorError>;

// Convenient error constructors
impl SelectorError {
    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a submission error
    pub fn submission(msg: impl Into<String>) -> Self {
        Self::Submission(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create a state error
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Create a general error
    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }

    /// True for errors the user can fix by correcting input (client
    /// category), false for collaborator/internal failures.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// True for transient collaborator failures worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Submission(_) | Self::Catalog(_) | Self::Io(_))
    }
}
