//! # AppError
//!
//! Centralized error handling for the Mental Game ecosystem.
//! Maps workflow failures to actionable error types.

use thiserror::Error;

/// The primary error type for all mg-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// A collection read failed (e.g., store down, malformed response).
    /// Callers recover by falling back to an empty list.
    #[error("failed to load {0}")]
    LoadFailure(String),

    /// Submission validation failure (e.g., rating out of range, empty comment,
    /// incomplete ranking selection)
    #[error("validation error: {0}")]
    Validation(String),

    /// Action requires a signed-in user
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The user already has a qualifying submission
    #[error("already submitted: {0}")]
    DuplicateSubmission(String),

    /// A store insert failed; the caller keeps the user's input for retry
    #[error("write failed: {0}")]
    WriteFailure(String),

    /// Infrastructure failure (e.g., identity provider unreachable)
    #[error("internal service error: {0}")]
    Internal(String),
}

/// A specialized Result type for Mental Game logic.
pub type Result<T> = std::result::Result<T, AppError>;
