//! Error types for the BridgeTutor domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; `TutorError` wraps
//! `ProviderError` so callers of the tutor only match on one type.

use thiserror::Error;

// --- Bounded context errors ---

/// Failures of the external text-generation service.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Errors raised by the explanation pipeline and the assessment engine.
///
/// Every variant is terminal for the call that produced it. Nothing in the
/// tutor retries; the caller decides whether to run the operation again.
#[derive(Debug, Clone, Error)]
pub enum TutorError {
    /// The caller passed an empty or malformed argument. Raised before any
    /// request reaches the provider.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The text-generation service failed. The provider error is kept verbatim.
    #[error("External service error: {0}")]
    ExternalService(#[from] ProviderError),

    /// The service answered, but not in the structured shape we asked for.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// `evaluate` was called before every question had an answer.
    #[error("Incomplete submission: {answered} of {expected} questions answered")]
    IncompleteSubmission { answered: usize, expected: usize },

    /// There is no active quiz to evaluate.
    #[error("No active quiz; generate one first")]
    NoActiveQuiz,
}
