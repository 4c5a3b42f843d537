//! Error types for the SevaHealth domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; `Error` rolls them up.

use thiserror::Error;

/// The top-level error type for all SevaHealth operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Model adapter errors ---
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Turn errors ---
    #[error("Turn error: {0}")]
    Turn(#[from] TurnError),

    // --- Document index errors ---
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures from the model invocation adapter.
///
/// `Timeout` and the transport variants are what the orchestration loop
/// treats as fatal to the current turn (the model is unreachable or
/// unresponsive; history already appended is preserved for the next turn).
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by model endpoint, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed model response: {0}")]
    InvalidResponse(String),

    #[error("Model adapter not configured: {0}")]
    NotConfigured(String),
}

impl ModelError {
    /// Whether this failure is a timeout (vs. the endpoint being unreachable
    /// or rejecting the request). Both are fatal to a turn; callers that
    /// report the distinction use this.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ModelError::Timeout(_))
    }
}

/// Failures from tool dispatch and execution.
///
/// `NotFound` and `InvocationFailed` are NOT fatal to a turn: the loop
/// feeds them back to the model as error-marker tool results.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool invocation failed: {tool_name}: {reason}")]
    InvocationFailed { tool_name: String, reason: String },

    #[error("Tool timed out: {tool_name} after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

/// Fatal turn-level failures from the orchestration loop.
///
/// Any of these terminates the turn with a single error event on the
/// stream; conversation state accumulated so far is kept (append-only,
/// no rollback).
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Model invocation failed: {0}")]
    Model(#[from] ModelError),

    #[error("Turn exceeded the maximum of {limit} model invocations")]
    MaxIterationsExceeded { limit: u32 },
}

/// Failures from the document embedding index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),

    #[error("Index storage error: {0}")]
    Storage(String),
}
