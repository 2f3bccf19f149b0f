//! Client error types

use thiserror::Error;

/// Client error type
///
/// Failure policy: `Network`/`Auth` during background session hydration
/// are logged and swallowed (identity stays null), `Remote` during role
/// resolution collapses to "role unknown" (the guard fails closed), and
/// `Cache` is always swallowed at the call site. Only interactive flows
/// (sign-in, sign-up) surface errors to the user.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Authentication failed or the session is no longer valid
    #[error("Auth error: {0}")]
    Auth(String),

    /// Wrong email/password combination
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Transient connectivity failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Query or authorization failure from the table capability.
    /// Row-level security makes denial indistinguishable from absence,
    /// so callers must not branch on the message.
    #[error("Remote error: {0}")]
    Remote(String),

    /// Local cache unavailable or corrupt
    #[error("Cache error: {0}")]
    Cache(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Client misconfiguration
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
