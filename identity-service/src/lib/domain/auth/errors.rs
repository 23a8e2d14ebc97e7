use auth::GoogleAuthError;
use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for authentication and session operations.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The presented identity assertion could not be verified.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Refresh token absent, malformed, unknown, revoked, or expired.
    /// Deliberately one variant so callers cannot probe which check failed.
    #[error("Invalid refresh token")]
    InvalidRefresh,

    /// No valid access credential on a route that requires one.
    #[error("Authentication required")]
    Unauthorized,

    /// Valid identity, but not the owner of the target resource.
    #[error("Forbidden")]
    Forbidden,

    /// Credential verified but the account no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// Storage failure; the one class worth an idempotent retry.
    #[error("Storage error: {0}")]
    Persistence(String),

    /// Provider-side or network failure during identity verification.
    #[error("Identity verification failed: {0}")]
    VerificationFailed(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

impl From<GoogleAuthError> for AuthError {
    fn from(err: GoogleAuthError) -> Self {
        match err {
            // Infrastructure failure, distinct from a bad assertion
            GoogleAuthError::VerificationFailed(msg) => AuthError::VerificationFailed(msg),
            _ => AuthError::AuthenticationFailed,
        }
    }
}
