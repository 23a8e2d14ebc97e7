use thiserror::Error;

/// Error type for Google identity-token verification.
///
/// None of these are retryable; each one means the caller must send the user
/// back through sign-in.
#[derive(Debug, Clone, Error)]
pub enum GoogleAuthError {
    #[error("Identity token is malformed: {0}")]
    InvalidFormat(String),

    #[error("Identity token signature, issuer, or audience is invalid")]
    SignatureInvalid,

    #[error("Identity token is expired")]
    Expired,

    #[error("Identity token is not yet valid")]
    NotYetValid,

    #[error("Email is missing or not verified by the provider")]
    EmailUnverified,

    #[error("Identity verification failed: {0}")]
    VerificationFailed(String),
}
