use thiserror::Error;

/// Error type for token issuance.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    /// Deployment error: the signing key is empty.
    #[error("Signing key is missing or empty")]
    MissingSigningKey,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// Token lifetime is not positive or puts `exp` out of range.
    #[error("Invalid token lifetime: {0}")]
    InvalidLifetime(String),
}

/// Reasons a presented token is rejected.
///
/// Validation reports the first failing check, in this order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature or algorithm is invalid")]
    BadSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token subject is invalid: {0}")]
    BadSubject(String),
}
