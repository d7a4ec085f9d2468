use thiserror::Error;

/// Failures of the session credential workflow.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credential missing, malformed, forged, or expired.
    #[error("unauthorized access")]
    Unauthenticated,
    /// Authenticated identity does not own the requested resource.
    #[error("forbidden access")]
    Forbidden,
    /// Credential could not be produced; a server fault, not a client one.
    #[error("token error: {0}")]
    Token(String),
}
