//! Error types for signing and verifying internal auth tokens.

use thiserror::Error;

/// Why a presented token was not accepted.
///
/// The display strings are for server logs only; clients get a generic
/// re-authentication redirect.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Token is empty or invalid")]
    Empty,

    #[error("Invalid token format")]
    InvalidFormat,

    #[error("Invalid signature - token may be forged or tampered")]
    InvalidSignature,

    #[error("Invalid payload format")]
    InvalidPayload,
}

impl VerifyError {
    /// True when the token was well-formed but its signature did not match,
    /// i.e. a forgery attempt rather than a stale or corrupted cookie.
    pub fn is_forgery(&self) -> bool {
        matches!(self, VerifyError::InvalidSignature)
    }
}

/// Failure while producing a token.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to serialize auth payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// `Hmac<Sha256>` takes keys of any length, so this is unreachable in
    /// practice; it exists because `Mac::new_from_slice` returns a `Result`.
    #[error("Signing key rejected by HMAC")]
    InvalidKey,
}
