//! Auth-related types and configuration.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export shared types for convenience
pub use shared_types::AuthUserResponse;

/// Minimum accepted length of the signing secret, in characters.
pub const MIN_SECRET_LEN: usize = 32;

/// Name of the cookie carrying the signed internal auth token.
pub const AUTH_COOKIE_NAME: &str = "esp-internal-auth";

/// Identity claim carried inside a signed token.
///
/// Only trustworthy when returned by `verify_auth_token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub email: String,
    pub name: String,
}

impl From<AuthPayload> for AuthUserResponse {
    fn from(payload: AuthPayload) -> Self {
        AuthUserResponse {
            email: payload.email,
            name: payload.name,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("signing secret must be at least 32 characters (got {len})")]
    TooShort { len: usize },
}

/// Server-side HMAC key. Never serialized, never logged.
#[derive(Clone)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Result<Self, SecretError> {
        let secret = secret.into();
        let len = secret.chars().count();
        if len < MIN_SECRET_LEN {
            return Err(SecretError::TooShort { len });
        }
        Ok(Self(secret))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Auth configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// `None` means the protected routes fail closed.
    pub signing_secret: Option<SigningSecret>,
    pub token_duration_days: i64,
    pub cookie_name: String,
    pub secure_cookies: bool,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub auth_redirect_uri: String,
}

impl AuthConfig {
    /// Load auth configuration from environment variables.
    ///
    /// Required env vars:
    /// - `GOOGLE_CLIENT_ID`: Google OAuth client ID
    /// - `GOOGLE_CLIENT_SECRET`: Google OAuth client secret
    /// - `AUTH_REDIRECT_URI`: OAuth callback URI for user login
    ///
    /// `INTERNAL_AUTH_SECRET` is read but not required: when it is missing or
    /// shorter than [`MIN_SECRET_LEN`] the server still starts, and every
    /// internal route answers with a configuration-error redirect.
    pub fn from_env() -> Result<Self, String> {
        let signing_secret = match std::env::var("INTERNAL_AUTH_SECRET") {
            Ok(raw) => match SigningSecret::new(raw) {
                Ok(secret) => Some(secret),
                Err(e) => {
                    tracing::error!("INTERNAL_AUTH_SECRET rejected: {}", e);
                    None
                }
            },
            Err(_) => {
                tracing::error!("INTERNAL_AUTH_SECRET is not set; internal routes are disabled");
                None
            }
        };

        Ok(Self {
            signing_secret,
            token_duration_days: 7,
            cookie_name: AUTH_COOKIE_NAME.to_string(),
            secure_cookies: std::env::var("RUST_ENV").unwrap_or_default() == "production",
            google_client_id: std::env::var("GOOGLE_CLIENT_ID")
                .map_err(|_| "GOOGLE_CLIENT_ID must be set".to_string())?,
            google_client_secret: std::env::var("GOOGLE_CLIENT_SECRET")
                .map_err(|_| "GOOGLE_CLIENT_SECRET must be set".to_string())?,
            auth_redirect_uri: std::env::var("AUTH_REDIRECT_URI")
                .map_err(|_| "AUTH_REDIRECT_URI must be set".to_string())?,
        })
    }

    /// Cookie lifetime in seconds.
    pub fn max_age_secs(&self) -> i64 {
        self.token_duration_days * 24 * 60 * 60
    }
}
