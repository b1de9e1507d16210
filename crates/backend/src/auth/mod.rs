//! Internal authentication gate for the confidential grants view.
//!
//! This module provides:
//! - Signed auth tokens (HMAC-SHA256, base64url) carried in a cookie
//! - Constant-time signature verification
//! - The single-domain email check
//! - OAuth login flow and the `require_internal_auth` middleware

pub mod domain;
pub mod errors;
mod handlers;
pub mod middleware;
pub mod oauth;
pub mod signature;
pub mod token;
pub mod types;

pub use domain::{is_authorized_email, AUTHORIZED_DOMAIN};
pub use errors::{TokenError, VerifyError};
pub use handlers::{auth_callback, auth_login, auth_logout, auth_me, INTERNAL_GRANTS_PAGE};
pub use middleware::{build_auth_cookie, clear_auth_cookie, require_internal_auth, AuthRedirect};
pub use oauth::{GoogleOAuthProvider, OAuthError, OAuthProvider, UserProfile};
pub use token::{decode_auth_token, encode_auth_token, verify_auth_token, TokenParts};
pub use types::{AuthConfig, AuthPayload, SigningSecret};
