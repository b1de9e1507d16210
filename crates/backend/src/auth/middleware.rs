//! Authentication middleware layer for the internal routes.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::AppState;

use super::domain::is_authorized_email;
use super::token::verify_auth_token;
use super::types::{AuthConfig, AuthPayload};

/// Where a denied request is sent. The query value is all the UI learns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRedirect {
    /// No session or an unusable one; sign in again.
    Reauthenticate,
    /// Valid session for someone outside the organization.
    UnauthorizedDomain,
    /// The server has no usable signing secret.
    ConfigError,
    /// The OAuth exchange itself failed.
    AuthFailed,
    /// OAuth `state` did not match the one issued at login.
    StateMismatch,
}

impl AuthRedirect {
    pub fn location(&self) -> &'static str {
        match self {
            AuthRedirect::Reauthenticate => "/?auth_error=auth_required",
            AuthRedirect::UnauthorizedDomain => "/?auth_error=unauthorized_domain",
            AuthRedirect::ConfigError => "/?auth_error=config_error",
            AuthRedirect::AuthFailed => "/?auth_error=auth_failed",
            AuthRedirect::StateMismatch => "/?auth_error=state_mismatch",
        }
    }
}

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        Redirect::to(self.location()).into_response()
    }
}

/// Middleware guarding the internal grants routes.
///
/// Use with `axum::middleware::from_fn_with_state`. On success the verified
/// [`AuthPayload`] is available to handlers as an `Extension`.
pub async fn require_internal_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &state.auth_config) {
        Ok(payload) => {
            request.extensions_mut().insert(payload);
            next.run(request).await
        }
        Err(redirect) => redirect.into_response(),
    }
}

/// Authenticate and authorize the request's auth cookie.
pub fn authenticate(headers: &HeaderMap, config: &AuthConfig) -> Result<AuthPayload, AuthRedirect> {
    let Some(secret) = config.signing_secret.as_ref() else {
        tracing::error!("Internal auth secret is not configured; denying access");
        return Err(AuthRedirect::ConfigError);
    };

    let token = extract_cookie(headers, &config.cookie_name).ok_or(AuthRedirect::Reauthenticate)?;

    let payload = verify_auth_token(&token, secret).map_err(|e| {
        if e.is_forgery() {
            tracing::warn!("Rejected internal auth cookie: {}", e);
        } else {
            tracing::debug!("Rejected internal auth cookie: {}", e);
        }
        AuthRedirect::Reauthenticate
    })?;

    if !is_authorized_email(&payload.email) {
        tracing::warn!("Signed session for unauthorized email: {}", payload.email);
        return Err(AuthRedirect::UnauthorizedDomain);
    }

    Ok(payload)
}

/// Find a cookie by name in the request's `Cookie` headers.
pub fn extract_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| cookie::Cookie::parse(pair.trim()).ok())
        .find(|cookie| cookie.name() == cookie_name)
        .map(|cookie| cookie.value().to_string())
}

/// Build the Set-Cookie value carrying a freshly signed token.
pub fn build_auth_cookie(config: &AuthConfig, token: &str) -> String {
    session_cookie(config, &config.cookie_name, token, config.max_age_secs())
}

/// Build a Set-Cookie value that expires the auth cookie.
pub fn clear_auth_cookie(config: &AuthConfig) -> String {
    session_cookie(config, &config.cookie_name, "", 0)
}

pub(crate) fn session_cookie(config: &AuthConfig, name: &str, value: &str, max_age: i64) -> String {
    let secure = if config.secure_cookies { "; Secure" } else { "" };
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        name, value, max_age, secure
    )
}
