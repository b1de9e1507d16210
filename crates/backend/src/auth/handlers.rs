//! Authentication HTTP handlers.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;

use crate::AppState;

use super::domain::is_authorized_email;
use super::middleware::{
    build_auth_cookie, clear_auth_cookie, extract_cookie, session_cookie, AuthRedirect,
};
use super::token::encode_auth_token;
use super::types::{AuthPayload, AuthUserResponse};

/// Cookie holding the OAuth `state` between login and callback.
pub const OAUTH_STATE_COOKIE: &str = "esp-oauth-state";
const OAUTH_STATE_MAX_AGE: i64 = 10 * 60;

/// Landing page after a successful internal login.
pub const INTERNAL_GRANTS_PAGE: &str = "/internal-grants";

/// Start the OAuth login flow.
///
/// Issues a random `state`, remembers it in a short-lived cookie and sends the
/// browser to the provider.
pub async fn auth_login(State(state): State<AppState>) -> Response {
    let csrf_state = uuid::Uuid::new_v4().to_string();
    let auth_url = state.oauth.authorize_url(&csrf_state);
    let state_cookie = session_cookie(
        &state.auth_config,
        OAUTH_STATE_COOKIE,
        &csrf_state,
        OAUTH_STATE_MAX_AGE,
    );

    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, auth_url.as_str()),
            (header::SET_COOKIE, state_cookie.as_str()),
        ],
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct AuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider instead of `code` when the user declines consent.
    pub error: Option<String>,
}

/// Handle the OAuth callback.
///
/// Exchanges the code for the user's profile, checks the email domain, and on
/// success sets the signed internal auth cookie.
pub async fn auth_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AuthCallbackParams>,
) -> Response {
    let config = &state.auth_config;

    match extract_cookie(&headers, OAUTH_STATE_COOKIE) {
        Some(expected) if params.state.as_deref() == Some(expected.as_str()) => {}
        _ => {
            tracing::warn!("OAuth callback with missing or mismatched state");
            return AuthRedirect::StateMismatch.into_response();
        }
    }

    let Some(secret) = config.signing_secret.as_ref() else {
        tracing::error!("Internal auth secret is not configured; refusing to sign in");
        return AuthRedirect::ConfigError.into_response();
    };

    let code = match (params.code, params.error) {
        (Some(code), None) => code,
        (_, error) => {
            tracing::warn!(
                "OAuth callback without authorization code: {}",
                error.as_deref().unwrap_or("no code")
            );
            return AuthRedirect::AuthFailed.into_response();
        }
    };

    let profile = match state.oauth.exchange_code(&code).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Auth callback error: {}", e);
            return AuthRedirect::AuthFailed.into_response();
        }
    };

    tracing::info!("OAuth login attempt from: {}", profile.email);

    if !is_authorized_email(&profile.email) {
        tracing::warn!("Unauthorized login attempt from: {}", profile.email);
        return AuthRedirect::UnauthorizedDomain.into_response();
    }

    let payload = AuthPayload {
        email: profile.email,
        name: profile.name,
    };

    let token = match encode_auth_token(&payload, secret) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to sign internal auth token: {}", e);
            return AuthRedirect::AuthFailed.into_response();
        }
    };

    let auth_cookie = build_auth_cookie(config, &token);
    let state_cookie = session_cookie(config, OAUTH_STATE_COOKIE, "", 0);

    tracing::info!("Successful login for: {}", payload.email);

    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, INTERNAL_GRANTS_PAGE)],
        AppendHeaders([
            (header::SET_COOKIE, auth_cookie),
            (header::SET_COOKIE, state_cookie),
        ]),
    )
        .into_response()
}

/// Get current authenticated user info.
pub async fn auth_me(Extension(payload): Extension<AuthPayload>) -> Json<AuthUserResponse> {
    Json(payload.into())
}

/// Logout - clear auth cookie.
pub async fn auth_logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_auth_cookie(&state.auth_config);

    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, "/".to_string()), (header::SET_COOKIE, cookie)],
    )
}
