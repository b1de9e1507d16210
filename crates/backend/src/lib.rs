//! ESP portal backend: the internal grants view and its authentication gate.

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Router};

pub mod auth;
pub mod error;
pub mod grants;

#[cfg(test)]
mod test_support;

use auth::{AuthConfig, OAuthProvider};
use grants::GrantSource;

#[derive(Clone)]
pub struct AppState {
    pub auth_config: Arc<AuthConfig>,
    pub oauth: Arc<dyn OAuthProvider>,
    pub grants: Arc<dyn GrantSource>,
}

/// Build the API router.
///
/// Everything under `internal` passes through `require_internal_auth`.
pub fn app(state: AppState) -> Router {
    let internal = Router::new()
        .route("/api/auth/me", get(auth::auth_me))
        .route("/api/internal-grants", get(grants::list_internal_grants))
        .route_layer(from_fn_with_state(state.clone(), auth::require_internal_auth));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/auth/login", get(auth::auth_login))
        .route("/api/auth/callback", get(auth::auth_callback))
        .route("/api/auth/logout", get(auth::auth_logout))
        .merge(internal)
        .with_state(state)
}
