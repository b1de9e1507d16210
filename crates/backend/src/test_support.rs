//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::oauth::{OAuthError, OAuthProvider, UserProfile};
use crate::auth::types::{AuthConfig, SigningSecret, AUTH_COOKIE_NAME};
use crate::grants::InMemoryGrantSource;
use crate::AppState;

pub const TEST_SECRET: &str = "test-signing-secret-0123456789abcdef";

pub fn test_config() -> AuthConfig {
    AuthConfig {
        signing_secret: Some(SigningSecret::new(TEST_SECRET).unwrap()),
        token_duration_days: 7,
        cookie_name: AUTH_COOKIE_NAME.to_string(),
        secure_cookies: false,
        google_client_id: "test".to_string(),
        google_client_secret: "test".to_string(),
        auth_redirect_uri: "http://localhost/api/auth/callback".to_string(),
    }
}

pub fn test_state(oauth: StubOAuth) -> AppState {
    AppState {
        auth_config: Arc::new(test_config()),
        oauth: Arc::new(oauth),
        grants: Arc::new(InMemoryGrantSource::default()),
    }
}

/// OAuth provider returning a fixed profile, counting exchanges.
#[derive(Clone)]
pub struct StubOAuth {
    profile: Option<UserProfile>,
    exchanges: Arc<AtomicUsize>,
}

impl StubOAuth {
    pub fn returning(email: &str, name: &str) -> Self {
        Self {
            profile: Some(UserProfile {
                email: email.to_string(),
                name: name.to_string(),
            }),
            exchanges: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            profile: None,
            exchanges: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OAuthProvider for StubOAuth {
    fn authorize_url(&self, state: &str) -> String {
        format!("https://provider.test/authorize?state={}", state)
    }

    async fn exchange_code(&self, _code: &str) -> Result<UserProfile, OAuthError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        self.profile
            .clone()
            .ok_or_else(|| OAuthError::TokenExchange("400 Bad Request - invalid_grant".to_string()))
    }
}
