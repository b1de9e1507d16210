//! OAuth provider used for internal login.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::types::AuthConfig;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Profile returned by the provider after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Failed to get user info: {0}")]
    UserInfo(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// URL the browser is sent to in order to start the login.
    fn authorize_url(&self, state: &str) -> String;

    /// Trade an authorization code for the user's profile.
    async fn exchange_code(&self, code: &str) -> Result<UserProfile, OAuthError>;
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

pub struct GoogleOAuthProvider {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl GoogleOAuthProvider {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.auth_redirect_uri.clone(),
        }
    }
}

#[async_trait]
impl OAuthProvider for GoogleOAuthProvider {
    fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope={}&\
             prompt=select_account&\
             state={}",
            GOOGLE_AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode("openid email profile"),
            urlencoding::encode(state)
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<UserProfile, OAuthError> {
        #[derive(serde::Serialize)]
        struct TokenRequest<'a> {
            code: &'a str,
            client_id: &'a str,
            client_secret: &'a str,
            redirect_uri: &'a str,
            grant_type: &'a str,
        }

        let token_response = self
            .client
            .post(GOOGLE_TOKEN_URL)
            .form(&TokenRequest {
                code,
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                redirect_uri: &self.redirect_uri,
                grant_type: "authorization_code",
            })
            .send()
            .await?;

        if !token_response.status().is_success() {
            let status = token_response.status();
            let body = token_response.text().await.unwrap_or_default();
            return Err(OAuthError::TokenExchange(format!("{} - {}", status, body)));
        }

        let tokens: GoogleTokenResponse = token_response
            .json()
            .await
            .map_err(|e| OAuthError::TokenExchange(format!("invalid token response: {}", e)))?;

        let userinfo_response = self
            .client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(&tokens.access_token)
            .send()
            .await?;

        if !userinfo_response.status().is_success() {
            return Err(OAuthError::UserInfo(userinfo_response.status().to_string()));
        }

        userinfo_response
            .json()
            .await
            .map_err(|e| OAuthError::UserInfo(format!("invalid user info response: {}", e)))
    }
}
