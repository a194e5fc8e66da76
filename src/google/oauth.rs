//! Google OAuth2 authorization code flow
use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::core::AppConfig;
use crate::credentials::Credential;

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
}

impl From<TokenResponse> for Credential {
    fn from(token: TokenResponse) -> Self {
        Credential {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: token
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs)),
            scope: token.scope,
            token_type: token.token_type.unwrap_or_else(|| "Bearer".to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GoogleOAuth {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: String,
    auth_url: String,
    token_url: String,
}

impl GoogleOAuth {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.google_redirect_uri.clone(),
            scope: config.google_scope.clone(),
            auth_url: config.google_auth_url.clone(),
            token_url: config.google_token_url.clone(),
        }
    }

    /// URL the user visits to grant calendar access. Offline access and
    /// forced consent make Google return a refresh token every time.
    pub fn authorization_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&self.scope)
        )
    }

    pub async fn exchange_code_for_token(&self, code: &str) -> Result<Credential> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = reqwest::Client::new()
            .post(&self.token_url)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            tracing::error!("Token exchange failed: HTTP {} - {}", status, error_body);
            return Err(anyhow!("Token exchange failed: HTTP {}", status));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.into())
    }
}
