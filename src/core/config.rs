use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,
    pub google_scope: String,
    pub google_api_url: String,
    pub google_auth_url: String,
    pub google_token_url: String,
    pub calendar_id: String,
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub system_message: String,
    pub credentials_path: Option<PathBuf>,
    pub static_dir: String,
}

impl AppConfig {
    /// Read the config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Empty values count as
    /// missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required =
            |key: &str| get(key).ok_or_else(|| anyhow!("Missing env var {}", key));

        let google_client_id = required("CALBRIDGE_GOOGLE_CLIENT_ID")?;
        let google_client_secret = required("CALBRIDGE_GOOGLE_CLIENT_SECRET")?;
        let google_redirect_uri = get("CALBRIDGE_GOOGLE_REDIRECT_URI")
            .unwrap_or_else(|| "http://localhost:3000/oauth2callback".to_string());
        let google_scope = get("CALBRIDGE_GOOGLE_SCOPE")
            .unwrap_or_else(|| "https://www.googleapis.com/auth/calendar".to_string());
        let google_api_url = get("CALBRIDGE_GOOGLE_API_URL")
            .unwrap_or_else(|| "https://www.googleapis.com".to_string());
        let google_auth_url = get("CALBRIDGE_GOOGLE_AUTH_URL")
            .unwrap_or_else(|| "https://accounts.google.com/o/oauth2/v2/auth".to_string());
        let google_token_url = get("CALBRIDGE_GOOGLE_TOKEN_URL")
            .unwrap_or_else(|| "https://oauth2.googleapis.com/token".to_string());
        let calendar_id = get("CALBRIDGE_CALENDAR_ID").unwrap_or_else(|| "primary".to_string());
        let openai_api_key = required("OPENAI_API_KEY")?;
        let openai_api_hostname =
            get("CALBRIDGE_LLM_HOST").unwrap_or_else(|| "https://api.openai.com".to_string());
        let openai_model =
            get("CALBRIDGE_LLM_MODEL").unwrap_or_else(|| "gpt-4.1-mini".to_string());
        let system_message = get("CALBRIDGE_SYSTEM_MESSAGE")
            .unwrap_or_else(|| "You are a helpful calendar assistant.".to_string());
        let credentials_path = get("CALBRIDGE_CREDENTIALS_PATH").map(PathBuf::from);
        let static_dir = get("CALBRIDGE_STATIC_DIR").unwrap_or_else(|| "./public".to_string());

        Ok(Self {
            google_client_id,
            google_client_secret,
            google_redirect_uri,
            google_scope,
            google_api_url,
            google_auth_url,
            google_token_url,
            calendar_id,
            openai_api_hostname,
            openai_api_key,
            openai_model,
            system_message,
            credentials_path,
            static_dir,
        })
    }
}
