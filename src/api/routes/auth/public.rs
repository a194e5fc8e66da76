//! Public types for the OAuth routes
use serde::{Deserialize, Serialize};

pub const AUTH_SUCCESS: &str =
    "Authentication successful! You can close this tab and return to the chat.";

#[derive(Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    // Set by Google when the user denies access
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
}
