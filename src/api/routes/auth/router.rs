//! Router for the OAuth flow

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::{Json, Redirect},
    routing::{get, post},
};
use axum_extra::extract::Query;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::core::ServiceError;

type SharedState = Arc<AppState>;

/// Step one: send the browser to Google's consent screen
async fn start_auth(State(state): State<SharedState>) -> Redirect {
    tracing::info!("Starting OAuth flow");
    Redirect::to(&state.oauth.authorization_url())
}

/// Step two: exchange the code Google sent back and keep the credential
async fn oauth_callback(
    State(state): State<SharedState>,
    Query(params): Query<public::OAuthCallbackQuery>,
) -> Result<&'static str, ApiError> {
    if let Some(error) = params.error {
        tracing::warn!("OAuth consent failed: {}", error);
        return Err(ServiceError::bad_request("Authorization was not granted").into());
    }
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ServiceError::bad_request("code is required"))?;

    let credential = state.oauth.exchange_code_for_token(&code).await?;
    state.calendar.credentials().set(credential).await?;
    tracing::info!("OAuth flow complete, calendar connected");

    Ok(public::AUTH_SUCCESS)
}

async fn auth_status(
    State(state): State<SharedState>,
) -> Result<Json<public::AuthStatusResponse>, ApiError> {
    let authenticated = state.calendar.is_authenticated().await?;
    Ok(Json(public::AuthStatusResponse { authenticated }))
}

async fn logout(
    State(state): State<SharedState>,
) -> Result<Json<public::AuthStatusResponse>, ApiError> {
    state.calendar.credentials().clear().await?;
    tracing::info!("Cleared stored credential");
    Ok(Json(public::AuthStatusResponse {
        authenticated: false,
    }))
}

/// Create the OAuth router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/auth", get(start_auth))
        .route("/oauth2callback", get(oauth_callback))
        .route("/auth/status", get(auth_status))
        .route("/auth/logout", post(logout))
}
