//! Router for the chat API

use std::sync::Arc;

use axum::{Router, extract::State, response::Json, routing::post};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;

type SharedState = Arc<AppState>;

/// Classify the message and answer with either text or a list of events
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::ChatRequest>,
) -> Result<Json<public::ChatResponse>, ApiError> {
    let message = payload.message.unwrap_or_default();
    let reply = state.chat.dispatch(&message).await?;
    Ok(Json(public::ChatResponse { reply }))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/chat", post(chat_handler))
}
