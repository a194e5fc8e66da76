//! API routes module

pub mod auth;
pub mod calendar;
pub mod chat;

use std::sync::Arc;

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<AppState>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Calendar routes
        .merge(calendar::router())
        // Chat routes
        .merge(chat::router())
}
