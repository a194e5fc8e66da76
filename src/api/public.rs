//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;

use crate::core::ServiceError;

pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

// Errors

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub struct ApiError(anyhow::Error);

/// Convert `ApiError` into an Axum compatible response. Clients always
/// get a 500 with the same short message; the detail only goes to the
/// log, at a level that matches how actionable it is.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0.downcast_ref::<ServiceError>() {
            Some(e @ ServiceError::Unauthenticated) => tracing::warn!("{}", e),
            Some(ServiceError::BadRequest(msg)) => tracing::warn!("Bad request: {}", msg),
            _ => tracing::error!("{:#}", self.0),
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: GENERIC_ERROR.to_string(),
            }),
        )
            .into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod auth {
    pub use crate::api::routes::auth::public::*;
}

pub mod calendar {
    pub use crate::api::routes::calendar::public::*;
}

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}
