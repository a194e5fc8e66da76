//! Router for the calendar API

use std::sync::Arc;

use axum::{Router, body::Bytes, extract::State, response::Json, routing::post};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::core::ServiceError;

type SharedState = Arc<AppState>;

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ServiceError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceError::BadRequest(format!("{} is required", name)))
}

/// The body is optional so an empty POST lists with the defaults
async fn list_events(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<public::ListEventsResponse>, ApiError> {
    let params: public::ListEventsRequest = if body.iter().all(u8::is_ascii_whitespace) {
        public::ListEventsRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|_| ServiceError::bad_request("maxResults must be a positive integer"))?
    };
    let events = state.calendar.list(params.max_results).await?;
    Ok(Json(public::ListEventsResponse { events }))
}

async fn create_event(
    State(state): State<SharedState>,
    Json(payload): Json<public::CreateEventRequest>,
) -> Result<Json<public::Event>, ApiError> {
    let summary = required(&payload.summary, "summary")?;
    let start = required(&payload.start, "start")?;
    let end = required(&payload.end, "end")?;

    let event = state.calendar.create(summary, start, end).await?;
    Ok(Json(event))
}

async fn update_event(
    State(state): State<SharedState>,
    Json(payload): Json<public::UpdateEventRequest>,
) -> Result<Json<public::Event>, ApiError> {
    let event_id = required(&payload.event_id, "eventId")?;

    let event = state
        .calendar
        .update(
            event_id,
            payload.summary.as_deref(),
            payload.start.as_deref(),
            payload.end.as_deref(),
        )
        .await?;
    Ok(Json(event))
}

async fn delete_event(
    State(state): State<SharedState>,
    Json(payload): Json<public::DeleteEventRequest>,
) -> Result<Json<public::DeleteEventResponse>, ApiError> {
    let event_id = required(&payload.event_id, "eventId")?;

    let message = state.calendar.delete(event_id).await?;
    Ok(Json(public::DeleteEventResponse {
        message: message.to_string(),
    }))
}

/// Create the calendar router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/listEvents", post(list_events))
        .route("/createEvent", post(create_event))
        .route("/updateEvent", post(update_event))
        .route("/deleteEvent", post(delete_event))
}
