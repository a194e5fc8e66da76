//! Public types for the calendar API
use serde::{Deserialize, Serialize};

pub use crate::calendar::Event;

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsRequest {
    pub max_results: Option<u32>,
}

#[derive(Serialize, Deserialize)]
pub struct ListEventsResponse {
    pub events: Vec<Event>,
}

// Required fields are optional here so a missing one is reported as a
// logged `BadRequest` instead of an extractor rejection
#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub summary: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub event_id: Option<String>,
    pub summary: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEventRequest {
    pub event_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteEventResponse {
    pub message: String,
}
