//! Calendar event types shared by the HTTP API, chat and tool server
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub summary: String,
    // RFC 3339 timestamp, or a plain date for all-day events
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
}

impl Event {
    /// Start of the event in UTC. All-day events start at midnight UTC.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(&self.start) {
            return Some(ts.with_timezone(&Utc));
        }
        self.start_date()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.start, "%Y-%m-%d").ok()
    }

    /// Whether the event starts at or after `floor`. An all-day event
    /// starts at midnight UTC, so it drops out once its day has begun.
    pub fn starts_at_or_after(&self, floor: DateTime<Utc>) -> bool {
        self.start_time().is_some_and(|start| start >= floor)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewEvent {
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Fields to change on an existing event. `None` leaves the field as is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventPatch {
    pub summary: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.start.is_none() && self.end.is_none()
    }
}

/// Unvalidated event fields, e.g. pulled out of a chat message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub summary: String,
    pub start: String,
    pub end: String,
}
