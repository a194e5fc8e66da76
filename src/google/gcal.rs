//! Google Calendar v3 REST client
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::calendar::time::to_canonical;
use crate::calendar::{CalendarBackend, Event, EventPatch, NewEvent};
use crate::credentials::Credential;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    // Set instead of `date_time` for all-day events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    fn at(ts: &DateTime<Utc>) -> Self {
        Self {
            date_time: Some(to_canonical(ts)),
            date: None,
            time_zone: Some(String::from("UTC")),
        }
    }

    fn into_string(self) -> Option<String> {
        self.date_time.or(self.date)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEvent {
    pub id: String,
    pub summary: Option<String>,
    pub start: Option<EventDateTime>,
    pub end: Option<EventDateTime>,
    pub html_link: Option<String>,
}

impl From<GoogleEvent> for Event {
    fn from(event: GoogleEvent) -> Self {
        Event {
            id: event.id,
            summary: event.summary.unwrap_or_else(|| "No title".to_string()),
            start: event
                .start
                .and_then(EventDateTime::into_string)
                .unwrap_or_default(),
            end: event.end.and_then(EventDateTime::into_string),
            html_link: event.html_link,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListEventsResponse {
    items: Option<Vec<GoogleEvent>>,
}

pub struct GoogleCalendar {
    client: Client,
    api_base_url: String,
    calendar_id: String,
}

impl GoogleCalendar {
    pub fn new(api_base_url: &str, calendar_id: &str) -> Self {
        Self {
            client: Client::new(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            calendar_id: calendar_id.to_string(),
        }
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendar/v3/calendars/{}/events",
            self.api_base_url,
            urlencoding::encode(&self.calendar_id)
        )
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url(), urlencoding::encode(event_id))
    }
}

/// Turn a non-2xx response into an error carrying the status and body.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response".to_string());
    tracing::error!("Google Calendar request failed: HTTP {} - {}", status, body);
    Err(anyhow!("Google Calendar request failed: HTTP {}", status))
}

#[async_trait]
impl CalendarBackend for GoogleCalendar {
    async fn list_events(
        &self,
        credential: &Credential,
        time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<Event>> {
        let response = self
            .client
            .get(self.events_url())
            .bearer_auth(&credential.access_token)
            .query(&[
                ("timeMin", to_canonical(&time_min)),
                ("maxResults", max_results.to_string()),
                ("singleEvents", String::from("true")),
                ("orderBy", String::from("startTime")),
            ])
            .send()
            .await?;
        let resp: ListEventsResponse = ensure_success(response).await?.json().await?;

        Ok(resp
            .items
            .unwrap_or_default()
            .into_iter()
            .map(Event::from)
            .collect())
    }

    async fn insert_event(&self, credential: &Credential, event: &NewEvent) -> Result<Event> {
        let body = json!({
            "summary": event.summary,
            "start": EventDateTime::at(&event.start),
            "end": EventDateTime::at(&event.end),
        });
        let response = self
            .client
            .post(self.events_url())
            .bearer_auth(&credential.access_token)
            .json(&body)
            .send()
            .await?;
        let created: GoogleEvent = ensure_success(response).await?.json().await?;
        Ok(created.into())
    }

    async fn patch_event(
        &self,
        credential: &Credential,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<Event> {
        // Only send what changed so the rest of the event is untouched
        let mut body = Map::new();
        if let Some(summary) = &patch.summary {
            body.insert("summary".to_string(), json!(summary));
        }
        if let Some(start) = &patch.start {
            body.insert("start".to_string(), json!(EventDateTime::at(start)));
        }
        if let Some(end) = &patch.end {
            body.insert("end".to_string(), json!(EventDateTime::at(end)));
        }

        let response = self
            .client
            .patch(self.event_url(event_id))
            .bearer_auth(&credential.access_token)
            .json(&Value::Object(body))
            .send()
            .await?;
        let updated: GoogleEvent = ensure_success(response).await?.json().await?;
        Ok(updated.into())
    }

    async fn delete_event(&self, credential: &Credential, event_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.event_url(event_id))
            .bearer_auth(&credential.access_token)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}
