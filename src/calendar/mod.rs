//! Calendar operations guarded by the stored OAuth credential
pub mod models;
pub mod time;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::AppConfig;
use crate::core::error::{ServiceError, ServiceResult};
use crate::credentials::{Credential, CredentialStore};
use crate::google::GoogleCalendar;
pub use models::{Event, EventDraft, EventPatch, NewEvent};
use time::parse_datetime;

pub const DEFAULT_MAX_RESULTS: u32 = 5;
// Upper bound the calendar API accepts for a single page
pub const MAX_RESULTS_LIMIT: u32 = 2500;
pub const DELETE_CONFIRMATION: &str = "Event deleted.";
// Extra rows requested per page to make room for events already in progress
const IN_PROGRESS_MARGIN: u32 = 20;

/// Remote calendar the service talks to.
#[async_trait]
pub trait CalendarBackend: Send + Sync {
    /// Upcoming single-occurrence events from `time_min`, ordered by
    /// start time.
    async fn list_events(
        &self,
        credential: &Credential,
        time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<Event>>;

    async fn insert_event(&self, credential: &Credential, event: &NewEvent) -> Result<Event>;

    async fn patch_event(
        &self,
        credential: &Credential,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<Event>;

    async fn delete_event(&self, credential: &Credential, event_id: &str) -> Result<()>;
}

/// Trimmed value, or `None` when the field is absent or blank.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// The calendar capability shared by the HTTP API, the chat dispatcher
/// and the tool server.
#[derive(Clone)]
pub struct CalendarService {
    backend: Arc<dyn CalendarBackend>,
    credentials: Arc<dyn CredentialStore>,
}

impl CalendarService {
    pub fn new(backend: Arc<dyn CalendarBackend>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    /// Google Calendar backed service for the configured calendar.
    pub fn from_config(config: &AppConfig, credentials: Arc<dyn CredentialStore>) -> Self {
        let backend = GoogleCalendar::new(&config.google_api_url, &config.calendar_id);
        Self::new(Arc::new(backend), credentials)
    }

    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.credentials)
    }

    pub async fn is_authenticated(&self) -> ServiceResult<bool> {
        Ok(self.credentials.get().await?.is_some())
    }

    async fn credential(&self) -> ServiceResult<Credential> {
        self.credentials
            .get()
            .await?
            .ok_or(ServiceError::Unauthenticated)
    }

    /// List upcoming events, soonest first, starting no earlier than now.
    pub async fn list(&self, max_results: Option<u32>) -> ServiceResult<Vec<Event>> {
        let credential = self.credential().await?;
        let max_results = max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        if max_results == 0 || max_results > MAX_RESULTS_LIMIT {
            return Err(ServiceError::bad_request(
                "maxResults must be between 1 and 2500",
            ));
        }

        let now = Utc::now();
        // The API includes events still in progress at `timeMin`, so ask for
        // more than needed and widen the page until enough upcoming ones
        // remain or the calendar runs out
        let mut fetch = max_results
            .saturating_add(IN_PROGRESS_MARGIN)
            .min(MAX_RESULTS_LIMIT);
        let upcoming = loop {
            let events = self.backend.list_events(&credential, now, fetch).await?;
            let exhausted = events.len() < fetch as usize || fetch == MAX_RESULTS_LIMIT;
            let fetched = events.len();

            let mut upcoming: Vec<Event> = events
                .into_iter()
                .filter(|e| e.starts_at_or_after(now))
                .collect();
            if upcoming.len() >= max_results as usize || exhausted {
                upcoming.sort_by_key(|e| e.start_time());
                upcoming.truncate(max_results as usize);
                tracing::debug!(
                    "Listed {} upcoming events ({} fetched)",
                    upcoming.len(),
                    fetched
                );
                break upcoming;
            }
            fetch = fetch.saturating_mul(2).min(MAX_RESULTS_LIMIT);
        };
        Ok(upcoming)
    }

    pub async fn create(&self, summary: &str, start: &str, end: &str) -> ServiceResult<Event> {
        let credential = self.credential().await?;

        let summary = summary.trim();
        if summary.is_empty() {
            return Err(ServiceError::bad_request("summary is required"));
        }
        let start = parse_datetime(start)
            .ok_or_else(|| ServiceError::bad_request("start must be a valid date-time"))?;
        let end = parse_datetime(end)
            .ok_or_else(|| ServiceError::bad_request("end must be a valid date-time"))?;
        if end < start {
            return Err(ServiceError::bad_request("end must not be before start"));
        }

        let new_event = NewEvent {
            summary: summary.to_string(),
            start,
            end,
        };
        let event = self.backend.insert_event(&credential, &new_event).await?;
        tracing::info!("Created event {}", event.id);
        Ok(event)
    }

    /// Update an event. Omitted or blank fields are left unchanged.
    pub async fn update(
        &self,
        event_id: &str,
        summary: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> ServiceResult<Event> {
        let credential = self.credential().await?;

        let event_id = event_id.trim();
        if event_id.is_empty() {
            return Err(ServiceError::bad_request("eventId is required"));
        }

        let start = match present(start) {
            Some(s) => Some(
                parse_datetime(s)
                    .ok_or_else(|| ServiceError::bad_request("start must be a valid date-time"))?,
            ),
            None => None,
        };
        let end = match present(end) {
            Some(s) => Some(
                parse_datetime(s)
                    .ok_or_else(|| ServiceError::bad_request("end must be a valid date-time"))?,
            ),
            None => None,
        };
        if let (Some(start), Some(end)) = (start, end)
            && end < start
        {
            return Err(ServiceError::bad_request("end must not be before start"));
        }

        let patch = EventPatch {
            summary: present(summary).map(String::from),
            start,
            end,
        };
        if patch.is_empty() {
            return Err(ServiceError::bad_request(
                "at least one of summary, start or end is required",
            ));
        }

        let event = self
            .backend
            .patch_event(&credential, event_id, &patch)
            .await?;
        tracing::info!("Updated event {}", event.id);
        Ok(event)
    }

    pub async fn delete(&self, event_id: &str) -> ServiceResult<&'static str> {
        let credential = self.credential().await?;

        let event_id = event_id.trim();
        if event_id.is_empty() {
            return Err(ServiceError::bad_request("eventId is required"));
        }

        self.backend.delete_event(&credential, event_id).await?;
        tracing::info!("Deleted event {}", event_id);
        Ok(DELETE_CONFIRMATION)
    }
}
