//! In-memory calendar backend for unit tests
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::time;
use super::{CalendarBackend, Event, EventPatch, NewEvent};
use crate::credentials::Credential;

/// Calendar kept in memory that behaves like the remote API.
#[derive(Default)]
pub(crate) struct StubCalendar {
    pub(crate) events: Mutex<Vec<Event>>,
    next_id: AtomicUsize,
    pub(crate) calls: AtomicUsize,
}

impl StubCalendar {
    pub(crate) fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: Mutex::new(events),
            ..Default::default()
        }
    }
}

#[async_trait]
impl CalendarBackend for StubCalendar {
    async fn list_events(
        &self,
        _credential: &Credential,
        time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<Event>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut events: Vec<Event> = self
            .events
            .lock()
            .unwrap()
            .iter()
            // Like the remote API, anything still running at `time_min` counts
            .filter(|e| end_time(e).is_some_and(|end| end > time_min))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start_time());
        events.truncate(max_results as usize);
        Ok(events)
    }

    async fn insert_event(&self, _credential: &Credential, event: &NewEvent) -> Result<Event> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let id = format!("evt-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let created = Event {
            id,
            summary: event.summary.clone(),
            start: time::to_canonical(&event.start),
            end: Some(time::to_canonical(&event.end)),
            html_link: None,
        };
        self.events.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn patch_event(
        &self,
        _credential: &Credential,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<Event> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| anyhow!("Not Found"))?;
        if let Some(summary) = &patch.summary {
            event.summary = summary.clone();
        }
        if let Some(start) = &patch.start {
            event.start = time::to_canonical(start);
        }
        if let Some(end) = &patch.end {
            event.end = Some(time::to_canonical(end));
        }
        Ok(event.clone())
    }

    async fn delete_event(&self, _credential: &Credential, event_id: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|e| e.id != event_id);
        if events.len() == before {
            return Err(anyhow!("Not Found"));
        }
        Ok(())
    }
}

fn end_time(event: &Event) -> Option<DateTime<Utc>> {
    event
        .end
        .as_deref()
        .and_then(|end| DateTime::parse_from_rfc3339(end).ok())
        .map(|end| end.with_timezone(&Utc))
        .or_else(|| event.start_time())
}

pub(crate) fn event_at(id: &str, summary: &str, start: DateTime<Utc>) -> Event {
    Event {
        id: id.to_string(),
        summary: summary.to_string(),
        start: time::to_canonical(&start),
        end: Some(time::to_canonical(&(start + Duration::hours(1)))),
        html_link: None,
    }
}
