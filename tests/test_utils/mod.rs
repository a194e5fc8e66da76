//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::{Router, body::Body};
use chrono::{DateTime, Duration, Utc};

use calbridge::api::{AppState, app};
use calbridge::calendar::time::to_canonical;
use calbridge::calendar::{
    CalendarBackend, CalendarService, Event, EventDraft, EventPatch, NewEvent,
};
use calbridge::chat::{ChatDispatcher, Conversation, Intent, IntentClassifier};
use calbridge::core::AppConfig;
use calbridge::credentials::{Credential, CredentialStore, InMemoryCredentialStore};
use calbridge::google::GoogleOAuth;

/// Calendar held in memory. Listing returns whatever is stored in start
/// order, the service does the time filtering.
#[derive(Default)]
pub struct StubBackend {
    pub events: Mutex<Vec<Event>>,
    pub calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl StubBackend {
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: Mutex::new(events),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarBackend for StubBackend {
    async fn list_events(
        &self,
        _credential: &Credential,
        _time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<Event>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut events = self.events.lock().unwrap().clone();
        events.sort_by_key(|e| e.start_time());
        events.truncate(max_results as usize);
        Ok(events)
    }

    async fn insert_event(&self, _credential: &Credential, event: &NewEvent) -> Result<Event> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let created = Event {
            id: format!("created-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            summary: event.summary.clone(),
            start: to_canonical(&event.start),
            end: Some(to_canonical(&event.end)),
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
            event.start = to_canonical(start);
        }
        if let Some(end) = &patch.end {
            event.end = Some(to_canonical(end));
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

/// Classifier that always answers with the same label and draft.
pub struct StubClassifier {
    pub label: &'static str,
    pub draft: Option<EventDraft>,
}

#[async_trait]
impl IntentClassifier for StubClassifier {
    async fn classify(&self, _message: &str) -> Result<Intent> {
        Ok(Intent::from_label(self.label))
    }

    async fn extract_event(&self, _message: &str) -> Result<Option<EventDraft>> {
        Ok(self.draft.clone())
    }
}

pub struct EchoConversation;

#[async_trait]
impl Conversation for EchoConversation {
    async fn reply(&self, message: &str) -> Result<String> {
        Ok(format!("You said: {}", message))
    }
}

/// Config with fake secrets. Nothing in it points at a real service.
pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "CALBRIDGE_GOOGLE_CLIENT_ID" => Some(String::from("test-client-id")),
        "CALBRIDGE_GOOGLE_CLIENT_SECRET" => Some(String::from("test-client-secret")),
        "OPENAI_API_KEY" => Some(String::from("test-api-key")),
        "CALBRIDGE_GOOGLE_API_URL" => Some(String::from("http://127.0.0.1:9")),
        "CALBRIDGE_STATIC_DIR" => Some(String::from("./tests/no-static-dir")),
        _ => None,
    })
    .expect("Failed to build test config")
}

/// Everything a test may want to poke at after building the router.
pub struct TestApp {
    pub router: Router,
    pub backend: Arc<StubBackend>,
    pub credentials: Arc<InMemoryCredentialStore>,
}

pub struct TestAppBuilder {
    config: AppConfig,
    events: Vec<Event>,
    authenticated: bool,
    classifier: StubClassifier,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            config: test_config(),
            events: vec![],
            authenticated: true,
            classifier: StubClassifier {
                label: "none",
                draft: None,
            },
        }
    }

    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn events(mut self, events: Vec<Event>) -> Self {
        self.events = events;
        self
    }

    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }

    pub fn classify_as(mut self, label: &'static str) -> Self {
        self.classifier.label = label;
        self
    }

    pub fn extracted(mut self, draft: EventDraft) -> Self {
        self.classifier.draft = Some(draft);
        self
    }

    pub fn build(self) -> TestApp {
        let backend = Arc::new(StubBackend::with_events(self.events));
        let credentials = Arc::new(if self.authenticated {
            InMemoryCredentialStore::with_credential(Credential::bearer("test-token"))
        } else {
            InMemoryCredentialStore::new()
        });

        let calendar = CalendarService::new(
            backend.clone(),
            credentials.clone() as Arc<dyn CredentialStore>,
        );
        let chat = ChatDispatcher::new(
            calendar.clone(),
            Arc::new(self.classifier),
            Arc::new(EchoConversation),
        );
        let oauth = GoogleOAuth::new(&self.config);
        let state = AppState::new(self.config, calendar, chat, oauth);

        TestApp {
            router: app(Arc::new(state)),
            backend,
            credentials,
        }
    }
}

/// Authenticated app over a calendar holding `events`.
pub fn test_app(events: Vec<Event>) -> TestApp {
    TestAppBuilder::new().events(events).build()
}

/// An event an hour long starting at `start`.
pub fn event_at(id: &str, summary: &str, start: DateTime<Utc>) -> Event {
    Event {
        id: id.to_string(),
        summary: summary.to_string(),
        start: to_canonical(&start),
        end: Some(to_canonical(&(start + Duration::hours(1)))),
        html_link: None,
    }
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).expect("Body is not JSON")
}
