use anyhow::Result;
use async_trait::async_trait;

use crate::calendar::EventDraft;

/// What calendar action, if any, a chat message asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    List,
    Create,
    Update,
    Delete,
    Chat,
}

impl Intent {
    /// Labels the classifier may answer with, and what each one means.
    pub const LABELS: [(&'static str, &'static str); 5] = [
        ("list_events", "the user wants to see upcoming events"),
        ("create_event", "the user wants to add an event"),
        ("update_event", "the user wants to change an existing event"),
        ("delete_event", "the user wants to remove an event"),
        ("none", "anything else"),
    ];

    /// Map a classifier label to an intent. Only exact labels count;
    /// anything else is treated as ordinary conversation.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "list_events" => Intent::List,
            "create_event" => Intent::Create,
            "update_event" => Intent::Update,
            "delete_event" => Intent::Delete,
            _ => Intent::Chat,
        }
    }
}

#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, message: &str) -> Result<Intent>;

    /// Pull the fields of a new event out of the message. `None` when
    /// the message doesn't say enough to create one.
    async fn extract_event(&self, message: &str) -> Result<Option<EventDraft>>;
}

/// Generic conversational reply for messages that aren't calendar
/// requests.
#[async_trait]
pub trait Conversation: Send + Sync {
    async fn reply(&self, message: &str) -> Result<String>;
}
