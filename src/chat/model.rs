//! Language model backed classifier and conversation
use anyhow::Result;
use async_trait::async_trait;
use chrono::Local;

use super::intent::{Conversation, Intent, IntentClassifier};
use crate::calendar::EventDraft;
use crate::openai::{CompletionClient, Message, Role};

fn classify_prompt() -> String {
    let labels: Vec<String> = Intent::LABELS
        .iter()
        .map(|(label, meaning)| format!("{} ({})", label, meaning))
        .collect();
    format!(
        "You route messages for a calendar assistant. \
Reply with exactly one label and nothing else: {}.",
        labels.join(", ")
    )
}

const EXTRACT_PROMPT: &str = "Extract the calendar event the user wants to create. \
Reply with JSON only, no code fences, in the form \
{\"summary\": \"...\", \"start\": \"...\", \"end\": \"...\"} where start and end are \
RFC 3339 date-times with offsets. If no end is given assume one hour after start. \
If the title or start time is missing reply with null.";

pub struct OpenAiModel {
    client: CompletionClient,
    system_message: String,
}

impl OpenAiModel {
    pub fn new(client: CompletionClient, system_message: &str) -> Self {
        Self {
            client,
            system_message: system_message.to_string(),
        }
    }
}

/// Models sometimes wrap JSON in markdown fences despite being told not to.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn parse_draft(text: &str) -> Option<EventDraft> {
    match serde_json::from_str::<Option<EventDraft>>(strip_code_fence(text)) {
        Ok(draft) => draft,
        Err(e) => {
            tracing::warn!("Could not parse extracted event {:?}: {}", text, e);
            None
        }
    }
}

#[async_trait]
impl IntentClassifier for OpenAiModel {
    async fn classify(&self, message: &str) -> Result<Intent> {
        let messages = vec![
            Message::new(Role::System, &classify_prompt()),
            Message::new(Role::User, message),
        ];
        let label = self.client.complete_text(&messages).await?;
        let intent = Intent::from_label(&label);
        tracing::debug!("Classified message as {:?} (label {:?})", intent, label.trim());
        Ok(intent)
    }

    async fn extract_event(&self, message: &str) -> Result<Option<EventDraft>> {
        let now = format!("The current local time is {}.", Local::now().to_rfc3339());
        let messages = vec![
            Message::new(Role::System, EXTRACT_PROMPT),
            Message::new(Role::System, &now),
            Message::new(Role::User, message),
        ];
        let text = self.client.complete_text(&messages).await?;
        Ok(parse_draft(&text))
    }
}

#[async_trait]
impl Conversation for OpenAiModel {
    async fn reply(&self, message: &str) -> Result<String> {
        let messages = vec![
            Message::new(Role::System, &self.system_message),
            Message::new(Role::User, message),
        ];
        self.client.complete_text(&messages).await
    }
}
