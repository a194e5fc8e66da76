//! Chat intent dispatch over the calendar service
pub mod intent;
pub mod model;

use std::sync::Arc;

use serde::Serialize;

use crate::calendar::{CalendarService, Event};
use crate::core::error::{ServiceError, ServiceResult};
pub use intent::{Conversation, Intent, IntentClassifier};
pub use model::OpenAiModel;

pub const CREATE_HELP: &str = "Tell me the event title and when it starts and ends, \
for example \"Lunch with Sam tomorrow from 12:00 to 13:00\".";
pub const UPDATE_HELP: &str =
    "To update an event, list your events and use the Edit button next to it.";
pub const DELETE_HELP: &str =
    "To delete an event, list your events and use the Delete button next to it.";

/// Reply to a chat message. Serializes as a plain string or an array of
/// events.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatReply {
    Text(String),
    Events(Vec<Event>),
}

#[derive(Clone)]
pub struct ChatDispatcher {
    calendar: CalendarService,
    classifier: Arc<dyn IntentClassifier>,
    conversation: Arc<dyn Conversation>,
}

impl ChatDispatcher {
    pub fn new(
        calendar: CalendarService,
        classifier: Arc<dyn IntentClassifier>,
        conversation: Arc<dyn Conversation>,
    ) -> Self {
        Self {
            calendar,
            classifier,
            conversation,
        }
    }

    pub async fn dispatch(&self, message: &str) -> ServiceResult<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ServiceError::bad_request("message is required"));
        }

        let intent = self.classifier.classify(message).await?;
        tracing::info!("Dispatching chat message with intent {:?}", intent);

        match intent {
            Intent::List => Ok(ChatReply::Events(self.calendar.list(None).await?)),
            Intent::Create => self.create_from_message(message).await,
            Intent::Update => Ok(ChatReply::Text(UPDATE_HELP.to_string())),
            Intent::Delete => Ok(ChatReply::Text(DELETE_HELP.to_string())),
            Intent::Chat => Ok(ChatReply::Text(self.conversation.reply(message).await?)),
        }
    }

    async fn create_from_message(&self, message: &str) -> ServiceResult<ChatReply> {
        let Some(draft) = self.classifier.extract_event(message).await? else {
            return Ok(ChatReply::Text(CREATE_HELP.to_string()));
        };

        match self
            .calendar
            .create(&draft.summary, &draft.start, &draft.end)
            .await
        {
            Ok(event) => Ok(ChatReply::Text(format!(
                "Created event: {} ({})",
                event.summary, event.start
            ))),
            // The model handed back fields the calendar can't use
            Err(ServiceError::BadRequest(reason)) => {
                tracing::warn!("Extracted event was rejected: {}", reason);
                Ok(ChatReply::Text(CREATE_HELP.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}
