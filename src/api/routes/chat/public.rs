//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::chat::ChatReply;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: ChatReply,
}
