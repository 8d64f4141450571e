use quiztocht_core::{message_count_label, Message};
use serde::Serialize;

/// The message overview, newest first
#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub count: usize,
    pub label: String,
    pub messages: Vec<Message>,
}

impl From<Vec<Message>> for MessageListResponse {
    fn from(messages: Vec<Message>) -> Self {
        Self {
            count: messages.len(),
            label: message_count_label(messages.len()),
            messages,
        }
    }
}
