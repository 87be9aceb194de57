//! Request and reply shapes exchanged with the workflows.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Shown when the chat workflow answers without any reply text.
pub const CHAT_FALLBACK_REPLY: &str =
    "I apologize, but I couldn't process your request right now. Please try again.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatRequest<'a> {
    message: &'a str,
    timestamp: String,
    session_id: &'a str,
}

impl<'a> ChatRequest<'a> {
    pub(crate) fn new(message: &'a str, session_id: &'a str) -> Self {
        Self {
            message,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            session_id,
        }
    }
}

/// The assistant's answer to one chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    /// True when the workflow sent no reply text and the stock apology is used.
    pub fallback: bool,
}
