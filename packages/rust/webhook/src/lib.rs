//! Client for the workflow-automation webhooks behind the website:
//! the chat assistant, the contact/feedback form, and the remote grammar
//! check for product descriptions.
//!
//! Every call is a single JSON `POST` with a timeout and no retries.

mod payload;

use std::time::Duration;

use pureextracts_shared::{ContactForm, PureExtractsError, Result, WebhookEndpoints};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

pub use payload::{CHAT_FALLBACK_REPLY, ChatReply};

/// User-Agent string for webhook requests.
const USER_AGENT: &str = concat!("PureExtracts/", env!("CARGO_PKG_VERSION"));

/// Reply keys tried in order for the chat workflow.
const CHAT_REPLY_KEYS: [&str; 3] = ["output", "response", "message"];

/// Corrected-text keys tried in order for the grammar workflow.
const GRAMMAR_REPLY_KEYS: [&str; 3] = ["correctedText", "corrected_text", "output"];

/// HTTP client bound to one set of webhook endpoints.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    endpoints: WebhookEndpoints,
    session_id: String,
}

impl WebhookClient {
    pub fn new(endpoints: WebhookEndpoints) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(endpoints.timeout_secs))
            .build()
            .map_err(|e| {
                PureExtractsError::Network(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoints,
            session_id: format!("web-chat-{}", uuid::Uuid::now_v7()),
        })
    }

    /// Session id sent with every chat message from this client.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send one chat message and return the assistant's reply.
    #[instrument(skip_all, fields(session = %self.session_id))]
    pub async fn chat(&self, message: &str) -> Result<ChatReply> {
        if message.trim().is_empty() {
            return Err(PureExtractsError::validation("chat message is empty"));
        }

        let body = payload::ChatRequest::new(message, &self.session_id);
        let response = self.post_json(&self.endpoints.chat, &body).await?;

        let reply = match first_string(&response, &CHAT_REPLY_KEYS) {
            Some(text) => ChatReply {
                text,
                fallback: false,
            },
            None => {
                debug!("chat reply had no text field");
                ChatReply {
                    text: CHAT_FALLBACK_REPLY.to_string(),
                    fallback: true,
                }
            }
        };
        info!(fallback = reply.fallback, "chat reply received");
        Ok(reply)
    }

    /// Submit the contact form. Returns whatever the workflow answered.
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn submit_contact(&self, form: &ContactForm) -> Result<Value> {
        form.validate()?;
        let response = self.post_json(&self.endpoints.contact, form).await?;
        info!("contact form delivered");
        Ok(response)
    }

    /// Ask the grammar workflow to correct a product description.
    #[instrument(skip_all, fields(len = text.len()))]
    pub async fn check_grammar(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(PureExtractsError::validation(
                "Please enter a description first",
            ));
        }

        let body = serde_json::json!({ "text": text });
        let response = self.post_json(&self.endpoints.grammar, &body).await?;

        first_string(&response, &GRAMMAR_REPLY_KEYS).ok_or_else(|| {
            PureExtractsError::validation("No corrected text received from grammar service")
        })
    }

    /// POST `body` as JSON. Non-JSON response bodies come back as a string value.
    async fn post_json<B: Serialize + ?Sized>(&self, url: &Url, body: &B) -> Result<Value> {
        debug!(%url, "posting to webhook");
        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| PureExtractsError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PureExtractsError::Network(format!("{url}: HTTP {status}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| PureExtractsError::Network(format!("{url}: failed to read body: {e}")))?;

        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

/// First non-empty string among `keys` in a JSON object.
///
/// Workflows sometimes answer with a one-element array wrapping the object,
/// so a leading array element is looked into as well.
fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    let object = match value {
        Value::Array(items) => items.first()?,
        other => other,
    };
    keys.iter()
        .filter_map(|key| object.get(*key))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .map(String::from)
}
