//! The chat relay: validate, compose, call upstream, translate.

use serde_json::Value;
use tracing::{info, warn};

use super::client::{CompletionApi, CompletionRequest};
use super::prompt_builder::build_conversation;
use crate::errors::RelayError;

/// Reply used when the upstream answers successfully but carries no text.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I couldn't come up with an answer just now. Please try again in a moment.";

pub struct ChatRelay<C> {
    api: C,
}

impl<C: CompletionApi> ChatRelay<C> {
    #[must_use]
    pub fn new(api: C) -> Self {
        Self { api }
    }

    /// Forwards one shopper message to the completion service and returns
    /// the assistant's reply.
    ///
    /// # Errors
    ///
    /// - [`RelayError::Validation`] for an empty message (no call is made)
    /// - whatever the [`CompletionApi`] reports for transport or upstream
    ///   failures
    pub async fn relay(&self, message: &str) -> Result<String, RelayError> {
        let message = validate_message(message)?;

        let prompt = build_conversation(message);
        let request = CompletionRequest::new(&prompt);
        let response = self.api.complete(&request).await?;

        match extract_reply(&response) {
            Some(reply) => {
                info!(reply_chars = reply.chars().count(), "Relayed chat reply");
                Ok(reply)
            }
            None => {
                warn!("Upstream response had no completion content, using fallback reply");
                Ok(FALLBACK_REPLY.to_string())
            }
        }
    }
}

/// Rejects empty or whitespace-only messages; returns the trimmed text.
///
/// # Errors
///
/// Returns [`RelayError::Validation`] when nothing is left after trimming.
pub fn validate_message(message: &str) -> Result<&str, RelayError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(RelayError::Validation("Message is required".to_string()));
    }
    Ok(trimmed)
}

/// `choices[0].message.content`, if present and non-empty.
#[must_use]
pub fn extract_reply(response: &Value) -> Option<String> {
    response
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(std::string::ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct CannedApi {
        response: Result<Value, (u16, &'static str)>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl CannedApi {
        fn ok(response: Value) -> Self {
            Self {
                response: Ok(response),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16, body: &'static str) -> Self {
            Self {
                response: Err((status, body)),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionApi for CannedApi {
        async fn complete(&self, request: &CompletionRequest) -> Result<Value, RelayError> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.response {
                Ok(v) => Ok(v.clone()),
                Err((status, body)) => Err(RelayError::Upstream {
                    status: *status,
                    body: (*body).to_string(),
                }),
            }
        }
    }

    fn completion(content: &str) -> Value {
        json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        })
    }

    #[tokio::test]
    async fn relays_reply_from_first_choice() {
        let relay = ChatRelay::new(CannedApi::ok(completion("We ship in two days.")));

        let reply = relay.relay("  When will my order ship?  ").await.unwrap();
        assert_eq!(reply, "We ship in two days.");

        let seen = relay.api.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert!(!request.stream);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[1]["content"], "When will my order ship?");
    }

    #[tokio::test]
    async fn empty_message_makes_no_call() {
        let relay = ChatRelay::new(CannedApi::ok(completion("unused")));

        let err = relay.relay(" \n\t").await.unwrap_err();
        assert!(matches!(err, RelayError::Validation(_)));
        assert_eq!(err.status_code(), 400);
        assert!(relay.api.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_content_uses_fallback() {
        for body in [
            json!({ "choices": [] }),
            json!({ "choices": [{ "message": { "role": "assistant" } }] }),
            json!({ "choices": [{ "message": { "content": null } }] }),
            completion(""),
            json!({}),
        ] {
            let relay = ChatRelay::new(CannedApi::ok(body));
            assert_eq!(relay.relay("hi").await.unwrap(), FALLBACK_REPLY);
        }
    }

    #[tokio::test]
    async fn upstream_failure_is_not_retried() {
        let relay = ChatRelay::new(CannedApi::failing(503, "rate limited"));

        let err = relay.relay("hello").await.unwrap_err();
        assert!(matches!(err, RelayError::Upstream { status: 503, .. }));
        assert_eq!(relay.api.seen.lock().unwrap().len(), 1);
    }
}
