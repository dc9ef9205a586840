//! Chat relay Lambda handler.
//!
//! This module handles:
//! - CORS preflight short-circuit
//! - Method and body validation
//! - Configuration loading (after validation, before any network call)
//! - Relaying the message and translating failures to status codes

use super::{helpers, parsing};
use crate::ai::{ChatRelay, CompletionApi, HttpCompletionClient};
use crate::core::config::RelayConfig;
use crate::errors::RelayError;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};

pub use self::function_handler as handler;

/// Lambda handler for the chat relay endpoint.
///
/// Configuration is read from the environment once per invocation.
///
/// # Errors
///
/// Never returns `Err`; every failure is rendered as a JSON error response.
#[tracing::instrument(level = "info", skip(event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    Ok(respond(&event.payload, connect_from_env).await)
}

fn connect_from_env() -> Result<ChatRelay<HttpCompletionClient>, RelayError> {
    let config = RelayConfig::from_env()?;
    Ok(ChatRelay::new(HttpCompletionClient::new(&config)?))
}

/// Handles one API Gateway event.
///
/// `connect` builds the relay and is only invoked once the request has been
/// validated, so a bad request never touches configuration or the network.
pub async fn respond<C, F>(payload: &Value, connect: F) -> Value
where
    C: CompletionApi,
    F: FnOnce() -> Result<ChatRelay<C>, RelayError>,
{
    let method = parsing::http_method(payload).unwrap_or("POST");

    if method.eq_ignore_ascii_case("OPTIONS") {
        return helpers::preflight();
    }

    if !method.eq_ignore_ascii_case("POST") {
        warn!(method = %method, "Rejected request method");
        return helpers::error_response(&RelayError::MethodNotAllowed(method.to_string()));
    }

    if let Some(origin) = payload
        .get("headers")
        .and_then(|h| parsing::get_header_value(h, "Origin"))
    {
        info!(origin = %origin, "Chat relay request");
    }

    let message = match parsing::extract_message(payload) {
        Ok(m) => m,
        Err(e) => {
            error!("Rejected chat request: {}", e);
            return helpers::error_response(&e);
        }
    };

    let relay = match connect() {
        Ok(relay) => relay,
        Err(e) => {
            error!("Config error: {}", e);
            return helpers::error_response(&e);
        }
    };

    match relay.relay(&message).await {
        Ok(reply) => helpers::ok_reply(&reply),
        Err(e) => {
            error!(status = e.status_code(), "Chat relay failed: {}", e);
            helpers::error_response(&e)
        }
    }
}
