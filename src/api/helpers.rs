//! Response builders for the chat relay endpoint.
//!
//! Every response carries the same permissive cross-origin headers so the
//! storefront can call the relay from the browser.

use serde_json::{Value, json};

use crate::errors::RelayError;

/// Headers attached to every response, preflight included.
#[must_use]
pub fn cors_headers() -> Value {
    json!({
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Headers": "Content-Type",
        "Access-Control-Allow-Methods": "POST, OPTIONS",
        "Content-Type": "application/json"
    })
}

/// Returns the 200 response to a CORS preflight request.
#[must_use]
pub fn preflight() -> Value {
    json!({
        "statusCode": 200,
        "headers": cors_headers(),
        "body": ""
    })
}

/// Returns a 200 OK response carrying the assistant reply.
#[must_use]
pub fn ok_reply(reply: &str) -> Value {
    json!({
        "statusCode": 200,
        "headers": cors_headers(),
        "body": json!({ "response": reply }).to_string()
    })
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": cors_headers(),
        "body": json!({ "error": message }).to_string()
    })
}

/// Renders a [`RelayError`] with its mapped status code.
#[must_use]
pub fn error_response(error: &RelayError) -> Value {
    err_response(error.status_code(), &error.to_string())
}
