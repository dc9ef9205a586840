use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::errors::RelayError;

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

/// HTTP method of an API Gateway event (REST `httpMethod` or HTTP API
/// `requestContext.http.method`). `None` for direct invocations.
pub fn http_method(payload: &Value) -> Option<&str> {
    v_str(payload, &["httpMethod"]).or_else(|| v_str(payload, &["requestContext", "http", "method"]))
}

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// Returns the raw request body, base64-decoding it when the gateway flagged
/// it as encoded. A missing or null body yields `None`.
pub fn decode_body(payload: &Value) -> Result<Option<String>, RelayError> {
    let Some(body) = payload.get("body").filter(|b| !b.is_null()) else {
        return Ok(None);
    };

    let Some(body_str) = body.as_str() else {
        return Err(RelayError::Validation("Invalid body format".to_string()));
    };

    let encoded = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if !encoded {
        return Ok(Some(body_str.to_string()));
    }

    let bytes = STANDARD
        .decode(body_str)
        .map_err(|e| RelayError::Validation(format!("Invalid base64 body: {e}")))?;
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|e| RelayError::Validation(format!("Body is not valid UTF-8: {e}")))
}

/// Pulls the `message` field out of the JSON request body.
///
/// # Errors
///
/// [`RelayError::Validation`] when the body is absent, is not a JSON object,
/// or has no non-empty string `message`.
pub fn extract_message(payload: &Value) -> Result<String, RelayError> {
    let missing = || RelayError::Validation("Message is required".to_string());

    let Some(body) = decode_body(payload)? else {
        return Err(missing());
    };
    if body.trim().is_empty() {
        return Err(missing());
    }

    let json: Value = serde_json::from_str(&body)
        .map_err(|e| RelayError::Validation(format!("Invalid JSON body: {e}")))?;

    match json.get("message") {
        None | Some(Value::Null) => Err(missing()),
        Some(Value::String(s)) if s.trim().is_empty() => Err(missing()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(RelayError::Validation("Message must be a string".to_string())),
    }
}
