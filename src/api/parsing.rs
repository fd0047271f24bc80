use base64::{Engine as _, engine::general_purpose};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::DigestError;

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

/// Request path from an HTTP API (`rawPath`) or REST API (`path`) event.
#[must_use]
pub fn request_path(payload: &Value) -> &str {
    v_str(payload, &["rawPath"])
        .or_else(|| v_str(payload, &["path"]))
        .unwrap_or("/")
}

/// Upper-cased HTTP method; events without one are treated as POST.
#[must_use]
pub fn request_method(payload: &Value) -> String {
    v_str(payload, &["requestContext", "http", "method"])
        .or_else(|| v_str(payload, &["httpMethod"]))
        .unwrap_or("POST")
        .to_ascii_uppercase()
}

/// True when `path` is `route`, optionally behind a stage prefix.
#[must_use]
pub fn path_matches(path: &str, route: &str) -> bool {
    let trimmed = path.trim_end_matches('/');
    trimmed == route || trimmed.ends_with(route)
}

/// Extracts the request body, undoing the gateway's base64 wrapping.
pub fn decode_body(payload: &Value) -> Result<String, DigestError> {
    let Some(body) = payload.get("body").and_then(Value::as_str) else {
        return Err(DigestError::ParseError("Missing body".to_string()));
    };

    let is_base64 = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if !is_base64 {
        return Ok(body.to_string());
    }

    let bytes = general_purpose::STANDARD
        .decode(body)
        .map_err(|e| DigestError::ParseError(format!("Invalid base64 body: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| DigestError::ParseError(format!("Body is not UTF-8: {}", e)))
}

pub fn parse_json_body<T: DeserializeOwned>(body: &str) -> Result<T, DigestError> {
    if body.trim().is_empty() {
        return Err(DigestError::ParseError("Request body is empty".to_string()));
    }
    serde_json::from_str(body)
        .map_err(|e| DigestError::ParseError(format!("Invalid JSON body: {}", e)))
}
