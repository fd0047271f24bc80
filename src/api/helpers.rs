//! Response builders for the gateway.
//!
//! Every response carries permissive CORS headers: the collector runs as a
//! browser extension on arbitrary origins.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;

use crate::core::models::ErrorBody;

// ============================================================================
// Headers
// ============================================================================

#[must_use]
pub fn cors_headers() -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Methods": "GET, POST, OPTIONS",
        "Access-Control-Allow-Headers": "*"
    })
}

// ============================================================================
// Response Builders
// ============================================================================

/// Serializes `body` into a gateway response with the given status code.
#[must_use]
pub fn json_response<T: Serialize>(status_code: u16, body: &T) -> Value {
    let body = serde_json::to_string(body).unwrap_or_else(|e| {
        error!("Failed to serialize response body: {}", e);
        json!({ "error": "Failed to serialize response" }).to_string()
    });

    json!({
        "statusCode": status_code,
        "headers": cors_headers(),
        "body": body
    })
}

/// Returns a 200 OK response with a JSON body.
#[must_use]
pub fn ok_json<T: Serialize>(body: &T) -> Value {
    json_response(200, body)
}

/// Returns a 200 OK response whose body is a single `{error}` object.
///
/// Analysis routes report request-level faults this way so the caller never
/// sees a transport-level failure.
#[must_use]
pub fn ok_error(message: &str) -> Value {
    ok_json(&ErrorBody::new(message))
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json_response(status_code, &ErrorBody::new(message))
}

/// Returns a 204 response for CORS preflight requests.
#[must_use]
pub fn preflight() -> Value {
    json!({
        "statusCode": 204,
        "headers": cors_headers(),
        "body": ""
    })
}
