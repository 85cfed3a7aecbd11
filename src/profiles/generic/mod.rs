//! Generic passthrough profile for unrecognized model identifiers.
//!
//! Sends the plainest widely-understood payload shape and hands the response
//! back with minimal interpretation: a well-known top-level text field when
//! one exists, otherwise the raw body.

use crate::error::{BuildError, ParseError};
use crate::types::InvocationRequest;
use serde::Serialize;
use serde_json::Value;

/// Top-level fields that commonly carry the generated text, tried in order.
const TEXT_FIELDS: &[&str] = &["completion", "generation", "text", "outputText"];

#[derive(Debug, Serialize)]
struct GenericPayload<'a> {
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

/// Build the passthrough payload.
pub(crate) fn build_payload(request: &InvocationRequest) -> Result<Vec<u8>, BuildError> {
    let payload = GenericPayload {
        prompt: request.prompt(),
        max_tokens: request.max_tokens(),
        temperature: request.temperature(),
    };
    serde_json::to_vec(&payload).map_err(|e| BuildError::Serialize {
        message: e.to_string(),
    })
}

/// Pull text out of an unknown response shape.
///
/// If the body is a JSON object with one of the [`TEXT_FIELDS`] as a string,
/// that field is returned; otherwise the raw body passes through unchanged.
pub(crate) fn parse_response(body: &[u8]) -> Result<String, ParseError> {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        for field in TEXT_FIELDS {
            if let Some(Value::String(text)) = map.get(*field) {
                return Ok(text.clone());
            }
        }
    }

    String::from_utf8(body.to_vec()).map_err(|_| ParseError::NonUtf8)
}
