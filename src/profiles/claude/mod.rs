//! Anthropic Claude wire schemas.
//!
//! Two generations coexist on Bedrock: the messages API used by Claude 3 and
//! later, and the legacy completion API with the `Human:`/`Assistant:` prompt
//! frame used by Claude 2 and earlier.

use crate::error::{BuildError, ParseError};
use crate::types::InvocationRequest;
use serde::{Deserialize, Serialize};

/// Anthropic protocol version tag required by Bedrock.
const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

// ============================================================================
// Messages API (Claude 3+)
// ============================================================================

#[derive(Debug, Serialize)]
struct MessagesPayload<'a> {
    anthropic_version: &'static str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Build a messages-API payload from a logical request.
pub(crate) fn build_messages_payload(request: &InvocationRequest) -> Result<Vec<u8>, BuildError> {
    let payload = MessagesPayload {
        anthropic_version: ANTHROPIC_VERSION,
        max_tokens: request.max_tokens(),
        messages: vec![ChatMessage {
            role: "user",
            content: request.prompt(),
        }],
        temperature: request.temperature(),
    };
    serde_json::to_vec(&payload).map_err(|e| BuildError::Serialize {
        message: e.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Extract the generated text from a messages-API response.
///
/// Text blocks are concatenated; non-text blocks are skipped. An empty
/// content list is a parse failure, not an empty success.
pub(crate) fn parse_messages_response(body: &[u8]) -> Result<String, ParseError> {
    let response: MessagesResponse =
        serde_json::from_slice(body).map_err(|e| ParseError::MalformedJson {
            message: e.to_string(),
        })?;

    if response.content.is_empty() {
        return Err(ParseError::MissingField {
            field: "content".to_string(),
        });
    }

    Ok(response
        .content
        .iter()
        .filter_map(|block| block.text.as_deref())
        .collect())
}

// ============================================================================
// Legacy completion API (Claude 2 and earlier)
// ============================================================================

#[derive(Debug, Serialize)]
struct LegacyPayload {
    prompt: String,
    max_tokens_to_sample: u32,
    temperature: f32,
}

/// Build a legacy completion payload with the `Human:`/`Assistant:` frame.
pub(crate) fn build_legacy_payload(request: &InvocationRequest) -> Result<Vec<u8>, BuildError> {
    let payload = LegacyPayload {
        prompt: format!("\n\nHuman: {}\n\nAssistant:", request.prompt()),
        max_tokens_to_sample: request.max_tokens(),
        temperature: request.temperature(),
    };
    serde_json::to_vec(&payload).map_err(|e| BuildError::Serialize {
        message: e.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct LegacyResponse {
    completion: Option<String>,
}

/// Extract the completion text from a legacy response.
pub(crate) fn parse_legacy_response(body: &[u8]) -> Result<String, ParseError> {
    let response: LegacyResponse =
        serde_json::from_slice(body).map_err(|e| ParseError::MalformedJson {
            message: e.to_string(),
        })?;

    response.completion.ok_or_else(|| ParseError::MissingField {
        field: "completion".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_payload_has_user_message_and_version_tag() {
        let request = InvocationRequest::new("anthropic.claude-3-5-sonnet-20240620-v1:0", "hi");
        let payload = build_messages_payload(&request).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();

        assert_eq!(json["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
        assert_eq!(json["max_tokens"], 512);
    }

    #[test]
    fn messages_response_extracts_text() {
        let body = br#"{"content":[{"text":"hello"}]}"#;
        assert_eq!(parse_messages_response(body).unwrap(), "hello");
    }

    #[test]
    fn messages_response_joins_multiple_blocks() {
        let body = br#"{"content":[{"text":"Hello, "},{"text":"world!"}]}"#;
        assert_eq!(parse_messages_response(body).unwrap(), "Hello, world!");
    }

    #[test]
    fn messages_response_tolerates_extra_fields() {
        let body = br#"{
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "ok"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 3, "output_tokens": 1}
        }"#;
        assert_eq!(parse_messages_response(body).unwrap(), "ok");
    }

    #[test]
    fn messages_response_without_content_is_an_error() {
        let err = parse_messages_response(br#"{"content":[]}"#).unwrap_err();
        assert!(err.to_string().contains("content"));
    }

    #[test]
    fn messages_response_rejects_malformed_json() {
        assert!(parse_messages_response(b"not json").is_err());
    }

    #[test]
    fn legacy_payload_frames_the_prompt() {
        let request = InvocationRequest::new("anthropic.claude-v2", "Why is the sky blue?")
            .with_max_tokens(256);
        let payload = build_legacy_payload(&request).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();

        assert_eq!(
            json["prompt"],
            "\n\nHuman: Why is the sky blue?\n\nAssistant:"
        );
        assert_eq!(json["max_tokens_to_sample"], 256);
    }

    #[test]
    fn legacy_response_extracts_completion() {
        let body = br#"{"completion":" Rayleigh scattering.","stop_reason":"stop_sequence"}"#;
        assert_eq!(parse_legacy_response(body).unwrap(), " Rayleigh scattering.");
    }

    #[test]
    fn legacy_response_without_completion_is_an_error() {
        let err = parse_legacy_response(br#"{"stop_reason":"stop_sequence"}"#).unwrap_err();
        assert!(err.to_string().contains("completion"));
    }
}
