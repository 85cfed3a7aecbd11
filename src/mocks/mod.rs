//! Test doubles for the adapter and its collaborators.
//!
//! [`MockTransport`] replays a canned outcome and records every call so
//! tests can assert on the exact payload a profile produced. The canned
//! reply builders emit the provider wire shapes without hand-writing JSON.

use crate::error::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

/// One recorded transport call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The model identifier the adapter targeted.
    pub model_id: String,
    /// The serialized payload the profile built.
    pub payload: Vec<u8>,
}

enum CannedOutcome {
    Reply(Bytes),
    Fail(TransportError),
}

/// A transport that replays a canned outcome and records its calls.
pub struct MockTransport {
    outcome: CannedOutcome,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    /// A transport that answers every call with the given body.
    pub fn replying_with(body: impl Into<String>) -> Self {
        Self {
            outcome: CannedOutcome::Reply(Bytes::from(body.into())),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A transport that fails every call with the given error.
    pub fn failing_with(error: TransportError) -> Self {
        Self {
            outcome: CannedOutcome::Fail(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// The most recent call, if any.
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }
}

#[async_trait]
impl crate::transport::Transport for MockTransport {
    async fn send(&self, model_id: &str, payload: &[u8]) -> Result<Bytes, TransportError> {
        self.calls.lock().push(RecordedCall {
            model_id: model_id.to_string(),
            payload: payload.to_vec(),
        });

        match &self.outcome {
            CannedOutcome::Reply(body) => Ok(body.clone()),
            CannedOutcome::Fail(error) => Err(error.clone()),
        }
    }
}

/// Canned Anthropic messages-API reply.
pub struct CannedClaudeReply {
    text: String,
    stop_reason: String,
}

impl CannedClaudeReply {
    /// A reply carrying the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            stop_reason: "end_turn".to_string(),
        }
    }

    /// Override the stop reason.
    pub fn with_stop_reason(mut self, reason: impl Into<String>) -> Self {
        self.stop_reason = reason.into();
        self
    }

    /// Render the wire JSON.
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "id": "msg_mock",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": self.text}],
            "stop_reason": self.stop_reason,
            "usage": {"input_tokens": 10, "output_tokens": 5}
        })
        .to_string()
    }
}

/// Canned Anthropic legacy completion reply.
pub struct CannedClaudeLegacyReply {
    completion: String,
}

impl CannedClaudeLegacyReply {
    /// A reply carrying the given completion text.
    pub fn new(completion: impl Into<String>) -> Self {
        Self {
            completion: completion.into(),
        }
    }

    /// Render the wire JSON.
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "completion": self.completion,
            "stop_reason": "stop_sequence"
        })
        .to_string()
    }
}

/// Canned Titan text-generation reply.
pub struct CannedTitanReply {
    output_text: String,
    completion_reason: String,
}

impl CannedTitanReply {
    /// A reply carrying the given output text.
    pub fn new(output_text: impl Into<String>) -> Self {
        Self {
            output_text: output_text.into(),
            completion_reason: "FINISH".to_string(),
        }
    }

    /// Override the completion reason.
    pub fn with_completion_reason(mut self, reason: impl Into<String>) -> Self {
        self.completion_reason = reason.into();
        self
    }

    /// Render the wire JSON.
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "inputTextTokenCount": 3,
            "results": [{
                "outputText": self.output_text,
                "tokenCount": 5,
                "completionReason": self.completion_reason
            }]
        })
        .to_string()
    }
}
