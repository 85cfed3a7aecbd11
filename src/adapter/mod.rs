//! The Model Invocation Adapter.
//!
//! One uniform call over heterogeneous provider schemas: validate the
//! logical request, pick the provider profile, build the payload, hand it to
//! the injected transport, and parse the text back out. Every failure along
//! the way becomes a message on the result; nothing is raised past `invoke`.

use crate::error::InvokeError;
use crate::profiles::ProviderProfile;
use crate::transport::Transport;
use crate::types::{InvocationRequest, InvocationResult};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Adapts logical invocation requests onto provider-specific wire schemas.
///
/// Holds no state beyond the injected transport; a single adapter can be
/// shared freely across tasks.
pub struct InvocationAdapter {
    transport: Arc<dyn Transport>,
}

impl InvocationAdapter {
    /// Create an adapter over the given transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Invoke a model and return the uniform result.
    ///
    /// Build, transport, and parse failures are all converted into
    /// [`InvocationResult::error`]; this method never fails.
    #[instrument(skip(self, request), fields(model_id = %request.model_id()))]
    pub async fn invoke(&self, request: &InvocationRequest) -> InvocationResult {
        match self.run(request).await {
            Ok(text) => InvocationResult::text(text),
            Err(e) => {
                warn!(error = %e, "invocation failed");
                InvocationResult::error(e.to_string())
            }
        }
    }

    async fn run(&self, request: &InvocationRequest) -> Result<String, InvokeError> {
        request.validate()?;

        let profile = ProviderProfile::for_model(request.model_id());
        debug!(profile = %profile.id(), "selected provider profile");

        let payload = profile.build_payload(request)?;
        debug!(payload_size = payload.len(), "built provider payload");

        let body = self.transport.send(request.model_id(), &payload).await?;
        let text = profile.parse_text(&body)?;
        Ok(text)
    }
}

impl std::fmt::Debug for InvocationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationAdapter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::mocks::{CannedClaudeReply, CannedTitanReply, MockTransport};

    fn adapter_with(transport: MockTransport) -> (InvocationAdapter, Arc<MockTransport>) {
        let transport = Arc::new(transport);
        (InvocationAdapter::new(transport.clone()), transport)
    }

    #[tokio::test]
    async fn claude_messages_round_trip() {
        let (adapter, transport) = adapter_with(MockTransport::replying_with(
            CannedClaudeReply::new("hello").to_json(),
        ));

        let request =
            InvocationRequest::new("anthropic.claude-3-5-sonnet-20240620-v1:0", "hi");
        let result = adapter.invoke(&request).await;

        assert_eq!(result.as_text(), Some("hello"));

        // The transport saw the messages-API payload.
        let call = transport.last_call().unwrap();
        assert_eq!(call.model_id, "anthropic.claude-3-5-sonnet-20240620-v1:0");
        let payload: serde_json::Value = serde_json::from_slice(&call.payload).unwrap();
        assert_eq!(payload["messages"][0]["role"], "user");
        assert_eq!(payload["messages"][0]["content"], "hi");
        assert_eq!(payload["anthropic_version"], "bedrock-2023-05-31");
    }

    #[tokio::test]
    async fn titan_round_trip() {
        let (adapter, transport) =
            adapter_with(MockTransport::replying_with(CannedTitanReply::new("ok").to_json()));

        let request = InvocationRequest::new("amazon.titan-text-express-v1", "Hello");
        let result = adapter.invoke(&request).await;

        assert_eq!(result.as_text(), Some("ok"));

        let call = transport.last_call().unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&call.payload).unwrap();
        assert_eq!(payload["inputText"], "Hello");
        assert!(payload["textGenerationConfig"]["maxTokenCount"].is_number());
    }

    #[tokio::test]
    async fn unrecognized_model_uses_generic_profile() {
        let (adapter, transport) =
            adapter_with(MockTransport::replying_with(r#"{"generation":"fine"}"#));

        let request = InvocationRequest::new("meta.llama3-70b-instruct-v1:0", "Hello");
        let result = adapter.invoke(&request).await;

        assert_eq!(result.as_text(), Some("fine"));
        let payload: serde_json::Value =
            serde_json::from_slice(&transport.last_call().unwrap().payload).unwrap();
        assert_eq!(payload["prompt"], "Hello");
    }

    #[tokio::test]
    async fn transport_failure_becomes_error_result() {
        let (adapter, _) = adapter_with(MockTransport::failing_with(TransportError::Connection {
            message: "connection refused".into(),
        }));

        let request = InvocationRequest::new("anthropic.claude-v2", "Hi");
        let result = adapter.invoke(&request).await;

        assert!(result.is_error());
        assert!(result.error_message().unwrap().contains("connection refused"));
        assert!(result.as_text().is_none());
    }

    #[tokio::test]
    async fn invalid_request_is_rejected_before_any_call() {
        let (adapter, transport) = adapter_with(MockTransport::replying_with("{}"));

        let request = InvocationRequest::new("anthropic.claude-v2", "Hi").with_max_tokens(0);
        let result = adapter.invoke(&request).await;

        assert!(result.is_error());
        assert!(result.error_message().unwrap().contains("max_tokens"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn unexpected_response_shape_becomes_error_result() {
        let (adapter, _) = adapter_with(MockTransport::replying_with(r#"{"unexpected":true}"#));

        let request =
            InvocationRequest::new("anthropic.claude-3-sonnet-20240229-v1:0", "Hi");
        let result = adapter.invoke(&request).await;

        assert!(result.is_error());
        assert!(result.error_message().unwrap().contains("content"));
    }

    #[tokio::test]
    async fn adapter_is_shareable_across_tasks() {
        let (adapter, _) =
            adapter_with(MockTransport::replying_with(CannedTitanReply::new("ok").to_json()));
        let adapter = Arc::new(adapter);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let adapter = adapter.clone();
                tokio::spawn(async move {
                    let request = InvocationRequest::new("amazon.titan-text-express-v1", "Hi");
                    adapter.invoke(&request).await
                })
            })
            .collect();

        for handle in handles {
            let result = handle.await.unwrap();
            assert_eq!(result.as_text(), Some("ok"));
        }
    }
}
