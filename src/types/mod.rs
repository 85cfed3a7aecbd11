//! Request and result types for model invocation.

use crate::error::BuildError;
use serde::Serialize;

/// Default token budget when the caller does not set one.
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// Default sampling temperature when the caller does not set one.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A logical invocation request, independent of any provider wire format.
///
/// Constructed with [`InvocationRequest::new`] and the consuming `with_*`
/// setters, then treated as immutable. Parameter bounds are checked by
/// [`validate`](InvocationRequest::validate) before any payload is built.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationRequest {
    model_id: String,
    prompt: String,
    max_tokens: u32,
    temperature: f32,
}

impl InvocationRequest {
    /// Create a request with default generation parameters.
    pub fn new(model_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Set the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature (0.0 - 1.0).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// The model identifier this request targets.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// The prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The token budget.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// The sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Check parameter bounds. Runs before profile selection so no payload
    /// is ever built from an out-of-range request.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.max_tokens == 0 {
            return Err(BuildError::InvalidParameter {
                parameter: "max_tokens".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if !self.temperature.is_finite() || !(0.0..=1.0).contains(&self.temperature) {
            return Err(BuildError::InvalidParameter {
                parameter: "temperature".to_string(),
                message: format!("{} is outside the range 0.0..=1.0", self.temperature),
            });
        }
        Ok(())
    }
}

/// The uniform outcome of an invocation.
///
/// Exactly one of `text` and `error` is populated; the constructors are the
/// only way to build a value, so the invariant cannot be violated.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl InvocationResult {
    /// A successful result carrying generated text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            error: None,
        }
    }

    /// A failed result carrying a human-readable message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            text: None,
            error: Some(message.into()),
        }
    }

    /// The generated text, if the invocation succeeded.
    pub fn as_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The error message, if the invocation failed.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether this result carries an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn request_defaults() {
        let request = InvocationRequest::new("amazon.titan-text-express-v1", "Hello");
        assert_eq!(request.model_id(), "amazon.titan-text-express-v1");
        assert_eq!(request.prompt(), "Hello");
        assert_eq!(request.max_tokens(), DEFAULT_MAX_TOKENS);
        assert_eq!(request.temperature(), DEFAULT_TEMPERATURE);
    }

    #[test]
    fn request_builder_setters() {
        let request = InvocationRequest::new("anthropic.claude-v2", "Hi")
            .with_max_tokens(128)
            .with_temperature(0.2);
        assert_eq!(request.max_tokens(), 128);
        assert_eq!(request.temperature(), 0.2);
    }

    #[test]
    fn validate_accepts_defaults() {
        let request = InvocationRequest::new("anthropic.claude-v2", "Hi");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_max_tokens() {
        let request = InvocationRequest::new("anthropic.claude-v2", "Hi").with_max_tokens(0);
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }

    #[test_case(-0.1 ; "below range")]
    #[test_case(1.5 ; "above range")]
    #[test_case(f32::NAN ; "not a number")]
    fn validate_rejects_bad_temperature(temperature: f32) {
        let request =
            InvocationRequest::new("anthropic.claude-v2", "Hi").with_temperature(temperature);
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test_case(0.0 ; "lower bound")]
    #[test_case(1.0 ; "upper bound")]
    fn validate_accepts_boundary_temperature(temperature: f32) {
        let request =
            InvocationRequest::new("anthropic.claude-v2", "Hi").with_temperature(temperature);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn result_text_and_error_are_exclusive() {
        let ok = InvocationResult::text("hello");
        assert_eq!(ok.as_text(), Some("hello"));
        assert!(ok.error_message().is_none());
        assert!(!ok.is_error());

        let failed = InvocationResult::error("boom");
        assert!(failed.as_text().is_none());
        assert_eq!(failed.error_message(), Some("boom"));
        assert!(failed.is_error());
    }

    #[test]
    fn result_serializes_only_populated_field() {
        let ok = serde_json::to_value(InvocationResult::text("hi")).unwrap();
        assert_eq!(ok, serde_json::json!({"text": "hi"}));

        let failed = serde_json::to_value(InvocationResult::error("boom")).unwrap();
        assert_eq!(failed, serde_json::json!({"error": "boom"}));
    }
}
