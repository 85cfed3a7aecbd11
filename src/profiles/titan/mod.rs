//! Amazon Titan text generation wire schema.

use crate::error::{BuildError, ParseError};
use crate::types::InvocationRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanPayload<'a> {
    input_text: &'a str,
    text_generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_token_count: u32,
    temperature: f32,
}

/// Build a Titan text-generation payload from a logical request.
pub(crate) fn build_payload(request: &InvocationRequest) -> Result<Vec<u8>, BuildError> {
    let payload = TitanPayload {
        input_text: request.prompt(),
        text_generation_config: GenerationConfig {
            max_token_count: request.max_tokens(),
            temperature: request.temperature(),
        },
    };
    serde_json::to_vec(&payload).map_err(|e| BuildError::Serialize {
        message: e.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct TitanResponse {
    #[serde(default)]
    results: Vec<TitanResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitanResult {
    output_text: String,
}

/// Extract the generated text from a Titan response (first result).
pub(crate) fn parse_response(body: &[u8]) -> Result<String, ParseError> {
    let response: TitanResponse =
        serde_json::from_slice(body).map_err(|e| ParseError::MalformedJson {
            message: e.to_string(),
        })?;

    response
        .results
        .into_iter()
        .next()
        .map(|r| r.output_text)
        .ok_or_else(|| ParseError::MissingField {
            field: "results".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_nests_generation_config() {
        let request = InvocationRequest::new("amazon.titan-text-express-v1", "Hello")
            .with_max_tokens(100)
            .with_temperature(0.5);
        let payload = build_payload(&request).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();

        assert_eq!(json["inputText"], "Hello");
        assert_eq!(json["textGenerationConfig"]["maxTokenCount"], 100);
        assert_eq!(json["textGenerationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn response_extracts_first_output_text() {
        let body = br#"{"results":[{"outputText":"ok"}]}"#;
        assert_eq!(parse_response(body).unwrap(), "ok");
    }

    #[test]
    fn response_tolerates_extra_result_fields() {
        let body = br#"{
            "inputTextTokenCount": 3,
            "results": [{"outputText": "ok", "tokenCount": 1, "completionReason": "FINISH"}]
        }"#;
        assert_eq!(parse_response(body).unwrap(), "ok");
    }

    #[test]
    fn response_without_results_is_an_error() {
        let err = parse_response(br#"{"results":[]}"#).unwrap_err();
        assert!(err.to_string().contains("results"));
    }

    #[test]
    fn response_rejects_malformed_json() {
        assert!(parse_response(b"<html>").is_err());
    }
}
