//! Error types for the Bedrock invocation adapter.
//!
//! Errors are grouped by the stage that produced them: building the provider
//! payload, sending it through the transport, or parsing the provider
//! response. The adapter converts all of them into a human-readable message
//! on the result; nothing escapes the `invoke` boundary.

use std::time::Duration;
use thiserror::Error;

/// Umbrella error for a single invocation attempt.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The logical request could not be translated into a provider payload.
    #[error("{0}")]
    Build(#[from] BuildError),

    /// The transport collaborator failed to deliver the payload.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// The provider response did not match the expected profile shape.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

/// The logical request cannot be turned into a provider payload.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A generation parameter is outside the accepted range.
    #[error("invalid parameter '{parameter}': {message}")]
    InvalidParameter {
        /// The offending parameter name.
        parameter: String,
        /// Why it was rejected.
        message: String,
    },

    /// The payload struct failed to serialize.
    #[error("failed to serialize request payload: {message}")]
    Serialize {
        /// Serializer error detail.
        message: String,
    },
}

/// The provider response shape didn't match the selected profile.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body was not valid JSON.
    #[error("malformed response body: {message}")]
    MalformedJson {
        /// Parser error detail.
        message: String,
    },

    /// A field the profile requires was absent or empty.
    #[error("response missing expected field '{field}'")]
    MissingField {
        /// The absent field, in the provider's naming.
        field: String,
    },

    /// The body was not valid UTF-8 (generic passthrough only).
    #[error("response body is not valid UTF-8")]
    NonUtf8,
}

/// Failure raised by the transport collaborator.
///
/// `Clone` so test doubles can replay a canned failure.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The connection could not be established or was dropped.
    #[error("connection failed: {message}")]
    Connection {
        /// Underlying error detail.
        message: String,
    },

    /// The request exceeded the configured timeout.
    #[error("request timed out after {duration:?}")]
    Timeout {
        /// The timeout that elapsed.
        duration: Duration,
    },

    /// Credentials could not be resolved or signed with.
    #[error("credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    /// The endpoint URL could not be parsed.
    #[error("invalid endpoint: {message}")]
    InvalidEndpoint {
        /// What was wrong with the URL.
        message: String,
    },

    /// The service answered with an error envelope.
    #[error("service error {status} ({code}): {message}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// AWS error code from `x-amzn-errortype`, or `UnknownError`.
        code: String,
        /// Message from the error body, if any.
        message: String,
        /// AWS request id from `x-amzn-requestid`, if present.
        request_id: Option<String>,
    },
}

/// Credential resolution errors.
#[derive(Debug, Clone, Error)]
pub enum CredentialsError {
    /// No provider in the chain produced credentials.
    #[error("no credentials could be loaded from any source")]
    NotFound,

    /// Session credentials are past their expiration.
    #[error("session credentials expired at {expiration}")]
    Expired {
        /// When the credentials expired.
        expiration: String,
    },

    /// Credentials were present but unusable.
    #[error("invalid credentials: {message}")]
    Invalid {
        /// Why they were rejected.
        message: String,
    },
}

/// Transport configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No region was supplied via builder or environment.
    #[error("missing region: set one via the builder or AWS_REGION")]
    MissingRegion,

    /// The region string does not look like an AWS region.
    #[error("'{region}' is not a valid AWS region")]
    InvalidRegion {
        /// The rejected region string.
        region: String,
    },
}
