//! Model Invocation Adapter for AWS Bedrock
//!
//! One uniform call over heterogeneous provider request/response schemas.
//! The adapter takes a logical request (model identifier, prompt, generation
//! parameters) and an injected transport, builds the provider-specific
//! payload, and parses the provider-specific response into a uniform result.
//!
//! # Features
//!
//! - **Provider profiles**: Anthropic messages API (Claude 3+), Anthropic
//!   legacy completions, Amazon Titan text, and a generic passthrough for
//!   everything else — selected by a fixed-priority pattern table
//! - **Injected transport**: the adapter never touches credentials, regions,
//!   or connections; [`BedrockRuntimeTransport`] covers the production case
//!   with AWS Signature V4 auth
//! - **Uniform results**: every invocation returns text or a human-readable
//!   error message, never a raised error
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use bedrock_invoke::{BedrockRuntimeTransport, InvocationAdapter, InvocationRequest};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Region and credentials from the environment
//!     let transport = BedrockRuntimeTransport::builder().from_env().build()?;
//!     let adapter = InvocationAdapter::new(Arc::new(transport));
//!
//!     let request = InvocationRequest::new(
//!         "anthropic.claude-3-5-sonnet-20240620-v1:0",
//!         "Explain how machine learning works in simple terms.",
//!     )
//!     .with_max_tokens(512)
//!     .with_temperature(0.7);
//!
//!     let result = adapter.invoke(&request).await;
//!     match result.as_text() {
//!         Some(text) => println!("Response: {text}"),
//!         None => eprintln!("Error: {}", result.error_message().unwrap_or("unknown")),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Testing without AWS
//!
//! ```rust
//! use bedrock_invoke::mocks::{CannedTitanReply, MockTransport};
//! use bedrock_invoke::{InvocationAdapter, InvocationRequest};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let transport = Arc::new(MockTransport::replying_with(
//!     CannedTitanReply::new("ok").to_json(),
//! ));
//! let adapter = InvocationAdapter::new(transport);
//!
//! let request = InvocationRequest::new("amazon.titan-text-express-v1", "Hello");
//! let result = adapter.invoke(&request).await;
//! assert_eq!(result.as_text(), Some("ok"));
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod adapter;
pub mod config;
pub mod credentials;
pub mod error;
pub mod mocks;
pub mod profiles;
pub mod signing;
pub mod transport;
pub mod types;

// Re-export main types at crate root

// Adapter
pub use adapter::InvocationAdapter;

// Configuration
pub use config::{TransportConfig, TransportConfigBuilder, BEDROCK_REGIONS};

// Credentials
pub use credentials::{
    AwsCredentials, ChainCredentialsProvider, CredentialsProvider, EnvCredentialsProvider,
    ProfileCredentialsProvider, StaticCredentialsProvider,
};

// Errors
pub use error::{
    BuildError, ConfigError, CredentialsError, InvokeError, ParseError, TransportError,
};

// Profiles
pub use profiles::{ProfileId, ProviderProfile};

// Signing
pub use signing::{SigV4Signer, SignedHeaders};

// Transport
pub use transport::{BedrockRuntimeTransport, BedrockRuntimeTransportBuilder, Transport};

// Types
pub use types::{InvocationRequest, InvocationResult};

/// Create an adapter whose transport is configured from the environment.
///
/// Reads `AWS_REGION` / `AWS_DEFAULT_REGION` for the region,
/// `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN` (or
/// the shared credentials file) for credentials, and
/// `AWS_ENDPOINT_URL_BEDROCK` / `AWS_ENDPOINT_URL` for custom endpoints.
///
/// # Example
///
/// ```rust,no_run
/// let adapter = bedrock_invoke::create_adapter_from_env()?;
/// # Ok::<(), bedrock_invoke::TransportError>(())
/// ```
pub fn create_adapter_from_env() -> Result<InvocationAdapter, TransportError> {
    use std::sync::Arc;

    let transport = BedrockRuntimeTransport::builder().from_env().build()?;
    Ok(InvocationAdapter::new(Arc::new(transport)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_exports_are_reachable() {
        let _ = std::any::type_name::<InvocationAdapter>();
        let _ = std::any::type_name::<InvocationRequest>();
        let _ = std::any::type_name::<InvocationResult>();
        let _ = std::any::type_name::<ProviderProfile>();
        let _ = std::any::type_name::<BedrockRuntimeTransport>();
        let _ = std::any::type_name::<InvokeError>();
    }

    #[test]
    fn profile_selection_covers_known_providers() {
        assert_eq!(
            ProviderProfile::for_model("anthropic.claude-3-5-sonnet-20240620-v1:0").id(),
            ProfileId::ClaudeMessages
        );
        assert_eq!(
            ProviderProfile::for_model("anthropic.claude-v2").id(),
            ProfileId::ClaudeLegacy
        );
        assert_eq!(
            ProviderProfile::for_model("amazon.titan-text-express-v1").id(),
            ProfileId::TitanText
        );
        assert_eq!(
            ProviderProfile::for_model("unknown.model-v1").id(),
            ProfileId::Generic
        );
    }
}
