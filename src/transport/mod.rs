//! The inference transport: the adapter's one collaborator.
//!
//! The [`Transport`] trait owns everything the adapter does not: endpoint
//! resolution, authentication, connection pooling, timeouts.
//! [`BedrockRuntimeTransport`] is the production implementation over the
//! Bedrock runtime HTTP API with Signature V4 auth.

use crate::config::TransportConfig;
use crate::credentials::{ChainCredentialsProvider, CredentialsProvider, StaticCredentialsProvider};
use crate::error::{ConfigError, TransportError};
use crate::signing::SigV4Signer;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reqwest::Client as HttpClient;
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

/// Anything able to deliver a payload to a model endpoint and return the
/// response body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `payload` to the endpoint identified by `model_id`.
    async fn send(&self, model_id: &str, payload: &[u8]) -> Result<Bytes, TransportError>;
}

/// HTTP transport for the Bedrock runtime `InvokeModel` API.
pub struct BedrockRuntimeTransport {
    config: TransportConfig,
    http: HttpClient,
    signer: SigV4Signer,
    credentials: Arc<dyn CredentialsProvider>,
}

impl BedrockRuntimeTransport {
    /// Create a transport from explicit configuration and credentials.
    pub fn new(
        config: TransportConfig,
        credentials: Arc<dyn CredentialsProvider>,
    ) -> Result<Self, TransportError> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Connection {
                message: format!("failed to create HTTP client: {}", e),
            })?;
        let signer = SigV4Signer::bedrock_runtime(&config.region);

        Ok(Self {
            config,
            http,
            signer,
            credentials,
        })
    }

    /// Create a transport builder.
    pub fn builder() -> BedrockRuntimeTransportBuilder {
        BedrockRuntimeTransportBuilder::default()
    }

    fn invoke_url(&self, model_id: &str) -> Result<Url, TransportError> {
        let raw = format!(
            "{}/model/{}/invoke",
            self.config.runtime_endpoint(),
            model_id
        );
        Url::parse(&raw).map_err(|e| TransportError::InvalidEndpoint {
            message: format!("{}: {}", raw, e),
        })
    }

    /// Turn a non-success response into a service error, pulling the AWS
    /// error code and request id out of the response headers.
    async fn service_error(response: reqwest::Response) -> TransportError {
        let status = response.status().as_u16();
        let code = response
            .headers()
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            // Header values look like "ValidationException:http://..."
            .map(|v| v.split(':').next().unwrap_or(v).to_string())
            .unwrap_or_else(|| "UnknownError".to_string());
        let request_id = response
            .headers()
            .get("x-amzn-requestid")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or(body);

        TransportError::Service {
            status,
            code,
            message,
            request_id,
        }
    }
}

#[async_trait]
impl Transport for BedrockRuntimeTransport {
    #[instrument(skip(self, payload), fields(model_id = %model_id))]
    async fn send(&self, model_id: &str, payload: &[u8]) -> Result<Bytes, TransportError> {
        let url = self.invoke_url(model_id)?;
        let credentials = self.credentials.credentials().await?;

        let headers = self.signer.sign(
            "POST",
            &url,
            &[
                ("content-type", "application/json"),
                ("accept", "application/json"),
            ],
            payload,
            &credentials,
            Utc::now(),
        );

        let mut request = self.http.post(url.as_str()).body(payload.to_vec());
        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }

        debug!(url = %url, payload_size = payload.len(), "sending invoke request");

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    duration: self.config.timeout,
                }
            } else {
                TransportError::Connection {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), "invoke response received");

        if !status.is_success() {
            return Err(Self::service_error(response).await);
        }

        response.bytes().await.map_err(|e| TransportError::Connection {
            message: format!("failed to read response body: {}", e),
        })
    }
}

impl std::fmt::Debug for BedrockRuntimeTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BedrockRuntimeTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`BedrockRuntimeTransport`].
#[derive(Default)]
pub struct BedrockRuntimeTransportBuilder {
    config: Option<TransportConfig>,
    credentials: Option<Arc<dyn CredentialsProvider>>,
}

impl BedrockRuntimeTransportBuilder {
    /// Set the transport configuration.
    pub fn config(mut self, config: TransportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the credentials provider.
    pub fn credentials_provider(mut self, provider: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(provider);
        self
    }

    /// Use explicit static credentials.
    pub fn credentials(mut self, credentials: crate::credentials::AwsCredentials) -> Self {
        self.credentials = Some(Arc::new(StaticCredentialsProvider::new(credentials)));
        self
    }

    /// Fill configuration and credentials from the environment.
    pub fn from_env(mut self) -> Self {
        if self.config.is_none() {
            if let Ok(config) = TransportConfig::builder().from_env().build() {
                self.config = Some(config);
            }
        }
        if self.credentials.is_none() {
            self.credentials = Some(Arc::new(ChainCredentialsProvider::new()));
        }
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<BedrockRuntimeTransport, TransportError> {
        let config = self.config.ok_or(TransportError::InvalidEndpoint {
            message: ConfigError::MissingRegion.to_string(),
        })?;
        let credentials = self
            .credentials
            .unwrap_or_else(|| Arc::new(ChainCredentialsProvider::new()));

        BedrockRuntimeTransport::new(config, credentials)
    }
}
