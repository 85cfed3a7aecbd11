//! Configuration for the Bedrock runtime transport.

use crate::error::ConfigError;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Transport configuration: region, endpoint override, timeout.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// AWS region.
    pub region: String,
    /// Custom endpoint URL (local stacks, tests).
    pub endpoint_url: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl TransportConfig {
    /// Create a config builder.
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::default()
    }

    /// The Bedrock runtime endpoint for this configuration.
    pub fn runtime_endpoint(&self) -> String {
        match &self.endpoint_url {
            Some(custom) => custom.clone(),
            None => format!("https://bedrock-runtime.{}.amazonaws.com", self.region),
        }
    }
}

/// Builder for [`TransportConfig`].
#[derive(Debug, Default)]
pub struct TransportConfigBuilder {
    region: Option<String>,
    endpoint_url: Option<String>,
    timeout: Option<Duration>,
}

impl TransportConfigBuilder {
    /// Set the AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a custom endpoint URL.
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Fill unset values from the environment: `AWS_REGION` /
    /// `AWS_DEFAULT_REGION` and `AWS_ENDPOINT_URL_BEDROCK` /
    /// `AWS_ENDPOINT_URL`.
    pub fn from_env(mut self) -> Self {
        if self.region.is_none() {
            self.region = std::env::var("AWS_REGION")
                .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
                .ok();
        }
        if self.endpoint_url.is_none() {
            self.endpoint_url = std::env::var("AWS_ENDPOINT_URL_BEDROCK")
                .or_else(|_| std::env::var("AWS_ENDPOINT_URL"))
                .ok();
        }
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<TransportConfig, ConfigError> {
        let region = self.region.ok_or(ConfigError::MissingRegion)?;

        if !is_valid_region(&region) {
            return Err(ConfigError::InvalidRegion { region });
        }

        Ok(TransportConfig {
            region,
            endpoint_url: self.endpoint_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}

/// Loose format check: geographic prefix plus at least two more segments.
fn is_valid_region(region: &str) -> bool {
    let parts: Vec<&str> = region.split('-').collect();
    if parts.len() < 3 {
        // Allow local test endpoints.
        return region.starts_with("local") || region == "localhost";
    }

    const PREFIXES: &[&str] = &["us", "eu", "ap", "sa", "ca", "me", "af", "cn", "il"];
    PREFIXES.contains(&parts[0])
}

/// Regions known to offer Bedrock.
pub const BEDROCK_REGIONS: &[&str] = &[
    "us-east-1",
    "us-west-2",
    "eu-west-1",
    "eu-west-3",
    "eu-central-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
];
