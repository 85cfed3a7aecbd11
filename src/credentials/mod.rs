//! AWS credential resolution for the Bedrock transport.
//!
//! Providers follow the standard AWS source order: explicit static values,
//! environment variables, then the shared credentials file. The chain caches
//! whichever source answered and refreshes shortly before expiry.

use crate::error::CredentialsError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, trace};

/// An AWS access key pair, optionally temporary.
#[derive(Debug, Clone)]
pub struct AwsCredentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
    expiration: Option<DateTime<Utc>>,
}

impl AwsCredentials {
    /// Long-term credentials.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
            expiration: None,
        }
    }

    /// Credentials with a session token.
    pub fn with_session_token(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            session_token: Some(session_token.into()),
            ..Self::new(access_key_id, secret_access_key)
        }
    }

    /// Temporary credentials with a known expiration.
    pub fn temporary(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
        expiration: DateTime<Utc>,
    ) -> Self {
        Self {
            expiration: Some(expiration),
            ..Self::with_session_token(access_key_id, secret_access_key, session_token)
        }
    }

    /// The access key id.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// The secret access key.
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// The session token, if any.
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Whether the credentials are past their expiration.
    pub fn is_expired(&self) -> bool {
        self.expiration.map(|exp| exp <= Utc::now()).unwrap_or(false)
    }

    /// Whether the credentials expire within the given window.
    pub fn expires_within(&self, window: Duration) -> bool {
        self.expiration
            .map(|exp| exp <= Utc::now() + window)
            .unwrap_or(false)
    }
}

/// A source of AWS credentials.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Resolve credentials.
    async fn credentials(&self) -> Result<AwsCredentials, CredentialsError>;

    /// Source name, for logging.
    fn name(&self) -> &'static str;
}

/// Fixed credentials supplied at construction.
pub struct StaticCredentialsProvider {
    credentials: AwsCredentials,
}

impl StaticCredentialsProvider {
    /// Wrap explicit credentials.
    pub fn new(credentials: AwsCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialsProvider for StaticCredentialsProvider {
    async fn credentials(&self) -> Result<AwsCredentials, CredentialsError> {
        if self.credentials.is_expired() {
            return Err(CredentialsError::Expired {
                expiration: self
                    .credentials
                    .expiration
                    .map(|e| e.to_rfc3339())
                    .unwrap_or_default(),
            });
        }
        Ok(self.credentials.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Reads `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`.
#[derive(Default)]
pub struct EnvCredentialsProvider;

impl EnvCredentialsProvider {
    /// Create the provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CredentialsProvider for EnvCredentialsProvider {
    async fn credentials(&self) -> Result<AwsCredentials, CredentialsError> {
        let access_key =
            std::env::var("AWS_ACCESS_KEY_ID").map_err(|_| CredentialsError::NotFound)?;
        let secret_key =
            std::env::var("AWS_SECRET_ACCESS_KEY").map_err(|_| CredentialsError::NotFound)?;

        Ok(match std::env::var("AWS_SESSION_TOKEN") {
            Ok(token) => AwsCredentials::with_session_token(access_key, secret_key, token),
            Err(_) => AwsCredentials::new(access_key, secret_key),
        })
    }

    fn name(&self) -> &'static str {
        "environment"
    }
}

/// Reads a profile from the shared credentials file (`~/.aws/credentials`).
pub struct ProfileCredentialsProvider {
    profile: String,
}

impl ProfileCredentialsProvider {
    /// Use `AWS_PROFILE` or fall back to `default`.
    pub fn new() -> Self {
        Self {
            profile: std::env::var("AWS_PROFILE").unwrap_or_else(|_| "default".to_string()),
        }
    }

    /// Use a specific profile name.
    pub fn with_profile(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
        }
    }

    fn credentials_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("AWS_SHARED_CREDENTIALS_FILE") {
            return Some(PathBuf::from(path));
        }
        dirs::home_dir().map(|home| home.join(".aws").join("credentials"))
    }

    fn parse(&self, content: &str) -> Result<AwsCredentials, CredentialsError> {
        let header = format!("[{}]", self.profile);
        let mut in_profile = false;
        let mut access_key = None;
        let mut secret_key = None;
        let mut session_token = None;

        for line in content.lines().map(str::trim) {
            if line.starts_with('[') {
                in_profile = line == header;
            } else if in_profile {
                if let Some((key, value)) = line.split_once('=') {
                    match key.trim() {
                        "aws_access_key_id" => access_key = Some(value.trim().to_string()),
                        "aws_secret_access_key" => secret_key = Some(value.trim().to_string()),
                        "aws_session_token" => session_token = Some(value.trim().to_string()),
                        _ => {}
                    }
                }
            }
        }

        match (access_key, secret_key, session_token) {
            (Some(ak), Some(sk), Some(token)) => {
                Ok(AwsCredentials::with_session_token(ak, sk, token))
            }
            (Some(ak), Some(sk), None) => Ok(AwsCredentials::new(ak, sk)),
            _ => Err(CredentialsError::NotFound),
        }
    }
}

impl Default for ProfileCredentialsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialsProvider for ProfileCredentialsProvider {
    async fn credentials(&self) -> Result<AwsCredentials, CredentialsError> {
        let path = Self::credentials_path().ok_or(CredentialsError::NotFound)?;
        if !path.exists() {
            return Err(CredentialsError::NotFound);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| CredentialsError::Invalid {
            message: format!("failed to read credentials file: {}", e),
        })?;

        self.parse(&content)
    }

    fn name(&self) -> &'static str {
        "profile"
    }
}

/// Refresh this long before cached credentials expire.
const REFRESH_WINDOW_SECONDS: i64 = 300;

/// Tries each provider in order and caches the first success.
pub struct ChainCredentialsProvider {
    providers: Vec<Arc<dyn CredentialsProvider>>,
    cached: RwLock<Option<AwsCredentials>>,
}

impl ChainCredentialsProvider {
    /// The default chain: environment, then shared credentials file.
    pub fn new() -> Self {
        Self::with_providers(vec![
            Arc::new(EnvCredentialsProvider::new()),
            Arc::new(ProfileCredentialsProvider::new()),
        ])
    }

    /// A chain over custom providers.
    pub fn with_providers(providers: Vec<Arc<dyn CredentialsProvider>>) -> Self {
        Self {
            providers,
            cached: RwLock::new(None),
        }
    }

    async fn resolve(&self) -> Result<AwsCredentials, CredentialsError> {
        let mut last_error = None;
        for provider in &self.providers {
            trace!(provider = provider.name(), "trying credentials provider");
            match provider.credentials().await {
                Ok(creds) => {
                    debug!(provider = provider.name(), "credentials resolved");
                    return Ok(creds);
                }
                Err(e) => last_error = Some(e),
            }
        }
        Err(last_error.unwrap_or(CredentialsError::NotFound))
    }
}

impl Default for ChainCredentialsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialsProvider for ChainCredentialsProvider {
    async fn credentials(&self) -> Result<AwsCredentials, CredentialsError> {
        {
            let cache = self.cached.read();
            if let Some(creds) = cache.as_ref() {
                if !creds.expires_within(Duration::seconds(REFRESH_WINDOW_SECONDS)) {
                    return Ok(creds.clone());
                }
            }
        }

        let creds = self.resolve().await?;
        *self.cached.write() = Some(creds.clone());
        Ok(creds)
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}

impl std::fmt::Debug for ChainCredentialsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainCredentialsProvider")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
