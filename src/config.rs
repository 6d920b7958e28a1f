use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{GenerationError, Result};
use crate::ratio::DEFAULT_BASE_SIZE;

pub const DEFAULT_ENDPOINT: &str = "https://router.huggingface.co/hf-inference/models";

/// API token for the inference provider. Never printed by `Debug` or `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Replaces every occurrence of the secret in `text`.
    pub fn redact(&self, text: &str) -> String {
        if self.is_empty() {
            return text.to_string();
        }
        text.replace(&self.0, "[redacted]")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([redacted])")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub endpoint: String,
    pub api_key: Option<Credential>,
    pub base_size: u32,
    pub request_timeout: Option<Duration>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        InferenceConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            base_size: DEFAULT_BASE_SIZE,
            request_timeout: None,
        }
    }
}

impl InferenceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let endpoint = env::var("INFERENCE_ENDPOINT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let api_key = env::var("HF_API_KEY")
            .or_else(|_| env::var("HF_TOKEN"))
            .ok()
            .map(Credential::new)
            .filter(|key| !key.is_empty());
        let base_size = env::var("IMAGE_BASE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_BASE_SIZE);
        let request_timeout = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs);

        InferenceConfig {
            endpoint,
            api_key,
            base_size,
            request_timeout,
        }
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Credential::new(api_key));
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_base_size(mut self, base_size: u32) -> Self {
        self.base_size = base_size;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Checks the settings a batch cannot run without and returns the credential.
    pub fn validate(&self) -> Result<&Credential> {
        if self.endpoint.trim().is_empty() {
            return Err(GenerationError::configuration("Inference endpoint is required"));
        }
        if self.base_size == 0 {
            return Err(GenerationError::configuration("Base image size must be positive"));
        }
        self.api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| GenerationError::configuration("Missing API key"))
    }

    /// `{endpoint}/{model}` without doubled slashes.
    pub fn model_url(&self, model: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            model.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_never_formats_secret() {
        let key = Credential::new("hf_secret123");
        assert_eq!(format!("{:?}", key), "Credential([redacted])");
        assert_eq!(key.to_string(), "[redacted]");
        assert_eq!(
            key.redact("token hf_secret123 rejected"),
            "token [redacted] rejected"
        );
    }

    #[test]
    fn missing_key_is_configuration_error() {
        let err = InferenceConfig::new().validate().unwrap_err();
        assert!(matches!(err, GenerationError::Configuration(_)));

        let err = InferenceConfig::new()
            .with_credentials("   ")
            .validate()
            .unwrap_err();
        assert!(matches!(err, GenerationError::Configuration(_)));
    }

    #[test]
    fn builder_sets_fields() {
        let config = InferenceConfig::new()
            .with_credentials("hf_abc")
            .with_endpoint("http://localhost:9000/models/")
            .with_base_size(768)
            .with_timeout(Duration::from_secs(30));

        assert!(config.validate().is_ok());
        assert_eq!(config.base_size, 768);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(
            config.model_url("black-forest-labs/FLUX.1-dev"),
            "http://localhost:9000/models/black-forest-labs/FLUX.1-dev"
        );
    }

    #[test]
    fn debug_output_hides_key() {
        let config = InferenceConfig::new().with_credentials("hf_topsecret");
        assert!(!format!("{:?}", config).contains("hf_topsecret"));
    }
}
