use async_trait::async_trait;
use reqwest::{header, Client};

use crate::{
    config::{Credential, InferenceConfig},
    error::Result,
    inference::traits::{InferenceCall, InferenceTransport},
    normalizer::RawApiResponse,
};

/// Posts inference calls to `{endpoint}/{model}` with a bearer token.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    config: InferenceConfig,
    api_key: Credential,
}

impl HttpTransport {
    pub fn new(config: InferenceConfig) -> Result<Self> {
        let api_key = config.validate()?.clone();

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn build_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", self.api_key.expose()))
            .map_err(|_| {
                crate::error::GenerationError::configuration(
                    "API key contains characters not allowed in a header",
                )
            })?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        Ok(headers)
    }
}

#[async_trait]
impl InferenceTransport for HttpTransport {
    async fn send(&self, call: &InferenceCall) -> Result<RawApiResponse> {
        let url = self.config.model_url(&call.model);
        log::debug!("POST {} for slot {}", url, call.slot);

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&call.payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        log::debug!(
            "Slot {} answered {} ({}, {} bytes)",
            call.slot,
            status,
            content_type.as_deref().unwrap_or("no content-type"),
            body.len()
        );

        Ok(RawApiResponse {
            status,
            content_type,
            body,
        })
    }
}
