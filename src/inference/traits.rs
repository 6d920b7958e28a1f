use async_trait::async_trait;

use crate::{error::Result, models::InferencePayload, normalizer::RawApiResponse};

/// Everything needed to request one image for one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceCall {
    pub slot: usize,
    pub model: String,
    pub payload: InferencePayload,
}

/// Performs one request/response exchange with the inference provider.
///
/// Implementations read the body fully before returning and report only
/// network-level problems as errors. HTTP error statuses come back as a
/// normal `RawApiResponse`.
#[async_trait]
pub trait InferenceTransport: Send + Sync {
    async fn send(&self, call: &InferenceCall) -> Result<RawApiResponse>;
}
