//! Fans one generation request out into independent per-slot inference calls.
//!
//! All slot futures are polled from the caller's task through a
//! [`FuturesUnordered`], so they only suspend on the transport exchange and
//! nothing is spawned. A slot that fails or stalls has no effect on its
//! siblings; the stream ends once every slot has settled.

use std::pin::Pin;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, Stream, StreamExt};
use uuid::Uuid;

use crate::{
    config::{Credential, InferenceConfig},
    error::{GenerationError, Result},
    gallery::GalleryReporter,
    inference::{HttpTransport, InferenceCall, InferenceTransport},
    logger,
    models::{BatchSummary, GenerationRequest, InferencePayload, SlotOutcome},
    normalizer, ratio,
};

/// Maximum length of a failure reason handed to reporters.
const MAX_REASON_CHARS: usize = 300;

pub type SlotStream<'a> = Pin<Box<dyn Stream<Item = SlotOutcome> + Send + 'a>>;

#[derive(Clone)]
pub struct RequestOrchestrator {
    transport: Arc<dyn InferenceTransport>,
    credential: Credential,
    base_size: u32,
}

impl RequestOrchestrator {
    /// Builds an orchestrator backed by the HTTP transport.
    ///
    /// Fails with [`GenerationError::Configuration`] when the credential is
    /// missing, before any request can be issued.
    pub fn new(config: InferenceConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.clone())?;
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(
        config: InferenceConfig,
        transport: Arc<dyn InferenceTransport>,
    ) -> Result<Self> {
        let credential = config.validate()?.clone();
        Ok(Self {
            transport,
            credential,
            base_size: config.base_size,
        })
    }

    /// Starts every slot of `request` and yields outcomes as they settle.
    ///
    /// The stream is lazy: nothing is sent until it is first polled. It
    /// yields exactly `request.count` items with distinct indices, in no
    /// particular order.
    pub fn run(&self, request: GenerationRequest) -> SlotStream<'_> {
        let dimensions = ratio::resolve(&request.ratio_text, self.base_size);
        log::info!(
            "Generating {} image(s) with model {} at {}",
            request.count,
            request.model,
            dimensions
        );

        let payload = InferencePayload::new(&request.prompt, dimensions);
        let slots: FuturesUnordered<_> = (0..request.count)
            .map(|slot| {
                self.run_slot(InferenceCall {
                    slot,
                    model: request.model.clone(),
                    payload: payload.clone(),
                })
            })
            .collect();

        Box::pin(slots)
    }

    /// Drives a batch to completion, forwarding each outcome to `reporter`
    /// and then reporting the summary once.
    pub async fn generate_into<R>(
        &self,
        request: GenerationRequest,
        reporter: &mut R,
    ) -> BatchSummary
    where
        R: GalleryReporter + ?Sized,
    {
        let batch_id = Uuid::new_v4().simple().to_string()[..8].to_string();
        let requested = request.count;
        let timer = logger::timer(&format!("Batch {}", batch_id));

        let mut succeeded = 0;
        let mut failed = 0;
        let mut outcomes = self.run(request);
        while let Some(outcome) = outcomes.next().await {
            if outcome.is_success() {
                succeeded += 1;
            } else {
                failed += 1;
            }
            reporter.slot_settled(outcome);
        }

        let summary = BatchSummary {
            batch_id,
            requested,
            succeeded,
            failed,
            elapsed: timer.stop(),
        };
        log::info!(
            "Batch {} done: {} succeeded, {} failed",
            summary.batch_id,
            summary.succeeded,
            summary.failed
        );
        reporter.batch_finished(&summary);
        summary
    }

    /// Runs a batch and returns all outcomes sorted by slot index.
    pub async fn collect(&self, request: GenerationRequest) -> (Vec<SlotOutcome>, BatchSummary) {
        let mut outcomes = Vec::with_capacity(request.count);
        let summary = self.generate_into(request, &mut outcomes).await;
        outcomes.sort_by_key(SlotOutcome::index);
        (outcomes, summary)
    }

    async fn run_slot(&self, call: InferenceCall) -> SlotOutcome {
        let index = call.slot;
        let result = match self.transport.send(&call).await {
            Ok(response) => normalizer::normalize(response).map_err(GenerationError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(image) => {
                let kind = if image.is_local() { "binary" } else { "embedded" };
                log::debug!("Slot {} ready ({})", index, kind);
                SlotOutcome::Success { index, image }
            }
            Err(e) => {
                let reason = self.failure_reason(&e);
                log::warn!("Slot {} failed: {}", index, reason);
                SlotOutcome::Failure { index, reason }
            }
        }
    }

    fn failure_reason(&self, error: &GenerationError) -> String {
        let redacted = self.credential.redact(&error.to_string());
        if redacted.chars().count() <= MAX_REASON_CHARS {
            return redacted;
        }
        let mut truncated: String = redacted.chars().take(MAX_REASON_CHARS).collect();
        truncated.push('…');
        truncated
    }
}
