//! Prompt-to-gallery image generation.
//!
//! [`RequestOrchestrator`] turns one [`GenerationRequest`] into `count`
//! concurrent calls against a text-to-image inference API and reports a
//! [`SlotOutcome`] per image, so a failed image never takes the others down.

pub mod config;
pub mod error;
pub mod gallery;
pub mod inference;
pub mod logger;
pub mod models;
pub mod normalizer;
pub mod orchestrator;
pub mod ratio;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Credential, InferenceConfig};
pub use error::{GenerationError, NormalizationError, Result};
pub use gallery::{Gallery, GalleryReporter, SlotState};
pub use inference::{HttpTransport, InferenceCall, InferenceTransport};
pub use models::*;
pub use normalizer::{normalize, RawApiResponse};
pub use orchestrator::{RequestOrchestrator, SlotStream};
pub use ratio::{normalize_ratio, resolve};
