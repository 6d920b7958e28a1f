//! Consumers of slot outcomes.
//!
//! A [`GalleryReporter`] sees every outcome once, in settle order, followed by
//! exactly one [`GalleryReporter::batch_finished`] call. [`Gallery`] is the
//! in-memory model a front end renders from: one placeholder per slot created
//! up front, each moving from loading to ready or failed.

use crate::models::{BatchSummary, ImageRef, SlotOutcome};
use crate::ratio::normalize_ratio;

/// Text shown on a failed card. Detailed reasons stay in the logs.
pub const FAILURE_TEXT: &str = "Generation failed";

pub trait GalleryReporter {
    fn slot_settled(&mut self, outcome: SlotOutcome);

    fn batch_finished(&mut self, _summary: &BatchSummary) {}
}

impl GalleryReporter for Vec<SlotOutcome> {
    fn slot_settled(&mut self, outcome: SlotOutcome) {
        self.push(outcome);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Loading,
    Ready(ImageRef),
    Failed(String),
}

#[derive(Debug)]
pub struct Gallery {
    aspect_ratio: String,
    slots: Vec<SlotState>,
    busy: bool,
    summary: Option<BatchSummary>,
}

impl Gallery {
    /// Creates `count` loading placeholders and marks the gallery busy.
    pub fn new(count: usize, ratio_text: &str) -> Self {
        Self {
            aspect_ratio: normalize_ratio(ratio_text),
            slots: vec![SlotState::Loading; count],
            busy: true,
            summary: None,
        }
    }

    /// CSS-style aspect ratio for the placeholders, e.g. `16/9`.
    pub fn aspect_ratio(&self) -> &str {
        &self.aspect_ratio
    }

    pub fn slots(&self) -> &[SlotState] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&SlotState> {
        self.slots.get(index)
    }

    /// True until the batch reports completion; a generate button stays disabled meanwhile.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn summary(&self) -> Option<&BatchSummary> {
        self.summary.as_ref()
    }

    pub fn pending(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, SlotState::Loading))
            .count()
    }

    pub fn ready_images(&self) -> impl Iterator<Item = (usize, &ImageRef)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match slot {
            SlotState::Ready(image) => Some((i, image)),
            _ => None,
        })
    }
}

impl GalleryReporter for Gallery {
    fn slot_settled(&mut self, outcome: SlotOutcome) {
        let index = outcome.index();
        let Some(slot) = self.slots.get_mut(index) else {
            log::warn!("Outcome for unknown slot {}", index);
            return;
        };
        if *slot != SlotState::Loading {
            log::warn!("Slot {} reported twice, keeping first outcome", index);
            return;
        }

        *slot = match outcome {
            SlotOutcome::Success { image, .. } => SlotState::Ready(image),
            SlotOutcome::Failure { .. } => SlotState::Failed(FAILURE_TEXT.to_string()),
        };
    }

    fn batch_finished(&mut self, summary: &BatchSummary) {
        self.busy = false;
        self.summary = Some(summary.clone());
    }
}
