use std::time::Duration;

use serde::Serialize;

use crate::models::ImageRef;

/// Result of one slot. Exactly one is produced per slot index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    Success { index: usize, image: ImageRef },
    Failure { index: usize, reason: String },
}

impl SlotOutcome {
    pub fn index(&self) -> usize {
        match self {
            SlotOutcome::Success { index, .. } | SlotOutcome::Failure { index, .. } => *index,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SlotOutcome::Success { .. })
    }

    pub fn image(&self) -> Option<&ImageRef> {
        match self {
            SlotOutcome::Success { image, .. } => Some(image),
            SlotOutcome::Failure { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub batch_id: String,
    pub requested: usize,
    pub succeeded: usize,
    pub failed: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn settled(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_failed(&self) -> bool {
        self.succeeded == 0 && self.requested > 0
    }
}

fn as_millis<S: serde::Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}
