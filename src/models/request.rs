use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};
use crate::ratio;

/// One form submission: what to generate and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub count: usize,
    pub ratio_text: String,
    pub prompt: String,
}

impl GenerationRequest {
    /// Builds a request the way a form would submit it: prompt trimmed, empty prompt and
    /// zero count rejected.
    pub fn new(
        model: impl Into<String>,
        count: usize,
        ratio_text: impl Into<String>,
        prompt: impl AsRef<str>,
    ) -> Result<Self> {
        let prompt = prompt.as_ref().trim();
        if prompt.is_empty() {
            return Err(GenerationError::InvalidRequest("Enter a prompt.".into()));
        }
        if count == 0 {
            return Err(GenerationError::InvalidRequest(
                "Image count must be at least 1".into(),
            ));
        }
        let model = model.into();
        if model.trim().is_empty() {
            return Err(GenerationError::InvalidRequest("Model id is required".into()));
        }

        Ok(Self {
            model,
            count,
            ratio_text: ratio_text.into(),
            prompt: prompt.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const FALLBACK: Dimensions = Dimensions {
        width: 512,
        height: 512,
    };

    /// Resolves with the default 512px base edge.
    pub fn from_ratio(ratio_text: &str) -> Self {
        ratio::resolve(ratio_text, ratio::DEFAULT_BASE_SIZE)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_prompt() {
        let request =
            GenerationRequest::new("black-forest-labs/FLUX.1-dev", 2, "16:9", "  a red fox \n")
                .unwrap();
        assert_eq!(request.prompt, "a red fox");
        assert_eq!(request.count, 2);
    }

    #[test]
    fn rejects_blank_prompt_and_zero_count() {
        assert!(matches!(
            GenerationRequest::new("m", 1, "1:1", "   "),
            Err(GenerationError::InvalidRequest(_))
        ));
        assert!(matches!(
            GenerationRequest::new("m", 0, "1:1", "a cat"),
            Err(GenerationError::InvalidRequest(_))
        ));
    }

    #[test]
    fn dimensions_display() {
        assert_eq!(Dimensions::from_ratio("16:9").to_string(), "672x384");
        assert_eq!(Dimensions::from_ratio("garbage"), Dimensions::FALLBACK);
    }
}
