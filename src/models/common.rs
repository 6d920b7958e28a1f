use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub description: String,
}

/// Models known to work with the hf-inference router. Not enforced; any id is sent as-is.
pub fn supported_models() -> Vec<ModelInfo> {
    [
        (
            "black-forest-labs/FLUX.1-dev",
            "FLUX.1 [dev]",
            "Black Forest Labs",
            "High quality, slower",
        ),
        (
            "black-forest-labs/FLUX.1-schnell",
            "FLUX.1 [schnell]",
            "Black Forest Labs",
            "Few-step distilled, fast",
        ),
        (
            "stabilityai/stable-diffusion-xl-base-1.0",
            "Stable Diffusion XL",
            "Stability AI",
            "General purpose SDXL base",
        ),
        (
            "stabilityai/stable-diffusion-3.5-large",
            "Stable Diffusion 3.5 Large",
            "Stability AI",
            "Strong prompt adherence",
        ),
    ]
    .into_iter()
    .map(|(id, name, provider, description)| ModelInfo {
        id: id.to_string(),
        name: name.to_string(),
        provider: provider.to_string(),
        description: description.to_string(),
    })
    .collect()
}

pub const DEFAULT_MODEL: &str = "black-forest-labs/FLUX.1-dev";

pub const RATIO_OPTIONS: [&str; 5] = ["1/1", "16/9", "9/16", "4/3", "3/4"];

pub const COUNT_OPTIONS: [usize; 4] = [1, 2, 3, 4];
