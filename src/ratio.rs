//! Aspect ratio to pixel dimensions.
//!
//! The resolved area stays close to `base * base` whatever the ratio, and both
//! edges are rounded down to a multiple of 16 with a floor of 64, which is what
//! diffusion models generally accept.

use crate::models::Dimensions;

pub const DEFAULT_BASE_SIZE: u32 = 512;

const STEP: f64 = 16.0;
const MIN_EDGE: f64 = 64.0;
const MAX_EDGE: f64 = (u32::MAX / 16 * 16) as f64;

/// `"16:9"` and `"16/9"` both become `"16/9"`.
pub fn normalize_ratio(ratio_text: &str) -> String {
    ratio_text.replace(':', "/").trim().to_string()
}

/// Resolves a ratio string such as `"16:9"` into dimensions around `base`.
///
/// Anything that does not parse as exactly two positive finite numbers
/// resolves to the 512x512 fallback.
pub fn resolve(ratio_text: &str, base: u32) -> Dimensions {
    let Some((w, h)) = parse_ratio(ratio_text) else {
        return Dimensions::FALLBACK;
    };

    let scale = f64::from(base) / (w * h).sqrt();

    Dimensions {
        width: snap(w * scale),
        height: snap(h * scale),
    }
}

fn parse_ratio(ratio_text: &str) -> Option<(f64, f64)> {
    let normalized = normalize_ratio(ratio_text);
    let parts: Vec<f64> = normalized
        .split('/')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;

    match parts.as_slice() {
        [w, h] if w.is_finite() && h.is_finite() && *w > 0.0 && *h > 0.0 => Some((*w, *h)),
        _ => None,
    }
}

fn snap(edge: f64) -> u32 {
    // Capped at the largest multiple of 16 that fits in a u32.
    ((edge / STEP).floor() * STEP).clamp(MIN_EDGE, MAX_EDGE) as u32
}
