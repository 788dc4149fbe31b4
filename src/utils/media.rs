//! Similarity and resolution helpers for image/video results.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Relative tolerance used when matching aspect ratios
const ASPECT_TOLERANCE: f64 = 0.1;

/// Aspect ratios selectable in the resolution filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "1:1")]
    Square,
    #[default]
    #[serde(rename = "any")]
    Any,
}

impl AspectRatio {
    fn target(self) -> Option<f64> {
        match self {
            AspectRatio::Widescreen => Some(16.0 / 9.0),
            AspectRatio::Standard => Some(4.0 / 3.0),
            AspectRatio::Square => Some(1.0),
            AspectRatio::Any => None,
        }
    }
}

/// Check whether `width x height` is within tolerance of the target ratio.
///
/// A zero height never matches a concrete ratio.
pub fn match_aspect_ratio(width: u32, height: u32, ratio: AspectRatio) -> bool {
    let Some(target) = ratio.target() else {
        return true;
    };
    if height == 0 {
        return false;
    }
    (width as f64 / height as f64 - target).abs() < ASPECT_TOLERANCE
}

/// Extract the first integer from a similarity string such as "95%" or "95"
pub fn parse_similarity(value: &str) -> Option<u32> {
    let digits: String = value
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn dimensions_regex() -> Option<&'static Regex> {
    static DIMENSIONS: OnceLock<Option<Regex>> = OnceLock::new();
    DIMENSIONS
        .get_or_init(|| Regex::new(r"(?i)(\d+)\s*[x×]\s*(\d+)").ok())
        .as_ref()
}

/// Parse a dimensions string such as "1920x1080" or "640 × 480"
pub fn parse_dimensions(value: &str) -> Option<(u32, u32)> {
    let caps = dimensions_regex()?.captures(value)?;
    let width = caps.get(1)?.as_str().parse().ok()?;
    let height = caps.get(2)?.as_str().parse().ok()?;
    Some((width, height))
}
