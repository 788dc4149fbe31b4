//! Byte size units, parsing and formatting.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Binary (1024-based) size units used by size filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeUnit {
    B,
    KB,
    MB,
    GB,
    TB,
}

impl SizeUnit {
    pub const ALL: [SizeUnit; 5] = [SizeUnit::B, SizeUnit::KB, SizeUnit::MB, SizeUnit::GB, SizeUnit::TB];

    /// Number of bytes in one unit
    pub fn multiplier(self) -> f64 {
        const KB: f64 = 1024.0;
        match self {
            SizeUnit::B => 1.0,
            SizeUnit::KB => KB,
            SizeUnit::MB => KB * KB,
            SizeUnit::GB => KB * KB * KB,
            SizeUnit::TB => KB * KB * KB * KB,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeUnit::B => "B",
            SizeUnit::KB => "KB",
            SizeUnit::MB => "MB",
            SizeUnit::GB => "GB",
            SizeUnit::TB => "TB",
        }
    }

    /// Parse a full unit suffix; "" counts as bytes
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_uppercase().as_str() {
            "" | "B" => Some(SizeUnit::B),
            "KB" => Some(SizeUnit::KB),
            "MB" => Some(SizeUnit::MB),
            "GB" => Some(SizeUnit::GB),
            "TB" => Some(SizeUnit::TB),
            _ => None,
        }
    }
}

fn size_regex() -> Option<&'static Regex> {
    static SIZE: OnceLock<Option<Regex>> = OnceLock::new();
    SIZE.get_or_init(|| Regex::new(r"(?i)^([\d.]+)\s*([KMGTPE]?B?)$").ok())
        .as_ref()
}

/// Longest leading decimal number, so "1.2.3" reads as 1.2
fn leading_number(digits: &str) -> Option<f64> {
    let end = digits
        .match_indices('.')
        .nth(1)
        .map(|(idx, _)| idx)
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

/// Parse a human-readable size such as "1.5 MB" or "100KB" into bytes.
///
/// Unparsable input yields 0. A suffix that is not a full unit name
/// ("K", "PB") counts as bytes.
pub fn parse_size_to_bytes(size_str: &str) -> u64 {
    let Some(caps) = size_regex().and_then(|re| re.captures(size_str.trim())) else {
        return 0;
    };
    let Some(value) = caps.get(1).and_then(|m| leading_number(m.as_str())) else {
        return 0;
    };
    let multiplier = caps
        .get(2)
        .and_then(|m| SizeUnit::from_suffix(m.as_str()))
        .map_or(1.0, SizeUnit::multiplier);

    (value * multiplier).round() as u64
}

/// Format a byte count as a human-readable string
///
/// Examples: "0 B", "512.00 B", "1.50 KB", "2.00 GB". With a target unit the
/// value is always expressed in that unit.
pub fn format_bytes(bytes: u64, target_unit: Option<SizeUnit>) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    if let Some(unit) = target_unit {
        return format!("{:.2} {}", bytes as f64 / unit.multiplier(), unit.as_str());
    }

    let mut value = bytes as f64;
    let mut unit_index = 0;
    while value >= 1024.0 && unit_index < SizeUnit::ALL.len() - 1 {
        value /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", value, SizeUnit::ALL[unit_index].as_str())
}

/// Convert a value between size units
pub fn convert_size(value: f64, from: SizeUnit, to: SizeUnit) -> f64 {
    value * from.multiplier() / to.multiplier()
}
