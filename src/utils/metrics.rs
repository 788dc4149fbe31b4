//! Per-entry metric accessors.
//!
//! Raw scanner numbers win; pre-formatted display strings are the fallback.

use crate::models::Entry;

use super::date::parse_display_date;
use super::media::{parse_dimensions, parse_similarity};
use super::size::parse_size_to_bytes;

/// Similarity reported for entries without a similarity column
pub const DEFAULT_SIMILARITY: u32 = 100;

/// File size in bytes (0 when unknown)
pub fn item_size(entry: &Entry) -> u64 {
    if let Some(size) = entry.raw.size {
        return size;
    }
    entry.size.as_deref().map(parse_size_to_bytes).unwrap_or(0)
}

/// Modification time in epoch milliseconds.
///
/// Returns `Some(0)` when the entry carries no date at all and `None` when a
/// display date is present but unparsable.
pub fn item_modified_date(entry: &Entry) -> Option<i64> {
    if let Some(millis) = entry.raw.modified_date {
        return Some(millis);
    }
    match entry.modified_date.as_deref() {
        Some(display) if !display.is_empty() => parse_display_date(display),
        _ => Some(0),
    }
}

/// Similarity percentage (0-100)
pub fn item_similarity(entry: &Entry) -> u32 {
    entry
        .similarity
        .as_deref()
        .filter(|s| !s.is_empty())
        .and_then(parse_similarity)
        .unwrap_or(DEFAULT_SIMILARITY)
}

/// Width and height, if the entry has any resolution information
pub fn item_resolution(entry: &Entry) -> Option<(u32, u32)> {
    if let (Some(width), Some(height)) = (entry.raw.width, entry.raw.height) {
        return Some((width, height));
    }
    entry.dimensions.as_deref().and_then(parse_dimensions)
}

/// File extension (lowercase, no dot). Dotfiles have no extension.
pub fn file_extension(path: &str) -> String {
    let file_name = path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("");
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name[idx + 1..].to_lowercase(),
        _ => String::new(),
    }
}
