//! Canned filter states and extension bundles.

use serde::{Deserialize, Serialize};

use crate::utils::{one_year_ago, DatePreset, SizeUnit};

use super::types::{DateFilterConfig, FilterPreset, FilterState, RangeFilterConfig, DEFAULT_MAX_SIZE};

const MIB: f64 = 1024.0 * 1024.0;

/// The state the panel opens with
pub fn default_filter_state() -> FilterState {
    FilterState::default()
}

/// Fresh default state; identical to [`default_filter_state`]
pub fn reset_filter_state() -> FilterState {
    FilterState::default()
}

/// Switch to a preset.
///
/// The result is the default state plus the preset's own settings; nothing
/// from the previous state survives, view toggles included.
pub fn apply_preset(preset: FilterPreset) -> FilterState {
    let mut state = FilterState {
        preset,
        ..FilterState::default()
    };

    match preset {
        FilterPreset::None => {}
        FilterPreset::LargeFilesFirst => {
            state.file_size = RangeFilterConfig {
                enabled: true,
                min: 100.0 * MIB,
                max: DEFAULT_MAX_SIZE,
                unit: Some(SizeUnit::MB),
            };
        }
        FilterPreset::SmallFilesFirst => {
            state.file_size = RangeFilterConfig {
                enabled: true,
                min: 0.0,
                max: MIB,
                unit: Some(SizeUnit::KB),
            };
        }
        FilterPreset::RecentlyModified => {
            state.modified_date = DateFilterConfig {
                enabled: true,
                preset: DatePreset::Last30Days,
                start_date: None,
                end_date: None,
            };
        }
        FilterPreset::OldFiles => {
            state.modified_date = DateFilterConfig {
                enabled: true,
                preset: DatePreset::Custom,
                start_date: Some(0),
                end_date: Some(one_year_ago()),
            };
        }
    }

    state
}

pub fn preset_display_name(preset: FilterPreset) -> &'static str {
    match preset {
        FilterPreset::None => "None",
        FilterPreset::LargeFilesFirst => "Large files first",
        FilterPreset::SmallFilesFirst => "Small files first",
        FilterPreset::RecentlyModified => "Recently modified",
        FilterPreset::OldFiles => "Old files",
    }
}

/// Extension bundles offered by the extension filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtensionPreset {
    Images,
    Videos,
    Audio,
    Documents,
    Archives,
}

impl ExtensionPreset {
    pub const ALL: [ExtensionPreset; 5] = [
        ExtensionPreset::Images,
        ExtensionPreset::Videos,
        ExtensionPreset::Audio,
        ExtensionPreset::Documents,
        ExtensionPreset::Archives,
    ];

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ExtensionPreset::Images => &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "heic", "svg"],
            ExtensionPreset::Videos => &["mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v"],
            ExtensionPreset::Audio => &["mp3", "wav", "flac", "aac", "ogg", "m4a", "wma", "opus"],
            ExtensionPreset::Documents => &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "md", "odt"],
            ExtensionPreset::Archives => &["zip", "rar", "7z", "tar", "gz", "bz2", "xz"],
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ExtensionPreset::Images => "Images",
            ExtensionPreset::Videos => "Videos",
            ExtensionPreset::Audio => "Audio",
            ExtensionPreset::Documents => "Documents",
            ExtensionPreset::Archives => "Archives",
        }
    }
}
