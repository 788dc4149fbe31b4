use serde::{Deserialize, Serialize};

use crate::models::{Entry, Selection, ValidationResult};
use crate::selection::PathMatchMode;
use crate::utils::{AspectRatio, DatePreset, SizeUnit};

/// 100 GiB, the upper bound of the default size ranges
pub const DEFAULT_MAX_SIZE: f64 = 100.0 * 1024.0 * 1024.0 * 1024.0;

/// Mark-status conditions; a row passes if it satisfies any selected one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkStatusOption {
    Marked,
    Unmarked,
    /// Group has at least one, but not every, member marked
    GroupHasSomeMarked,
    GroupAllUnmarked,
    GroupSomeNotAll,
    GroupAllMarked,
    /// Reference files
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtensionFilterMode {
    #[default]
    Include,
    Exclude,
}

/// Canned filter configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterPreset {
    #[default]
    None,
    LargeFilesFirst,
    SmallFilesFirst,
    RecentlyModified,
    OldFiles,
}

impl FilterPreset {
    pub const ALL: [FilterPreset; 5] = [
        FilterPreset::None,
        FilterPreset::LargeFilesFirst,
        FilterPreset::SmallFilesFirst,
        FilterPreset::RecentlyModified,
        FilterPreset::OldFiles,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkStatusFilterConfig {
    pub enabled: bool,
    pub options: Vec<MarkStatusOption>,
}

/// Inclusive numeric range. Size ranges are in bytes; `unit` is display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeFilterConfig {
    #[serde(default)]
    pub enabled: bool,
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<SizeUnit>,
}

impl RangeFilterConfig {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionFilterConfig {
    pub enabled: bool,
    /// Case and a leading dot are ignored
    pub extensions: Vec<String>,
    pub mode: ExtensionFilterMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFilterConfig {
    #[serde(default)]
    pub enabled: bool,
    pub preset: DatePreset,
    /// Epoch millis, only read by the custom preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathFilterConfig {
    pub enabled: bool,
    pub mode: PathMatchMode,
    pub pattern: String,
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityFilterConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Percent, 0-100
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolutionFilterConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
}

/// Complete filter panel state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub mark_status: MarkStatusFilterConfig,
    pub group_count: RangeFilterConfig,
    pub group_size: RangeFilterConfig,
    pub file_size: RangeFilterConfig,
    pub extension: ExtensionFilterConfig,
    pub modified_date: DateFilterConfig,
    pub path: PathFilterConfig,
    pub similarity: SimilarityFilterConfig,
    pub resolution: ResolutionFilterConfig,
    /// Only rows that are currently selected
    pub selection_only: bool,
    /// Expand the result to every member of each surviving group
    pub show_all_in_filtered_groups: bool,
    pub preset: FilterPreset,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            mark_status: MarkStatusFilterConfig::default(),
            group_count: RangeFilterConfig {
                enabled: false,
                min: 2.0,
                max: 100.0,
                unit: None,
            },
            group_size: RangeFilterConfig {
                enabled: false,
                min: 0.0,
                max: DEFAULT_MAX_SIZE,
                unit: Some(SizeUnit::MB),
            },
            file_size: RangeFilterConfig {
                enabled: false,
                min: 0.0,
                max: DEFAULT_MAX_SIZE,
                unit: Some(SizeUnit::MB),
            },
            extension: ExtensionFilterConfig::default(),
            modified_date: DateFilterConfig {
                enabled: false,
                preset: DatePreset::Custom,
                start_date: None,
                end_date: None,
            },
            path: PathFilterConfig::default(),
            similarity: SimilarityFilterConfig {
                enabled: false,
                min: 0.0,
                max: 100.0,
            },
            resolution: ResolutionFilterConfig {
                aspect_ratio: Some(AspectRatio::Any),
                ..ResolutionFilterConfig::default()
            },
            selection_only: false,
            show_all_in_filtered_groups: true,
            preset: FilterPreset::None,
        }
    }
}

impl FilterState {
    /// Structural checks for states coming from the UI.
    ///
    /// `min > max` is allowed and simply filters everything out.
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        for (name, range) in [
            ("groupCount", &self.group_count),
            ("groupSize", &self.group_size),
            ("fileSize", &self.file_size),
        ] {
            if !range.min.is_finite() || range.min < 0.0 {
                errors.push(format!("{name}.min must be a non-negative number"));
            }
            if !range.max.is_finite() || range.max < 0.0 {
                errors.push(format!("{name}.max must be a non-negative number"));
            }
        }

        for (name, bound) in [("similarity.min", self.similarity.min), ("similarity.max", self.similarity.max)] {
            if !(0.0..=100.0).contains(&bound) {
                errors.push(format!("{name} must be between 0 and 100"));
            }
        }

        ValidationResult::from_errors(errors)
    }
}

/// Aggregate numbers shown above the result table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterStats {
    pub total_items: usize,
    pub filtered_items: usize,
    pub total_groups: usize,
    pub filtered_groups: usize,
    /// Bytes
    pub total_size: u64,
    pub filtered_size: u64,
    pub active_filter_count: usize,
}

/// Inputs of one filter pass
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub data: &'a [Entry],
    pub selection: &'a Selection,
    pub filter_state: &'a FilterState,
}

/// Output of one filter pass; rows borrow from the context's data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResult<'a> {
    pub filtered_data: Vec<&'a Entry>,
    pub stats: FilterStats,
}
