use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::filters::{
    apply_filters, apply_preset, deselect_all_filtered, filtered_selection_stats, invert_selection_filtered,
    refresh_filters, reset_filter_state, select_all_filtered, FilterContext, FilterPreset, FilterResult,
    FilterState, FilterStats, FilteredSelectionStats,
};
use crate::models::{Entry, Selection};

use super::sorted_paths;

/// Input for a filter pass
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub selection: Vec<String>,
    #[serde(default)]
    pub filter_state: FilterState,
}

/// Visible rows plus the stats line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResponse {
    pub filtered_data: Vec<Entry>,
    pub stats: FilterStats,
}

impl From<FilterResult<'_>> for FilterResponse {
    fn from(result: FilterResult<'_>) -> Self {
        Self {
            filtered_data: result.filtered_data.into_iter().cloned().collect(),
            stats: result.stats,
        }
    }
}

/// Bulk selection actions scoped to the visible rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScopeAction {
    SelectAll,
    Invert,
    DeselectAll,
}

/// Input for a bulk action over the filtered rows
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeRequest {
    #[serde(flatten)]
    pub filter: FilterRequest,
    pub action: ScopeAction,
}

/// Selection after a scoped action, with counts over the visible rows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeResponse {
    pub selection: Vec<String>,
    pub stats: FilteredSelectionStats,
}

fn checked_state(state: &FilterState) -> Result<(), String> {
    let validation = state.validate();
    if validation.valid {
        return Ok(());
    }
    warn!("Rejected filter state: {:?}", validation.errors);
    Err(validation.errors.join("; "))
}

/// Run the filter pipeline over the entries
pub fn filter_entries(request: FilterRequest) -> Result<FilterResponse, String> {
    checked_state(&request.filter_state)?;
    let selection: Selection = request.selection.into_iter().collect();
    let ctx = FilterContext {
        data: &request.entries,
        selection: &selection,
        filter_state: &request.filter_state,
    };
    Ok(apply_filters(&ctx).into())
}

/// Re-run the filters after the data or selection changed
pub fn refresh_entries(request: FilterRequest) -> Result<FilterResponse, String> {
    checked_state(&request.filter_state)?;
    let selection: Selection = request.selection.into_iter().collect();
    let ctx = FilterContext {
        data: &request.entries,
        selection: &selection,
        filter_state: &request.filter_state,
    };
    Ok(refresh_filters(&ctx).into())
}

/// Replace the filter state with a preset
pub fn apply_filter_preset(preset: FilterPreset) -> Result<FilterState, String> {
    Ok(apply_preset(preset))
}

/// Reset every filter to its default
pub fn reset_filters() -> Result<FilterState, String> {
    Ok(reset_filter_state())
}

/// Select, invert or clear the visible rows, leaving hidden rows untouched
pub fn apply_scope_action(request: ScopeRequest) -> Result<ScopeResponse, String> {
    let filter = request.filter;
    checked_state(&filter.filter_state)?;
    let current: Selection = filter.selection.into_iter().collect();
    let ctx = FilterContext {
        data: &filter.entries,
        selection: &current,
        filter_state: &filter.filter_state,
    };
    let visible = apply_filters(&ctx).filtered_data;

    let next = match request.action {
        ScopeAction::SelectAll => select_all_filtered(&visible, &current),
        ScopeAction::Invert => invert_selection_filtered(&visible, &current),
        ScopeAction::DeselectAll => deselect_all_filtered(&visible, &current),
    };

    Ok(ScopeResponse {
        selection: sorted_paths(&next),
        stats: filtered_selection_stats(&visible, &next),
    })
}
