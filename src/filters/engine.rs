//! Filter stages and the combinator that chains them.
//!
//! Every stage takes the previous stage's rows and returns the survivors in
//! input order. Group aggregates are always computed over the stage input, so
//! earlier stages narrow what later group filters see.

use std::collections::HashSet;
use tracing::debug;

use crate::models::{Entry, GroupId, Selection};
use crate::selection::match_path;
use crate::utils::{
    file_extension, group_file_counts, group_mark_statuses, group_total_sizes, item_modified_date,
    item_resolution, item_similarity, item_size, match_aspect_ratio, resolve_date_range, unique_group_ids,
    AspectRatio, GroupMarkStatus,
};

use super::types::{
    DateFilterConfig, ExtensionFilterConfig, ExtensionFilterMode, FilterContext, FilterResult, FilterState,
    FilterStats, MarkStatusFilterConfig, MarkStatusOption, PathFilterConfig, RangeFilterConfig,
    ResolutionFilterConfig, SimilarityFilterConfig,
};

/// Keep rows matching any selected mark-status option
pub fn apply_mark_status_filter<'a>(
    data: &[&'a Entry],
    config: &MarkStatusFilterConfig,
    selection: &Selection,
) -> Vec<&'a Entry> {
    if !config.enabled || config.options.is_empty() {
        return data.to_vec();
    }

    let statuses = group_mark_statuses(data.iter().copied(), selection);

    data.iter()
        .copied()
        .filter(|entry| {
            let marked = selection.contains(&entry.path);
            let status = entry.group_id.and_then(|id| statuses.get(&id).copied());

            config.options.iter().any(|option| match option {
                MarkStatusOption::Marked => marked,
                MarkStatusOption::Unmarked => !marked,
                MarkStatusOption::GroupHasSomeMarked | MarkStatusOption::GroupSomeNotAll => {
                    status == Some(GroupMarkStatus::SomeNotAll)
                }
                MarkStatusOption::GroupAllUnmarked => status == Some(GroupMarkStatus::AllUnmarked),
                MarkStatusOption::GroupAllMarked => status == Some(GroupMarkStatus::AllMarked),
                MarkStatusOption::Protected => entry.is_ref,
            })
        })
        .collect()
}

/// Keep grouped rows whose group passes; ungrouped rows always pass
fn retain_groups<'a>(data: &[&'a Entry], passing: &HashSet<GroupId>) -> Vec<&'a Entry> {
    data.iter()
        .copied()
        .filter(|entry| entry.group_id.map_or(true, |id| passing.contains(&id)))
        .collect()
}

pub fn apply_group_count_filter<'a>(data: &[&'a Entry], config: &RangeFilterConfig) -> Vec<&'a Entry> {
    if !config.enabled {
        return data.to_vec();
    }

    let passing: HashSet<GroupId> = group_file_counts(data.iter().copied())
        .into_iter()
        .filter(|(_, count)| config.contains(*count as f64))
        .map(|(id, _)| id)
        .collect();
    retain_groups(data, &passing)
}

pub fn apply_group_size_filter<'a>(data: &[&'a Entry], config: &RangeFilterConfig) -> Vec<&'a Entry> {
    if !config.enabled {
        return data.to_vec();
    }

    let passing: HashSet<GroupId> = group_total_sizes(data.iter().copied())
        .into_iter()
        .filter(|(_, size)| config.contains(*size as f64))
        .map(|(id, _)| id)
        .collect();
    retain_groups(data, &passing)
}

pub fn apply_file_size_filter<'a>(data: &[&'a Entry], config: &RangeFilterConfig) -> Vec<&'a Entry> {
    if !config.enabled {
        return data.to_vec();
    }
    data.iter()
        .copied()
        .filter(|entry| config.contains(item_size(entry) as f64))
        .collect()
}

pub fn apply_extension_filter<'a>(data: &[&'a Entry], config: &ExtensionFilterConfig) -> Vec<&'a Entry> {
    if !config.enabled || config.extensions.is_empty() {
        return data.to_vec();
    }

    let wanted: HashSet<String> = config
        .extensions
        .iter()
        .map(|ext| {
            let ext = ext.to_lowercase();
            ext.strip_prefix('.').map(str::to_string).unwrap_or(ext)
        })
        .collect();

    data.iter()
        .copied()
        .filter(|entry| {
            let listed = wanted.contains(&file_extension(&entry.path));
            match config.mode {
                ExtensionFilterMode::Include => listed,
                ExtensionFilterMode::Exclude => !listed,
            }
        })
        .collect()
}

/// Rows with an unparsable display date never match an enabled date filter
pub fn apply_date_filter<'a>(data: &[&'a Entry], config: &DateFilterConfig) -> Vec<&'a Entry> {
    if !config.enabled {
        return data.to_vec();
    }

    let range = resolve_date_range(config.preset, config.start_date, config.end_date);
    data.iter()
        .copied()
        .filter(|entry| item_modified_date(entry).is_some_and(|millis| range.contains(millis)))
        .collect()
}

pub fn apply_path_filter<'a>(data: &[&'a Entry], config: &PathFilterConfig) -> Vec<&'a Entry> {
    if !config.enabled || config.pattern.is_empty() {
        return data.to_vec();
    }
    data.iter()
        .copied()
        .filter(|entry| match_path(&entry.path, &config.pattern, config.mode, config.case_sensitive))
        .collect()
}

pub fn apply_similarity_filter<'a>(data: &[&'a Entry], config: &SimilarityFilterConfig) -> Vec<&'a Entry> {
    if !config.enabled {
        return data.to_vec();
    }
    data.iter()
        .copied()
        .filter(|entry| {
            let similarity = f64::from(item_similarity(entry));
            similarity >= config.min && similarity <= config.max
        })
        .collect()
}

/// Rows without resolution information are not applicable and pass
pub fn apply_resolution_filter<'a>(data: &[&'a Entry], config: &ResolutionFilterConfig) -> Vec<&'a Entry> {
    if !config.enabled {
        return data.to_vec();
    }

    data.iter()
        .copied()
        .filter(|entry| {
            let Some((width, height)) = item_resolution(entry) else {
                return true;
            };
            if config.min_width.is_some_and(|min| width < min)
                || config.min_height.is_some_and(|min| height < min)
                || config.max_width.is_some_and(|max| width > max)
                || config.max_height.is_some_and(|max| height > max)
            {
                return false;
            }
            match_aspect_ratio(width, height, config.aspect_ratio.unwrap_or(AspectRatio::Any))
        })
        .collect()
}

pub fn apply_selection_filter<'a>(data: &[&'a Entry], selection: &Selection, enabled: bool) -> Vec<&'a Entry> {
    if !enabled {
        return data.to_vec();
    }
    data.iter()
        .copied()
        .filter(|entry| selection.contains(&entry.path))
        .collect()
}

/// Widen `filtered` to every original row of each group it still touches.
///
/// Ungrouped rows only come back if they survived on their own.
pub fn apply_show_all_in_filtered_groups<'a>(
    original: &'a [Entry],
    filtered: Vec<&'a Entry>,
    show_all: bool,
) -> Vec<&'a Entry> {
    if !show_all {
        return filtered;
    }

    let groups = unique_group_ids(filtered.iter().copied());
    if groups.is_empty() {
        return filtered;
    }

    let survivors: HashSet<&str> = filtered.iter().map(|entry| entry.path.as_str()).collect();
    original
        .iter()
        .filter(|entry| match entry.group_id {
            Some(id) => groups.contains(&id),
            None => survivors.contains(entry.path.as_str()),
        })
        .collect()
}

fn stage<'a>(
    name: &str,
    rows: Vec<&'a Entry>,
    filter: impl FnOnce(&[&'a Entry]) -> Vec<&'a Entry>,
) -> Vec<&'a Entry> {
    let before = rows.len();
    let after = filter(&rows);
    if after.len() != before {
        debug!(stage = name, before, after = after.len(), "filter stage narrowed rows");
    }
    after
}

/// Run every enabled stage in fixed order, then the group expansion
pub fn apply_filters<'a>(ctx: &FilterContext<'a>) -> FilterResult<'a> {
    let state = ctx.filter_state;
    let selection = ctx.selection;

    let mut rows: Vec<&'a Entry> = ctx.data.iter().collect();
    rows = stage("markStatus", rows, |d| apply_mark_status_filter(d, &state.mark_status, selection));
    rows = stage("groupCount", rows, |d| apply_group_count_filter(d, &state.group_count));
    rows = stage("groupSize", rows, |d| apply_group_size_filter(d, &state.group_size));
    rows = stage("fileSize", rows, |d| apply_file_size_filter(d, &state.file_size));
    rows = stage("extension", rows, |d| apply_extension_filter(d, &state.extension));
    rows = stage("modifiedDate", rows, |d| apply_date_filter(d, &state.modified_date));
    rows = stage("path", rows, |d| apply_path_filter(d, &state.path));
    rows = stage("similarity", rows, |d| apply_similarity_filter(d, &state.similarity));
    rows = stage("resolution", rows, |d| apply_resolution_filter(d, &state.resolution));
    rows = stage("selectionOnly", rows, |d| apply_selection_filter(d, selection, state.selection_only));

    let rows = apply_show_all_in_filtered_groups(ctx.data, rows, state.show_all_in_filtered_groups);
    let stats = calculate_stats(ctx.data, &rows, state);

    FilterResult {
        filtered_data: rows,
        stats,
    }
}

/// Same result as [`apply_filters`]; named for callers re-running after a data change
pub fn refresh_filters<'a>(ctx: &FilterContext<'a>) -> FilterResult<'a> {
    apply_filters(ctx)
}

pub fn calculate_stats(original: &[Entry], filtered: &[&Entry], state: &FilterState) -> FilterStats {
    FilterStats {
        total_items: original.len(),
        filtered_items: filtered.len(),
        total_groups: unique_group_ids(original).len(),
        filtered_groups: unique_group_ids(filtered.iter().copied()).len(),
        total_size: original.iter().map(item_size).fold(0, u64::saturating_add),
        filtered_size: filtered.iter().map(|entry| item_size(entry)).fold(0, u64::saturating_add),
        active_filter_count: count_active_filters(state),
    }
}

/// Number of filter categories that would actually narrow the result
pub fn count_active_filters(state: &FilterState) -> usize {
    [
        state.mark_status.enabled && !state.mark_status.options.is_empty(),
        state.group_count.enabled,
        state.group_size.enabled,
        state.file_size.enabled,
        state.extension.enabled && !state.extension.extensions.is_empty(),
        state.modified_date.enabled,
        state.path.enabled && !state.path.pattern.is_empty(),
        state.similarity.enabled,
        state.resolution.enabled,
        state.selection_only,
    ]
    .into_iter()
    .filter(|active| *active)
    .count()
}

pub fn is_any_filter_active(state: &FilterState) -> bool {
    count_active_filters(state) > 0
}

/// A fresh default state
pub fn reset_to_default() -> FilterState {
    FilterState::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterPreset, MarkStatusFilterConfig};
    use crate::selection::PathMatchMode;
    use crate::utils::DatePreset;
    use chrono::Utc;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    fn sample() -> Vec<Entry> {
        vec![
            Entry::new("/photos/a.jpg").in_group(1).with_size(1_000).with_dimensions(1920, 1080).with_similarity("95%"),
            Entry::new("/backup/a.jpg").in_group(1).with_size(1_000).with_dimensions(1920, 1080).with_similarity("95%"),
            Entry::new("/music/b.mp3").in_group(2).with_size(5_000_000).as_reference(),
            Entry::new("/music/copy/b.mp3").in_group(2).with_size(5_000_000),
            Entry::new("/music/old/b.mp3").in_group(2).with_size(5_000_000),
            Entry::new("/docs/c.PDF").in_group(3).with_size(10).with_similarity("60%"),
            Entry::new("/docs/c2.pdf").in_group(3).with_size(10).with_similarity("70%"),
            Entry::new("/loose/readme").with_size(3),
        ]
    }

    fn refs(data: &[Entry]) -> Vec<&Entry> {
        data.iter().collect()
    }

    fn paths(rows: &[&Entry]) -> Vec<String> {
        rows.iter().map(|e| e.path.clone()).collect()
    }

    fn range(min: f64, max: f64) -> RangeFilterConfig {
        RangeFilterConfig {
            enabled: true,
            min,
            max,
            unit: None,
        }
    }

    fn selection(items: &[&str]) -> Selection {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mark_status_empty_options_is_identity() {
        let data = sample();
        let rows = refs(&data);
        let sel = selection(&["/photos/a.jpg"]);
        for enabled in [true, false] {
            let config = MarkStatusFilterConfig {
                enabled,
                options: vec![],
            };
            assert_eq!(apply_mark_status_filter(&rows, &config, &sel), rows);
        }
    }

    #[test]
    fn test_mark_status_or_semantics() {
        let data = sample();
        let rows = refs(&data);
        let sel = selection(&["/photos/a.jpg", "/music/b.mp3", "/music/copy/b.mp3", "/music/old/b.mp3"]);
        let all_options = [
            MarkStatusOption::Marked,
            MarkStatusOption::Unmarked,
            MarkStatusOption::GroupHasSomeMarked,
            MarkStatusOption::GroupAllUnmarked,
            MarkStatusOption::GroupSomeNotAll,
            MarkStatusOption::GroupAllMarked,
            MarkStatusOption::Protected,
        ];

        let statuses = group_mark_statuses(&data, &sel);
        // every subset of options
        for mask in 1u32..(1 << all_options.len()) {
            let options: Vec<MarkStatusOption> = all_options
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, o)| *o)
                .collect();
            let config = MarkStatusFilterConfig {
                enabled: true,
                options: options.clone(),
            };
            for entry in apply_mark_status_filter(&rows, &config, &sel) {
                let marked = sel.contains(&entry.path);
                let status = entry.group_id.and_then(|id| statuses.get(&id).copied());
                let satisfied = options.iter().any(|o| match o {
                    MarkStatusOption::Marked => marked,
                    MarkStatusOption::Unmarked => !marked,
                    MarkStatusOption::GroupHasSomeMarked | MarkStatusOption::GroupSomeNotAll => {
                        status == Some(GroupMarkStatus::SomeNotAll)
                    }
                    MarkStatusOption::GroupAllUnmarked => status == Some(GroupMarkStatus::AllUnmarked),
                    MarkStatusOption::GroupAllMarked => status == Some(GroupMarkStatus::AllMarked),
                    MarkStatusOption::Protected => entry.is_ref,
                });
                assert!(satisfied, "{} passed {:?}", entry.path, options);
            }
        }
    }

    #[test]
    fn test_mark_status_group_options() {
        let data = sample();
        let rows = refs(&data);
        let sel = selection(&["/photos/a.jpg", "/music/b.mp3", "/music/copy/b.mp3", "/music/old/b.mp3"]);

        let some = MarkStatusFilterConfig {
            enabled: true,
            options: vec![MarkStatusOption::GroupHasSomeMarked],
        };
        assert_eq!(paths(&apply_mark_status_filter(&rows, &some, &sel)), vec!["/photos/a.jpg", "/backup/a.jpg"]);

        let all = MarkStatusFilterConfig {
            enabled: true,
            options: vec![MarkStatusOption::GroupAllMarked],
        };
        assert_eq!(apply_mark_status_filter(&rows, &all, &sel).len(), 3);

        let protected = MarkStatusFilterConfig {
            enabled: true,
            options: vec![MarkStatusOption::Protected],
        };
        assert_eq!(paths(&apply_mark_status_filter(&rows, &protected, &sel)), vec!["/music/b.mp3"]);
    }

    #[test]
    fn test_group_count_bounds_every_group() {
        let data = sample();
        let rows = refs(&data);
        for min in 0..5 {
            for max in min..5 {
                let result = apply_group_count_filter(&rows, &range(min as f64, max as f64));
                for (_, count) in group_file_counts(result.iter().copied()) {
                    assert!(count >= min && count <= max);
                }
                // ungrouped rows always pass
                assert!(result.iter().any(|e| e.path == "/loose/readme"));
            }
        }
    }

    #[test]
    fn test_group_size_filter() {
        let data = sample();
        let rows = refs(&data);
        let result = apply_group_size_filter(&rows, &range(1_000.0, 3_000.0));
        assert_eq!(paths(&result), vec!["/photos/a.jpg", "/backup/a.jpg", "/loose/readme"]);
    }

    #[test]
    fn test_file_size_filter_inclusive() {
        let data = sample();
        let rows = refs(&data);
        let result = apply_file_size_filter(&rows, &range(10.0, 1_000.0));
        assert_eq!(result.len(), 4);
        let disabled = RangeFilterConfig {
            enabled: false,
            ..range(0.0, 0.0)
        };
        assert_eq!(apply_file_size_filter(&rows, &disabled).len(), data.len());
    }

    #[test]
    fn test_extension_filter() {
        let data = sample();
        let rows = refs(&data);
        let include = ExtensionFilterConfig {
            enabled: true,
            extensions: vec![".PDF".into(), "jpg".into()],
            mode: ExtensionFilterMode::Include,
        };
        assert_eq!(apply_extension_filter(&rows, &include).len(), 4);

        let exclude = ExtensionFilterConfig {
            mode: ExtensionFilterMode::Exclude,
            ..include.clone()
        };
        assert_eq!(
            paths(&apply_extension_filter(&rows, &exclude)),
            vec!["/music/b.mp3", "/music/copy/b.mp3", "/music/old/b.mp3", "/loose/readme"]
        );

        let empty = ExtensionFilterConfig {
            enabled: true,
            extensions: vec![],
            mode: ExtensionFilterMode::Include,
        };
        assert_eq!(apply_extension_filter(&rows, &empty).len(), data.len());
    }

    #[test]
    fn test_date_filter() {
        let now = Utc::now().timestamp_millis();
        let data = vec![
            Entry::new("/new").with_modified(now - DAY_MS),
            Entry::new("/old").with_modified(now - 400 * DAY_MS),
            Entry::new("/undated"),
        ];
        let rows = refs(&data);

        let recent = DateFilterConfig {
            enabled: true,
            preset: DatePreset::Last7Days,
            start_date: None,
            end_date: None,
        };
        assert_eq!(paths(&apply_date_filter(&rows, &recent)), vec!["/new"]);

        let custom = DateFilterConfig {
            enabled: true,
            preset: DatePreset::Custom,
            start_date: None,
            end_date: Some(now - 365 * DAY_MS),
        };
        assert_eq!(paths(&apply_date_filter(&rows, &custom)), vec!["/old", "/undated"]);

        let mut garbled = Entry::new("/garbled");
        garbled.modified_date = Some("sometime".into());
        let garbled_rows = vec![&garbled];
        assert!(apply_date_filter(&garbled_rows, &custom).is_empty());
    }

    #[test]
    fn test_path_filter() {
        let data = sample();
        let rows = refs(&data);
        let config = PathFilterConfig {
            enabled: true,
            mode: PathMatchMode::StartsWith,
            pattern: "/MUSIC".into(),
            case_sensitive: false,
        };
        assert_eq!(apply_path_filter(&rows, &config).len(), 3);

        let empty = PathFilterConfig {
            pattern: String::new(),
            ..config
        };
        assert_eq!(apply_path_filter(&rows, &empty).len(), data.len());
    }

    #[test]
    fn test_similarity_filter_defaults_missing_to_100() {
        let data = sample();
        let rows = refs(&data);
        let config = SimilarityFilterConfig {
            enabled: true,
            min: 65.0,
            max: 96.0,
        };
        assert_eq!(
            paths(&apply_similarity_filter(&rows, &config)),
            vec!["/photos/a.jpg", "/backup/a.jpg", "/docs/c2.pdf"]
        );
    }

    #[test]
    fn test_resolution_filter() {
        let data = vec![
            Entry::new("/wide").with_dimensions(1920, 1080),
            Entry::new("/square").with_dimensions(800, 800),
            Entry::new("/small").with_dimensions(320, 240),
            Entry::new("/audio.mp3"),
        ];
        let rows = refs(&data);

        let widescreen = ResolutionFilterConfig {
            enabled: true,
            aspect_ratio: Some(AspectRatio::Widescreen),
            ..ResolutionFilterConfig::default()
        };
        assert_eq!(paths(&apply_resolution_filter(&rows, &widescreen)), vec!["/wide", "/audio.mp3"]);

        let bounded = ResolutionFilterConfig {
            enabled: true,
            min_width: Some(500),
            max_height: Some(900),
            ..ResolutionFilterConfig::default()
        };
        assert_eq!(paths(&apply_resolution_filter(&rows, &bounded)), vec!["/square", "/audio.mp3"]);
    }

    #[test]
    fn test_show_all_in_filtered_groups() {
        let data = sample();
        let only_photo: Vec<&Entry> = vec![&data[0], &data[7]];
        let expanded = apply_show_all_in_filtered_groups(&data, only_photo.clone(), true);
        assert_eq!(paths(&expanded), vec!["/photos/a.jpg", "/backup/a.jpg", "/loose/readme"]);

        assert_eq!(apply_show_all_in_filtered_groups(&data, only_photo.clone(), false), only_photo);

        let ungrouped_only: Vec<&Entry> = vec![&data[7]];
        assert_eq!(apply_show_all_in_filtered_groups(&data, ungrouped_only.clone(), true), ungrouped_only);
    }

    #[test]
    fn test_apply_filters_fixed_order_and_stats() {
        let data = sample();
        let sel = selection(&["/music/copy/b.mp3"]);
        let mut state = FilterState::default();
        state.show_all_in_filtered_groups = false;
        state.extension = ExtensionFilterConfig {
            enabled: true,
            extensions: vec!["mp3".into()],
            mode: ExtensionFilterMode::Include,
        };
        state.mark_status = MarkStatusFilterConfig {
            enabled: true,
            options: vec![MarkStatusOption::Unmarked],
        };

        let ctx = FilterContext {
            data: &data,
            selection: &sel,
            filter_state: &state,
        };
        let result = apply_filters(&ctx);
        assert_eq!(paths(&result.filtered_data), vec!["/music/b.mp3", "/music/old/b.mp3"]);
        assert_eq!(
            result.stats,
            FilterStats {
                total_items: 8,
                filtered_items: 2,
                total_groups: 3,
                filtered_groups: 1,
                total_size: 15_002_023,
                filtered_size: 10_000_000,
                active_filter_count: 2,
            }
        );

        state.show_all_in_filtered_groups = true;
        let ctx = FilterContext {
            data: &data,
            selection: &sel,
            filter_state: &state,
        };
        assert_eq!(apply_filters(&ctx).filtered_data.len(), 3);
    }

    #[test]
    fn test_refresh_matches_apply_and_is_idempotent() {
        let data = sample();
        let sel = selection(&["/photos/a.jpg"]);
        let mut state = FilterState::default();
        state.group_count.enabled = true;
        state.selection_only = true;
        let ctx = FilterContext {
            data: &data,
            selection: &sel,
            filter_state: &state,
        };

        let applied = apply_filters(&ctx);
        for _ in 0..3 {
            assert_eq!(refresh_filters(&ctx), applied);
        }
        assert_eq!(paths(&applied.filtered_data), vec!["/photos/a.jpg", "/backup/a.jpg"]);
    }

    #[test]
    fn test_default_state_filters_nothing() {
        let data = sample();
        let state = reset_to_default();
        let sel = Selection::new();
        let ctx = FilterContext {
            data: &data,
            selection: &sel,
            filter_state: &state,
        };
        let result = apply_filters(&ctx);
        assert_eq!(result.filtered_data.len(), data.len());
        assert_eq!(result.stats.active_filter_count, 0);
    }

    #[test]
    fn test_count_active_filters() {
        let mut state = FilterState::default();
        assert_eq!(count_active_filters(&state), 0);
        assert!(!is_any_filter_active(&state));

        // enabled but empty list/pattern does not count
        state.mark_status.enabled = true;
        state.extension.enabled = true;
        state.path.enabled = true;
        assert_eq!(count_active_filters(&state), 0);

        state.path.pattern = "x".into();
        state.file_size.enabled = true;
        state.selection_only = true;
        assert_eq!(count_active_filters(&state), 3);
        assert_eq!(is_any_filter_active(&state), count_active_filters(&state) > 0);
        assert_eq!(state.preset, FilterPreset::None);
    }

    #[test]
    fn test_reset_returns_fresh_equal_values() {
        let mut first = reset_to_default();
        let second = reset_to_default();
        assert_eq!(first, second);
        first.selection_only = true;
        assert_ne!(first, second);
        assert_eq!(second, FilterState::default());
    }

    #[test]
    fn test_inverted_ranges_are_not_normalized() {
        let data: Vec<Entry> = sample().into_iter().filter(|e| e.group_id.is_some()).collect();
        let sel = Selection::new();

        let mut states = Vec::new();
        for field in ["groupCount", "groupSize", "fileSize"] {
            let mut state = FilterState::default();
            let inverted = range(10_000_000.0, 1.0);
            match field {
                "groupCount" => state.group_count = inverted,
                "groupSize" => state.group_size = inverted,
                _ => state.file_size = inverted,
            }
            states.push(state);
        }

        let mut similarity = FilterState::default();
        similarity.similarity.enabled = true;
        similarity.similarity.min = 90.0;
        similarity.similarity.max = 10.0;
        states.push(similarity);

        let mut date = FilterState::default();
        date.modified_date.enabled = true;
        date.modified_date.preset = DatePreset::Custom;
        date.modified_date.start_date = Some(Utc::now().timestamp_millis());
        date.modified_date.end_date = Some(0);
        states.push(date);

        for state in &states {
            let result = apply_filters(&FilterContext {
                data: &data,
                selection: &sel,
                filter_state: state,
            });
            assert!(result.filtered_data.is_empty(), "{:?}", paths(&result.filtered_data));
            assert_eq!(result.stats.total_items, data.len());
            assert_eq!(result.stats.filtered_items, 0);
        }
    }

    #[test]
    fn test_stats_saturate_on_huge_sizes() {
        let data = vec![
            Entry::new("/big/1").in_group(1).with_size(u64::MAX),
            Entry::new("/big/2").in_group(1).with_size(u64::MAX),
        ];
        let rows = refs(&data);
        let stats = calculate_stats(&data, &rows, &FilterState::default());
        assert_eq!(stats.total_size, u64::MAX);
        assert_eq!(stats.filtered_size, u64::MAX);
    }
}
