//! Group-level aggregates over entry collections.
//!
//! Helpers accept any iterator of entry references so they work on both the
//! scanner's `&[Entry]` and the filter engine's intermediate `&[&Entry]`.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::models::{Entry, GroupId, Selection};

use super::metrics::item_size;

/// Aggregate mark status of one group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupMarkStatus {
    /// Every member is marked
    AllMarked,
    /// No member is marked
    AllUnmarked,
    /// At least one, but not every, member is marked
    SomeNotAll,
}

/// All distinct group ids present in `data`
pub fn unique_group_ids<'a>(data: impl IntoIterator<Item = &'a Entry>) -> HashSet<GroupId> {
    data.into_iter().filter_map(|entry| entry.group_id).collect()
}

/// Number of members per group
pub fn group_file_counts<'a>(data: impl IntoIterator<Item = &'a Entry>) -> HashMap<GroupId, usize> {
    let mut counts = HashMap::new();
    for group_id in data.into_iter().filter_map(|entry| entry.group_id) {
        *counts.entry(group_id).or_insert(0) += 1;
    }
    counts
}

/// Summed member size (bytes) per group
pub fn group_total_sizes<'a>(data: impl IntoIterator<Item = &'a Entry>) -> HashMap<GroupId, u64> {
    let mut totals = HashMap::new();
    for entry in data {
        if let Some(group_id) = entry.group_id {
            let total = totals.entry(group_id).or_insert(0u64);
            *total = total.saturating_add(item_size(entry));
        }
    }
    totals
}

/// Number of members in one group
pub fn group_file_count<'a>(data: impl IntoIterator<Item = &'a Entry>, group_id: GroupId) -> usize {
    data.into_iter().filter(|entry| entry.group_id == Some(group_id)).count()
}

/// Summed member size of one group
pub fn group_total_size<'a>(data: impl IntoIterator<Item = &'a Entry>, group_id: GroupId) -> u64 {
    data.into_iter()
        .filter(|entry| entry.group_id == Some(group_id))
        .map(item_size)
        .fold(0, u64::saturating_add)
}

fn status_from_counts(marked: usize, total: usize) -> GroupMarkStatus {
    if marked == 0 {
        GroupMarkStatus::AllUnmarked
    } else if marked == total {
        GroupMarkStatus::AllMarked
    } else {
        GroupMarkStatus::SomeNotAll
    }
}

/// Mark status of one group. An empty group counts as all unmarked.
pub fn group_mark_status<'a>(
    data: impl IntoIterator<Item = &'a Entry>,
    group_id: GroupId,
    selection: &Selection,
) -> GroupMarkStatus {
    let (marked, total) = data
        .into_iter()
        .filter(|entry| entry.group_id == Some(group_id))
        .fold((0, 0), |(marked, total), entry| {
            (marked + usize::from(selection.contains(&entry.path)), total + 1)
        });
    status_from_counts(marked, total)
}

/// Mark status of every group in one pass
pub fn group_mark_statuses<'a>(
    data: impl IntoIterator<Item = &'a Entry>,
    selection: &Selection,
) -> HashMap<GroupId, GroupMarkStatus> {
    let mut counts: HashMap<GroupId, (usize, usize)> = HashMap::new();
    for entry in data {
        if let Some(group_id) = entry.group_id {
            let slot = counts.entry(group_id).or_insert((0, 0));
            slot.0 += usize::from(selection.contains(&entry.path));
            slot.1 += 1;
        }
    }
    counts
        .into_iter()
        .map(|(group_id, (marked, total))| (group_id, status_from_counts(marked, total)))
        .collect()
}
