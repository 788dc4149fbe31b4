//! Bulk selection operations limited to the rows currently visible.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{Entry, Selection};

/// Selected/visible counts for the filtered view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilteredSelectionStats {
    pub total: usize,
    pub selected: usize,
}

/// Mark every visible row
pub fn select_all_filtered(filtered: &[&Entry], current: &Selection) -> Selection {
    let mut next = current.clone();
    next.extend(filtered.iter().map(|entry| entry.path.clone()));
    next
}

/// Flip the mark of every visible row; hidden marks are untouched
pub fn invert_selection_filtered(filtered: &[&Entry], current: &Selection) -> Selection {
    let mut next = current.clone();
    let mut seen = HashSet::new();
    for entry in filtered {
        if !seen.insert(entry.path.as_str()) {
            continue;
        }
        if current.contains(&entry.path) {
            next.remove(&entry.path);
        } else {
            next.insert(entry.path.clone());
        }
    }
    next
}

/// Unmark every visible row
pub fn deselect_all_filtered(filtered: &[&Entry], current: &Selection) -> Selection {
    let mut next = current.clone();
    for entry in filtered {
        next.remove(&entry.path);
    }
    next
}

/// Visible rows that are marked, in view order
pub fn selected_in_filtered<'a>(filtered: &[&'a Entry], current: &Selection) -> Vec<&'a Entry> {
    filtered
        .iter()
        .copied()
        .filter(|entry| current.contains(&entry.path))
        .collect()
}

pub fn filtered_selection_stats(filtered: &[&Entry], current: &Selection) -> FilteredSelectionStats {
    FilteredSelectionStats {
        total: filtered.len(),
        selected: filtered.iter().filter(|entry| current.contains(&entry.path)).count(),
    }
}

/// False for an empty view
pub fn is_all_filtered_selected(filtered: &[&Entry], current: &Selection) -> bool {
    !filtered.is_empty() && filtered.iter().all(|entry| current.contains(&entry.path))
}

pub fn is_any_filtered_selected(filtered: &[&Entry], current: &Selection) -> bool {
    filtered.iter().any(|entry| current.contains(&entry.path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> Vec<Entry> {
        vec![Entry::new("/a"), Entry::new("/b"), Entry::new("/c")]
    }

    fn sel(items: &[&str]) -> Selection {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_and_deselect_only_touch_visible_rows() {
        let data = data();
        let visible: Vec<&Entry> = vec![&data[0], &data[1]];
        let current = sel(&["/hidden"]);

        let selected = select_all_filtered(&visible, &current);
        assert_eq!(selected, sel(&["/hidden", "/a", "/b"]));

        let cleared = deselect_all_filtered(&visible, &selected);
        assert_eq!(cleared, current);
        assert_eq!(current, sel(&["/hidden"]));
    }

    #[test]
    fn test_invert() {
        let data = data();
        let visible: Vec<&Entry> = data.iter().collect();
        let current = sel(&["/a", "/hidden"]);
        assert_eq!(invert_selection_filtered(&visible, &current), sel(&["/b", "/c", "/hidden"]));

        // duplicate rows flip once
        let doubled: Vec<&Entry> = vec![&data[1], &data[1]];
        assert_eq!(invert_selection_filtered(&doubled, &Selection::new()), sel(&["/b"]));
    }

    #[test]
    fn test_queries() {
        let data = data();
        let visible: Vec<&Entry> = data.iter().collect();
        let current = sel(&["/b"]);

        let picked = selected_in_filtered(&visible, &current);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].path, "/b");
        assert_eq!(
            filtered_selection_stats(&visible, &current),
            FilteredSelectionStats { total: 3, selected: 1 }
        );
        assert!(is_any_filtered_selected(&visible, &current));
        assert!(!is_all_filtered_selected(&visible, &current));
        assert!(is_all_filtered_selected(&visible, &sel(&["/a", "/b", "/c"])));
        assert!(!is_all_filtered_selected(&[], &current));
        assert!(!is_any_filtered_selected(&[], &current));
    }
}
