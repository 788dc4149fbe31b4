//! Command layer
//!
//! Plain functions the host UI bridge calls. Every command takes and returns
//! camelCase serde types and reports failures as strings. Selections cross
//! the boundary as sorted path lists.

pub mod config;
pub mod filter;
pub mod selection;

pub use config::*;
pub use filter::*;
pub use selection::*;

use crate::models::Selection;

/// Sorted path list for a selection set
pub(crate) fn sorted_paths(selection: &Selection) -> Vec<String> {
    let mut paths: Vec<String> = selection.iter().cloned().collect();
    paths.sort();
    paths
}
