//! Shared utility functions
//!
//! Pure helpers used by both the selection rules and the filter engine:
//! size units, date windows, media metadata parsing, and group aggregates.

pub mod date;
pub mod groups;
pub mod media;
pub mod metrics;
pub mod size;

pub use date::*;
pub use groups::*;
pub use media::*;
pub use metrics::*;
pub use size::*;
