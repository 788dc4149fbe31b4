//! Filter panel engine: narrows the scan result shown in the table.
//!
//! Stages are pure functions over entry references; [`apply_filters`] chains
//! the enabled ones in a fixed order and reports [`FilterStats`].

pub mod engine;
pub mod presets;
pub mod scope;
pub mod types;

pub use engine::*;
pub use presets::*;
pub use scope::*;
pub use types::*;
