//! Selection assistant and filter panel core for duplicate file review.
//!
//! The crate takes grouped scan results (see [`models::Entry`]) and answers two
//! questions for the review UI:
//! - which paths should be marked for deletion/move (`selection`)
//! - which entries stay visible in the table (`filters`)
//!
//! Both engines are pure: they read caller-owned collections and always hand
//! back new ones, so undo/redo layered on top keeps working.

pub mod commands;
pub mod error;
pub mod filters;
pub mod logging;
pub mod models;
pub mod selection;
pub mod settings;
pub mod utils;

pub use error::EngineError;
pub use filters::{apply_filters, refresh_filters, FilterContext, FilterResult, FilterState, FilterStats};
pub use models::{Entry, GroupId, RawMetadata, Selection};
pub use selection::{
    DirectoryRule, GroupRule, Rule, RuleContext, RulePipeline, RuleResult, SelectionAction,
    SelectionRule, TextRule, ValidationResult,
};
pub use settings::EngineSettings;

/// Crate version, independent from the persisted config version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
