//! Selection assistant: rules that compute which entries to mark.
//!
//! Every rule reads a [`RuleContext`] and returns a brand-new selection in a
//! [`RuleResult`]. Rules are chained by [`RulePipeline`] and persisted through
//! [`config`] (import/export) or the pipeline's own JSON form.

pub mod config;
pub mod directory_rule;
pub mod group_rule;
pub mod matchers;
pub mod pipeline;
pub mod text_rule;

mod schema;

use serde::{Deserialize, Serialize};

use crate::models::{Entry, Selection};

pub use crate::models::ValidationResult;
pub use config::{
    export_config, import_config, is_version_compatible, merge_configs, parse_export_config, read_config_file,
    write_config_file, ExportConfig, ExportResult, ImportResult, PartialRuleConfigs, RuleConfigs, CONFIG_VERSION,
};
pub use directory_rule::{DirectoryMode, DirectoryRule, DirectoryRuleConfig};
pub use group_rule::{
    field_value, FieldValue, FilterCondition, GroupRule, GroupRuleConfig, GroupSelectionMode, SortCriterion,
    SortDirection, SortField,
};
pub use matchers::{
    get_column_value, get_directory, is_in_directory, is_valid_regex, match_path, match_text,
    MatchCondition, PathMatchMode, TextColumn, TextMatcher,
};
pub use pipeline::{PipelineConfig, RuleIdGenerator, RulePipeline, SerializedRule};
pub use text_rule::{TextRule, TextRuleConfig};

/// Whether matched entries get added to or removed from the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionAction {
    #[default]
    Mark,
    Unmark,
}

impl SelectionAction {
    /// Union (mark) or difference (unmark) of `current` with `matched`
    pub fn apply<'a>(&self, current: &Selection, matched: impl IntoIterator<Item = &'a str>) -> Selection {
        let mut next = current.clone();
        match self {
            SelectionAction::Mark => {
                for path in matched {
                    next.insert(path.to_string());
                }
            }
            SelectionAction::Unmark => {
                for path in matched {
                    next.remove(path);
                }
            }
        }
        next
    }
}

/// Kind tag of a rule, used in serialized pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Group,
    Text,
    Directory,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Group => "group",
            RuleType::Text => "text",
            RuleType::Directory => "directory",
        }
    }

    /// Parse a serialized type tag
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "group" => Some(RuleType::Group),
            "text" => Some(RuleType::Text),
            "directory" => Some(RuleType::Directory),
            _ => None,
        }
    }
}

/// Read-only inputs for one rule execution
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Entries the rule evaluates (normally the whole scan result)
    pub data: &'a [Entry],
    /// Selection before the rule runs
    pub current_selection: &'a Selection,
    /// Keep marks the rule would otherwise clear
    pub keep_existing_selection: bool,
    pub action: SelectionAction,
}

impl<'a> RuleContext<'a> {
    pub fn new(data: &'a [Entry], current_selection: &'a Selection, action: SelectionAction) -> Self {
        Self {
            data,
            current_selection,
            keep_existing_selection: false,
            action,
        }
    }

    pub fn keep_existing(mut self, keep: bool) -> Self {
        self.keep_existing_selection = keep;
        self
    }
}

/// Outcome of executing one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    /// Selection after the rule; equals the input selection on failure
    pub selection: Selection,
    /// Number of paths whose mark state changed
    pub affected_count: usize,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RuleResult {
    /// Successful result; affected count is derived from the two selections
    pub fn success(before: &Selection, after: Selection) -> Self {
        Self {
            affected_count: count_affected(before, &after),
            selection: after,
            success: true,
            error: None,
        }
    }

    /// Failed result that leaves the selection as it was
    pub fn failure(before: &Selection, error: impl Into<String>) -> Self {
        Self {
            selection: before.clone(),
            affected_count: 0,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Size of the symmetric difference between two selections
pub fn count_affected(before: &Selection, after: &Selection) -> usize {
    before.symmetric_difference(after).count()
}

/// Shared behavior of every selection rule
pub trait SelectionRule {
    fn id(&self) -> &str;

    fn rule_type(&self) -> RuleType;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Compute a new selection. Never mutates the context.
    fn execute(&self, ctx: &RuleContext<'_>) -> RuleResult;

    fn validate(&self) -> ValidationResult;

    /// Human-readable one-line summary for the UI
    fn describe(&self) -> String;

    /// Number of paths `execute` would change, without applying anything
    fn preview(&self, ctx: &RuleContext<'_>) -> usize {
        self.execute(ctx).affected_count
    }
}

/// Configuration of any rule kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "lowercase")]
pub enum RuleConfig {
    Group(GroupRuleConfig),
    Text(TextRuleConfig),
    Directory(DirectoryRuleConfig),
}

impl RuleConfig {
    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleConfig::Group(_) => RuleType::Group,
            RuleConfig::Text(_) => RuleType::Text,
            RuleConfig::Directory(_) => RuleType::Directory,
        }
    }
}

/// A rule of any kind, as held by the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Group(GroupRule),
    Text(TextRule),
    Directory(DirectoryRule),
}

impl Rule {
    /// Build a rule from its config
    pub fn from_config(id: impl Into<String>, config: RuleConfig) -> Self {
        match config {
            RuleConfig::Group(config) => Rule::Group(GroupRule::new(id, config)),
            RuleConfig::Text(config) => Rule::Text(TextRule::new(id, config)),
            RuleConfig::Directory(config) => Rule::Directory(DirectoryRule::new(id, config)),
        }
    }

    /// Snapshot of the rule's current config
    pub fn config(&self) -> RuleConfig {
        match self {
            Rule::Group(rule) => RuleConfig::Group(rule.config().clone()),
            Rule::Text(rule) => RuleConfig::Text(rule.config().clone()),
            Rule::Directory(rule) => RuleConfig::Directory(rule.config().clone()),
        }
    }

    fn inner(&self) -> &dyn SelectionRule {
        match self {
            Rule::Group(rule) => rule,
            Rule::Text(rule) => rule,
            Rule::Directory(rule) => rule,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn SelectionRule {
        match self {
            Rule::Group(rule) => rule,
            Rule::Text(rule) => rule,
            Rule::Directory(rule) => rule,
        }
    }
}

impl SelectionRule for Rule {
    fn id(&self) -> &str {
        self.inner().id()
    }

    fn rule_type(&self) -> RuleType {
        self.inner().rule_type()
    }

    fn is_enabled(&self) -> bool {
        self.inner().is_enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.inner_mut().set_enabled(enabled);
    }

    fn execute(&self, ctx: &RuleContext<'_>) -> RuleResult {
        self.inner().execute(ctx)
    }

    fn validate(&self) -> ValidationResult {
        self.inner().validate()
    }

    fn describe(&self) -> String {
        self.inner().describe()
    }

    fn preview(&self, ctx: &RuleContext<'_>) -> usize {
        self.inner().preview(ctx)
    }
}

impl From<GroupRule> for Rule {
    fn from(rule: GroupRule) -> Self {
        Rule::Group(rule)
    }
}

impl From<TextRule> for Rule {
    fn from(rule: TextRule) -> Self {
        Rule::Text(rule)
    }
}

impl From<DirectoryRule> for Rule {
    fn from(rule: DirectoryRule) -> Self {
        Rule::Directory(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(paths: &[&str]) -> Selection {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_action_apply() {
        let current = selection(&["/a", "/b"]);
        let marked = SelectionAction::Mark.apply(&current, ["/c"]);
        assert_eq!(marked, selection(&["/a", "/b", "/c"]));

        let unmarked = SelectionAction::Unmark.apply(&current, ["/a", "/zzz"]);
        assert_eq!(unmarked, selection(&["/b"]));

        // input untouched
        assert_eq!(current, selection(&["/a", "/b"]));
    }

    #[test]
    fn test_count_affected_is_symmetric_difference() {
        let before = selection(&["/a", "/b"]);
        let after = selection(&["/b", "/c", "/d"]);
        assert_eq!(count_affected(&before, &after), 3);
        assert_eq!(count_affected(&before, &before), 0);
    }

    #[test]
    fn test_rule_result_constructors() {
        let before = selection(&["/a"]);
        let ok = RuleResult::success(&before, selection(&["/a", "/b"]));
        assert!(ok.success);
        assert_eq!(ok.affected_count, 1);

        let failed = RuleResult::failure(&before, "boom");
        assert!(!failed.success);
        assert_eq!(failed.selection, before);
        assert_eq!(failed.affected_count, 0);
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_rule_type_tags() {
        assert_eq!(RuleType::from_str("group"), Some(RuleType::Group));
        assert_eq!(RuleType::from_str("directory"), Some(RuleType::Directory));
        assert_eq!(RuleType::from_str("regex"), None);
        assert_eq!(RuleType::Text.as_str(), "text");
    }

    #[test]
    fn test_rule_config_round_trips_through_rule() {
        let config = RuleConfig::Text(TextRuleConfig {
            pattern: "tmp".into(),
            ..TextRuleConfig::default()
        });
        let rule = Rule::from_config("text-rule-1", config.clone());
        assert_eq!(rule.id(), "text-rule-1");
        assert_eq!(rule.rule_type(), RuleType::Text);
        assert!(rule.is_enabled());
        assert_eq!(rule.config(), config);
    }

    #[test]
    fn test_rule_config_serialized_shape() {
        let config = RuleConfig::Directory(DirectoryRuleConfig::default());
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["type"], "directory");
        assert_eq!(value["config"]["mode"], "keepOnePerDirectory");
    }
}
