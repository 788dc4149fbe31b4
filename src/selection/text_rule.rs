//! Text rule: match entries whose path column satisfies a literal or regex
//! pattern.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::ValidationResult;

use super::matchers::{get_column_value, is_valid_regex, MatchCondition, TextColumn, TextMatcher};
use super::{RuleContext, RuleResult, RuleType, SelectionAction, SelectionRule};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextRuleConfig {
    pub column: TextColumn,
    /// Ignored in regex mode
    pub condition: MatchCondition,
    pub pattern: String,
    pub use_regex: bool,
    pub case_sensitive: bool,
    pub keep_existing_selection: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRule {
    id: String,
    config: TextRuleConfig,
    enabled: bool,
}

impl TextRule {
    pub fn new(id: impl Into<String>, config: TextRuleConfig) -> Self {
        Self {
            id: id.into(),
            config,
            enabled: true,
        }
    }

    pub fn config(&self) -> &TextRuleConfig {
        &self.config
    }
}

impl SelectionRule for TextRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn rule_type(&self) -> RuleType {
        RuleType::Text
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn execute(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let validation = self.validate();
        if !validation.valid {
            return RuleResult::failure(ctx.current_selection, validation.errors.join(", "));
        }

        let config = &self.config;
        let matcher = match TextMatcher::new(&config.pattern, config.condition, config.case_sensitive, config.use_regex) {
            Ok(matcher) => matcher,
            Err(e) => {
                warn!(rule = %self.id, error = %e, "text rule pattern rejected");
                return RuleResult::failure(ctx.current_selection, e.to_string());
            }
        };

        let keep_existing = config.keep_existing_selection || ctx.keep_existing_selection;
        if ctx.action == SelectionAction::Unmark && keep_existing {
            // unmarking while keeping existing marks can only be a no-op
            return RuleResult::success(ctx.current_selection, ctx.current_selection.clone());
        }

        let matched: Vec<&str> = ctx
            .data
            .iter()
            .map(|entry| entry.path.as_str())
            .filter(|path| matcher.is_match(get_column_value(path, config.column)))
            .collect();
        debug!(rule = %self.id, matched = matched.len(), action = ?ctx.action, "text rule matched");

        let next = ctx.action.apply(ctx.current_selection, matched);
        RuleResult::success(ctx.current_selection, next)
    }

    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        if self.config.pattern.is_empty() {
            errors.push("Pattern must not be empty".to_string());
        } else if self.config.use_regex && !is_valid_regex(&self.config.pattern) {
            errors.push(format!("Invalid regular expression: {}", self.config.pattern));
        }

        ValidationResult::from_errors(errors)
    }

    fn describe(&self) -> String {
        let column = match self.config.column {
            TextColumn::FolderPath => "folder",
            TextColumn::FileName => "file name",
            TextColumn::FullPath => "full path",
        };
        let condition = match self.config.condition {
            MatchCondition::Contains => "contains",
            MatchCondition::NotContains => "does not contain",
            MatchCondition::Equals => "equals",
            MatchCondition::StartsWith => "starts with",
            MatchCondition::EndsWith => "ends with",
        };
        let regex = if self.config.use_regex { " (regex)" } else { "" };
        let case = if self.config.case_sensitive { " (case sensitive)" } else { "" };

        format!("Text selection: {column} {condition} \"{}\"{regex}{case}", self.config.pattern)
    }
}
