//! Ordered, persistable chain of selection rules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::ValidationResult;

use super::{
    DirectoryRuleConfig, GroupRuleConfig, Rule, RuleConfig, RuleContext, RuleResult, RuleType,
    SelectionRule, TextRuleConfig,
};

fn default_enabled() -> bool {
    true
}

/// One rule in a serialized pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedRule {
    pub id: String,
    /// "group", "text" or "directory"; anything else is dropped on load
    #[serde(rename = "type")]
    pub rule_type: String,
    pub config: serde_json::Value,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Serialized pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<SerializedRule>,
}

/// Per-kind counter producing ids like `text-rule-3`
#[derive(Debug, Clone, Default)]
pub struct RuleIdGenerator {
    counters: HashMap<RuleType, u64>,
}

impl RuleIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, rule_type: RuleType) -> String {
        let counter = self.counters.entry(rule_type).or_insert(0);
        *counter += 1;
        format!("{}-rule-{}", rule_type.as_str(), counter)
    }
}

#[derive(Debug, Clone)]
pub struct RulePipeline {
    id: String,
    name: String,
    rules: Vec<Rule>,
    ids: RuleIdGenerator,
}

impl RulePipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            rules: Vec::new(),
            ids: RuleIdGenerator::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn enabled_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|rule| rule.is_enabled())
    }

    pub fn get_rule(&self, rule_id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id() == rule_id)
    }

    /// Append an already-built rule
    pub fn add_rule(&mut self, rule: impl Into<Rule>) {
        self.rules.push(rule.into());
    }

    /// Build a rule with a pipeline-unique id, append it, and return the id
    pub fn add_config(&mut self, config: RuleConfig) -> String {
        let id = self.fresh_id(config.rule_type());
        self.rules.push(Rule::from_config(id.clone(), config));
        id
    }

    fn fresh_id(&mut self, rule_type: RuleType) -> String {
        loop {
            let candidate = self.ids.next_id(rule_type);
            if self.get_rule(&candidate).is_none() {
                return candidate;
            }
        }
    }

    /// Remove a rule by id; returns whether anything was removed
    pub fn remove_rule(&mut self, rule_id: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.id() != rule_id);
        self.rules.len() != before
    }

    /// Move the rule at `from` to `to`. Out-of-range indices are ignored.
    pub fn reorder_rules(&mut self, from: usize, to: usize) {
        if from >= self.rules.len() || to >= self.rules.len() {
            return;
        }
        let rule = self.rules.remove(from);
        self.rules.insert(to, rule);
    }

    /// Toggle a rule; returns false when no rule has that id
    pub fn enable_rule(&mut self, rule_id: &str, enabled: bool) -> bool {
        match self.rules.iter_mut().find(|rule| rule.id() == rule_id) {
            Some(rule) => {
                rule.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    /// Run enabled rules in order, feeding each the previous rule's output.
    ///
    /// Invalid or failing rules are skipped and reported; they never abort
    /// the run.
    pub fn execute(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let mut selection = ctx.current_selection.clone();
        let mut total_affected = 0;
        let mut errors = Vec::new();
        let mut ran = 0;

        for rule in self.enabled_rules() {
            let validation = rule.validate();
            if !validation.valid {
                warn!(pipeline = %self.id, rule = rule.id(), "skipping invalid rule");
                errors.push(format!(
                    "Rule {} validation failed: {}",
                    rule.id(),
                    validation.errors.join(", ")
                ));
                continue;
            }

            let step = RuleContext {
                data: ctx.data,
                current_selection: &selection,
                keep_existing_selection: ctx.keep_existing_selection,
                action: ctx.action,
            };
            let result = rule.execute(&step);
            ran += 1;

            if result.success {
                total_affected += result.affected_count;
                selection = result.selection;
            } else {
                let message = result.error.unwrap_or_default();
                warn!(pipeline = %self.id, rule = rule.id(), error = %message, "rule execution failed");
                errors.push(format!("Rule {} execution failed: {}", rule.id(), message));
            }
        }

        info!(
            pipeline = %self.id,
            rules = ran,
            affected = total_affected,
            errors = errors.len(),
            "pipeline executed"
        );

        RuleResult {
            selection,
            affected_count: total_affected,
            success: errors.is_empty(),
            error: (!errors.is_empty()).then(|| errors.join("; ")),
        }
    }

    /// Validate every rule, enabled or not; messages are prefixed with the rule id
    pub fn validate(&self) -> ValidationResult {
        let errors = self
            .rules
            .iter()
            .flat_map(|rule| {
                let id = rule.id().to_string();
                rule.validate()
                    .errors
                    .into_iter()
                    .map(move |error| format!("[{id}] {error}"))
            })
            .collect();
        ValidationResult::from_errors(errors)
    }

    pub fn preview(&self, ctx: &RuleContext<'_>) -> usize {
        self.execute(ctx).affected_count
    }

    pub fn to_config(&self) -> Result<PipelineConfig, EngineError> {
        let rules = self
            .rules
            .iter()
            .map(|rule| -> Result<SerializedRule, serde_json::Error> {
                let config = match rule.config() {
                    RuleConfig::Group(config) => serde_json::to_value(config),
                    RuleConfig::Text(config) => serde_json::to_value(config),
                    RuleConfig::Directory(config) => serde_json::to_value(config),
                }?;
                Ok(SerializedRule {
                    id: rule.id().to_string(),
                    rule_type: rule.rule_type().as_str().to_string(),
                    config,
                    enabled: rule.is_enabled(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PipelineConfig {
            name: self.name.clone(),
            rules,
        })
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(&self.to_config()?)?)
    }

    /// Rebuild a pipeline. Unknown rule types are dropped; a known type with
    /// a config that does not fit it is an error.
    pub fn from_config(config: PipelineConfig) -> Result<Self, EngineError> {
        let mut pipeline = RulePipeline::new(config.name);

        for serialized in config.rules {
            let Some(rule_type) = RuleType::from_str(&serialized.rule_type) else {
                warn!(rule = %serialized.id, rule_type = %serialized.rule_type, "dropping rule of unknown type");
                continue;
            };

            let invalid = |e: serde_json::Error| EngineError::InvalidRuleConfig {
                rule_id: serialized.id.clone(),
                message: e.to_string(),
            };
            let rule_config = match rule_type {
                RuleType::Group => {
                    RuleConfig::Group(serde_json::from_value::<GroupRuleConfig>(serialized.config.clone()).map_err(invalid)?)
                }
                RuleType::Text => {
                    RuleConfig::Text(serde_json::from_value::<TextRuleConfig>(serialized.config.clone()).map_err(invalid)?)
                }
                RuleType::Directory => RuleConfig::Directory(
                    serde_json::from_value::<DirectoryRuleConfig>(serialized.config.clone()).map_err(invalid)?,
                ),
            };

            let mut rule = Rule::from_config(serialized.id.clone(), rule_config);
            rule.set_enabled(serialized.enabled);
            pipeline.rules.push(rule);
        }

        Ok(pipeline)
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }
}

impl Default for RulePipeline {
    fn default() -> Self {
        Self::new("Default pipeline")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entry, Selection};
    use crate::selection::{
        DirectoryMode, GroupSelectionMode, SelectionAction, SortCriterion, SortDirection, SortField,
    };

    fn sample() -> Vec<Entry> {
        vec![
            Entry::new("/a/one.jpg").in_group(1).with_size(10),
            Entry::new("/b/one.jpg").in_group(1).with_size(20),
            Entry::new("/a/two.txt").in_group(2).with_size(5),
            Entry::new("/tmp/two.txt").in_group(2).with_size(5),
        ]
    }

    fn text(pattern: &str) -> RuleConfig {
        RuleConfig::Text(TextRuleConfig {
            pattern: pattern.into(),
            ..TextRuleConfig::default()
        })
    }

    fn run(pipeline: &RulePipeline, data: &[Entry], current: &Selection, action: SelectionAction) -> RuleResult {
        pipeline.execute(&RuleContext::new(data, current, action))
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let data = sample();
        let current = Selection::from(["/a/one.jpg".to_string()]);
        let pipeline = RulePipeline::new("empty");

        let result = run(&pipeline, &data, &current, SelectionAction::Mark);
        assert!(result.success);
        assert_eq!(result.selection, current);
        assert_eq!(result.affected_count, 0);
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_all_disabled_pipeline_is_identity() {
        let data = sample();
        let mut pipeline = RulePipeline::new("p");
        let id = pipeline.add_config(text("one"));
        assert!(pipeline.enable_rule(&id, false));

        let result = run(&pipeline, &data, &Selection::new(), SelectionAction::Mark);
        assert!(result.success);
        assert!(result.selection.is_empty());
    }

    #[test]
    fn test_rules_chain_in_order() {
        let data = sample();
        let mut pipeline = RulePipeline::new("p");
        pipeline.add_config(RuleConfig::Group(GroupRuleConfig {
            mode: GroupSelectionMode::SelectAll,
            ..GroupRuleConfig::default()
        }));
        pipeline.add_config(RuleConfig::Directory(DirectoryRuleConfig {
            mode: DirectoryMode::ExcludeDirectory,
            directories: vec!["/a".into()],
            keep_existing_selection: false,
        }));

        // mark everything, then mark /a again: union is still everything
        let marked = run(&pipeline, &data, &Selection::new(), SelectionAction::Mark);
        assert!(marked.success);
        assert_eq!(marked.selection.len(), 4);
        assert_eq!(marked.affected_count, 4);

        let unmarked = run(&pipeline, &data, &marked.selection, SelectionAction::Unmark);
        assert!(unmarked.selection.is_empty());
        assert_eq!(unmarked.affected_count, 4);
    }

    #[test]
    fn test_invalid_rule_is_skipped_and_reported() {
        let data = sample();
        let mut pipeline = RulePipeline::new("p");
        let bad = pipeline.add_config(text(""));
        pipeline.add_config(text("tmp"));

        let result = run(&pipeline, &data, &Selection::new(), SelectionAction::Mark);
        assert!(!result.success);
        assert_eq!(result.selection, Selection::from(["/tmp/two.txt".to_string()]));
        assert_eq!(result.affected_count, 1);
        let error = result.error.unwrap();
        assert!(error.starts_with(&format!("Rule {bad} validation failed")));
    }

    #[test]
    fn test_validate_prefixes_rule_ids() {
        let mut pipeline = RulePipeline::new("p");
        let bad = pipeline.add_config(text(""));
        pipeline.add_config(text("ok"));

        let validation = pipeline.validate();
        assert!(!validation.valid);
        assert_eq!(validation.errors.len(), 1);
        assert!(validation.errors[0].starts_with(&format!("[{bad}] ")));
    }

    #[test]
    fn test_ids_are_unique_and_typed() {
        let mut pipeline = RulePipeline::new("p");
        let a = pipeline.add_config(text("a"));
        let b = pipeline.add_config(text("b"));
        let g = pipeline.add_config(RuleConfig::Group(GroupRuleConfig::default()));
        assert_eq!(a, "text-rule-1");
        assert_eq!(b, "text-rule-2");
        assert_eq!(g, "group-rule-1");

        // ids loaded from JSON are not reissued
        let mut loaded = RulePipeline::from_config(pipeline.to_config().unwrap()).unwrap();
        let next = loaded.add_config(text("c"));
        assert_eq!(next, "text-rule-3");

        assert_ne!(RulePipeline::new("x").id(), RulePipeline::new("x").id());
    }

    #[test]
    fn test_reorder_remove_enable() {
        let mut pipeline = RulePipeline::new("p");
        let a = pipeline.add_config(text("a"));
        let b = pipeline.add_config(text("b"));
        let c = pipeline.add_config(text("c"));

        pipeline.reorder_rules(0, 2);
        let ids = |p: &RulePipeline| -> Vec<String> { p.rules().iter().map(|r| r.id().to_string()).collect() };
        let order = ids(&pipeline);
        assert_eq!(order, vec![b.clone(), c.clone(), a.clone()]);

        pipeline.reorder_rules(0, 9);
        pipeline.reorder_rules(7, 0);
        assert_eq!(ids(&pipeline), order);

        assert!(pipeline.remove_rule(&b));
        assert!(!pipeline.remove_rule(&b));
        assert_eq!(pipeline.rules().len(), 2);

        assert!(pipeline.enable_rule(&c, false));
        assert!(!pipeline.enable_rule("missing", false));
        assert_eq!(pipeline.enabled_rules().count(), 1);
    }

    #[test]
    fn test_json_round_trip_preserves_rules() {
        let mut pipeline = RulePipeline::new("cleanup");
        pipeline.add_config(RuleConfig::Group(GroupRuleConfig {
            mode: GroupSelectionMode::SelectAllExceptOne,
            sort_criteria: vec![SortCriterion::new(SortField::FileSize, SortDirection::Desc)],
            keep_existing_selection: true,
        }));
        let text_id = pipeline.add_config(text("tmp"));
        pipeline.enable_rule(&text_id, false);

        let json = pipeline.to_json().unwrap();
        let restored = RulePipeline::from_json(&json).unwrap();

        assert_eq!(restored.name(), "cleanup");
        assert_eq!(restored.rules(), pipeline.rules());
        assert!(!restored.get_rule(&text_id).unwrap().is_enabled());
    }

    #[test]
    fn test_serialized_shape() {
        let mut pipeline = RulePipeline::new("p");
        pipeline.add_config(RuleConfig::Directory(DirectoryRuleConfig::default()));
        let value = serde_json::to_value(pipeline.to_config().unwrap()).unwrap();
        assert_eq!(value["name"], "p");
        assert_eq!(value["rules"][0]["id"], "directory-rule-1");
        assert_eq!(value["rules"][0]["type"], "directory");
        assert_eq!(value["rules"][0]["enabled"], true);
        assert_eq!(value["rules"][0]["config"]["mode"], "keepOnePerDirectory");
    }

    #[test]
    fn test_from_json_drops_unknown_types() {
        let json = r#"{
            "name": "mixed",
            "rules": [
                { "id": "x-1", "type": "similarity", "config": {}, "enabled": true },
                { "id": "t-1", "type": "text", "config": { "pattern": "tmp" }, "enabled": true }
            ]
        }"#;
        let pipeline = RulePipeline::from_json(json).unwrap();
        assert_eq!(pipeline.rules().len(), 1);
        assert_eq!(pipeline.rules()[0].id(), "t-1");
        assert_eq!(pipeline.rules()[0].rule_type(), RuleType::Text);
    }

    #[test]
    fn test_from_json_rejects_mismatched_config() {
        let json = r#"{ "name": "p", "rules": [ { "id": "g", "type": "group", "config": { "mode": "bogus" }, "enabled": true } ] }"#;
        let err = RulePipeline::from_json(json).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRuleConfig { ref rule_id, .. } if rule_id == "g"));

        assert!(matches!(RulePipeline::from_json("{"), Err(EngineError::InvalidJson(_))));
    }

    #[test]
    fn test_keep_existing_mark_is_superset_across_rules() {
        let data = sample();
        let current = Selection::from(["/elsewhere".to_string(), "/a/one.jpg".to_string()]);
        let mut pipeline = RulePipeline::new("p");
        pipeline.add_config(RuleConfig::Group(GroupRuleConfig::default()));
        pipeline.add_config(text("two"));
        pipeline.add_config(RuleConfig::Directory(DirectoryRuleConfig::default()));

        let ctx = RuleContext::new(&data, &current, SelectionAction::Mark).keep_existing(true);
        let result = pipeline.execute(&ctx);
        assert!(result.selection.is_superset(&current));
    }
}
