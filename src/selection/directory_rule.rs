//! Directory rule: match entries by where they live on disk.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::models::{Entry, GroupId, ValidationResult};

use super::matchers::{get_directory, is_in_directory};
use super::{RuleContext, RuleResult, RuleType, SelectionRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DirectoryMode {
    /// Within each group, collapse duplicates that share a directory
    #[default]
    KeepOnePerDirectory,
    /// Everything under any configured directory
    SelectAllInDirectory,
    /// Same membership test as `SelectAllInDirectory`; the UI pairs it with unmark
    ExcludeDirectory,
}

impl DirectoryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectoryMode::KeepOnePerDirectory => "keepOnePerDirectory",
            DirectoryMode::SelectAllInDirectory => "selectAllInDirectory",
            DirectoryMode::ExcludeDirectory => "excludeDirectory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectoryRuleConfig {
    pub mode: DirectoryMode,
    pub directories: Vec<String>,
    pub keep_existing_selection: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryRule {
    id: String,
    config: DirectoryRuleConfig,
    enabled: bool,
}

/// Group members in input order; ungrouped entries stand alone
fn partition_by_group(data: &[Entry]) -> Vec<Vec<&Entry>> {
    let mut index: HashMap<GroupId, usize> = HashMap::new();
    let mut groups: Vec<Vec<&Entry>> = Vec::new();

    for entry in data {
        match entry.group_id {
            Some(group_id) => {
                let slot = *index.entry(group_id).or_insert_with(|| {
                    groups.push(Vec::new());
                    groups.len() - 1
                });
                groups[slot].push(entry);
            }
            None => groups.push(vec![entry]),
        }
    }
    groups
}

/// Bucket one group's members by parent directory, keeping first-seen order
fn partition_by_directory<'a>(group: &[&'a Entry]) -> Vec<Vec<&'a Entry>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<Vec<&'a Entry>> = Vec::new();

    for &entry in group {
        let dir = get_directory(&entry.path);
        let slot = *index.entry(dir).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[slot].push(entry);
    }
    buckets
}

impl DirectoryRule {
    pub fn new(id: impl Into<String>, config: DirectoryRuleConfig) -> Self {
        Self {
            id: id.into(),
            config,
            enabled: true,
        }
    }

    pub fn config(&self) -> &DirectoryRuleConfig {
        &self.config
    }

    fn keep_one_per_directory<'a>(&self, data: &'a [Entry]) -> Vec<&'a str> {
        let mut matched = Vec::new();

        for group in partition_by_group(data) {
            let buckets = partition_by_directory(&group);

            if let [only] = buckets.as_slice() {
                let non_ref: Vec<&Entry> = only.iter().copied().filter(|entry| !entry.is_ref).collect();
                let chosen = if non_ref.is_empty() { only.clone() } else { non_ref };
                matched.extend(chosen.iter().map(|entry| entry.path.as_str()));
            } else {
                for bucket in &buckets {
                    matched.extend(bucket.iter().skip(1).map(|entry| entry.path.as_str()));
                }
            }
        }
        matched
    }

    fn in_configured_directories<'a>(&self, data: &'a [Entry]) -> Vec<&'a str> {
        data.iter()
            .filter(|entry| self.config.directories.iter().any(|dir| is_in_directory(&entry.path, dir)))
            .map(|entry| entry.path.as_str())
            .collect()
    }
}

impl SelectionRule for DirectoryRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn rule_type(&self) -> RuleType {
        RuleType::Directory
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn execute(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let matched = match self.config.mode {
            DirectoryMode::KeepOnePerDirectory => self.keep_one_per_directory(ctx.data),
            DirectoryMode::SelectAllInDirectory | DirectoryMode::ExcludeDirectory => {
                self.in_configured_directories(ctx.data)
            }
        };
        debug!(
            rule = %self.id,
            mode = self.config.mode.as_str(),
            matched = matched.len(),
            action = ?ctx.action,
            "directory rule matched"
        );

        let next = ctx.action.apply(ctx.current_selection, matched);
        RuleResult::success(ctx.current_selection, next)
    }

    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        match self.config.mode {
            DirectoryMode::KeepOnePerDirectory => {}
            DirectoryMode::SelectAllInDirectory | DirectoryMode::ExcludeDirectory => {
                if self.config.directories.is_empty() {
                    errors.push(format!("At least one directory is required for {}", self.config.mode.as_str()));
                }
            }
        }

        ValidationResult::from_errors(errors)
    }

    fn describe(&self) -> String {
        let mode = match self.config.mode {
            DirectoryMode::KeepOnePerDirectory => "keep one file per directory",
            DirectoryMode::SelectAllInDirectory => "select everything in",
            DirectoryMode::ExcludeDirectory => "exclude",
        };

        match self.config.directories.as_slice() {
            [] => format!("Directory selection: {mode}"),
            [first] => format!("Directory selection: {mode} {first}"),
            [first, rest @ ..] => format!("Directory selection: {mode} {first} and {} more", rest.len()),
        }
    }
}
