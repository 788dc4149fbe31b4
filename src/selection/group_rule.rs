//! Group rule: within each duplicate group, order the members by sort
//! criteria and mark all but the first, only the first, or every member.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

use crate::models::{Entry, GroupId, ValidationResult};

use super::matchers::{get_column_value, TextColumn};
use super::{RuleContext, RuleResult, RuleType, SelectionAction, SelectionRule};

/// Which members of each sorted group get matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupSelectionMode {
    /// Everything except the first member after sorting
    #[default]
    SelectAllExceptOne,
    /// Only the first member after sorting
    SelectOne,
    SelectAll,
}

/// Entry attribute a sort criterion reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    FolderPath,
    FileName,
    FileSize,
    /// Falls back to the modification date when no creation date is known
    CreationDate,
    ModifiedDate,
    /// Pixel count (width * height)
    Resolution,
    /// Drive letter on Windows, first path component elsewhere
    Disk,
    FileType,
    Hash,
    HardLinks,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::FolderPath => "folderPath",
            SortField::FileName => "fileName",
            SortField::FileSize => "fileSize",
            SortField::CreationDate => "creationDate",
            SortField::ModifiedDate => "modifiedDate",
            SortField::Resolution => "resolution",
            SortField::Disk => "disk",
            SortField::FileType => "fileType",
            SortField::Hash => "hash",
            SortField::HardLinks => "hardLinks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Pre-sort filter applied to a criterion's field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterCondition {
    #[default]
    None,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Equals,
}

impl FilterCondition {
    fn accepts(&self, value: &str, needle: &str) -> bool {
        match self {
            FilterCondition::None => true,
            FilterCondition::Contains => value.contains(needle),
            FilterCondition::NotContains => !value.contains(needle),
            FilterCondition::StartsWith => value.starts_with(needle),
            FilterCondition::EndsWith => value.ends_with(needle),
            FilterCondition::Equals => value == needle,
        }
    }
}

/// One ordering key of a group rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortCriterion {
    pub field: SortField,
    pub direction: SortDirection,
    /// Empty values sort before non-empty ones regardless of direction
    pub prefer_empty: bool,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_condition: Option<FilterCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_value: Option<String>,
}

impl SortCriterion {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self {
            field,
            direction,
            prefer_empty: false,
            enabled: true,
            filter_condition: None,
            filter_value: None,
        }
    }

    pub fn prefer_empty(mut self) -> Self {
        self.prefer_empty = true;
        self
    }

    pub fn with_filter(mut self, condition: FilterCondition, value: impl Into<String>) -> Self {
        self.filter_condition = Some(condition);
        self.filter_value = Some(value.into());
        self
    }

    /// The filter to apply before sorting, if any
    fn active_filter(&self) -> Option<(FilterCondition, &str)> {
        match (self.filter_condition, self.filter_value.as_deref()) {
            (Some(condition), Some(value)) if condition != FilterCondition::None && !value.is_empty() => {
                Some((condition, value))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupRuleConfig {
    pub mode: GroupSelectionMode,
    pub sort_criteria: Vec<SortCriterion>,
    pub keep_existing_selection: bool,
}

/// Value of a sort field for one entry
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Empty,
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// Missing values and empty strings are both "empty"
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(_) => false,
        }
    }

    /// Display form used by pre-sort filters
    pub fn display(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => format_number(*n),
        }
    }

    /// Text form used when comparing mixed values; zero reads as empty
    fn sort_text(&self) -> String {
        match self {
            FieldValue::Number(n) if *n == 0.0 => String::new(),
            other => other.display(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn optional_number(value: Option<f64>) -> FieldValue {
    value.map(FieldValue::Number).unwrap_or(FieldValue::Empty)
}

fn disk_of(path: &str) -> String {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return path[..2].to_uppercase();
    }
    match path.split('/').find(|part| !part.is_empty()) {
        Some(first) => format!("/{first}"),
        None => "/".to_string(),
    }
}

fn file_type_of(path: &str) -> String {
    let file_name = get_column_value(path, TextColumn::FileName);
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name[idx + 1..].to_lowercase(),
        _ => String::new(),
    }
}

/// Read one sort field from an entry
pub fn field_value(entry: &Entry, field: SortField) -> FieldValue {
    let raw = &entry.raw;
    match field {
        SortField::FolderPath => FieldValue::Text(get_column_value(&entry.path, TextColumn::FolderPath).to_string()),
        SortField::FileName => FieldValue::Text(get_column_value(&entry.path, TextColumn::FileName).to_string()),
        SortField::FileSize => optional_number(raw.size.map(|v| v as f64)),
        SortField::CreationDate => optional_number(raw.created_date.or(raw.modified_date).map(|v| v as f64)),
        SortField::ModifiedDate => optional_number(raw.modified_date.map(|v| v as f64)),
        SortField::Resolution => match (raw.width, raw.height) {
            (Some(w), Some(h)) => FieldValue::Number(f64::from(w) * f64::from(h)),
            _ => FieldValue::Empty,
        },
        SortField::Disk => FieldValue::Text(disk_of(&entry.path)),
        SortField::FileType => FieldValue::Text(file_type_of(&entry.path)),
        SortField::Hash => raw.hash.clone().map(FieldValue::Text).unwrap_or(FieldValue::Empty),
        SortField::HardLinks => optional_number(raw.hardlinks.map(|v| v as f64)),
    }
}

/// Case-insensitive text order, raw order as the tie break
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn compare_by_criterion(a: &Entry, b: &Entry, criterion: &SortCriterion) -> Ordering {
    let value_a = field_value(a, criterion.field);
    let value_b = field_value(b, criterion.field);

    if criterion.prefer_empty {
        match (value_a.is_empty(), value_b.is_empty()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
    }

    let ordering = match (&value_a, &value_b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        _ => compare_text(&value_a.sort_text(), &value_b.sort_text()),
    };

    match criterion.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupRule {
    id: String,
    config: GroupRuleConfig,
    enabled: bool,
}

impl GroupRule {
    pub fn new(id: impl Into<String>, config: GroupRuleConfig) -> Self {
        Self {
            id: id.into(),
            config,
            enabled: true,
        }
    }

    pub fn config(&self) -> &GroupRuleConfig {
        &self.config
    }

    /// Apply filters then order one group's members
    fn sort_group<'a>(&self, group: &[&'a Entry]) -> Vec<&'a Entry> {
        let criteria: Vec<&SortCriterion> = self.config.sort_criteria.iter().filter(|c| c.enabled).collect();

        let mut members: Vec<&'a Entry> = group.to_vec();
        if criteria.is_empty() {
            return members;
        }

        for criterion in &criteria {
            if let Some((condition, needle)) = criterion.active_filter() {
                let needle = needle.to_lowercase();
                members.retain(|entry| {
                    let value = field_value(entry, criterion.field).display().to_lowercase();
                    condition.accepts(&value, &needle)
                });
            }
        }

        members.sort_by(|a, b| {
            criteria
                .iter()
                .map(|criterion| compare_by_criterion(a, b, criterion))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        members
    }

    fn select_by_mode<'a>(&self, sorted: &[&'a Entry]) -> Vec<&'a str> {
        let chosen: &[&Entry] = match self.config.mode {
            GroupSelectionMode::SelectAllExceptOne => sorted.get(1..).unwrap_or(&[]),
            GroupSelectionMode::SelectOne => sorted.get(..1).unwrap_or(&[]),
            GroupSelectionMode::SelectAll => sorted,
        };
        chosen.iter().map(|entry| entry.path.as_str()).collect()
    }

    /// Paths matched across all groups. Ungrouped entries never match.
    fn matched_paths<'a>(&self, data: &'a [Entry]) -> Vec<&'a str> {
        let mut groups: HashMap<GroupId, Vec<&'a Entry>> = HashMap::new();
        for entry in data {
            if let Some(group_id) = entry.group_id {
                groups.entry(group_id).or_default().push(entry);
            }
        }

        groups
            .values()
            .flat_map(|group| {
                let sorted = self.sort_group(group);
                self.select_by_mode(&sorted)
            })
            .collect()
    }
}

impl SelectionRule for GroupRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn rule_type(&self) -> RuleType {
        RuleType::Group
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn execute(&self, ctx: &RuleContext<'_>) -> RuleResult {
        let matched = self.matched_paths(ctx.data);
        debug!(rule = %self.id, matched = matched.len(), action = ?ctx.action, "group rule matched");

        let next = ctx.action.apply(ctx.current_selection, matched);
        RuleResult::success(ctx.current_selection, next)
    }

    fn validate(&self) -> ValidationResult {
        // Modes, fields and conditions are closed enums; nothing else can be wrong.
        ValidationResult::ok()
    }

    fn describe(&self) -> String {
        let mode = match self.config.mode {
            GroupSelectionMode::SelectAllExceptOne => "all but one file in each group",
            GroupSelectionMode::SelectOne => "one file in each group",
            GroupSelectionMode::SelectAll => "every file in each group",
        };
        let criteria: Vec<String> = self
            .config
            .sort_criteria
            .iter()
            .filter(|c| c.enabled)
            .map(|c| format!("{} {}", c.field.as_str(), c.direction.as_str()))
            .collect();

        if criteria.is_empty() {
            format!("Group selection: {mode}")
        } else {
            format!("Group selection: {mode} (sort: {})", criteria.join(", "))
        }
    }
}
