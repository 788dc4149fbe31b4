//! Structural checks for imported config JSON.
//!
//! Serde stops at the first problem; import needs every offending field, so
//! the parsed value is walked by hand first. Messages read
//! `<dotted.path>: <problem>`, with array indices as path segments.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{DirectoryMode, FilterCondition, GroupSelectionMode, MatchCondition, SortDirection, SortField, TextColumn};

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

#[derive(Default)]
struct SchemaWalker {
    errors: Vec<String>,
}

impl SchemaWalker {
    fn fail(&mut self, path: &str, message: impl AsRef<str>) {
        if path.is_empty() {
            self.errors.push(message.as_ref().to_string());
        } else {
            self.errors.push(format!("{path}: {}", message.as_ref()));
        }
    }

    fn expect_kind(&mut self, value: &Value, path: &str, expected: &str) -> bool {
        let actual = kind(value);
        if actual == expected {
            true
        } else {
            self.fail(path, format!("Expected {expected}, received {actual}"));
            false
        }
    }

    fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        if self.expect_kind(value, path, "object") {
            value.as_object()
        } else {
            None
        }
    }

    fn required<'v>(&mut self, obj: &'v Map<String, Value>, key: &str, parent: &str) -> Option<&'v Value> {
        let value = obj.get(key);
        if value.is_none() {
            self.fail(&join(parent, key), "Required");
        }
        value
    }

    fn string(&mut self, obj: &Map<String, Value>, key: &str, parent: &str) {
        if let Some(value) = self.required(obj, key, parent) {
            self.expect_kind(value, &join(parent, key), "string");
        }
    }

    fn boolean(&mut self, obj: &Map<String, Value>, key: &str, parent: &str) {
        if let Some(value) = self.required(obj, key, parent) {
            self.expect_kind(value, &join(parent, key), "boolean");
        }
    }

    /// Check a value against a serde enum; serde's message lists the variants
    fn variant<T: DeserializeOwned>(&mut self, value: &Value, path: &str) {
        if let Err(e) = serde_json::from_value::<T>(value.clone()) {
            self.fail(path, e.to_string());
        }
    }

    fn enum_field<T: DeserializeOwned>(&mut self, obj: &Map<String, Value>, key: &str, parent: &str) {
        if let Some(value) = self.required(obj, key, parent) {
            self.variant::<T>(value, &join(parent, key));
        }
    }

    fn array<'v>(&mut self, obj: &'v Map<String, Value>, key: &str, parent: &str) -> Option<&'v Vec<Value>> {
        let value = self.required(obj, key, parent)?;
        if self.expect_kind(value, &join(parent, key), "array") {
            value.as_array()
        } else {
            None
        }
    }

    fn sort_criterion(&mut self, value: &Value, path: &str) {
        let Some(obj) = self.object(value, path) else {
            return;
        };
        self.enum_field::<SortField>(obj, "field", path);
        self.enum_field::<SortDirection>(obj, "direction", path);
        self.boolean(obj, "preferEmpty", path);
        self.boolean(obj, "enabled", path);
        if let Some(condition) = obj.get("filterCondition") {
            self.variant::<FilterCondition>(condition, &join(path, "filterCondition"));
        }
        if let Some(filter_value) = obj.get("filterValue") {
            self.expect_kind(filter_value, &join(path, "filterValue"), "string");
        }
    }

    fn group_rule(&mut self, value: &Value, path: &str) {
        let Some(obj) = self.object(value, path) else {
            return;
        };
        self.enum_field::<GroupSelectionMode>(obj, "mode", path);
        if let Some(criteria) = self.array(obj, "sortCriteria", path) {
            let criteria_path = join(path, "sortCriteria");
            for (index, criterion) in criteria.iter().enumerate() {
                self.sort_criterion(criterion, &join(&criteria_path, &index.to_string()));
            }
        }
        self.boolean(obj, "keepExistingSelection", path);
    }

    fn text_rule(&mut self, value: &Value, path: &str) {
        let Some(obj) = self.object(value, path) else {
            return;
        };
        self.enum_field::<TextColumn>(obj, "column", path);
        self.enum_field::<MatchCondition>(obj, "condition", path);
        self.string(obj, "pattern", path);
        self.boolean(obj, "useRegex", path);
        self.boolean(obj, "caseSensitive", path);
        self.boolean(obj, "keepExistingSelection", path);
    }

    fn directory_rule(&mut self, value: &Value, path: &str) {
        let Some(obj) = self.object(value, path) else {
            return;
        };
        self.enum_field::<DirectoryMode>(obj, "mode", path);
        if let Some(directories) = self.array(obj, "directories", path) {
            let directories_path = join(path, "directories");
            for (index, directory) in directories.iter().enumerate() {
                self.expect_kind(directory, &join(&directories_path, &index.to_string()), "string");
            }
        }
        self.boolean(obj, "keepExistingSelection", path);
    }
}

/// Every schema violation in an exported config document
pub(crate) fn validate_export_config(value: &Value) -> Vec<String> {
    let mut walker = SchemaWalker::default();

    if let Some(root) = walker.object(value, "") {
        walker.string(root, "version", "");
        if let Some(group) = root.get("groupRule") {
            walker.group_rule(group, "groupRule");
        }
        if let Some(text) = root.get("textRule") {
            walker.text_rule(text, "textRule");
        }
        if let Some(directory) = root.get("directoryRule") {
            walker.directory_rule(directory, "directoryRule");
        }
    }

    walker.errors
}
