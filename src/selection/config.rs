//! Versioned import/export of rule configs.

use semver::Version;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::EngineError;

use super::schema::validate_export_config;
use super::{DirectoryRuleConfig, GroupRuleConfig, TextRuleConfig};

/// Version stamped on every exported document
pub const CONFIG_VERSION: &str = "1.0.0";

/// Persisted config document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_rule: Option<GroupRuleConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_rule: Option<TextRuleConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_rule: Option<DirectoryRuleConfig>,
}

/// Any subset of rule configs, as handed to export
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialRuleConfigs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_rule: Option<GroupRuleConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_rule: Option<TextRuleConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_rule: Option<DirectoryRuleConfig>,
}

/// The full set of rule configs the UI is currently editing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfigs {
    pub group_rule: GroupRuleConfig,
    pub text_rule: TextRuleConfig,
    pub directory_rule: DirectoryRuleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ExportConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ImportResult {
    fn failed(errors: Vec<String>) -> Self {
        Self {
            success: false,
            config: None,
            errors: Some(errors),
        }
    }
}

/// Serialize configs as pretty JSON stamped with [`CONFIG_VERSION`]
pub fn export_config(configs: &PartialRuleConfigs) -> ExportResult {
    let document = ExportConfig {
        version: CONFIG_VERSION.to_string(),
        group_rule: configs.group_rule.clone(),
        text_rule: configs.text_rule.clone(),
        directory_rule: configs.directory_rule.clone(),
    };

    match serde_json::to_string_pretty(&document) {
        Ok(data) => {
            info!(bytes = data.len(), "exported selection config");
            ExportResult {
                success: true,
                data: Some(data),
                error: None,
            }
        }
        Err(e) => {
            warn!(error = %e, "failed to export selection config");
            ExportResult {
                success: false,
                data: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Parse and schema-check a config document
pub fn parse_export_config(json: &str) -> Result<ExportConfig, EngineError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| EngineError::InvalidJson(e.to_string()))?;

    let violations = validate_export_config(&value);
    if !violations.is_empty() {
        return Err(EngineError::Schema(violations));
    }

    Ok(serde_json::from_value(value)?)
}

/// Import a config document, reporting every problem found.
///
/// Version compatibility is not enforced here; see [`is_version_compatible`].
pub fn import_config(json: &str) -> ImportResult {
    match parse_export_config(json) {
        Ok(config) => {
            info!(version = %config.version, "imported selection config");
            ImportResult {
                success: true,
                config: Some(config),
                errors: None,
            }
        }
        Err(EngineError::InvalidJson(_)) => ImportResult::failed(vec!["Invalid JSON".to_string()]),
        Err(EngineError::Schema(errors)) => {
            warn!(count = errors.len(), "rejected selection config");
            ImportResult::failed(errors)
        }
        Err(other) => ImportResult::failed(vec![other.to_string()]),
    }
}

/// Read and import a config document from disk
pub fn read_config_file(path: &Path) -> ImportResult {
    match fs::read_to_string(path) {
        Ok(content) => import_config(&content),
        Err(e) => ImportResult::failed(vec![format!("Failed to read {}: {}", path.display(), e)]),
    }
}

/// Export configs and write them to disk
pub fn write_config_file(path: &Path, configs: &PartialRuleConfigs) -> ExportResult {
    let result = export_config(configs);
    let Some(data) = result.data.as_deref() else {
        return result;
    };

    match fs::write(path, data) {
        Ok(()) => result,
        Err(e) => ExportResult {
            success: false,
            data: None,
            error: Some(format!("Failed to write {}: {}", path.display(), e)),
        },
    }
}

fn leading_component(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

/// Whether a document version shares the major version of [`CONFIG_VERSION`]
pub fn is_version_compatible(version: &str) -> bool {
    match (Version::parse(version), Version::parse(CONFIG_VERSION)) {
        (Ok(theirs), Ok(ours)) => theirs.major == ours.major,
        _ => leading_component(version) == leading_component(CONFIG_VERSION),
    }
}

/// Imported sections replace current ones wholesale; absent sections keep current
pub fn merge_configs(current: &RuleConfigs, imported: &ExportConfig) -> RuleConfigs {
    RuleConfigs {
        group_rule: imported.group_rule.clone().unwrap_or_else(|| current.group_rule.clone()),
        text_rule: imported.text_rule.clone().unwrap_or_else(|| current.text_rule.clone()),
        directory_rule: imported
            .directory_rule
            .clone()
            .unwrap_or_else(|| current.directory_rule.clone()),
    }
}
