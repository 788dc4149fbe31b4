use std::path::PathBuf;

use tracing::warn;

use crate::selection::{
    export_config, import_config, is_version_compatible, merge_configs, read_config_file, write_config_file,
    ExportConfig, ImportResult, PartialRuleConfigs, RuleConfigs, CONFIG_VERSION,
};
use crate::settings::EngineSettings;

fn accept_import(result: ImportResult, settings: &EngineSettings) -> Result<ExportConfig, String> {
    let config = match (result.success, result.config) {
        (true, Some(config)) => config,
        _ => return Err(result.errors.unwrap_or_default().join("; ")),
    };

    if settings.reject_incompatible_versions && !is_version_compatible(&config.version) {
        warn!("Rejected config version {} (current {})", config.version, CONFIG_VERSION);
        return Err(format!(
            "Unsupported config version {}; expected {}",
            config.version, CONFIG_VERSION
        ));
    }

    Ok(config)
}

/// Serialize the given rule configs to a JSON document
pub fn export_selection_config(configs: PartialRuleConfigs) -> Result<String, String> {
    let result = export_config(&configs);
    result
        .data
        .ok_or_else(|| result.error.unwrap_or_else(|| "Export failed".to_string()))
}

/// Parse and validate a JSON config document
pub fn import_selection_config(json: String, settings: &EngineSettings) -> Result<ExportConfig, String> {
    accept_import(import_config(&json), settings)
}

/// Import a document and merge it over the configs currently being edited
pub fn merge_selection_config(
    current: RuleConfigs,
    json: String,
    settings: &EngineSettings,
) -> Result<RuleConfigs, String> {
    let imported = accept_import(import_config(&json), settings)?;
    Ok(merge_configs(&current, &imported))
}

/// Write the given rule configs to a file
pub fn save_selection_config(path: PathBuf, configs: PartialRuleConfigs) -> Result<(), String> {
    let result = write_config_file(&path, &configs);
    if result.success {
        Ok(())
    } else {
        Err(result.error.unwrap_or_else(|| "Export failed".to_string()))
    }
}

/// Read a config document from a file
pub fn load_selection_config(path: PathBuf, settings: &EngineSettings) -> Result<ExportConfig, String> {
    accept_import(read_config_file(&path), settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{TextColumn, TextRuleConfig};
    use tempfile::TempDir;

    fn text_only() -> PartialRuleConfigs {
        PartialRuleConfigs {
            text_rule: Some(TextRuleConfig {
                column: TextColumn::FileName,
                pattern: "copy".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_export_then_import() {
        let json = export_selection_config(text_only()).unwrap();
        let config = import_selection_config(json, &EngineSettings::default()).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.text_rule, text_only().text_rule);
        assert!(config.group_rule.is_none());
    }

    #[test]
    fn test_import_errors_are_joined() {
        let error = import_selection_config("{not json".to_string(), &EngineSettings::default()).unwrap_err();
        assert_eq!(error, "Invalid JSON");

        let error = import_selection_config("{}".to_string(), &EngineSettings::default()).unwrap_err();
        assert!(error.contains("version"));
    }

    #[test]
    fn test_strict_version_check() {
        let json = r#"{ "version": "2.0.0" }"#.to_string();

        assert!(import_selection_config(json.clone(), &EngineSettings::default()).is_ok());

        let strict = EngineSettings {
            reject_incompatible_versions: true,
            ..Default::default()
        };
        let error = import_selection_config(json, &strict).unwrap_err();
        assert!(error.contains("2.0.0"));

        let same_major = r#"{ "version": "1.4.0" }"#.to_string();
        assert!(import_selection_config(same_major, &strict).is_ok());
    }

    #[test]
    fn test_merge_keeps_absent_sections() {
        let mut current = RuleConfigs::default();
        current.directory_rule.directories = vec!["/keep".to_string()];

        let json = export_selection_config(text_only()).unwrap();
        let merged = merge_selection_config(current, json, &EngineSettings::default()).unwrap();

        assert_eq!(merged.text_rule.pattern, "copy");
        assert_eq!(merged.directory_rule.directories, vec!["/keep"]);
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("selection.json");

        save_selection_config(path.clone(), text_only()).unwrap();
        let loaded = load_selection_config(path, &EngineSettings::default()).unwrap();
        assert_eq!(loaded.text_rule, text_only().text_rule);

        let missing = load_selection_config(temp.path().join("missing.json"), &EngineSettings::default());
        assert!(missing.unwrap_err().contains("Failed to read"));
    }
}
