//! Engine settings
//!
//! Small set of knobs the host application can override through the
//! environment (or a `.env` file next to the binary):
//!
//! - `DUPE_ASSIST_LOG` - tracing filter directive, e.g. `dupe_assist=debug`
//! - `DUPE_ASSIST_PIPELINE_NAME` - name given to freshly created pipelines
//! - `DUPE_ASSIST_STRICT_VERSION` - reject imported configs from another major version

use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_LOG: &str = "DUPE_ASSIST_LOG";
const ENV_PIPELINE_NAME: &str = "DUPE_ASSIST_PIPELINE_NAME";
const ENV_STRICT_VERSION: &str = "DUPE_ASSIST_STRICT_VERSION";

/// Runtime settings for the selection and filter engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSettings {
    /// Tracing filter directive used by [`crate::logging::init`]
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Name assigned to pipelines created without an explicit name
    #[serde(default = "default_pipeline_name")]
    pub default_pipeline_name: String,

    /// Reject imports whose major version differs from the current config version
    #[serde(default)]
    pub reject_incompatible_versions: bool,
}

fn default_log_filter() -> String {
    "dupe_assist=info".to_string()
}

fn default_pipeline_name() -> String {
    "Default pipeline".to_string()
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            default_pipeline_name: default_pipeline_name(),
            reject_incompatible_versions: false,
        }
    }
}

impl EngineSettings {
    /// Load settings from the process environment, reading `.env` first if present.
    pub fn from_env() -> Self {
        // A missing .env is the normal case
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load settings from an explicit env file without touching the process environment.
    pub fn from_env_file(path: &Path) -> Result<Self, String> {
        let vars: Vec<(String, String)> = dotenvy::from_path_iter(path)
            .map_err(|e| format!("Failed to read settings file {:?}: {}", path, e))?
            .collect::<Result<_, _>>()
            .map_err(|e| format!("Failed to parse settings file {:?}: {}", path, e))?;

        Ok(Self::from_vars(|key| {
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        }))
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let log_filter = lookup(ENV_LOG)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        let default_pipeline_name = lookup(ENV_PIPELINE_NAME)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.default_pipeline_name);

        let reject_incompatible_versions = lookup(ENV_STRICT_VERSION)
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.reject_incompatible_versions);

        Self {
            log_filter,
            default_pipeline_name,
            reject_incompatible_versions,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
