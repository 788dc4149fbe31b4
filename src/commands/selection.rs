use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{Entry, Selection, ValidationResult};
use crate::selection::{
    PipelineConfig, Rule, RuleConfig, RuleContext, RulePipeline, RuleResult, SelectionAction, SelectionRule,
};
use crate::settings::EngineSettings;

use super::sorted_paths;

/// Input for running a whole pipeline
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRequest {
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub current_selection: Vec<String>,
    #[serde(default)]
    pub action: SelectionAction,
    #[serde(default)]
    pub keep_existing_selection: bool,
    pub pipeline: PipelineConfig,
}

/// Input for running a single rule outside any pipeline
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRequest {
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub current_selection: Vec<String>,
    #[serde(default)]
    pub action: SelectionAction,
    #[serde(default)]
    pub keep_existing_selection: bool,
    pub rule: RuleConfig,
}

/// Outcome of a selection command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub selection: Vec<String>,
    pub affected_count: usize,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<RuleResult> for SelectionResponse {
    fn from(result: RuleResult) -> Self {
        Self {
            selection: sorted_paths(&result.selection),
            affected_count: result.affected_count,
            success: result.success,
            error: result.error,
        }
    }
}

/// One line of a pipeline overview
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSummary {
    pub id: String,
    pub rule_type: String,
    pub enabled: bool,
    pub description: String,
}

/// Create an empty pipeline, named from settings unless a name is given
pub fn create_pipeline(name: Option<String>, settings: &EngineSettings) -> Result<PipelineConfig, String> {
    let name = name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| settings.default_pipeline_name.clone());
    RulePipeline::new(name).to_config().map_err(String::from)
}

/// Run every enabled rule of a pipeline against the entries
pub fn run_pipeline(request: PipelineRequest) -> Result<SelectionResponse, String> {
    let pipeline = RulePipeline::from_config(request.pipeline).map_err(String::from)?;
    let selection: Selection = request.current_selection.into_iter().collect();
    let ctx = RuleContext::new(&request.entries, &selection, request.action)
        .keep_existing(request.keep_existing_selection);

    let result = pipeline.execute(&ctx);
    info!(
        "Pipeline '{}' finished: {} affected, success={}",
        pipeline.name(),
        result.affected_count,
        result.success
    );
    Ok(result.into())
}

/// Count how many paths a pipeline run would change
pub fn preview_pipeline(request: PipelineRequest) -> Result<usize, String> {
    let pipeline = RulePipeline::from_config(request.pipeline).map_err(String::from)?;
    let selection: Selection = request.current_selection.into_iter().collect();
    let ctx = RuleContext::new(&request.entries, &selection, request.action)
        .keep_existing(request.keep_existing_selection);
    Ok(pipeline.preview(&ctx))
}

/// Run a single rule
pub fn execute_rule(request: RuleRequest) -> Result<SelectionResponse, String> {
    let rule = Rule::from_config(request.rule.rule_type().as_str(), request.rule);
    let selection: Selection = request.current_selection.into_iter().collect();
    let ctx = RuleContext::new(&request.entries, &selection, request.action)
        .keep_existing(request.keep_existing_selection);
    Ok(rule.execute(&ctx).into())
}

/// Validate every rule of a pipeline
pub fn validate_pipeline(pipeline: PipelineConfig) -> Result<ValidationResult, String> {
    let pipeline = RulePipeline::from_config(pipeline).map_err(String::from)?;
    Ok(pipeline.validate())
}

/// Human-readable overview of a pipeline's rules
pub fn describe_pipeline(pipeline: PipelineConfig) -> Result<Vec<RuleSummary>, String> {
    let pipeline = RulePipeline::from_config(pipeline).map_err(String::from)?;
    Ok(pipeline
        .rules()
        .iter()
        .map(|rule| RuleSummary {
            id: rule.id().to_string(),
            rule_type: rule.rule_type().as_str().to_string(),
            enabled: rule.is_enabled(),
            description: rule.describe(),
        })
        .collect())
}
