//! Result rendering for the CLI

use crate::detection::uvicorn_command;
use crate::github::api::RepoMetadata;
use crate::pipeline::{DeployFacts, PipelineError, Stage};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

#[derive(Serialize)]
struct SuccessReport<'a> {
    success: bool,
    facts: &'a DeployFacts,
    notebook_path: String,
    single_cell_path: String,
}

#[derive(Serialize)]
struct FailureReport {
    success: bool,
    stage: Stage,
    error: String,
    suggestions: Vec<String>,
}

#[derive(Serialize)]
struct InspectReport<'a> {
    #[serde(flatten)]
    metadata: &'a RepoMetadata,
    conventional_app_files: Vec<&'a str>,
    has_requirements: bool,
    has_api_layout: bool,
}

/// Renders a successful deployment
pub fn render_success(
    facts: &DeployFacts,
    notebook_path: &Path,
    single_cell_path: &Path,
    format: OutputFormat,
) -> String {
    let report = SuccessReport {
        success: true,
        facts,
        notebook_path: notebook_path.display().to_string(),
        single_cell_path: single_cell_path.display().to_string(),
    };

    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)
            .unwrap_or_else(|e| format!("{{\"error\": \"render failure: {}\"}}", e)),
        OutputFormat::Yaml => serde_yaml::to_string(&report)
            .unwrap_or_else(|e| format!("error: render failure: {}", e)),
        OutputFormat::Human => {
            let mut out = String::new();
            out.push_str(&format!(
                "Deployment artifacts ready for {}\n\n",
                report.facts.repository.full_name()
            ));
            out.push_str(&format!(
                "  entry point:   {} ({})\n",
                report.facts.entry_file, report.facts.app_variable
            ));
            out.push_str(&format!(
                "  run command:   {}\n",
                uvicorn_command(&report.facts.entry_file, &report.facts.app_variable)
            ));
            out.push_str(&format!(
                "  confidence:    {} ({} candidate(s) found)\n",
                report.facts.confidence, report.facts.total_apps_found
            ));
            out.push_str(&format!(
                "  requirements:  {}\n",
                report.facts.requirements_source
            ));
            out.push_str(&format!(
                "  env variables: {}\n\n",
                report.facts.env_var_count
            ));
            for warning in &report.facts.env_warnings {
                out.push_str(&format!("  warning: {}\n", warning));
            }
            out.push_str(&format!("  notebook:     {}\n", report.notebook_path));
            out.push_str(&format!("  single cell:  {}\n", report.single_cell_path));
            out
        }
    }
}

/// Renders a pipeline failure
pub fn render_failure(error: &PipelineError, format: OutputFormat) -> String {
    let report = FailureReport {
        success: false,
        stage: error.stage,
        error: error.to_string(),
        suggestions: error.suggestions(),
    };

    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)
            .unwrap_or_else(|e| format!("{{\"error\": \"render failure: {}\"}}", e)),
        OutputFormat::Yaml => serde_yaml::to_string(&report)
            .unwrap_or_else(|e| format!("error: render failure: {}", e)),
        OutputFormat::Human => {
            let mut out = format!("Error: {}\n", report.error);
            if !report.suggestions.is_empty() {
                out.push_str("\nSuggestions:\n");
                for suggestion in &report.suggestions {
                    out.push_str(&format!("  - {}\n", suggestion));
                }
            }
            out
        }
    }
}

/// Renders a no-clone inspection report
pub fn render_inspection(metadata: &RepoMetadata, format: OutputFormat) -> String {
    let report = InspectReport {
        metadata,
        conventional_app_files: metadata.conventional_app_files(),
        has_requirements: metadata.has_requirements(),
        has_api_layout: metadata.has_api_layout(),
    };

    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)
            .unwrap_or_else(|e| format!("{{\"error\": \"render failure: {}\"}}", e)),
        OutputFormat::Yaml => serde_yaml::to_string(&report)
            .unwrap_or_else(|e| format!("error: render failure: {}", e)),
        OutputFormat::Human => {
            let mut out = format!("{}\n", metadata.reference.full_name());
            if let Some(description) = &metadata.description {
                out.push_str(&format!("  {}\n", description));
            }
            if let Some(language) = &metadata.language {
                out.push_str(&format!("  language: {}\n", language));
            }
            out.push_str(&format!(
                "  top-level: {} file(s), {} dir(s)\n",
                metadata.files.len(),
                metadata.directories.len()
            ));

            let app_files = metadata.conventional_app_files();
            if !app_files.is_empty() {
                out.push_str(&format!("  app files: {}\n", app_files.join(", ")));
            }
            if metadata.has_requirements() {
                out.push_str("  has requirements.txt\n");
            }
            if metadata.has_api_layout() {
                out.push_str("  has an API directory layout\n");
            }
            out
        }
    }
}
