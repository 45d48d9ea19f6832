//! Deployment artifact generation
//!
//! Consumes the facts resolved by the pipeline and emits two equivalent
//! textual artifacts: a multi-cell notebook and a single-cell script. Both
//! install dependencies, clone the repository, inject environment variables,
//! start the detected application and open a public tunnel when run inside a
//! hosted notebook environment.

pub mod notebook;
pub mod script;

use crate::envfile::EnvMap;
use thiserror::Error;

/// Packages every deployment installs before the repository's own requirements
pub const BASE_PACKAGES: &[&str] = &[
    "pyngrok",
    "fastapi",
    "uvicorn[standard]",
    "python-dotenv",
    "requests",
    "aiofiles",
];

/// Artifact generation failures are programming defects, not user errors
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to serialize notebook document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Everything the emitters need, resolved by the pipeline
#[derive(Debug, Clone)]
pub struct ArtifactInputs<'a> {
    pub repo_url: &'a str,
    pub app_file: &'a str,
    pub app_variable: &'a str,
    pub env: &'a EnvMap,
    pub requirements: Option<&'a str>,
    pub app_name: Option<&'a str>,
    pub ngrok_token: Option<&'a str>,
    pub python_version: &'a str,
    pub deployment_id: &'a str,
}

/// The two generated artifacts
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    /// nbformat-4 notebook document as a JSON string
    pub notebook_json: String,
    /// Flattened copy-paste script
    pub single_cell: String,
}

/// Generates both artifacts from the resolved facts
pub fn generate(inputs: &ArtifactInputs<'_>) -> Result<ArtifactBundle, GenerationError> {
    let notebook_json = notebook::generate(inputs)?;
    let single_cell = script::generate(inputs);

    Ok(ArtifactBundle {
        notebook_json,
        single_cell,
    })
}

/// Base packages plus the non-comment lines of the resolved requirements
pub fn deployment_packages(requirements: Option<&str>) -> Vec<String> {
    let mut packages: Vec<String> = BASE_PACKAGES.iter().map(|p| p.to_string()).collect();

    if let Some(requirements) = requirements {
        for line in requirements.lines() {
            let line = line.trim();
            if !line.is_empty() && !line.starts_with('#') {
                packages.push(line.to_string());
            }
        }
    }

    packages
}

/// Python statements assigning the environment variables, in insertion order
pub(crate) fn env_assignments(env: &EnvMap) -> Vec<String> {
    env.iter()
        .map(|var| {
            let escaped = var.value.replace('\\', "\\\\").replace('"', "\\\"");
            format!("os.environ[\"{}\"] = \"{}\"", var.key, escaped)
        })
        .collect()
}
