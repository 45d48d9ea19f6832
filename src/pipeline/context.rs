//! Per-run request and result types

use crate::artifacts::ArtifactBundle;
use crate::github::url::RepoRef;
use crate::requirements::RequirementsSource;
use serde::Serialize;

const DEFAULT_PYTHON_VERSION: &str = "3.10";

/// One deployment request
///
/// Constructed per invocation; the pipeline keeps no state between requests.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub url: String,
    pub env_file: Option<String>,
    pub requirements: Option<String>,
    pub app_name: Option<String>,
    pub ngrok_token: Option<String>,
    pub python_version: String,
}

impl DeployRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            env_file: None,
            requirements: None,
            app_name: None,
            ngrok_token: None,
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
        }
    }
}

/// The facts the artifacts were built from, reported back to the caller
#[derive(Debug, Clone, Serialize)]
pub struct DeployFacts {
    pub repository: RepoRef,
    pub description: Option<String>,
    pub language: Option<String>,
    pub entry_file: String,
    pub app_variable: String,
    pub confidence: u32,
    pub total_apps_found: usize,
    pub requirements_source: RequirementsSource,
    pub env_var_count: usize,
    pub has_sensitive_env: bool,
    pub env_warnings: Vec<String>,
    pub deployment_id: String,
}

/// Successful pipeline output: both artifacts plus the facts behind them
///
/// A value object; never mutated after creation.
#[derive(Debug, Clone)]
pub struct DeploymentBundle {
    pub facts: DeployFacts,
    pub artifacts: ArtifactBundle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = DeployRequest::new("https://github.com/acme/demo");
        assert_eq!(request.url, "https://github.com/acme/demo");
        assert_eq!(request.python_version, "3.10");
        assert!(request.env_file.is_none());
        assert!(request.requirements.is_none());
        assert!(request.app_name.is_none());
        assert!(request.ngrok_token.is_none());
    }
}
