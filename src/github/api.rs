//! GitHub REST API client for repository inspection
//!
//! One metadata request plus one top-level listing request per inspection,
//! both bounded by the configured timeout. The listing is used for display
//! and existence confirmation only; deep scanning always works on a clone.

use crate::config::NbforgeConfig;
use crate::github::url::RepoRef;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("nbforge/", env!("CARGO_PKG_VERSION"));

/// Conventional top-level file names that suggest an application entry point
const CONVENTIONAL_APP_FILES: &[&str] = &["main.py", "app.py", "server.py", "api.py", "run.py"];

/// Top-level directory names that suggest an HTTP API layout
const API_LAYOUT_DIRS: &[&str] = &["api", "routes", "endpoints"];

/// Errors from remote repository inspection
#[derive(Debug, Error)]
pub enum InspectionError {
    /// GitHub reports 404 for both missing and private repositories; the two
    /// cases are indistinguishable from here.
    #[error("repository not found or private")]
    NotFound,

    #[error("GitHub API error: HTTP {status}")]
    Api { status: u16 },

    #[error("network error: {detail}")]
    Network { detail: String },

    #[error("unexpected GitHub API response: {detail}")]
    InvalidResponse { detail: String },
}

impl InspectionError {
    fn from_transport(err: reqwest::Error) -> Self {
        InspectionError::Network {
            detail: err.to_string(),
        }
    }
}

/// Metadata about a repository from a single remote listing
///
/// `files` and `directories` hold top-level entry names in API order.
#[derive(Debug, Clone, Serialize)]
pub struct RepoMetadata {
    pub reference: RepoRef,
    pub description: Option<String>,
    pub language: Option<String>,
    pub files: Vec<String>,
    pub directories: Vec<String>,
}

impl RepoMetadata {
    /// Top-level files matching conventional entry-point names
    pub fn conventional_app_files(&self) -> Vec<&str> {
        self.files
            .iter()
            .map(String::as_str)
            .filter(|f| CONVENTIONAL_APP_FILES.contains(f))
            .collect()
    }

    pub fn has_requirements(&self) -> bool {
        self.files.iter().any(|f| f == "requirements.txt")
    }

    /// True when the top-level layout contains a conventional API directory
    pub fn has_api_layout(&self) -> bool {
        self.directories
            .iter()
            .any(|d| API_LAYOUT_DIRS.contains(&d.as_str()))
    }
}

/// Remote host operations required by the deployment pipeline
///
/// Abstracted as a trait so the orchestrator can run against a mock host in
/// tests without touching the network.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Fetch repository metadata and the top-level directory listing
    async fn inspect(&self, repo: &RepoRef) -> Result<RepoMetadata, InspectionError>;

    /// Fetch and decode a root `requirements.txt`; `Ok(None)` when absent
    async fn fetch_requirements(&self, repo: &RepoRef) -> Result<Option<String>, InspectionError>;
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    description: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct FileContentResponse {
    content: String,
    encoding: String,
}

/// GitHub REST client
pub struct GitHubClient {
    http: Client,
    api_base: String,
}

impl GitHubClient {
    pub fn new(config: &NbforgeConfig) -> Result<Self, InspectionError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.api_timeout())
            .build()
            .map_err(InspectionError::from_transport)?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Client against a non-default API base, with an explicit timeout
    pub fn with_base(api_base: impl Into<String>, timeout: Duration) -> Result<Self, InspectionError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(InspectionError::from_transport)?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn repo_url(&self, repo: &RepoRef) -> String {
        format!("{}/repos/{}/{}", self.api_base, repo.owner, repo.name)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, InspectionError> {
        debug!(url, "GitHub API request");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(InspectionError::from_transport)?;

        match response.status() {
            StatusCode::OK => response
                .json::<T>()
                .await
                .map_err(|e| InspectionError::InvalidResponse {
                    detail: e.to_string(),
                }),
            StatusCode::NOT_FOUND => Err(InspectionError::NotFound),
            status => Err(InspectionError::Api {
                status: status.as_u16(),
            }),
        }
    }
}

#[async_trait]
impl RepositoryHost for GitHubClient {
    async fn inspect(&self, repo: &RepoRef) -> Result<RepoMetadata, InspectionError> {
        info!(repo = %repo.full_name(), "Inspecting repository");

        let details: RepoResponse = self.get_json(&self.repo_url(repo)).await?;

        let listing_url = format!("{}/contents", self.repo_url(repo));
        let entries: Vec<ContentEntry> = self.get_json(&listing_url).await?;

        let mut files = Vec::new();
        let mut directories = Vec::new();
        for entry in entries {
            match entry.kind.as_str() {
                "file" => files.push(entry.name),
                "dir" => directories.push(entry.name),
                _ => {}
            }
        }

        debug!(
            repo = %repo.full_name(),
            files = files.len(),
            directories = directories.len(),
            "Repository listing fetched"
        );

        Ok(RepoMetadata {
            reference: repo.clone(),
            description: details.description,
            language: details.language,
            files,
            directories,
        })
    }

    async fn fetch_requirements(&self, repo: &RepoRef) -> Result<Option<String>, InspectionError> {
        let url = format!("{}/contents/requirements.txt", self.repo_url(repo));

        let file: FileContentResponse = match self.get_json(&url).await {
            Ok(file) => file,
            Err(InspectionError::NotFound) => {
                debug!(repo = %repo.full_name(), "No requirements.txt in repository root");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if file.encoding != "base64" {
            return Err(InspectionError::InvalidResponse {
                detail: format!("unexpected content encoding: {}", file.encoding),
            });
        }

        // The contents API wraps base64 payloads across lines.
        let raw: String = file.content.split_whitespace().collect();
        let bytes = BASE64
            .decode(raw.as_bytes())
            .map_err(|e| InspectionError::InvalidResponse {
                detail: format!("invalid base64 content: {}", e),
            })?;

        match String::from_utf8(bytes) {
            Ok(text) => Ok(Some(text)),
            Err(e) => {
                warn!(repo = %repo.full_name(), error = %e, "requirements.txt is not valid UTF-8");
                Err(InspectionError::InvalidResponse {
                    detail: "requirements.txt is not valid UTF-8".to_string(),
                })
            }
        }
    }
}
