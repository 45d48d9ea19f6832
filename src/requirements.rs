//! Requirements resolution
//!
//! Picks dependency list content by priority: explicit upload beats the
//! repository's own `requirements.txt`, which beats the built-in baseline.
//! Resolution never fails; a remote fetch error counts as absence.

use crate::github::api::RepositoryHost;
use crate::github::url::RepoRef;
use serde::Serialize;
use tracing::{debug, warn};

/// Where the resolved requirements content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementsSource {
    Uploaded,
    Repository,
    Default,
}

impl std::fmt::Display for RequirementsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequirementsSource::Uploaded => write!(f, "uploaded"),
            RequirementsSource::Repository => write!(f, "repository"),
            RequirementsSource::Default => write!(f, "default"),
        }
    }
}

/// Resolved requirements content
///
/// `content` is `None` for [`RequirementsSource::Default`]; the artifact
/// emitter supplies the baseline package list in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequirements {
    pub content: Option<String>,
    pub source: RequirementsSource,
}

/// Resolves requirements for a deployment
pub async fn resolve(
    uploaded: Option<&str>,
    repo: &RepoRef,
    host: &dyn RepositoryHost,
) -> ResolvedRequirements {
    if let Some(uploaded) = uploaded {
        if !uploaded.trim().is_empty() {
            debug!("Using uploaded requirements");
            return ResolvedRequirements {
                content: Some(uploaded.to_string()),
                source: RequirementsSource::Uploaded,
            };
        }
    }

    match host.fetch_requirements(repo).await {
        Ok(Some(content)) if !content.trim().is_empty() => {
            debug!(repo = %repo.full_name(), "Using repository requirements.txt");
            ResolvedRequirements {
                content: Some(content),
                source: RequirementsSource::Repository,
            }
        }
        Ok(_) => ResolvedRequirements {
            content: None,
            source: RequirementsSource::Default,
        },
        Err(e) => {
            warn!(repo = %repo.full_name(), error = %e, "Requirements fetch failed, using defaults");
            ResolvedRequirements {
                content: None,
                source: RequirementsSource::Default,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::api::{InspectionError, RepoMetadata};
    use async_trait::async_trait;

    struct StubHost {
        requirements: Result<Option<String>, ()>,
    }

    #[async_trait]
    impl RepositoryHost for StubHost {
        async fn inspect(&self, _repo: &RepoRef) -> Result<RepoMetadata, InspectionError> {
            unreachable!("requirements resolution never inspects")
        }

        async fn fetch_requirements(
            &self,
            _repo: &RepoRef,
        ) -> Result<Option<String>, InspectionError> {
            match &self.requirements {
                Ok(content) => Ok(content.clone()),
                Err(()) => Err(InspectionError::Network {
                    detail: "connection refused".to_string(),
                }),
            }
        }
    }

    fn repo_fixture() -> RepoRef {
        RepoRef {
            owner: "acme".to_string(),
            name: "demo".to_string(),
            url: "https://github.com/acme/demo".to_string(),
        }
    }

    #[tokio::test]
    async fn test_uploaded_wins_over_repository() {
        let host = StubHost {
            requirements: Ok(Some("django\n".to_string())),
        };

        let resolved = resolve(Some("flask\n"), &repo_fixture(), &host).await;

        assert_eq!(resolved.content.as_deref(), Some("flask\n"));
        assert_eq!(resolved.source, RequirementsSource::Uploaded);
    }

    #[tokio::test]
    async fn test_blank_upload_falls_through() {
        let host = StubHost {
            requirements: Ok(Some("fastapi\n".to_string())),
        };

        let resolved = resolve(Some("   \n"), &repo_fixture(), &host).await;

        assert_eq!(resolved.source, RequirementsSource::Repository);
        assert_eq!(resolved.content.as_deref(), Some("fastapi\n"));
    }

    #[tokio::test]
    async fn test_absent_remote_means_default() {
        let host = StubHost {
            requirements: Ok(None),
        };

        let resolved = resolve(None, &repo_fixture(), &host).await;

        assert_eq!(resolved.source, RequirementsSource::Default);
        assert!(resolved.content.is_none());
    }

    #[tokio::test]
    async fn test_empty_remote_file_means_default() {
        let host = StubHost {
            requirements: Ok(Some("  \n".to_string())),
        };

        let resolved = resolve(None, &repo_fixture(), &host).await;
        assert_eq!(resolved.source, RequirementsSource::Default);
    }

    #[tokio::test]
    async fn test_fetch_failure_means_default() {
        let host = StubHost { requirements: Err(()) };

        let resolved = resolve(None, &repo_fixture(), &host).await;

        assert_eq!(resolved.source, RequirementsSource::Default);
        assert!(resolved.content.is_none());
    }
}
