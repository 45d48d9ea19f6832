//! Pipeline stages and the aggregated failure shape

use crate::artifacts::GenerationError;
use crate::github::api::InspectionError;
use crate::github::clone::CloneError;
use crate::github::url::UrlError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Validating,
    Inspecting,
    Cloning,
    Scanning,
    Resolving,
    Emitting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "Validating",
            Stage::Inspecting => "Inspecting",
            Stage::Cloning => "Cloning",
            Stage::Scanning => "Scanning",
            Stage::Resolving => "Resolving",
            Stage::Emitting => "Emitting",
        };
        write!(f, "{}", name)
    }
}

/// The failure a single stage can produce
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Url(#[from] UrlError),

    #[error(transparent)]
    Inspection(#[from] InspectionError),

    #[error(transparent)]
    Clone(#[from] CloneError),

    /// No application detected: a valid terminal outcome of scanning, always
    /// reported with remediation suggestions
    #[error("no FastAPI application found in the repository")]
    NoApplication,

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("deployment cancelled")]
    Cancelled,
}

/// A stage name plus its typed failure, suitable for direct user display
#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: StageError) -> Self {
        Self { stage, source }
    }

    /// Actionable hints for the user, empty when there is nothing to suggest
    pub fn suggestions(&self) -> Vec<String> {
        match &self.source {
            StageError::Url(UrlError::Empty) => vec![
                "provide a repository URL such as https://github.com/<owner>/<repository>"
                    .to_string(),
            ],
            StageError::Url(UrlError::Malformed) => vec![
                "use the form https://github.com/<owner>/<repository>".to_string(),
                "remove any extra path segments like /tree/main".to_string(),
            ],
            StageError::Inspection(InspectionError::NotFound) => vec![
                "check the URL for typos".to_string(),
                "ensure the repository is public".to_string(),
            ],
            StageError::Inspection(InspectionError::Api { .. }) => vec![
                "GitHub may be rate limiting unauthenticated requests; try again later"
                    .to_string(),
            ],
            StageError::Inspection(InspectionError::Network { .. }) => vec![
                "check your network connection".to_string(),
            ],
            StageError::Inspection(InspectionError::InvalidResponse { .. }) => Vec::new(),
            StageError::Clone(CloneError::GitMissing) => vec![
                "install git and ensure it is on PATH".to_string(),
            ],
            StageError::Clone(CloneError::Timeout { .. }) => vec![
                "the repository may be very large; try again".to_string(),
            ],
            StageError::Clone(_) => vec![
                "verify the repository can be cloned anonymously".to_string(),
            ],
            StageError::NoApplication => vec![
                "ensure the repository contains a FastAPI app".to_string(),
                "check that FastAPI is imported in your Python files".to_string(),
                "name the main application file main.py, app.py or similar, with an instance like app = FastAPI()"
                    .to_string(),
            ],
            StageError::Generation(_) => vec![
                "this is a defect in nbforge rather than a problem with the repository; please report it"
                    .to_string(),
            ],
            StageError::Cancelled => Vec::new(),
        }
    }
}
