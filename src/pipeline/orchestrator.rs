//! Pipeline orchestration
//!
//! Drives one deployment request through the stage sequence
//! Validating -> Inspecting -> Cloning -> Scanning -> Resolving -> Emitting,
//! translating every stage failure into a single `{stage, error}` shape. No
//! stage is retried. The cloned workspace is released on every exit path
//! once Cloning has succeeded, including cancellation and failures in later
//! stages; release problems are logged and never mask the pipeline result.
//!
//! A pipeline instance is built per request from injected collaborators and
//! holds no state across invocations.

use crate::artifacts::{self, ArtifactInputs};
use crate::detection::{resolve_variable, AppScanner, ResolvedEntryPoint};
use crate::envfile::EnvMap;
use crate::github::api::{RepoMetadata, RepositoryHost};
use crate::github::clone::{RepositoryCloner, Workspace};
use crate::github::url::{validate_url, RepoRef};
use crate::pipeline::context::{DeployFacts, DeployRequest, DeploymentBundle};
use crate::pipeline::error::{PipelineError, Stage, StageError};
use crate::requirements;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct DeployPipeline<'a> {
    host: &'a dyn RepositoryHost,
    cloner: &'a dyn RepositoryCloner,
    scanner: AppScanner,
    cancel: Arc<AtomicBool>,
}

impl<'a> DeployPipeline<'a> {
    pub fn new(host: &'a dyn RepositoryHost, cloner: &'a dyn RepositoryCloner) -> Self {
        Self {
            host,
            cloner,
            scanner: AppScanner::new(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shares a cancellation flag with the caller
    ///
    /// The flag is checked between stages; setting it stops the run before
    /// the next stage starts. A run cancelled after Cloning still releases
    /// its workspace.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Runs the full pipeline for one request
    pub async fn deploy(&self, request: &DeployRequest) -> Result<DeploymentBundle, PipelineError> {
        let start = std::time::Instant::now();

        info!(url = %request.url, "Stage: Validating");
        self.checkpoint(Stage::Validating)?;
        let repo =
            validate_url(&request.url).map_err(|e| PipelineError::new(Stage::Validating, e.into()))?;

        info!(repo = %repo.full_name(), "Stage: Inspecting");
        self.checkpoint(Stage::Inspecting)?;
        let metadata = self
            .host
            .inspect(&repo)
            .await
            .map_err(|e| PipelineError::new(Stage::Inspecting, e.into()))?;

        info!(repo = %repo.full_name(), "Stage: Cloning");
        self.checkpoint(Stage::Cloning)?;
        let mut workspace = self
            .cloner
            .clone_temporary(&repo)
            .await
            .map_err(|e| PipelineError::new(Stage::Cloning, e.into()))?;

        // Everything past this point runs with the workspace held; release
        // is unconditional whatever the outcome.
        let outcome = self
            .resolve_and_emit(request, &repo, &metadata, &workspace)
            .await;
        workspace.release();

        match &outcome {
            Ok(_) => info!(
                repo = %repo.full_name(),
                elapsed_ms = start.elapsed().as_millis(),
                "Pipeline complete"
            ),
            Err(e) => info!(
                repo = %repo.full_name(),
                stage = %e.stage,
                elapsed_ms = start.elapsed().as_millis(),
                "Pipeline failed"
            ),
        }

        outcome
    }

    async fn resolve_and_emit(
        &self,
        request: &DeployRequest,
        repo: &RepoRef,
        metadata: &RepoMetadata,
        workspace: &Workspace,
    ) -> Result<DeploymentBundle, PipelineError> {
        info!(repo = %repo.full_name(), "Stage: Scanning");
        self.checkpoint(Stage::Scanning)?;
        let scan = self.scanner.scan(workspace.root());

        let Some(best) = self.scanner.pick_best(&scan.candidates) else {
            return Err(PipelineError::new(Stage::Scanning, StageError::NoApplication));
        };
        debug!(
            entry = %best.path,
            confidence = best.confidence,
            candidates = scan.candidates.len(),
            "Selected entry point"
        );

        info!(repo = %repo.full_name(), "Stage: Resolving");
        self.checkpoint(Stage::Resolving)?;

        // The resolver is total, so an unreadable winner still yields the
        // default identifier rather than a failure.
        let content = match fs::read_to_string(workspace.root().join(&best.path)) {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %best.path, error = %e, "Could not re-read entry file");
                String::new()
            }
        };
        let entry = ResolvedEntryPoint {
            file: best.path.clone(),
            variable: resolve_variable(&content),
        };

        let resolved =
            requirements::resolve(request.requirements.as_deref(), repo, self.host).await;

        let env = request
            .env_file
            .as_deref()
            .map(EnvMap::parse)
            .unwrap_or_default();

        info!(repo = %repo.full_name(), "Stage: Emitting");
        self.checkpoint(Stage::Emitting)?;
        let deployment_id = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();

        let inputs = ArtifactInputs {
            repo_url: &repo.url,
            app_file: &entry.file,
            app_variable: &entry.variable,
            env: &env,
            requirements: resolved.content.as_deref(),
            app_name: request.app_name.as_deref(),
            ngrok_token: request.ngrok_token.as_deref(),
            python_version: &request.python_version,
            deployment_id: &deployment_id,
        };
        let bundle = artifacts::generate(&inputs)
            .map_err(|e| PipelineError::new(Stage::Emitting, e.into()))?;

        let facts = DeployFacts {
            repository: repo.clone(),
            description: metadata.description.clone(),
            language: metadata.language.clone(),
            entry_file: entry.file,
            app_variable: entry.variable,
            confidence: best.confidence,
            total_apps_found: scan.candidates.len(),
            requirements_source: resolved.source,
            env_var_count: env.len(),
            has_sensitive_env: env.has_sensitive(),
            env_warnings: env.warnings(),
            deployment_id,
        };

        Ok(DeploymentBundle {
            facts,
            artifacts: bundle,
        })
    }

    fn checkpoint(&self, stage: Stage) -> Result<(), PipelineError> {
        if self.cancel.load(Ordering::Relaxed) {
            warn!(stage = %stage, "Deployment cancelled");
            return Err(PipelineError::new(stage, StageError::Cancelled));
        }
        Ok(())
    }
}
