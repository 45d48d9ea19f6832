//! nbforge - FastAPI repository analysis and notebook deployment artifacts
//!
//! This library takes a public GitHub repository URL, statically locates a
//! FastAPI application inside it, and generates two deployment artifacts: a
//! multi-cell notebook and an equivalent single-cell script. Executed in a
//! hosted notebook environment, the artifacts install dependencies, clone
//! the repository, start the detected application and expose it through a
//! public tunnel.
//!
//! # Core Concepts
//!
//! - **Pipeline**: a per-request stage machine (validate, inspect, clone,
//!   scan, resolve, emit) where every stage returns a typed failure and the
//!   temporary clone is released on every exit path
//! - **Detection**: regex pattern matching over the cloned tree with an
//!   additive confidence score per candidate file; the repository's code is
//!   never executed
//! - **Artifacts**: opaque textual outputs built from the resolved facts
//!
//! # Example Usage
//!
//! ```ignore
//! use nbforge::config::NbforgeConfig;
//! use nbforge::github::{GitHubClient, GitCloner};
//! use nbforge::pipeline::{DeployPipeline, DeployRequest};
//!
//! async fn deploy(url: &str) -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NbforgeConfig::default();
//!     let client = GitHubClient::new(&config)?;
//!     let cloner = GitCloner::new(config.git_bin.clone(), config.clone_timeout());
//!
//!     let pipeline = DeployPipeline::new(&client, &cloner);
//!     let bundle = pipeline.deploy(&DeployRequest::new(url)).await?;
//!
//!     println!("entry point: {}", bundle.facts.entry_file);
//!     println!("{}", bundle.artifacts.single_cell);
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`github`]: URL validation, REST inspection and temporary clones
//! - [`detection`]: candidate scanning and entry-point resolution
//! - [`pipeline`]: the orchestrator and its error taxonomy
//! - [`artifacts`]: notebook and single-cell script emitters

// Public modules
pub mod artifacts;
pub mod cli;
pub mod config;
pub mod detection;
pub mod envfile;
pub mod github;
pub mod pipeline;
pub mod requirements;
pub mod util;

// Re-export key types for convenient access
pub use config::{ConfigError, NbforgeConfig};
pub use detection::{AppScanner, ResolvedEntryPoint};
pub use envfile::EnvMap;
pub use github::{
    validate_url, CloneError, GitCloner, GitHubClient, InspectionError, RepoRef, RepositoryCloner,
    RepositoryHost, UrlError, Workspace,
};
pub use pipeline::{DeployPipeline, DeployRequest, DeploymentBundle, PipelineError, Stage};
pub use requirements::{RequirementsSource, ResolvedRequirements};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_nbforge() {
        assert_eq!(NAME, "nbforge");
    }
}
