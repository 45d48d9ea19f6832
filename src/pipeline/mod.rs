//! Deployment pipeline
//!
//! Stage-by-stage orchestration from raw URL to artifact bundle, with a
//! typed failure per stage and guaranteed workspace cleanup.

pub mod context;
pub mod error;
pub mod orchestrator;

pub use context::{DeployFacts, DeployRequest, DeploymentBundle};
pub use error::{PipelineError, Stage, StageError};
pub use orchestrator::DeployPipeline;
