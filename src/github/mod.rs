//! GitHub repository access: URL validation, REST inspection, temporary clones

pub mod api;
pub mod clone;
pub mod url;

pub use api::{GitHubClient, InspectionError, RepoMetadata, RepositoryHost};
pub use clone::{CloneError, GitCloner, RepositoryCloner, Workspace};
pub use url::{validate_url, RepoRef, UrlError};
