//! Temporary repository clones
//!
//! Each pipeline run gets its own uniquely named scratch directory holding a
//! full checkout. The directory is exclusively owned by that run and removed
//! on every exit path; removal is best-effort and never fails the pipeline.

use crate::github::url::RepoRef;
use async_trait::async_trait;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Cap on captured stderr carried inside `CloneError::Failed`
const MAX_STDERR_LEN: usize = 2048;

/// Errors from the clone subprocess
#[derive(Debug, Error)]
pub enum CloneError {
    #[error("git clone timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("git executable not found; install git and ensure it is on PATH")]
    GitMissing,

    #[error("git clone failed: {stderr}")]
    Failed { stderr: String },

    #[error("failed to prepare workspace: {0}")]
    Io(#[from] std::io::Error),
}

/// An exclusively owned scratch checkout of a repository
///
/// Created by [`RepositoryCloner::clone_temporary`]; destroyed exactly once
/// per pipeline run via [`Workspace::release`]. `Drop` is a backstop for the
/// paths where release was not reached, so the directory is never leaked.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    pub reference: RepoRef,
}

impl Workspace {
    pub fn new(root: PathBuf, reference: RepoRef) -> Self {
        Self { root, reference }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Removes the workspace directory
    ///
    /// Idempotent: calling it again, or on an already-removed path, is a
    /// no-op. Removal escalates once through a forced-writable pass (clone
    /// tools may leave read-only objects behind); a final failure is logged
    /// and swallowed.
    pub fn release(&mut self) {
        if !self.root.exists() {
            return;
        }

        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                debug!(path = %self.root.display(), "Workspace removed");
            }
            Err(first) => {
                make_writable(&self.root);
                if let Err(second) = fs::remove_dir_all(&self.root) {
                    warn!(
                        path = %self.root.display(),
                        first_error = %first,
                        error = %second,
                        "Failed to remove workspace, leaving it behind"
                    );
                } else {
                    debug!(path = %self.root.display(), "Workspace removed after permission fix");
                }
            }
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.release();
    }
}

/// Recursively clears read-only bits so removal can proceed
fn make_writable(path: &Path) {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return;
    };

    let mut perms = metadata.permissions();
    if perms.readonly() {
        perms.set_readonly(false);
        let _ = fs::set_permissions(path, perms);
    }

    if metadata.is_dir() {
        if let Ok(entries) = fs::read_dir(path) {
            for entry in entries.flatten() {
                make_writable(&entry.path());
            }
        }
    }
}

/// Clone operations required by the deployment pipeline
#[async_trait]
pub trait RepositoryCloner: Send + Sync {
    async fn clone_temporary(&self, repo: &RepoRef) -> Result<Workspace, CloneError>;
}

/// Clones repositories with the system git client
pub struct GitCloner {
    git_bin: String,
    timeout: Duration,
    scratch_root: PathBuf,
}

impl GitCloner {
    pub fn new(git_bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            git_bin: git_bin.into(),
            timeout,
            scratch_root: env::temp_dir(),
        }
    }

    /// Overrides the parent directory for scratch checkouts
    pub fn with_scratch_root(mut self, root: PathBuf) -> Self {
        self.scratch_root = root;
        self
    }

    fn scratch_path(&self, repo: &RepoRef) -> PathBuf {
        // Random suffix keeps concurrent runs collision-free.
        let dir_name = format!(
            "nbforge-{}-{}-{}",
            repo.owner,
            repo.name,
            Uuid::new_v4().simple()
        );
        self.scratch_root.join(dir_name)
    }
}

#[async_trait]
impl RepositoryCloner for GitCloner {
    async fn clone_temporary(&self, repo: &RepoRef) -> Result<Workspace, CloneError> {
        let root = self.scratch_path(repo);
        info!(repo = %repo.full_name(), dest = %root.display(), "Cloning repository");

        let mut cmd = Command::new(&self.git_bin);
        cmd.arg("clone")
            .arg(&repo.url)
            .arg(&root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let started = std::time::Instant::now();
        let output = match time::timeout(self.timeout, cmd.output()).await {
            Err(_) => {
                // The child is killed when the dropped future releases it.
                Workspace::new(root, repo.clone()).release();
                return Err(CloneError::Timeout {
                    seconds: self.timeout.as_secs(),
                });
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CloneError::GitMissing);
            }
            Ok(Err(e)) => return Err(CloneError::Io(e)),
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            let mut stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            stderr.truncate(MAX_STDERR_LEN);
            Workspace::new(root, repo.clone()).release();
            return Err(CloneError::Failed { stderr });
        }

        debug!(
            repo = %repo.full_name(),
            elapsed_ms = started.elapsed().as_millis(),
            "Clone completed"
        );

        Ok(Workspace::new(root, repo.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo_fixture() -> RepoRef {
        RepoRef {
            owner: "acme".to_string(),
            name: "demo".to_string(),
            url: "https://github.com/acme/demo".to_string(),
        }
    }

    #[test]
    fn test_release_removes_directory() {
        let scratch = TempDir::new().unwrap();
        let root = scratch.path().join("ws");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("main.py"), "app = FastAPI()").unwrap();

        let mut workspace = Workspace::new(root.clone(), repo_fixture());
        workspace.release();
        assert!(!root.exists());
    }

    #[test]
    fn test_release_is_idempotent() {
        let scratch = TempDir::new().unwrap();
        let root = scratch.path().join("ws");
        fs::create_dir(&root).unwrap();

        let mut workspace = Workspace::new(root.clone(), repo_fixture());
        workspace.release();
        workspace.release();
        assert!(!root.exists());
    }

    #[test]
    fn test_release_on_missing_path() {
        let mut workspace = Workspace::new(
            PathBuf::from("/nonexistent/nbforge-test-workspace"),
            repo_fixture(),
        );
        workspace.release();
    }

    #[test]
    fn test_release_handles_readonly_entries() {
        let scratch = TempDir::new().unwrap();
        let root = scratch.path().join("ws");
        fs::create_dir(&root).unwrap();
        let locked = root.join("pack");
        fs::write(&locked, "data").unwrap();

        let mut perms = fs::metadata(&locked).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&locked, perms).unwrap();

        let mut workspace = Workspace::new(root.clone(), repo_fixture());
        workspace.release();
        assert!(!root.exists());
    }

    #[test]
    fn test_drop_removes_directory() {
        let scratch = TempDir::new().unwrap();
        let root = scratch.path().join("ws");
        fs::create_dir(&root).unwrap();

        {
            let _workspace = Workspace::new(root.clone(), repo_fixture());
        }
        assert!(!root.exists());
    }

    #[test]
    fn test_scratch_paths_are_unique() {
        let cloner = GitCloner::new("git", Duration::from_secs(60));
        let repo = repo_fixture();
        let first = cloner.scratch_path(&repo);
        let second = cloner.scratch_path(&repo);
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_missing_git_binary() {
        let cloner = GitCloner::new("nbforge-no-such-git-binary", Duration::from_secs(5));
        let result = cloner.clone_temporary(&repo_fixture()).await;
        assert!(matches!(result, Err(CloneError::GitMissing)));
    }
}
