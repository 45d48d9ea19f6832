//! Structural validation of GitHub repository URLs
//!
//! Validation is purely syntactic: no network access, cheap enough to run on
//! every keystroke of an interactive form.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for repository URLs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("repository URL cannot be empty")]
    Empty,

    #[error("invalid GitHub URL, expected https://github.com/<owner>/<repository>")]
    Malformed,
}

/// A validated reference to a GitHub repository
///
/// `name` never retains a `.git` suffix; `url` keeps the caller's original
/// (trimmed) input for cloning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    pub url: String,
}

impl RepoRef {
    /// "owner/name" as used in API paths and display
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Validates a repository URL and extracts owner and name
///
/// Accepts exactly `https://github.com/<owner>/<name>` where owner and name
/// consist of word characters, hyphens and dots, with an optional trailing
/// slash. A trailing `.git` on the name is stripped.
pub fn validate_url(raw: &str) -> Result<RepoRef, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let pattern =
        Regex::new(r"^https://github\.com/([\w.-]+)/([\w.-]+)/?$").expect("valid regex");

    let captures = pattern.captures(trimmed).ok_or(UrlError::Malformed)?;
    let owner = captures[1].to_string();
    let mut name = captures[2].to_string();

    if let Some(stripped) = name.strip_suffix(".git") {
        name = stripped.to_string();
    }
    if name.is_empty() {
        return Err(UrlError::Malformed);
    }

    Ok(RepoRef {
        owner,
        name,
        url: trimmed.to_string(),
    })
}
