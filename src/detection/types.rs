//! Detection result types

use crate::detection::patterns::{
    is_preferred_entry_name, PREFERRED_NAME_BONUS, ROOT_FILE_BONUS,
};
use serde::{Deserialize, Serialize};

/// A scanned file with at least one framework-usage pattern match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCandidate {
    /// Relative path from the workspace root, forward slashes
    pub path: String,
    /// Import pattern sources that matched
    pub matched_imports: Vec<String>,
    /// Instance-construction pattern sources that matched
    pub matched_instances: Vec<String>,
    /// Additive confidence score
    pub confidence: u32,
}

impl AppCandidate {
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// True when the file sits directly in the workspace root
    pub fn is_root_level(&self) -> bool {
        !self.path.contains('/')
    }

    /// Confidence plus selection bonuses for preferred names and root files
    pub fn adjusted_score(&self) -> u32 {
        let mut score = self.confidence;
        if is_preferred_entry_name(self.file_name()) {
            score += PREFERRED_NAME_BONUS;
        }
        if self.is_root_level() {
            score += ROOT_FILE_BONUS;
        }
        score
    }
}

/// Outcome of a workspace scan
///
/// An empty candidate list is a valid terminal outcome, not an error; the
/// orchestrator translates it into a user-facing failure.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    pub candidates: Vec<AppCandidate>,
    /// Every source file seen during the walk, in walk order
    pub python_files: Vec<String>,
}

impl ScanResult {
    pub fn has_app(&self) -> bool {
        !self.candidates.is_empty()
    }
}

/// The winning entry point plus the identifier bound to the app instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntryPoint {
    pub file: String,
    pub variable: String,
}
