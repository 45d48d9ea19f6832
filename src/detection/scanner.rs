//! Workspace scanner for FastAPI application candidates
//!
//! Walks every Python file under a cloned workspace, applies the fixed
//! pattern tables and scores each match additively. The walk is sorted
//! lexicographically by path, which makes tie-breaking in [`AppScanner::pick_best`]
//! deterministic: the first candidate in walk order wins.

use crate::detection::patterns::{
    is_excluded_dir, is_python_file, IMPORT_MATCH_SCORE, IMPORT_PATTERNS, INSTANCE_MATCH_SCORE,
    INSTANCE_PATTERNS, ROUTE_EVIDENCE_SCORE, ROUTE_MARKERS, RUNNER_MENTION_SCORE,
    SERVER_RUNNER_MARKER,
};
use crate::detection::types::{AppCandidate, ScanResult};
use ignore::WalkBuilder;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Scanner with pre-compiled pattern tables
pub struct AppScanner {
    import_patterns: Vec<(String, Regex)>,
    instance_patterns: Vec<(String, Regex)>,
}

impl Default for AppScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl AppScanner {
    pub fn new() -> Self {
        let compile = |patterns: &[&str]| {
            patterns
                .iter()
                .map(|p| {
                    let re = Regex::new(&format!("(?i){}", p)).expect("valid pattern");
                    (p.to_string(), re)
                })
                .collect()
        };

        Self {
            import_patterns: compile(IMPORT_PATTERNS),
            instance_patterns: compile(INSTANCE_PATTERNS),
        }
    }

    /// Scans the workspace for application candidates
    ///
    /// Files that cannot be read as text are skipped; an unreadable file
    /// never aborts the scan. Walk order is lexicographic by relative path.
    pub fn scan(&self, root: &Path) -> ScanResult {
        let start = std::time::Instant::now();
        let mut result = ScanResult::default();

        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(false)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().map_or(false, |t| t.is_dir());
                let name = entry.file_name().to_string_lossy();
                !(is_dir && is_excluded_dir(&name))
            })
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    continue;
                }
            };
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !is_python_file(name) {
                continue;
            }

            let rel_path = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");

            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(err) => {
                    debug!(path = %rel_path, error = %err, "Skipping unreadable file");
                    continue;
                }
            };

            result.python_files.push(rel_path.clone());

            if let Some(candidate) = self.analyze(&rel_path, &content) {
                debug!(
                    path = %candidate.path,
                    confidence = candidate.confidence,
                    "Found application candidate"
                );
                result.candidates.push(candidate);
            }
        }

        info!(
            files_scanned = result.python_files.len(),
            candidates = result.candidates.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Workspace scan completed"
        );

        result
    }

    /// Evaluates one file's content; `None` when no pattern matched
    fn analyze(&self, rel_path: &str, content: &str) -> Option<AppCandidate> {
        let mut matched_imports = Vec::new();
        let mut matched_instances = Vec::new();
        let mut confidence = 0u32;

        for (source, re) in &self.import_patterns {
            if re.is_match(content) {
                matched_imports.push(source.clone());
                confidence += IMPORT_MATCH_SCORE;
            }
        }

        for (source, re) in &self.instance_patterns {
            if re.is_match(content) {
                matched_instances.push(source.clone());
                confidence += INSTANCE_MATCH_SCORE;
            }
        }

        if matched_imports.is_empty() && matched_instances.is_empty() {
            return None;
        }

        if ROUTE_MARKERS.iter().any(|marker| content.contains(marker)) {
            confidence += ROUTE_EVIDENCE_SCORE;
        }
        if content.contains(SERVER_RUNNER_MARKER) {
            confidence += RUNNER_MENTION_SCORE;
        }

        Some(AppCandidate {
            path: rel_path.to_string(),
            matched_imports,
            matched_instances,
            confidence,
        })
    }

    /// Selects the most likely entry point
    ///
    /// Maximum adjusted score wins; ties go to the first candidate in walk
    /// order (lexicographic by path).
    pub fn pick_best<'a>(&self, candidates: &'a [AppCandidate]) -> Option<&'a AppCandidate> {
        let mut best: Option<&AppCandidate> = None;
        for candidate in candidates {
            match best {
                Some(current) if candidate.adjusted_score() <= current.adjusted_score() => {}
                _ => best = Some(candidate),
            }
        }
        best
    }
}
