//! FastAPI usage patterns and scan exclusion rules

/// Import statements that indicate FastAPI usage (matched case-insensitively)
pub const IMPORT_PATTERNS: &[&str] = &[
    r"from\s+fastapi\s+import\s+FastAPI",
    r"import\s+fastapi",
    r"from\s+fastapi\s+import\s+.*FastAPI",
];

/// Instance constructions that indicate a FastAPI application (matched
/// case-insensitively)
pub const INSTANCE_PATTERNS: &[&str] = &[
    r"app\s*=\s*FastAPI\(",
    r"application\s*=\s*FastAPI\(",
    r"api\s*=\s*FastAPI\(",
    r"server\s*=\s*FastAPI\(",
    r"fastapi_app\s*=\s*FastAPI\(",
];

/// Route decorator substrings counted as routing evidence
pub const ROUTE_MARKERS: &[&str] = &["@app.route", "@app.get", "@app.post"];

/// Server-runner mention counted as weak evidence
pub const SERVER_RUNNER_MARKER: &str = "uvicorn";

/// Base names that earn the preferred entry-point bonus
pub const PREFERRED_ENTRY_NAMES: &[&str] = &["main.py", "app.py", "server.py", "api.py"];

/// Directories never worth scanning for application code
pub const EXCLUDED_DIRS: &[&str] = &[
    "__pycache__",
    "node_modules",
    "venv",
    "env",
    "site-packages",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    ".eggs",
    "dist",
    "build",
];

pub const PYTHON_SUFFIX: &str = ".py";

/// Confidence weights, additive per match
pub const IMPORT_MATCH_SCORE: u32 = 30;
pub const INSTANCE_MATCH_SCORE: u32 = 40;
pub const ROUTE_EVIDENCE_SCORE: u32 = 20;
pub const RUNNER_MENTION_SCORE: u32 = 10;

/// Selection bonuses applied when picking the best candidate
pub const PREFERRED_NAME_BONUS: u32 = 50;
pub const ROOT_FILE_BONUS: u32 = 20;

/// Checks whether a file name has the recognized source suffix
pub fn is_python_file(name: &str) -> bool {
    name.ends_with(PYTHON_SUFFIX)
}

/// Checks whether a directory name should be skipped during scanning
pub fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIRS.contains(&name)
}

/// Checks whether a base name is one of the conventional entry-point names
pub fn is_preferred_entry_name(name: &str) -> bool {
    PREFERRED_ENTRY_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_python_file() {
        assert!(is_python_file("main.py"));
        assert!(is_python_file("api/routes.py"));
        assert!(!is_python_file("README.md"));
        assert!(!is_python_file("mainpy"));
    }

    #[test]
    fn test_is_excluded_dir() {
        assert!(is_excluded_dir("__pycache__"));
        assert!(is_excluded_dir("venv"));
        assert!(is_excluded_dir("node_modules"));
        assert!(!is_excluded_dir("src"));
        assert!(!is_excluded_dir("api"));
    }

    #[test]
    fn test_is_preferred_entry_name() {
        assert!(is_preferred_entry_name("main.py"));
        assert!(is_preferred_entry_name("app.py"));
        assert!(is_preferred_entry_name("server.py"));
        assert!(is_preferred_entry_name("api.py"));
        assert!(!is_preferred_entry_name("run.py"));
        assert!(!is_preferred_entry_name("routes.py"));
    }
}
