//! Static resolution of the application variable name
//!
//! The winning candidate file is never executed. A declaration-order scan of
//! module-level assignments covers well-formed sources; a looser regex pass
//! catches indented or inline assignments; the conventional default covers
//! everything else. Resolution is total: it always returns a usable
//! identifier.

use regex::Regex;

/// Identifier used when no assignment can be found
pub const DEFAULT_APP_VARIABLE: &str = "app";

/// Extracts the identifier bound to the FastAPI instance
///
/// Returns the left-hand side of the first module-level
/// `<ident> = FastAPI(...)` or `<ident> = <module>.FastAPI(...)` assignment
/// in declaration order, falling back to a content-wide search and finally
/// to [`DEFAULT_APP_VARIABLE`].
pub fn resolve_variable(content: &str) -> String {
    let declaration = Regex::new(
        r"^([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(?:[A-Za-z_][A-Za-z0-9_]*\.)?FastAPI\s*\(",
    )
    .expect("valid regex");

    for line in content.lines() {
        if let Some(captures) = declaration.captures(line) {
            return captures[1].to_string();
        }
    }

    let fallback_patterns = [
        r"(\w+)\s*=\s*FastAPI\(",
        r"(\w+)\s*=\s*fastapi\.FastAPI\(",
    ];
    for pattern in fallback_patterns {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(captures) = re.captures(content) {
            return captures[1].to_string();
        }
    }

    DEFAULT_APP_VARIABLE.to_string()
}

/// Converts a relative file path to a Python module path
///
/// Strips the `.py` suffix and turns path separators into dots.
pub fn module_path(app_file: &str) -> String {
    let stem = app_file.strip_suffix(".py").unwrap_or(app_file);
    stem.replace(['/', '\\'], ".")
}

/// Builds the uvicorn invocation for the resolved entry point
pub fn uvicorn_command(app_file: &str, app_variable: &str) -> String {
    format!(
        "uvicorn {}:{} --host 0.0.0.0 --port 8000",
        module_path(app_file),
        app_variable
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_plain_assignment() {
        let content = "from fastapi import FastAPI\n\napp = FastAPI()\n";
        assert_eq!(resolve_variable(content), "app");
    }

    #[test]
    fn test_resolves_custom_name() {
        let content = "from fastapi import FastAPI\n\nbackend = FastAPI(title=\"svc\")\n";
        assert_eq!(resolve_variable(content), "backend");
    }

    #[test]
    fn test_resolves_dotted_constructor() {
        let content = "import fastapi\n\nserver = fastapi.FastAPI()\n";
        assert_eq!(resolve_variable(content), "server");
    }

    #[test]
    fn test_first_declaration_wins() {
        let content = "\
from fastapi import FastAPI

api = FastAPI()
admin = FastAPI()
";
        assert_eq!(resolve_variable(content), "api");
    }

    #[test]
    fn test_fallback_finds_indented_assignment() {
        // Not a module-level declaration; only the looser pass sees it.
        let content = "def build():\n    inner = FastAPI()\n    return inner\n";
        assert_eq!(resolve_variable(content), "inner");
    }

    #[test]
    fn test_default_on_arbitrary_text() {
        assert_eq!(resolve_variable("not python at all"), DEFAULT_APP_VARIABLE);
        assert_eq!(resolve_variable(""), DEFAULT_APP_VARIABLE);
        assert_eq!(resolve_variable("binary\u{0}garbage"), DEFAULT_APP_VARIABLE);
    }

    #[test]
    fn test_default_is_usable_identifier() {
        let resolved = resolve_variable("x = Flask()");
        assert!(!resolved.is_empty());
        assert!(resolved.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn test_module_path() {
        assert_eq!(module_path("main.py"), "main");
        assert_eq!(module_path("src/api/server.py"), "src.api.server");
        assert_eq!(module_path("src\\api\\server.py"), "src.api.server");
    }

    #[test]
    fn test_uvicorn_command() {
        assert_eq!(
            uvicorn_command("main.py", "app"),
            "uvicorn main:app --host 0.0.0.0 --port 8000"
        );
        assert_eq!(
            uvicorn_command("src/server.py", "backend"),
            "uvicorn src.server:backend --host 0.0.0.0 --port 8000"
        );
    }
}
