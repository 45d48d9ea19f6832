//! FastAPI application detection
//!
//! Pattern tables, the workspace scanner that ranks candidate entry points,
//! and the static resolver for the application variable name.

pub mod entrypoint;
pub mod patterns;
pub mod scanner;
pub mod types;

pub use entrypoint::{module_path, resolve_variable, uvicorn_command, DEFAULT_APP_VARIABLE};
pub use scanner::AppScanner;
pub use types::{AppCandidate, ResolvedEntryPoint, ScanResult};
