//! Command handlers
//!
//! Each handler owns its collaborators for the duration of one invocation
//! and returns a process exit code.

use crate::cli::commands::{DeployArgs, InspectArgs, ValidateArgs};
use crate::cli::output::{render_failure, render_inspection, render_success, OutputFormat};
use crate::config::NbforgeConfig;
use crate::envfile;
use crate::github::api::{GitHubClient, RepositoryHost};
use crate::github::clone::GitCloner;
use crate::github::url::validate_url;
use crate::pipeline::{DeployPipeline, DeployRequest, DeploymentBundle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::error;

pub async fn handle_deploy(args: &DeployArgs, quiet: bool) -> i32 {
    let config = NbforgeConfig::default();
    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return 2;
    }

    let env_file = match read_optional_file(args.env_file.as_deref()) {
        Ok(content) => content,
        Err(code) => return code,
    };
    let requirements = match read_optional_file(args.requirements.as_deref()) {
        Ok(content) => content,
        Err(code) => return code,
    };

    let client = match GitHubClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to construct GitHub client");
            return 2;
        }
    };
    let cloner = GitCloner::new(config.git_bin.clone(), config.clone_timeout());

    let mut request = DeployRequest::new(&args.url);
    request.env_file = env_file;
    request.requirements = requirements;
    request.app_name = args.name.clone();
    request.ngrok_token = args.ngrok_token.clone();
    request.python_version = args.python_version.clone();

    let pipeline = DeployPipeline::new(&client, &cloner);
    let format = OutputFormat::from(args.format);

    match pipeline.deploy(&request).await {
        Ok(bundle) => {
            let output_dir = args.output.clone().unwrap_or(config.output_dir);
            match write_artifacts(&bundle, &output_dir) {
                Ok((notebook_path, single_cell_path)) => {
                    println!(
                        "{}",
                        render_success(&bundle.facts, &notebook_path, &single_cell_path, format)
                    );
                    if format == OutputFormat::Human && !quiet && atty::is(atty::Stream::Stdout) {
                        println!("Next: upload the notebook to a hosted runtime and run all cells.");
                    }
                    0
                }
                Err(e) => {
                    error!(error = %e, "Failed to write artifacts");
                    2
                }
            }
        }
        Err(e) => {
            eprintln!("{}", render_failure(&e, format));
            1
        }
    }
}

pub async fn handle_inspect(args: &InspectArgs, _quiet: bool) -> i32 {
    let config = NbforgeConfig::default();
    let format = OutputFormat::from(args.format);

    let repo = match validate_url(&args.url) {
        Ok(repo) => repo,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let client = match GitHubClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to construct GitHub client");
            return 2;
        }
    };

    match client.inspect(&repo).await {
        Ok(metadata) => {
            println!("{}", render_inspection(&metadata, format));
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

pub fn handle_validate(args: &ValidateArgs) -> i32 {
    match validate_url(&args.url) {
        Ok(repo) => {
            println!("ok: {}", repo.full_name());
            0
        }
        Err(e) => {
            eprintln!("invalid: {}", e);
            1
        }
    }
}

pub fn handle_sample_env() -> i32 {
    println!("{}", envfile::sample_content());
    0
}

fn read_optional_file(path: Option<&Path>) -> Result<Option<String>, i32> {
    let Some(path) = path else {
        return Ok(None);
    };
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read input file");
            Err(2)
        }
    }
}

fn write_artifacts(
    bundle: &DeploymentBundle,
    output_dir: &Path,
) -> std::io::Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(output_dir)?;

    let notebook_path = output_dir.join(format!(
        "fastapi_deploy_{}.ipynb",
        bundle.facts.deployment_id
    ));
    let single_cell_path = output_dir.join(format!(
        "fastapi_deploy_single_cell_{}.txt",
        bundle.facts.deployment_id
    ));

    fs::write(&notebook_path, &bundle.artifacts.notebook_json)?;
    fs::write(&single_cell_path, &bundle.artifacts.single_cell)?;

    Ok((notebook_path, single_cell_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ArtifactBundle;
    use crate::github::url::RepoRef;
    use crate::pipeline::DeployFacts;
    use crate::requirements::RequirementsSource;
    use tempfile::TempDir;

    fn bundle_fixture() -> DeploymentBundle {
        DeploymentBundle {
            facts: DeployFacts {
                repository: RepoRef {
                    owner: "acme".to_string(),
                    name: "demo".to_string(),
                    url: "https://github.com/acme/demo".to_string(),
                },
                description: None,
                language: None,
                entry_file: "main.py".to_string(),
                app_variable: "app".to_string(),
                confidence: 130,
                total_apps_found: 1,
                requirements_source: RequirementsSource::Default,
                env_var_count: 0,
                has_sensitive_env: false,
                env_warnings: vec![],
                deployment_id: "20260807_120000".to_string(),
            },
            artifacts: ArtifactBundle {
                notebook_json: "{}".to_string(),
                single_cell: "print('hi')".to_string(),
            },
        }
    }

    #[test]
    fn test_write_artifacts_creates_both_files() {
        let dir = TempDir::new().unwrap();
        let bundle = bundle_fixture();

        let (notebook, single_cell) = write_artifacts(&bundle, dir.path()).unwrap();

        assert!(notebook.exists());
        assert!(single_cell.exists());
        assert_eq!(fs::read_to_string(&notebook).unwrap(), "{}");
        assert!(notebook
            .file_name()
            .unwrap()
            .to_string_lossy()
            .contains("20260807_120000"));
    }

    #[test]
    fn test_write_artifacts_creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        let bundle = bundle_fixture();

        assert!(write_artifacts(&bundle, &nested).is_ok());
        assert!(nested.exists());
    }

    #[test]
    fn test_handle_validate_exit_codes() {
        let ok = ValidateArgs {
            url: "https://github.com/acme/demo".to_string(),
        };
        assert_eq!(handle_validate(&ok), 0);

        let bad = ValidateArgs {
            url: "ftp://example.com/x/y".to_string(),
        };
        assert_eq!(handle_validate(&bad), 1);
    }

    #[test]
    fn test_read_optional_file() {
        assert_eq!(read_optional_file(None), Ok(None));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reqs.txt");
        fs::write(&path, "flask\n").unwrap();
        assert_eq!(
            read_optional_file(Some(&path)),
            Ok(Some("flask\n".to_string()))
        );

        let missing = dir.path().join("absent.txt");
        assert_eq!(read_optional_file(Some(&missing)), Err(2));
    }
}
