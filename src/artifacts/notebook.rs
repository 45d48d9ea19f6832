//! Multi-cell deployment notebook
//!
//! Emits an nbformat-4 document: one markdown title cell followed by one
//! code cell per deployment step. The document stays valid for any
//! notebook-compatible host; Colab-specific metadata is included so Colab
//! renders a table of contents.

use super::{deployment_packages, env_assignments, ArtifactInputs, GenerationError};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Cell {
    Markdown {
        cell_type: &'static str,
        metadata: serde_json::Value,
        source: String,
    },
    Code {
        cell_type: &'static str,
        execution_count: Option<u32>,
        metadata: serde_json::Value,
        outputs: Vec<serde_json::Value>,
        source: String,
    },
}

impl Cell {
    fn markdown(source: String) -> Self {
        Cell::Markdown {
            cell_type: "markdown",
            metadata: json!({}),
            source,
        }
    }

    fn code(source: String) -> Self {
        Cell::Code {
            cell_type: "code",
            execution_count: None,
            metadata: json!({}),
            outputs: Vec::new(),
            source,
        }
    }
}

#[derive(Debug, Serialize)]
struct Notebook {
    nbformat: u32,
    nbformat_minor: u32,
    metadata: serde_json::Value,
    cells: Vec<Cell>,
}

/// Generates the notebook document as a JSON string
pub fn generate(inputs: &ArtifactInputs<'_>) -> Result<String, GenerationError> {
    let notebook = Notebook {
        nbformat: 4,
        nbformat_minor: 0,
        metadata: json!({
            "colab": { "provenance": [], "toc_visible": true },
            "kernelspec": { "name": "python3", "display_name": "Python 3" },
            "language_info": { "name": "python" }
        }),
        cells: vec![
            Cell::markdown(title_cell(inputs)),
            Cell::code(install_cell(inputs)),
            Cell::code(clone_cell(inputs)),
            Cell::code(env_cell(inputs)),
            Cell::code(app_cell(inputs)),
            Cell::code(tunnel_cell(inputs)),
            Cell::code(monitor_cell()),
        ],
    };

    Ok(serde_json::to_string_pretty(&notebook)?)
}

fn title_cell(inputs: &ArtifactInputs<'_>) -> String {
    let title = inputs.app_name.unwrap_or("FastAPI deployment");
    format!(
        "# {title} - {id}\n\n\
         **Repository:** {url}\n\n\
         **Python:** {python}\n\n\
         ---\n\n\
         Run all cells in sequence (Runtime -> Run all), wait for the tunnel\n\
         cell to print the public URL, and keep the notebook running while the\n\
         API is in use.",
        title = title,
        id = inputs.deployment_id,
        url = inputs.repo_url,
        python = inputs.python_version,
    )
}

fn install_cell(inputs: &ArtifactInputs<'_>) -> String {
    let packages = deployment_packages(inputs.requirements).join(" ");
    format!(
        "# Install deployment packages\n\
         print('Installing packages...')\n\
         !pip install -q {packages}\n\
         print('Packages installed.')",
    )
}

fn clone_cell(inputs: &ArtifactInputs<'_>) -> String {
    format!(
        "# Clone the repository\n\
         import os\n\
         print('Cloning repository...')\n\
         if os.path.exists('/content/app'):\n\
         \x20   !rm -rf /content/app\n\
         !git clone {url} /content/app\n\
         os.chdir('/content/app')\n\
         print('Repository cloned.')\n\
         if os.path.exists('requirements.txt'):\n\
         \x20   print('Installing project requirements...')\n\
         \x20   !pip install -q -r requirements.txt\n\
         else:\n\
         \x20   print('No requirements.txt in repository.')",
        url = inputs.repo_url,
    )
}

fn env_cell(inputs: &ArtifactInputs<'_>) -> String {
    if inputs.env.is_empty() {
        return "# Environment variables\nprint('No environment variables configured.')"
            .to_string();
    }

    let mut lines = vec![
        "# Environment variables".to_string(),
        "import os".to_string(),
    ];
    lines.extend(env_assignments(inputs.env));
    lines.push(format!(
        "print('Set {} environment variables.')",
        inputs.env.len()
    ));
    lines.join("\n")
}

fn app_cell(inputs: &ArtifactInputs<'_>) -> String {
    format!(
        "# Load and start the application\n\
         import importlib.util\n\
         import threading\n\
         import time\n\
         import uvicorn\n\
         \n\
         app_file = '{file}'\n\
         app_variable = '{var}'\n\
         \n\
         print('Loading application from ' + app_file + '...')\n\
         spec = importlib.util.spec_from_file_location('deployed_app', app_file)\n\
         module = importlib.util.module_from_spec(spec)\n\
         spec.loader.exec_module(module)\n\
         \n\
         if not hasattr(module, app_variable):\n\
         \x20   available = [a for a in dir(module) if not a.startswith('_')]\n\
         \x20   raise RuntimeError('variable ' + app_variable + ' not found in ' + app_file\n\
         \x20                      + '; module defines: ' + ', '.join(available))\n\
         application = getattr(module, app_variable)\n\
         \n\
         def serve():\n\
         \x20   uvicorn.run(application, host='0.0.0.0', port=8000, log_level='warning')\n\
         \n\
         threading.Thread(target=serve, daemon=True).start()\n\
         time.sleep(8)\n\
         print('Application started on port 8000.')",
        file = inputs.app_file,
        var = inputs.app_variable,
    )
}

fn tunnel_cell(inputs: &ArtifactInputs<'_>) -> String {
    let auth = match inputs.ngrok_token {
        Some(token) => format!("ngrok.set_auth_token('{}')", token.replace('\'', "\\'")),
        None => "\
try:\n\
\x20   from google.colab import userdata\n\
\x20   ngrok.set_auth_token(userdata.get('NGROK_AUTH_TOKEN'))\n\
except Exception:\n\
\x20   print('No NGROK_AUTH_TOKEN configured; using the free ngrok tier.')"
            .to_string(),
    };

    format!(
        "# Open the public tunnel\n\
         from pyngrok import ngrok\n\
         import requests\n\
         \n\
         {auth}\n\
         \n\
         tunnel = ngrok.connect(8000)\n\
         public_url = tunnel.public_url\n\
         print('Public API URL: ' + public_url)\n\
         print('Swagger UI:     ' + public_url + '/docs')\n\
         \n\
         try:\n\
         \x20   response = requests.get(public_url + '/', timeout=10)\n\
         \x20   print('Smoke test: HTTP ' + str(response.status_code))\n\
         except Exception as exc:\n\
         \x20   print('Smoke test failed: ' + str(exc))\n\
         \n\
         PUBLIC_API_URL = public_url",
    )
}

fn monitor_cell() -> String {
    "# Poll the deployed API every 30 seconds\n\
     import time\n\
     import requests\n\
     \n\
     if 'PUBLIC_API_URL' not in globals():\n\
     \x20   raise RuntimeError('run the tunnel cell first')\n\
     \n\
     print('Monitoring ' + PUBLIC_API_URL + ' (interrupt to stop)')\n\
     while True:\n\
     \x20   try:\n\
     \x20       started = time.time()\n\
     \x20       response = requests.get(PUBLIC_API_URL + '/', timeout=5)\n\
     \x20       elapsed_ms = round((time.time() - started) * 1000)\n\
     \x20       print('HTTP ' + str(response.status_code) + ' in ' + str(elapsed_ms) + 'ms')\n\
     \x20   except Exception as exc:\n\
     \x20       print('unreachable: ' + str(exc))\n\
     \x20   time.sleep(30)"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envfile::EnvMap;

    fn inputs<'a>(env: &'a EnvMap) -> ArtifactInputs<'a> {
        ArtifactInputs {
            repo_url: "https://github.com/acme/demo",
            app_file: "main.py",
            app_variable: "app",
            env,
            requirements: Some("fastapi\nuvicorn\n"),
            app_name: None,
            ngrok_token: None,
            python_version: "3.10",
            deployment_id: "20260807_120000",
        }
    }

    #[test]
    fn test_notebook_is_valid_json_with_seven_cells() {
        let env = EnvMap::default();
        let rendered = generate(&inputs(&env)).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["nbformat"], 4);
        assert_eq!(parsed["cells"].as_array().unwrap().len(), 7);
        assert_eq!(parsed["cells"][0]["cell_type"], "markdown");
        assert_eq!(parsed["cells"][1]["cell_type"], "code");
    }

    #[test]
    fn test_code_cells_carry_nbformat_fields() {
        let env = EnvMap::default();
        let rendered = generate(&inputs(&env)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        let code_cell = &parsed["cells"][1];
        assert!(code_cell["execution_count"].is_null());
        assert!(code_cell["outputs"].as_array().unwrap().is_empty());
        assert!(code_cell["metadata"].is_object());
    }

    #[test]
    fn test_install_cell_merges_requirements() {
        let env = EnvMap::default();
        let rendered = generate(&inputs(&env)).unwrap();
        assert!(rendered.contains("pip install -q"));
        assert!(rendered.contains("pyngrok"));
        assert!(rendered.contains("fastapi"));
    }

    #[test]
    fn test_clone_cell_references_repository() {
        let env = EnvMap::default();
        let rendered = generate(&inputs(&env)).unwrap();
        assert!(rendered.contains("git clone https://github.com/acme/demo /content/app"));
    }

    #[test]
    fn test_env_cell_with_variables() {
        let env = EnvMap::parse("PORT=8000\n");
        let cell = env_cell(&inputs(&env));
        assert!(cell.contains("os.environ[\"PORT\"] = \"8000\""));
        assert!(cell.contains("Set 1 environment variables."));
    }

    #[test]
    fn test_env_cell_without_variables() {
        let env = EnvMap::default();
        let cell = env_cell(&inputs(&env));
        assert!(cell.contains("No environment variables configured."));
    }

    #[test]
    fn test_app_cell_uses_resolved_entry_point() {
        let env = EnvMap::default();
        let mut i = inputs(&env);
        i.app_file = "src/server.py";
        i.app_variable = "backend";
        let cell = app_cell(&i);
        assert!(cell.contains("app_file = 'src/server.py'"));
        assert!(cell.contains("app_variable = 'backend'"));
    }

    #[test]
    fn test_tunnel_cell_embeds_token_when_given() {
        let env = EnvMap::default();
        let mut i = inputs(&env);
        i.ngrok_token = Some("tok_123");
        let cell = tunnel_cell(&i);
        assert!(cell.contains("ngrok.set_auth_token('tok_123')"));
        assert!(!cell.contains("userdata"));
    }

    #[test]
    fn test_tunnel_cell_falls_back_to_secrets() {
        let env = EnvMap::default();
        let cell = tunnel_cell(&inputs(&env));
        assert!(cell.contains("userdata.get('NGROK_AUTH_TOKEN')"));
    }

    #[test]
    fn test_title_cell_uses_app_name() {
        let env = EnvMap::default();
        let mut i = inputs(&env);
        i.app_name = Some("billing-api");
        let cell = title_cell(&i);
        assert!(cell.starts_with("# billing-api"));
    }
}
