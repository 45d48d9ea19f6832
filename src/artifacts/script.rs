//! Single-cell deployment script
//!
//! Semantically equivalent to the notebook but flattened into one block of
//! plain Python, intended for copy-paste into any notebook cell. Shell
//! escapes are avoided so the block also runs under a bare interpreter
//! inside the hosted environment.

use super::{deployment_packages, env_assignments, ArtifactInputs};

/// Generates the flattened script
pub fn generate(inputs: &ArtifactInputs<'_>) -> String {
    let packages = deployment_packages(inputs.requirements)
        .iter()
        .map(|p| format!("\"{}\"", p))
        .collect::<Vec<_>>()
        .join(", ");

    let env_block = if inputs.env.is_empty() {
        "print('No environment variables configured.')".to_string()
    } else {
        let mut lines = env_assignments(inputs.env);
        lines.push(format!(
            "print('Set {} environment variables.')",
            inputs.env.len()
        ));
        lines.join("\n")
    };

    let auth_block = match inputs.ngrok_token {
        Some(token) => format!("ngrok.set_auth_token('{}')", token.replace('\'', "\\'")),
        None => "\
try:\n\
\x20   from google.colab import userdata\n\
\x20   ngrok.set_auth_token(userdata.get('NGROK_AUTH_TOKEN'))\n\
except Exception:\n\
\x20   print('No NGROK_AUTH_TOKEN configured; using the free ngrok tier.')"
            .to_string(),
    };

    let title = inputs.app_name.unwrap_or("FastAPI deployment");

    format!(
        "# {title} - {id}\n\
         # Copy this entire cell into a hosted notebook and run it.\n\
         \n\
         import importlib.util\n\
         import os\n\
         import subprocess\n\
         import sys\n\
         import threading\n\
         import time\n\
         \n\
         print('Starting deployment...')\n\
         \n\
         # Step 1: install packages\n\
         print('Installing packages...')\n\
         packages = [{packages}]\n\
         for package in packages:\n\
         \x20   result = subprocess.run([sys.executable, '-m', 'pip', 'install', '-q', package])\n\
         \x20   if result.returncode != 0:\n\
         \x20       print('warning: failed to install ' + package)\n\
         print('Packages installed.')\n\
         \n\
         # Step 2: clone the repository\n\
         print('Cloning repository...')\n\
         if os.path.exists('/content/app'):\n\
         \x20   subprocess.run(['rm', '-rf', '/content/app'], check=False)\n\
         subprocess.run(['git', 'clone', '{url}', '/content/app'], check=True)\n\
         os.chdir('/content/app')\n\
         if os.path.exists('requirements.txt'):\n\
         \x20   print('Installing project requirements...')\n\
         \x20   subprocess.run([sys.executable, '-m', 'pip', 'install', '-q', '-r', 'requirements.txt'], check=False)\n\
         print('Repository ready.')\n\
         \n\
         # Step 3: environment variables\n\
         {env_block}\n\
         \n\
         # Step 4: load and start the application\n\
         app_file = '{file}'\n\
         app_variable = '{var}'\n\
         print('Loading application from ' + app_file + '...')\n\
         spec = importlib.util.spec_from_file_location('deployed_app', app_file)\n\
         module = importlib.util.module_from_spec(spec)\n\
         spec.loader.exec_module(module)\n\
         if not hasattr(module, app_variable):\n\
         \x20   raise RuntimeError('variable ' + app_variable + ' not found in ' + app_file)\n\
         application = getattr(module, app_variable)\n\
         \n\
         import uvicorn\n\
         \n\
         def serve():\n\
         \x20   uvicorn.run(application, host='0.0.0.0', port=8000, log_level='warning')\n\
         \n\
         threading.Thread(target=serve, daemon=True).start()\n\
         time.sleep(8)\n\
         print('Application started on port 8000.')\n\
         \n\
         # Step 5: open the public tunnel\n\
         from pyngrok import ngrok\n\
         import requests\n\
         \n\
         {auth_block}\n\
         \n\
         tunnel = ngrok.connect(8000)\n\
         public_url = tunnel.public_url\n\
         print('Public API URL: ' + public_url)\n\
         print('Swagger UI:     ' + public_url + '/docs')\n\
         try:\n\
         \x20   response = requests.get(public_url + '/', timeout=10)\n\
         \x20   print('Smoke test: HTTP ' + str(response.status_code))\n\
         except Exception as exc:\n\
         \x20   print('Smoke test failed: ' + str(exc))\n\
         print('Keep this cell running to maintain the API.')",
        title = title,
        id = inputs.deployment_id,
        packages = packages,
        url = inputs.repo_url,
        env_block = env_block,
        file = inputs.app_file,
        var = inputs.app_variable,
        auth_block = auth_block,
    )
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
            requirements: None,
            app_name: None,
            ngrok_token: None,
            python_version: "3.10",
            deployment_id: "20260807_120000",
        }
    }

    #[test]
    fn test_script_contains_all_steps() {
        let env = EnvMap::default();
        let script = generate(&inputs(&env));

        assert!(script.contains("pip"));
        assert!(script.contains("['git', 'clone', 'https://github.com/acme/demo', '/content/app']"));
        assert!(script.contains("app_file = 'main.py'"));
        assert!(script.contains("app_variable = 'app'"));
        assert!(script.contains("ngrok.connect(8000)"));
    }

    #[test]
    fn test_script_quotes_packages() {
        let env = EnvMap::default();
        let script = generate(&inputs(&env));
        assert!(script.contains("\"uvicorn[standard]\""));
    }

    #[test]
    fn test_script_injects_env_vars() {
        let env = EnvMap::parse("PORT=8000\nDEBUG=False\n");
        let script = generate(&inputs(&env));
        assert!(script.contains("os.environ[\"PORT\"] = \"8000\""));
        assert!(script.contains("Set 2 environment variables."));
    }

    #[test]
    fn test_script_embeds_ngrok_token() {
        let env = EnvMap::default();
        let mut i = inputs(&env);
        i.ngrok_token = Some("tok_456");
        let script = generate(&i);
        assert!(script.contains("ngrok.set_auth_token('tok_456')"));
    }

    #[test]
    fn test_script_mentions_custom_requirements() {
        let env = EnvMap::default();
        let mut i = inputs(&env);
        i.requirements = Some("redis\n");
        let script = generate(&i);
        assert!(script.contains("\"redis\""));
    }
}
