use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// FastAPI repository analysis and notebook deployment artifact generation
#[derive(Parser, Debug)]
#[command(
    name = "nbforge",
    about = "Analyze a GitHub repository and generate notebook deployment artifacts",
    version,
    long_about = "nbforge statically analyzes a public GitHub repository to locate a FastAPI \
                  application, then generates a multi-cell deployment notebook and an \
                  equivalent single-cell script. Run either inside a hosted notebook \
                  environment to install dependencies, clone the repository, start the app \
                  and expose it through a public tunnel."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Analyze a repository and generate deployment artifacts",
        long_about = "Validates the URL, inspects and clones the repository, locates the \
                      FastAPI entry point and writes both deployment artifacts.\n\n\
                      Examples:\n  \
                      nbforge deploy https://github.com/acme/demo\n  \
                      nbforge deploy https://github.com/acme/demo --env-file .env --requirements requirements.txt\n  \
                      nbforge deploy https://github.com/acme/demo --format json"
    )]
    Deploy(DeployArgs),

    #[command(
        about = "Inspect a repository without cloning it",
        long_about = "Fetches repository metadata and the top-level listing, and reports \
                      FastAPI-compatibility indicators.\n\n\
                      Examples:\n  \
                      nbforge inspect https://github.com/acme/demo\n  \
                      nbforge inspect https://github.com/acme/demo --format json"
    )]
    Inspect(InspectArgs),

    #[command(
        about = "Validate a repository URL offline",
        long_about = "Checks the structural shape of a repository URL without any network \
                      access."
    )]
    Validate(ValidateArgs),

    #[command(about = "Print a sample .env file for the --env-file option")]
    SampleEnv,
}

#[derive(Parser, Debug, Clone)]
pub struct DeployArgs {
    #[arg(value_name = "URL", help = "Public GitHub repository URL")]
    pub url: String,

    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a .env file to inject into the deployment"
    )]
    pub env_file: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Requirements file overriding the repository's requirements.txt"
    )]
    pub requirements: Option<PathBuf>,

    #[arg(long, value_name = "NAME", help = "Display name for the deployment")]
    pub name: Option<String>,

    #[arg(
        long,
        value_name = "TOKEN",
        help = "ngrok auth token to embed in the artifacts"
    )]
    pub ngrok_token: Option<String>,

    #[arg(
        long,
        value_name = "VERSION",
        default_value = "3.10",
        help = "Python version noted in the generated artifacts"
    )]
    pub python_version: String,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Directory for generated artifacts (defaults to the configured output dir)"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    #[arg(value_name = "URL", help = "Public GitHub repository URL")]
    pub url: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(value_name = "URL", help = "Repository URL to check")]
    pub url: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
