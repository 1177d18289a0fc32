/// CLI argument definitions via clap derive.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// cloudctl — manage cloud resources from the command line.
#[derive(Debug, Parser)]
#[command(
    name = "cloudctl",
    about = "Manage cloud resources from the command line",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, value_name = "FORMAT", default_value = "text")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Omit table headers (useful for awk/cut processing).
    #[arg(long, global = true)]
    pub no_header: bool,

    /// Path to a config file (default: <config dir>/cloudctl/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Sandbox directory holding the functions engine.
    #[arg(long, global = true, value_name = "DIR")]
    pub sandbox_dir: Option<PathBuf>,

    /// Log engine invocations and timings to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text and tables.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Top-level command groups.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Develop and test serverless functions in a sandbox.
    #[command(subcommand, visible_alias = "sbx")]
    Sandbox(SandboxCommand),
}

/// `cloudctl sandbox` subcommands.
#[derive(Debug, Subcommand)]
pub enum SandboxCommand {
    /// Initialize a local file system directory for the sandbox.
    #[command(long_about = INIT_ABOUT)]
    Init(InitArgs),
    /// Deploy sandbox local assets to the cloud.
    #[command(long_about = DEPLOY_ABOUT)]
    Deploy(DeployArgs),
    /// Obtain metadata of a sandbox directory.
    #[command(long_about = GET_METADATA_ABOUT)]
    GetMetadata(GetMetadataArgs),
    /// Watch a sandbox directory, deploying incrementally on change.
    #[command(long_about = WATCH_ABOUT)]
    Watch(WatchArgs),
}

const INIT_ABOUT: &str = "\
The `cloudctl sandbox init` command specifies a directory in your file system which will hold \
functions and supporting artifacts while you're developing them. When ready, you can upload these \
to the cloud for testing. Later, after the area is committed to a `git` repository, you can create \
an app from them.
Type `cloudctl sandbox status --languages` for a list of supported languages.";

const DEPLOY_ABOUT: &str = "\
At any time you can use `cloudctl sandbox deploy` to upload the contents of a directory in your \
file system for testing in the cloud. The area must be organized in the fashion expected by an App \
Platform Functions component. The `cloudctl sandbox init` command will create a properly organized \
directory for you to work in.";

const GET_METADATA_ABOUT: &str = "\
The `cloudctl sandbox get-metadata` command produces a JSON structure that summarizes the contents \
of a directory you have designated for functions development. This can be useful for feeding into \
other tools.";

const WATCH_ABOUT: &str = "\
Type `cloudctl sandbox watch <directory>` in a separate terminal window. It will run until \
interrupted. It will watch the directory (which should be one you initialized for sandbox use) and \
will deploy the contents to the cloud incrementally as it detects changes.";

/// Arguments for `cloudctl sandbox init`.
#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Directory to initialize.
    pub path: PathBuf,

    /// Language for the initial sample code.
    #[arg(short, long, value_name = "LANGUAGE", default_value = "javascript")]
    pub language: String,

    /// Clears and reuses an existing directory.
    #[arg(long)]
    pub overwrite: bool,
}

/// Flags shared by `deploy` and `watch`.
#[derive(Debug, Clone, Default, Args)]
pub struct BuildArgs {
    /// Path to runtime environment file.
    #[arg(long, value_name = "PATH")]
    pub env: Option<String>,

    /// Path to build-time environment file.
    #[arg(long, value_name = "PATH")]
    pub build_env: Option<String>,

    /// API host to use.
    #[arg(long, value_name = "HOST")]
    pub apihost: Option<String>,

    /// Auth token to use.
    #[arg(long, value_name = "TOKEN")]
    pub auth: Option<String>,

    /// Ignore SSL Certificates.
    #[arg(long)]
    pub insecure: bool,

    /// Display build details.
    #[arg(long)]
    pub verbose_build: bool,

    /// Display start/end of zipping phase for each function.
    #[arg(long)]
    pub verbose_zip: bool,

    /// Use yarn instead of npm for node builds.
    #[arg(long)]
    pub yarn: bool,

    /// Functions and/or packages to include.
    #[arg(long, value_name = "LIST")]
    pub include: Option<String>,

    /// Functions and/or packages to exclude.
    #[arg(long, value_name = "LIST")]
    pub exclude: Option<String>,

    /// Run builds remotely.
    #[arg(long)]
    pub remote_build: bool,
}

/// Arguments for `cloudctl sandbox deploy`.
#[derive(Debug, Parser)]
pub struct DeployArgs {
    /// Directory to deploy.
    pub directory: PathBuf,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Deploy only changes since last deploy.
    #[arg(long)]
    pub incremental: bool,
}

/// Arguments for `cloudctl sandbox get-metadata`.
#[derive(Debug, Parser)]
pub struct GetMetadataArgs {
    /// Directory to summarize.
    pub directory: PathBuf,

    /// Path to environment file.
    #[arg(long, value_name = "PATH")]
    pub env: Option<String>,

    /// Functions or packages to include.
    #[arg(long, value_name = "LIST")]
    pub include: Option<String>,

    /// Functions or packages to exclude.
    #[arg(long, value_name = "LIST")]
    pub exclude: Option<String>,
}

/// Arguments for `cloudctl sandbox watch`.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// Directory to watch.
    pub directory: PathBuf,

    #[command(flatten)]
    pub build: BuildArgs,
}
