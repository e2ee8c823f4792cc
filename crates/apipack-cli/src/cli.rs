//! CLI argument definitions for the API packager.

use std::path::PathBuf;

use apipack_model::{BuildSwitches, Phase};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "apipack",
    version,
    about = "API specification packager",
    long_about = "Package RAML and OpenAPI specification projects.\n\n\
                  Resolves exchange.json, normalizes dependency archives into \
                  exchange_modules, validates the specification and assembles \
                  the package directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with timestamps (pretty and compact formats).
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the build lifecycle locally up to a phase.
    Build(BuildArgs),

    /// Validate the specification (runs the lifecycle up to compile).
    Validate(ValidateArgs),

    /// Resolve the descriptor and print the synthesized POM.
    Pom(PomArgs),

    /// Resolve the descriptor and print the bound goals per phase.
    Plan(PlanArgs),

    /// Normalize a directory of dependency archives.
    Normalize(NormalizeArgs),
}

/// Switches shared by every command that resolves a project.
#[derive(Args, Clone, Default)]
pub struct SwitchArgs {
    /// Do not validate the specification.
    #[arg(long = "skip-validation", env = "APIPACK_SKIP_VALIDATION")]
    pub skip_validation: bool,

    /// Do not run connector generation for complete APIs.
    #[arg(long = "skip-rest-connect", env = "APIPACK_SKIP_REST_CONNECT")]
    pub skip_rest_connect: bool,

    /// Group id used when exchange.json has none.
    #[arg(long = "group-id", value_name = "GROUP_ID", env = "APIPACK_GROUP_ID")]
    pub group_id: Option<String>,
}

impl SwitchArgs {
    pub fn to_switches(&self) -> BuildSwitches {
        BuildSwitches::new()
            .with_skip_validation(self.skip_validation)
            .with_skip_rest_connect(self.skip_rest_connect)
            .with_group_id_override(self.group_id.clone())
    }
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Project directory containing exchange.json.
    #[arg(value_name = "PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Last lifecycle phase to run.
    #[arg(long = "until", value_enum, default_value = "package")]
    pub until: PhaseArg,

    /// Directory holding the downloaded dependency archives
    /// (default: <BUILD_DIR>/dependencies).
    #[arg(long = "dependencies-dir", value_name = "DIR")]
    pub dependencies_dir: Option<PathBuf>,

    /// Build output directory (default: <PROJECT_DIR>/.exchange_modules_tmp/target).
    #[arg(long = "build-dir", value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    #[command(flatten)]
    pub switches: SwitchArgs,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Project directory containing exchange.json.
    #[arg(value_name = "PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Directory holding the downloaded dependency archives.
    #[arg(long = "dependencies-dir", value_name = "DIR")]
    pub dependencies_dir: Option<PathBuf>,

    /// Group id used when exchange.json has none.
    #[arg(long = "group-id", value_name = "GROUP_ID", env = "APIPACK_GROUP_ID")]
    pub group_id: Option<String>,
}

#[derive(Parser)]
pub struct PomArgs {
    /// Project directory containing exchange.json.
    #[arg(value_name = "PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Write the POM to this file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub switches: SwitchArgs,
}

#[derive(Parser)]
pub struct PlanArgs {
    /// Project directory containing exchange.json.
    #[arg(value_name = "PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    #[command(flatten)]
    pub switches: SwitchArgs,
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// Directory containing dependency archives (searched recursively).
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Destination of the normalized tree.
    #[arg(value_name = "DEST")]
    pub dest: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PhaseArg {
    GenerateSources,
    Compile,
    Package,
    Install,
    Deploy,
}

impl From<PhaseArg> for Phase {
    fn from(value: PhaseArg) -> Self {
        match value {
            PhaseArg::GenerateSources => Phase::GenerateSources,
            PhaseArg::Compile => Phase::Compile,
            PhaseArg::Package => Phase::Package,
            PhaseArg::Install => Phase::Install,
            PhaseArg::Deploy => Phase::Deploy,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
