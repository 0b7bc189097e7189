//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Args, Parser, Subcommand, ValueEnum};
use propclean_core::PathStyle;
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Propclean CLI - flatten keys and anonymize paths in JSON/YAML documents
///
/// Reads a document from a file or stdin, renames its keys to start case and
/// flattens them, and/or reduces absolute filesystem paths to basenames.
#[derive(Parser, Debug)]
#[command(
    name = "propclean",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose logging (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "PROPCLEAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rename keys to start case and flatten nested mappings
    Transform(TransformArgs),

    /// Replace absolute paths in string values with their basename
    Anonymize(AnonymizeArgs),

    /// Anonymize paths, then transform keys
    Prepare(PrepareArgs),

    /// Inspect or create configuration files
    Config(ConfigArgs),
}

/// Input and output locations shared by the document commands
#[derive(Args, Debug, Clone)]
pub struct IoArgs {
    /// Input document (JSON, or YAML for .yaml/.yml); '-' or omitted reads stdin
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Write the result to a file instead of stdout
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

impl IoArgs {
    /// Input path, or `None` when reading stdin
    pub fn input_path(&self) -> Option<&std::path::Path> {
        self.input
            .as_deref()
            .filter(|path| path.as_os_str() != "-")
    }
}

/// Arguments for the transform command
#[derive(Args, Debug)]
pub struct TransformArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// Separator placed between flattened key segments
    #[arg(short, long)]
    pub delimiter: Option<String>,

    /// Reject documents nested deeper than this
    #[arg(long)]
    pub max_depth: Option<usize>,
}

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// Path convention used to detect absolute paths
    #[arg(short, long, value_enum)]
    pub style: Option<StyleArg>,

    /// Reject documents nested deeper than this
    #[arg(long)]
    pub max_depth: Option<usize>,
}

/// Arguments for the prepare command
#[derive(Args, Debug)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// Path convention used to detect absolute paths
    #[arg(short, long, value_enum)]
    pub style: Option<StyleArg>,

    /// Separator placed between flattened key segments
    #[arg(short, long)]
    pub delimiter: Option<String>,

    /// Reject documents nested deeper than this
    #[arg(long)]
    pub max_depth: Option<usize>,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with default values
    Init(ConfigInitArgs),

    /// Print the locations searched for a configuration file
    Paths,
}

/// Arguments for config init
#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file (defaults to the user config directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Compact JSON output
    Json,
    /// Pretty-printed JSON output
    JsonPretty,
    /// YAML output
    Yaml,
}

/// Path convention selection
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    /// Forward-slash paths rooted at '/'
    Posix,
    /// Drive-letter and backslash paths
    Windows,
    /// Whatever this platform uses
    Host,
}

impl From<StyleArg> for PathStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Posix => PathStyle::Posix,
            StyleArg::Windows => PathStyle::Windows,
            StyleArg::Host => PathStyle::host(),
        }
    }
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Whether to color diagnostics written to stderr
    pub fn use_color(&self) -> bool {
        !self.no_color
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stderr().is_terminal()
    }
}
