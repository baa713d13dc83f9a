use crate::diagnostic::OutputFormat;
use crate::discovery;
use crate::mode::Mode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "confcheck")]
#[command(version = "0.1.0")]
#[command(about = "Validate and merge modal editor configuration files")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check configuration documents and report problems
    Check {
        /// Documents in load order (defaults to config.toml and languages.toml)
        files: Vec<PathBuf>,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Look formatter and language server commands up on PATH
        #[arg(long)]
        check_commands: bool,

        #[arg(long)]
        config_dir: Option<PathBuf>,
    },
    /// Print the layered documents as one TOML document
    Merge {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the effective key bindings
    Keys {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Only show bindings for this mode
        #[arg(long, short = 'm', value_enum)]
        mode: Option<Mode>,
    },
    /// List themes the `theme` setting can name
    Themes {
        #[arg(long)]
        config_dir: Option<PathBuf>,
    },
}

/// `--config-dir` if given, otherwise the discovered one.
pub fn resolve_config_dir(config_dir: Option<&PathBuf>) -> PathBuf {
    config_dir.cloned().unwrap_or_else(discovery::get_config_dir)
}

pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
