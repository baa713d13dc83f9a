use anyhow::{Context, Result};
use confcheck::cli::{self, Command};
use confcheck::config::CheckerConfig;
use confcheck::diagnostic::{Diagnostics, Severity};
use confcheck::discovery;
use confcheck::document::Document;
use confcheck::error::ConfigError;
use confcheck::mode::Mode;
use confcheck::validate::{self, ValidateOptions};
use log::warn;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli_args = cli::parse_args();

    // Initialize logger (set RUST_LOG env var to control verbosity)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    match cli_args.command {
        Command::Check {
            files,
            strict,
            format,
            check_commands,
            config_dir,
        } => {
            let config_dir = cli::resolve_config_dir(config_dir.as_ref());
            let config = load_checker_config(&config_dir)?;

            let files = if files.is_empty() {
                discovery::find_documents(&config_dir)
            } else {
                files
            };
            if files.is_empty() {
                return Err(ConfigError::NotFound(format!(
                    "no configuration documents in {}",
                    config_dir.display()
                ))
                .into());
            }
            let docs = load_documents(&files)?;

            let mut options = ValidateOptions::from_config(&config);
            options.check_commands = check_commands;
            options.theme_dirs.extend(discovery::theme_dirs(&config_dir));

            let report = validate::validate(&docs, &options);
            print!("{}", report.render(format));

            if report.has_errors(strict || config.strict) {
                std::process::exit(1);
            }
        }
        Command::Merge { files } => {
            let docs = load_documents(&files)?;
            let mut diags = Diagnostics::default();
            let merged = validate::merged_table(&docs, &mut diags);
            for dropped in diags.iter().filter(|d| d.severity == Severity::Error) {
                warn!("not merged: {}", dropped);
            }
            let text = toml::to_string_pretty(&merged)
                .context("Failed to serialize merged document")?;
            print!("{}", text);
        }
        Command::Keys { files, mode } => {
            let docs = load_documents(&files)?;
            let keymaps = validate::layered_keymaps(&docs);
            let modes: Vec<Mode> = match mode {
                Some(mode) => vec![mode],
                None => keymaps.modes().collect(),
            };
            for mode in modes {
                for binding in keymaps.bindings(mode) {
                    println!("{}: {} ({})", mode, binding, binding.target.kind());
                }
            }
        }
        Command::Themes { config_dir } => {
            let config_dir = cli::resolve_config_dir(config_dir.as_ref());
            let config = load_checker_config(&config_dir)?;
            let mut options = ValidateOptions::from_config(&config);
            options.theme_dirs.extend(discovery::theme_dirs(&config_dir));

            for theme in validate::available_themes(&options) {
                println!("{}", theme);
            }
        }
    }

    Ok(())
}

fn load_checker_config(config_dir: &Path) -> Result<CheckerConfig> {
    match discovery::find_tool_config(config_dir) {
        Some(path) => CheckerConfig::from_file(&path)
            .with_context(|| format!("Failed to load checker settings from {}", path.display())),
        None => Ok(CheckerConfig::default()),
    }
}

fn load_documents(files: &[PathBuf]) -> Result<Vec<Document>> {
    files
        .iter()
        .map(|path| {
            Document::from_file(path).with_context(|| format!("Failed to load {}", path.display()))
        })
        .collect()
}
