//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigInitArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use serde::Serialize;

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Show => output.data(config),
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Paths => handle_config_paths(output),
    }
}

fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => Config::user_config_path()
            .ok_or_else(|| Error::config("Unable to determine user config directory"))?,
    };

    if path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        ))?;
        return Ok(());
    }

    Config::default().save(&path)?;
    tracing::info!(path = %path.display(), "Wrote default configuration");
    output.success(&format!("✓ Created config at {}", path.display()))
}

#[derive(Serialize)]
struct SearchPath {
    path: String,
    exists: bool,
}

fn handle_config_paths(output: &mut OutputWriter) -> Result<()> {
    let paths: Vec<SearchPath> = Config::default_config_paths()
        .into_iter()
        .map(|path| SearchPath {
            exists: path.exists(),
            path: path.display().to_string(),
        })
        .collect();
    output.data(&paths)
}
