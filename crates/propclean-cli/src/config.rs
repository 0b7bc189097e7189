//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Environment variables
//!
//! Command-line flags are applied on top by the handlers.

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use propclean_core::{AnonymizeOptions, PathStyle, PrepareOptions, TransformOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Nesting limit used when neither the config nor the command line sets one
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key flattening settings
    pub transform: TransformOptions,

    /// Path anonymization settings
    pub anonymize: AnonymizeOptions,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored diagnostics by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transform: TransformOptions::default().with_max_depth(DEFAULT_MAX_DEPTH),
            anonymize: AnonymizeOptions::default().with_max_depth(DEFAULT_MAX_DEPTH),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::JsonPretty,
            color: true,
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let parsed = if is_yaml(path) {
            serde_yaml::from_str(&content).map_err(anyhow::Error::from)
        } else {
            serde_json::from_str(&content).map_err(anyhow::Error::from)
        };

        parsed.map_err(|e| {
            Error::config_with_source(format!("Failed to load {}", path.display()), e)
        })
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable config");
                    }
                }
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations, then apply env overrides
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::load()?,
        };
        config.apply_env()?;
        Ok(config)
    }

    /// User-level config file location
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("propclean").join("config.yaml"))
    }

    /// Default configuration file paths to check, in priority order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("propclean.yaml"),
            PathBuf::from("propclean.json"),
            PathBuf::from(".propclean.yaml"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let propclean_dir = config_dir.join("propclean");
            paths.push(propclean_dir.join("config.yaml"));
            paths.push(propclean_dir.join("config.json"));
        }

        paths
    }

    /// Apply `PROPCLEAN_PATH_STYLE` and `PROPCLEAN_MAX_DEPTH`
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(
            std::env::var("PROPCLEAN_PATH_STYLE").ok().as_deref(),
            std::env::var("PROPCLEAN_MAX_DEPTH").ok().as_deref(),
        )
    }

    fn apply_overrides(&mut self, style: Option<&str>, max_depth: Option<&str>) -> Result<()> {
        if let Some(style) = style {
            self.anonymize.style = style.parse::<PathStyle>().map_err(Error::config)?;
        }

        if let Some(max_depth) = max_depth {
            let limit: usize = max_depth.trim().parse().map_err(|e| {
                Error::config_with_source(
                    format!("PROPCLEAN_MAX_DEPTH must be a non-negative integer, got '{max_depth}'"),
                    e,
                )
            })?;
            self.transform.max_depth = Some(limit);
            self.anonymize.max_depth = Some(limit);
        }

        Ok(())
    }

    /// Combined options for the prepare command
    pub fn prepare_options(&self) -> PrepareOptions {
        PrepareOptions {
            transform: self.transform.clone(),
            anonymize: self.anonymize,
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.transform.delimiter, " ");
        assert_eq!(config.transform.max_depth, Some(DEFAULT_MAX_DEPTH));
        assert_eq!(config.anonymize.style, PathStyle::host());
        assert_eq!(config.output.format, OutputFormat::JsonPretty);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("propclean.yaml");
        std::fs::write(
            &path,
            "transform:\n  delimiter: \".\"\nanonymize:\n  style: windows\noutput:\n  format: yaml\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.transform.delimiter, ".");
        assert_eq!(config.transform.max_depth, None);
        assert_eq!(config.anonymize.style, PathStyle::Windows);
        assert_eq!(config.output.format, OutputFormat::Yaml);
        assert!(config.output.color);
    }

    #[test]
    fn test_json_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("propclean.json");
        std::fs::write(&path, r#"{"anonymize": {"style": "posix", "max_depth": 16}}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.anonymize.style, PathStyle::Posix);
        assert_eq!(config.anonymize.max_depth, Some(16));
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "anonymize:\n  style: amiga\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert_eq!(err.exit_code(), 5);
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::from_file(Path::new("/nonexistent/propclean.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(Some("windows"), Some("12")).unwrap();
        assert_eq!(config.anonymize.style, PathStyle::Windows);
        assert_eq!(config.transform.max_depth, Some(12));
        assert_eq!(config.anonymize.max_depth, Some(12));

        assert!(config.apply_overrides(Some("beos"), None).is_err());
        assert!(config.apply_overrides(None, Some("-1")).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let mut config = Config::default();
        config.transform.delimiter = "/".to_string();
        config.save(&path).unwrap();

        let reloaded = Config::from_file(&path).unwrap();
        assert_eq!(reloaded, config);
    }
}
