//! Shared utilities for command handlers

use crate::error::{Error, Result};
use propclean_core::Node;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Document encodings accepted on input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// Pick the format from a file extension; anything but .yaml/.yml is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => InputFormat::Yaml,
            _ => InputFormat::Json,
        }
    }

    fn name(self) -> &'static str {
        match self {
            InputFormat::Json => "JSON",
            InputFormat::Yaml => "YAML",
        }
    }
}

/// Read a document from a file, or from stdin when `path` is `None`
pub fn read_document(path: Option<&Path>) -> Result<Node> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            let content = fs::read_to_string(path)?;
            parse_document(
                &content,
                InputFormat::from_path(path),
                &path.display().to_string(),
            )
        }
        None => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            parse_document(&content, InputFormat::Json, "<stdin>")
        }
    }
}

/// Parse document text. Blank input is an absent document.
pub fn parse_document(content: &str, format: InputFormat, source_name: &str) -> Result<Node> {
    if content.trim().is_empty() {
        tracing::debug!(source = source_name, "Empty input, treating document as absent");
        return Ok(Node::Absent);
    }

    let parsed = match format {
        InputFormat::Json => serde_json::from_str::<Node>(content).map_err(|e| e.to_string()),
        InputFormat::Yaml => serde_yaml::from_str::<Node>(content).map_err(|e| e.to_string()),
    };

    parsed.map_err(|reason| Error::InvalidFormat {
        source_name: source_name.to_string(),
        expected: format.name().to_string(),
        reason,
    })
}
