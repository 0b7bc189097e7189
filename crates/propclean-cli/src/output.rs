//! Output formatting and writing utilities
//!
//! Results go to stdout (or a file) in JSON or YAML. Status messages go to
//! stderr so piped output stays machine readable.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Trait for formatting serializable values
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }
}

/// Output writer that handles the result stream and status messages
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
    status: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a writer for stdout (results) and stderr (status)
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writers(
            format,
            use_color,
            quiet,
            Box::new(io::stdout()),
            Box::new(io::stderr()),
        )
    }

    /// Create an output writer with custom streams
    pub fn with_writers(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
        status: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
            status,
        }
    }

    /// Send results to a file instead of the current result stream
    pub fn redirect_to_file(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.writer = Box::new(BufWriter::new(File::create(path)?));
        Ok(())
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write data in the configured format, newline terminated
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut formatted = self.format.format(value)?;
        if !formatted.ends_with('\n') {
            formatted.push('\n');
        }
        debug!(bytes = formatted.len(), format = ?self.format, "Writing result");
        self.write(&formatted)
    }

    /// Write an info message to the status stream
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.use_color {
            format!("{} {}", "ℹ".blue(), message)
        } else {
            format!("INFO: {}", message)
        };
        self.status_line(&line)
    }

    /// Write a success message to the status stream
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.use_color {
            message.green().to_string()
        } else {
            message.to_string()
        };
        self.status_line(&line)
    }

    /// Write a warning message to the status stream, even in quiet mode
    pub fn warning(&mut self, message: &str) -> Result<()> {
        let line = if self.use_color {
            message.yellow().to_string()
        } else {
            format!("WARNING: {}", message)
        };
        self.status_line(&line)
    }

    fn status_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.status, "{}", line)?;
        self.status.flush()?;
        Ok(())
    }
}
