//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod config;
mod process;
mod utils;

pub use config::handle_config;
pub use process::{handle_anonymize, handle_prepare, handle_transform};
