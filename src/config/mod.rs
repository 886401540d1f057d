//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (default paths, export tag names, query limits)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Cli, Command, Config, DbArg, LogFormat, LogLevel};
