//! CLI tool for inspecting consistent hash rings.
//!
//! Provides commands for:
//! - Routing keys to nodes (with replica lists)
//! - Measuring key distribution across nodes
//! - Measuring key movement when a node leaves

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::{CliConfig, OutputFormat};
