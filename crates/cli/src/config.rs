//! Command-line configuration.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use corelib::{HashAlgorithm, RingConfig};
use tracing::debug;

use crate::commands::Command;

/// Inspect key placement on a consistent hash ring.
#[derive(Debug, Parser)]
#[command(name = "ring", version)]
pub struct CliConfig {
    /// JSON ring config file (`{"replicas": 20, "hash": "fnv1a"}`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Virtual nodes per node; overrides the config file.
    #[arg(long, global = true)]
    pub replicas: Option<usize>,

    /// Hash algorithm (fnv1a, fnv1, xxh3, sip13); overrides the config file.
    #[arg(long, global = true)]
    pub hash: Option<HashAlgorithm>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl CliConfig {
    /// Ring settings: defaults, then the config file, then flags.
    pub fn ring_config(&self) -> anyhow::Result<RingConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => RingConfig::default(),
        };
        if let Some(replicas) = self.replicas {
            config.replicas = replicas;
        }
        if let Some(hash) = self.hash {
            config.hash = hash;
        }
        config.validate()?;
        debug!(?config, "ring config");
        Ok(config)
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        let ring_config = self.ring_config()?;
        let result = self.command.execute(&ring_config)?;
        println!("{}", result.render(self.format)?);
        Ok(())
    }
}
