//! CLI subcommands.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use clap::Subcommand;
use corelib::{HashRing, RingBuilder, RingConfig};
use replication::{ReplicationStrategy, SimpleStrategy};
use serde::Serialize;
use tracing::info;

use crate::config::OutputFormat;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the owner (and optional replicas) of each key.
    Route {
        /// Ring members; repeat or comma-separate.
        #[arg(short, long = "node", required = true, value_delimiter = ',')]
        nodes: Vec<String>,
        /// Nodes listed per key, owner included.
        #[arg(short = 'r', long, default_value_t = 1)]
        replication_factor: usize,
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Spread synthetic keys over the ring and report each node's share.
    Distribution {
        #[arg(short, long = "node", required = true, value_delimiter = ',')]
        nodes: Vec<String>,
        #[arg(short, long, default_value_t = 10_000)]
        keys: usize,
    },
    /// Remove one node and report how many keys changed owner.
    Churn {
        #[arg(short, long = "node", required = true, value_delimiter = ',')]
        nodes: Vec<String>,
        #[arg(short, long)]
        remove: String,
        #[arg(short, long, default_value_t = 10_000)]
        keys: usize,
    },
}

#[derive(Debug, Serialize)]
pub struct Route {
    pub key: String,
    pub nodes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NodeShare {
    pub node: String,
    pub keys: usize,
    /// Fraction of the 32-bit position space owned.
    pub ownership: f64,
}

#[derive(Debug, Serialize)]
pub struct DistributionReport {
    pub keys: usize,
    pub nodes: Vec<NodeShare>,
    /// Largest per-node key count divided by the mean.
    pub max_over_mean: f64,
}

#[derive(Debug, Serialize)]
pub struct ChurnReport {
    pub keys: usize,
    pub removed: String,
    pub moved: usize,
    /// Keys that changed owner although the removed node did not own them.
    /// Always zero on a consistent hash ring.
    pub moved_between_survivors: usize,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CommandResult {
    Routes(Vec<Route>),
    Distribution(DistributionReport),
    Churn(ChurnReport),
}

fn build_ring(config: &RingConfig, nodes: &[String]) -> anyhow::Result<HashRing> {
    Ok(RingBuilder::from_config(config)
        .add_nodes(nodes.iter().cloned())
        .build()?)
}

fn synthetic_key(i: usize) -> String {
    format!("key-{i}")
}

impl Command {
    pub fn execute(&self, config: &RingConfig) -> anyhow::Result<CommandResult> {
        match self {
            Command::Route {
                nodes,
                replication_factor,
                keys,
            } => {
                let ring = build_ring(config, nodes)?;
                let strategy = SimpleStrategy::new(*replication_factor)?;
                let routes = keys
                    .iter()
                    .map(|key| {
                        Ok(Route {
                            key: key.clone(),
                            nodes: strategy.replicas_for_key(&ring, key)?,
                        })
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;
                Ok(CommandResult::Routes(routes))
            }
            Command::Distribution { nodes, keys } => {
                let ring = build_ring(config, nodes)?;
                let mut counts: BTreeMap<String, usize> =
                    ring.members().into_iter().map(|node| (node, 0)).collect();
                for i in 0..*keys {
                    *counts.entry(ring.get(synthetic_key(i))?).or_default() += 1;
                }

                let ownership: BTreeMap<String, f64> = ring.ownership().into_iter().collect();
                let mean = *keys as f64 / counts.len() as f64;
                let max = counts.values().copied().max().unwrap_or(0);
                let report = DistributionReport {
                    keys: *keys,
                    nodes: counts
                        .into_iter()
                        .map(|(node, keys)| NodeShare {
                            ownership: ownership.get(&node).copied().unwrap_or(0.0),
                            node,
                            keys,
                        })
                        .collect(),
                    max_over_mean: if mean > 0.0 { max as f64 / mean } else { 0.0 },
                };
                info!(keys, max_over_mean = report.max_over_mean, "distribution computed");
                Ok(CommandResult::Distribution(report))
            }
            Command::Churn {
                nodes,
                remove,
                keys,
            } => {
                let ring = build_ring(config, nodes)?;
                anyhow::ensure!(ring.contains(remove), "{remove} is not one of the nodes");

                let before = (0..*keys)
                    .map(|i| ring.get(synthetic_key(i)))
                    .collect::<corelib::Result<Vec<_>>>()?;
                ring.remove(remove);

                let mut moved = 0;
                let mut moved_between_survivors = 0;
                for (i, old) in before.iter().enumerate() {
                    // Removing the only node leaves every key without an owner.
                    let new = ring.get(synthetic_key(i)).ok();
                    if new.as_ref() != Some(old) {
                        moved += 1;
                        if old != remove {
                            moved_between_survivors += 1;
                        }
                    }
                }
                Ok(CommandResult::Churn(ChurnReport {
                    keys: *keys,
                    removed: remove.clone(),
                    moved,
                    moved_between_survivors,
                }))
            }
        }
    }
}

impl CommandResult {
    pub fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        if format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(self)?);
        }

        let mut out = String::new();
        match self {
            CommandResult::Routes(routes) => {
                for route in routes {
                    writeln!(out, "{}\t{}", route.key, route.nodes.join(","))?;
                }
            }
            CommandResult::Distribution(report) => {
                for share in &report.nodes {
                    writeln!(
                        out,
                        "{}\t{}\t{:.2}%\t{:.2}% of ring",
                        share.node,
                        share.keys,
                        100.0 * share.keys as f64 / report.keys.max(1) as f64,
                        100.0 * share.ownership,
                    )?;
                }
                writeln!(out, "max/mean\t{:.3}", report.max_over_mean)?;
            }
            CommandResult::Churn(report) => {
                writeln!(
                    out,
                    "removed {}: {} of {} keys moved ({} between surviving nodes)",
                    report.removed, report.moved, report.keys, report.moved_between_survivors
                )?;
            }
        }
        Ok(out.trim_end().to_string())
    }
}
