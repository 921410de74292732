//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod capacity;
mod decode;
mod encode;

pub use capacity::CapacityCommand;
pub use decode::DecodeCommand;
pub use encode::EncodeCommand;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use netstego::config::Settings;
use netstego::io::{read_payload, read_table, EdgeFormat, EdgeTable};
use netstego::msg::generate_bytes;
use netstego::{AdjacencyGraph, CodecStats};

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic. Defaults from the
/// configuration file are passed in; flags override them.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self, settings: &Settings) -> Result<()>;
}

/// Which codec to run.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodecKind {
    /// 2 bits per edge from endpoint degree parities
    Bind,
    /// 1 byte per edge from endpoint degree sums
    Bymond,
    /// 1 byte per synthesized edge from node ID sums
    Bynis,
}

/// Edge-list options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GraphArgs {
    /// Edge-list format: csv, sif or dbstring (default: csv)
    #[arg(long)]
    pub format: Option<EdgeFormat>,

    /// Treat edges as directed
    #[arg(long)]
    pub directed: bool,
}

impl GraphArgs {
    /// Format from the flag, then the config file, then CSV.
    pub fn format(&self, settings: &Settings) -> EdgeFormat {
        self.format.or(settings.format).unwrap_or_default()
    }

    /// Directedness from the flag or the config file.
    pub fn directed(&self, settings: &Settings) -> bool {
        self.directed || settings.directed.unwrap_or(false)
    }

    /// Reads an edge list and builds its graph.
    pub fn load(&self, path: &Path, settings: &Settings) -> Result<(AdjacencyGraph<String>, EdgeTable)> {
        let format = self.format(settings);
        let (graph, table) = read_table(path, format, self.directed(settings))
            .with_context(|| format!("Failed to read {format} edge list {}", path.display()))?;
        tracing::info!("Loaded {} rows from {}", table.len(), path.display());
        Ok((graph, table))
    }
}

/// Where the payload comes from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct PayloadArgs {
    /// Text message to hide
    #[arg(short, long)]
    pub message: Option<String>,

    /// File whose bytes to hide
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Hide N random bytes (for experiments)
    #[arg(long, value_name = "N")]
    pub random: Option<usize>,
}

impl PayloadArgs {
    /// Loads the payload bytes.
    pub fn load(&self, seed: Option<u64>) -> Result<Vec<u8>> {
        if let Some(message) = &self.message {
            return Ok(message.as_bytes().to_vec());
        }
        if let Some(path) = &self.file {
            return read_payload(path)
                .with_context(|| format!("Failed to read payload file {}", path.display()));
        }
        Ok(generate_bytes(self.random.unwrap_or(0), seed))
    }
}

/// Seed from the flag, then the config file.
pub fn resolve_seed(flag: Option<u64>, settings: &Settings) -> Option<u64> {
    flag.or(settings.seed)
}

/// Prints statistics as pretty JSON on stdout.
pub fn print_stats(stats: &CodecStats) -> Result<()> {
    let json = serde_json::to_string_pretty(stats).context("Failed to serialize statistics")?;
    println!("{json}");
    Ok(())
}
