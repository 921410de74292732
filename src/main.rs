//! netstego - Hide data in the structure of networks
//!
//! A CLI tool for graph steganography: reorder the edge list of a cover
//! network, or synthesize a new network, so that it carries a payload.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use commands::{CapacityCommand, CommandExecutor, DecodeCommand, EncodeCommand};
use netstego::config::Settings;

/// netstego - Hide data in the structure of networks
///
/// BIND and BYMOND hide a payload in the edge order of an existing network
/// without changing its nodes or edges. BYNIS builds a new network whose
/// node IDs carry the payload.
#[derive(Parser)]
#[command(name = "netstego")]
#[command(version)]
#[command(about = "Graph steganography over edge lists")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.netstego/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (progress and diagnostics on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate how much a cover network can hold
    Capacity(CapacityCommand),

    /// Hide a payload in a network
    Encode(EncodeCommand),

    /// Recover a payload from a stego network
    Decode(DecodeCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::resolve(cli.config.as_deref()).context("Failed to load configuration")?;

    match &cli.command {
        Commands::Capacity(cmd) => cmd.execute(&settings),
        Commands::Encode(cmd) => cmd.execute(&settings),
        Commands::Decode(cmd) => cmd.execute(&settings),
    }
}

/// Installs a stderr subscriber. `RUST_LOG` overrides the level.
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();
}
