//! Decode command - recover a payload from a stego network.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use netstego::config::Settings;
use netstego::io::write_payload;
use netstego::{Bind, Bymond, Bynis, TracingSink};

use super::{print_stats, resolve_seed, CodecKind, CommandExecutor, GraphArgs};

/// Recover a payload from a stego edge list.
///
/// Use -o/--output to write raw bytes to a file. Without -o, the payload is
/// printed as text (lossy UTF-8 conversion).
#[derive(Args, Debug)]
pub struct DecodeCommand {
    /// Codec the stego network was encoded with
    #[arg(short, long, value_enum)]
    pub codec: CodecKind,

    /// Stego edge list
    #[arg(short, long)]
    pub input: PathBuf,

    /// Write the payload to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seed used at encode time
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Print decode statistics as JSON
    #[arg(long)]
    pub stats: bool,

    #[command(flatten)]
    pub graph: GraphArgs,
}

impl CommandExecutor for DecodeCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let seed = resolve_seed(self.seed, settings);
        let (graph, table) = self.graph.load(&self.input, settings)?;
        let mut sink = TracingSink;

        let (msg, stats) = match self.codec {
            CodecKind::Bind => Bind::new()
                .decode_with_sink(&graph, &table.rows, seed, &mut sink)
                .context("BIND decoding failed")?,
            CodecKind::Bymond => Bymond::new()
                .decode_with_sink(&graph, &table.rows, seed, &mut sink)
                .context("BYMOND decoding failed")?,
            CodecKind::Bynis => {
                let rows = table
                    .numeric_rows()
                    .context("bynis stego networks need integer node IDs")?;
                Bynis::new()
                    .decode_with_sink(&rows, self.graph.directed(settings), &mut sink)
                    .context("BYNIS decoding failed")?
            }
        };

        match &self.output {
            Some(path) => {
                write_payload(path, &msg)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("Wrote {} bytes to {}", msg.len(), path.display());
            }
            None => println!("{}", String::from_utf8_lossy(&msg)),
        }

        if self.stats {
            print_stats(&stats)?;
        }
        Ok(())
    }
}
