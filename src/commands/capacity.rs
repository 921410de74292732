//! Capacity command - estimate how much a cover network can hold.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use netstego::config::Settings;
use netstego::{Bind, Bymond, Graph};

use super::{CodecKind, CommandExecutor, GraphArgs};

/// Estimate the payload capacity of a cover network.
///
/// The estimate assumes payload symbols are spread evenly over the degree
/// classes; a skewed payload may still fail to fit.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Codec to estimate for (bind or bymond)
    #[arg(short, long, value_enum)]
    pub codec: CodecKind,

    /// Cover edge list
    #[arg(short, long)]
    pub input: PathBuf,

    #[command(flatten)]
    pub graph: GraphArgs,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let (graph, table) = self.graph.load(&self.input, settings)?;
        println!("Nodes: {}", graph.num_nodes());
        println!("Edges: {}", graph.num_edges());

        match self.codec {
            CodecKind::Bind => {
                let bits = Bind::new().estimate_capacity_bits(&graph, &table.rows);
                println!("Capacity: {} bits ({} bytes)", bits, bits / 8);
            }
            CodecKind::Bymond => {
                let mut codec = Bymond::new();
                let bytes = codec.estimate_capacity_bytes(&graph, &table.rows);
                println!("Capacity: {bytes} bytes");
                if let Some(sizes) = codec.bucket_sizes() {
                    let empty = sizes.iter().filter(|&&n| n == 0).count();
                    if empty > 0 {
                        println!("Empty degree-sum classes: {empty} of 256");
                    }
                }
            }
            CodecKind::Bynis => {
                bail!("bynis synthesizes its own network; capacity does not apply");
            }
        }
        Ok(())
    }
}
