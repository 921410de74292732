//! Encode command - hide a payload in a network.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use netstego::codec::BynisOptions;
use netstego::config::Settings;
use netstego::io::{write_table, EdgeTable};
use netstego::{Bind, Bymond, Bynis, CodecStats, Graph, TracingSink, DEFAULT_MAX_RETRIES};

use super::{print_stats, resolve_seed, CodecKind, CommandExecutor, GraphArgs, PayloadArgs};

/// Hide a payload in a network.
///
/// bind and bymond reorder the edge list of an existing cover network
/// (--input); the nodes and edges stay the same. bynis synthesizes a new
/// network, optionally mimicking the degree distribution of --reference.
#[derive(Args, Debug)]
pub struct EncodeCommand {
    /// Codec to use
    #[arg(short, long, value_enum)]
    pub codec: CodecKind,

    /// Cover edge list (bind and bymond)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Where to write the stego edge list
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub payload: PayloadArgs,

    /// Seed for the row shuffle (bind, bymond) or the reference network (bynis)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Edge list whose degree distribution bynis mimics
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Collision probes allowed per synthesized edge (bynis)
    #[arg(long)]
    pub max_retries: Option<usize>,

    /// Print encode statistics as JSON
    #[arg(long)]
    pub stats: bool,

    #[command(flatten)]
    pub graph: GraphArgs,
}

impl CommandExecutor for EncodeCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let seed = resolve_seed(self.seed, settings);
        let msg = self.payload.load(seed)?;
        tracing::info!("Payload: {} bytes", msg.len());

        let (table, stats) = match self.codec {
            CodecKind::Bind | CodecKind::Bymond => self.encode_cover(&msg, seed, settings)?,
            CodecKind::Bynis => self.encode_synthetic(&msg, seed, settings)?,
        };

        let format = self.graph.format(settings);
        write_table(&self.output, format, &table)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;
        eprintln!(
            "Encoded {} bytes into {} edges: {}",
            msg.len(),
            table.len(),
            self.output.display()
        );

        if self.stats {
            print_stats(&stats)?;
        }
        Ok(())
    }
}

impl EncodeCommand {
    fn encode_cover(
        &self,
        msg: &[u8],
        seed: Option<u64>,
        settings: &Settings,
    ) -> Result<(EdgeTable, CodecStats)> {
        let Some(input) = &self.input else {
            bail!("--input is required for {:?}", self.codec);
        };
        let (graph, table) = self.graph.load(input, settings)?;
        let mut sink = TracingSink;

        let (rows, stats) = match self.codec {
            CodecKind::Bind => Bind::new()
                .encode_with_sink(&graph, &table.rows, msg, seed, &mut sink)
                .context("BIND encoding failed")?,
            _ => Bymond::new()
                .encode_with_sink(&graph, &table.rows, msg, seed, &mut sink)
                .context("BYMOND encoding failed")?,
        };
        Ok((table.with_rows(rows), stats))
    }

    fn encode_synthetic(
        &self,
        msg: &[u8],
        seed: Option<u64>,
        settings: &Settings,
    ) -> Result<(EdgeTable, CodecStats)> {
        let reference_degrees = match &self.reference {
            Some(path) => {
                let (graph, _) = self.graph.load(path, settings)?;
                Some(graph.nodes().map(|node| graph.degree(node)).collect())
            }
            None => None,
        };

        let options = BynisOptions {
            seed,
            reference_degrees,
            directed: self.graph.directed(settings),
            max_retries: self
                .max_retries
                .or(settings.max_retries)
                .unwrap_or(DEFAULT_MAX_RETRIES),
        };
        let out = Bynis::new()
            .encode_with_sink(msg, &options, &mut TracingSink)
            .context("BYNIS encoding failed")?;
        Ok((EdgeTable::from_numeric(&out.edges), out.stats))
    }
}
