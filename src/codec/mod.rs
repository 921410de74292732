//! Encoding engines and the primitives they share.
//!
//! This module provides:
//! - Length headers ([`header`])
//! - Seeded row permutation ([`permute`])
//! - Degree-class partitioning ([`partition`])
//! - The three codecs: [`bind`] (2 bits per edge from degree parities),
//!   [`bymond`] (1 byte per edge from degree sums) and [`bynis`]
//!   (1 byte per synthesized edge from node IDs)

pub mod bind;
pub mod bymond;
pub mod bynis;
pub mod header;
pub mod partition;
pub mod permute;
pub mod stats;

pub use bind::Bind;
pub use bymond::Bymond;
pub use bynis::{Bynis, BynisOptions, Synthesized};
pub use header::{bit_header_width, decode_header, encode_header, frame_payload, split_payload};
pub use partition::{ModSumClassifier, ParityClassifier, Partition};
pub use permute::{resolve_seed, SeededPermutation};
pub use stats::CodecStats;

use crate::error::{Result, StegoError};
use crate::graph::{EdgeRow, Graph};

/// Checks that `edges` is exactly the edge set of `graph`.
///
/// The extraction codecs derive header widths and symbols from the graph,
/// so an edge list that disagrees with it would decode to garbage.
pub(crate) fn ensure_consistent<G: Graph>(graph: &G, edges: &[EdgeRow<G::Node>]) -> Result<()> {
    if graph.num_edges() != edges.len() {
        return Err(StegoError::InconsistentGraph(format!(
            "graph has {} edges but the edge list has {} rows",
            graph.num_edges(),
            edges.len()
        )));
    }
    if let Some(row) = edges
        .iter()
        .position(|row| !graph.has_edge(&row.source, &row.target))
    {
        return Err(StegoError::InconsistentGraph(format!(
            "edge list row {row} is not an edge of the graph"
        )));
    }
    Ok(())
}
