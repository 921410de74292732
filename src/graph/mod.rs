//! Graph capability consumed by the codecs.
//!
//! This module provides:
//! - The [`Graph`] trait: the five operations every codec needs
//! - Edge list rows that carry extra attributes through unchanged
//! - [`AdjacencyGraph`], the bundled in-memory backend
//! - A power-law cluster generator for reference degree sequences

pub mod adjacency;
pub mod generators;

pub use adjacency::AdjacencyGraph;
pub use generators::{gnm_random_edges, powerlaw_cluster_degrees};

/// Minimal graph interface used by the codecs.
///
/// Any backend (adjacency list, matrix, an external library) can implement
/// it. Nothing beyond these operations is ever required.
pub trait Graph {
    /// Node identifier.
    type Node;

    /// Degree of `node` (0 for unknown nodes).
    fn degree(&self, node: &Self::Node) -> usize;

    /// Number of distinct nodes.
    fn num_nodes(&self) -> usize;

    /// Number of distinct edges.
    fn num_edges(&self) -> usize;

    /// Whether the edge `(a, b)` exists.
    fn has_edge(&self, a: &Self::Node, b: &Self::Node) -> bool;

    /// Inserts the edge `(a, b)`, creating missing nodes.
    fn add_edge(&mut self, a: Self::Node, b: Self::Node);
}

/// One row of an edge list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeRow<N> {
    /// First endpoint.
    pub source: N,
    /// Second endpoint.
    pub target: N,
    /// Extra columns, carried through unchanged.
    pub attrs: Vec<String>,
}

impl<N> EdgeRow<N> {
    /// Creates a row without attributes.
    pub fn new(source: N, target: N) -> Self {
        Self {
            source,
            target,
            attrs: Vec::new(),
        }
    }

    /// Creates a row with attribute columns.
    pub fn with_attrs(source: N, target: N, attrs: Vec<String>) -> Self {
        Self {
            source,
            target,
            attrs,
        }
    }
}

/// Ordered list of edge rows.
pub type EdgeList<N> = Vec<EdgeRow<N>>;
