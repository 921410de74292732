//! In-memory simple graph backed by hash adjacency sets.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::{EdgeRow, Graph};

/// Simple graph (no parallel edges), directed or undirected.
///
/// Degrees follow the usual convention: a self loop adds 2, and a node of a
/// directed graph has degree = in-degree + out-degree.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph<N> {
    directed: bool,
    succ: HashMap<N, HashSet<N>>,
    pred: HashMap<N, HashSet<N>>,
    num_edges: usize,
}

impl<N: Clone + Eq + Hash> AdjacencyGraph<N> {
    /// Creates an empty graph.
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            succ: HashMap::new(),
            pred: HashMap::new(),
            num_edges: 0,
        }
    }

    /// Builds a graph from edge rows. Duplicate rows collapse into one edge.
    pub fn from_edges<'a, I>(rows: I, directed: bool) -> Self
    where
        I: IntoIterator<Item = &'a EdgeRow<N>>,
        N: 'a,
    {
        let mut graph = Self::new(directed);
        for row in rows {
            graph.add_edge(row.source.clone(), row.target.clone());
        }
        graph
    }

    /// Whether edges are directed.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Whether `node` is present.
    pub fn has_node(&self, node: &N) -> bool {
        self.succ.contains_key(node)
    }

    /// Iterates over all nodes in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.succ.keys()
    }

    fn ensure_node(&mut self, node: &N) {
        if !self.succ.contains_key(node) {
            self.succ.insert(node.clone(), HashSet::new());
            if self.directed {
                self.pred.insert(node.clone(), HashSet::new());
            }
        }
    }
}

impl<N: Clone + Eq + Hash> Graph for AdjacencyGraph<N> {
    type Node = N;

    fn degree(&self, node: &N) -> usize {
        let Some(out) = self.succ.get(node) else {
            return 0;
        };
        let self_loop = usize::from(out.contains(node));
        if self.directed {
            let inc = self.pred.get(node).map_or(0, HashSet::len);
            out.len() + inc
        } else {
            out.len() + self_loop
        }
    }

    fn num_nodes(&self) -> usize {
        self.succ.len()
    }

    fn num_edges(&self) -> usize {
        self.num_edges
    }

    fn has_edge(&self, a: &N, b: &N) -> bool {
        self.succ.get(a).is_some_and(|out| out.contains(b))
    }

    fn add_edge(&mut self, a: N, b: N) {
        if self.has_edge(&a, &b) {
            return;
        }
        self.ensure_node(&a);
        self.ensure_node(&b);

        if let Some(out) = self.succ.get_mut(&a) {
            out.insert(b.clone());
        }
        if self.directed {
            if let Some(inc) = self.pred.get_mut(&b) {
                inc.insert(a);
            }
        } else if let Some(out) = self.succ.get_mut(&b) {
            out.insert(a);
        }
        self.num_edges += 1;
    }
}
