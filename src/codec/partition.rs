//! Degree-class partitioning of a cover edge list.
//!
//! Each edge is classified by a symbol derived from its endpoint degrees.
//! Edge indices are grouped into one bucket per symbol, keeping original
//! edge-list order inside each bucket. Encoders draw edges from the bucket
//! matching each payload symbol; decoders recompute the symbol per row.

use crate::graph::{EdgeRow, Graph};

/// Maps endpoint degrees to a symbol in `0..ALPHABET`.
pub trait Classifier {
    /// Number of distinct symbols.
    const ALPHABET: usize;

    /// Payload bits carried per unit of the smallest bucket, used for the
    /// capacity estimate.
    const CAPACITY_FACTOR: u64;

    /// Symbol for an edge whose endpoints have degrees `deg_a` and `deg_b`.
    fn classify(deg_a: usize, deg_b: usize) -> usize;
}

/// 2-bit symbol `(deg_a mod 2, deg_b mod 2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParityClassifier;

impl Classifier for ParityClassifier {
    const ALPHABET: usize = 4;
    const CAPACITY_FACTOR: u64 = 8;

    fn classify(deg_a: usize, deg_b: usize) -> usize {
        ((deg_a & 1) << 1) | (deg_b & 1)
    }
}

/// Byte symbol `(deg_a + deg_b) mod 256`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModSumClassifier;

impl Classifier for ModSumClassifier {
    const ALPHABET: usize = 256;
    const CAPACITY_FACTOR: u64 = 256;

    fn classify(deg_a: usize, deg_b: usize) -> usize {
        (deg_a.wrapping_add(deg_b)) & 0xFF
    }
}

/// Symbol of one row under classifier `C`.
pub fn symbol_of<G, C>(graph: &G, row: &EdgeRow<G::Node>) -> usize
where
    G: Graph,
    C: Classifier,
{
    C::classify(graph.degree(&row.source), graph.degree(&row.target))
}

/// Disjoint, order-preserving buckets of edge indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    buckets: Vec<Vec<usize>>,
    capacity_factor: u64,
    num_edges: usize,
}

impl Partition {
    /// Classifies every row of `edges` against the degrees of `graph`.
    pub fn build<G, C>(graph: &G, edges: &[EdgeRow<G::Node>]) -> Self
    where
        G: Graph,
        C: Classifier,
    {
        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); C::ALPHABET];
        for (index, row) in edges.iter().enumerate() {
            buckets[symbol_of::<G, C>(graph, row)].push(index);
        }
        Self {
            buckets,
            capacity_factor: C::CAPACITY_FACTOR,
            num_edges: edges.len(),
        }
    }

    /// Number of edges partitioned.
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Number of buckets.
    pub fn alphabet(&self) -> usize {
        self.buckets.len()
    }

    /// Edge indices carrying `symbol`, in original order.
    pub fn bucket(&self, symbol: usize) -> &[usize] {
        &self.buckets[symbol]
    }

    /// Size of every bucket, by symbol.
    pub fn sizes(&self) -> Vec<usize> {
        self.buckets.iter().map(Vec::len).collect()
    }

    /// Size of the smallest bucket.
    pub fn min_size(&self) -> usize {
        self.buckets.iter().map(Vec::len).min().unwrap_or(0)
    }

    /// Capacity estimate: `factor * min(bucket sizes)`.
    ///
    /// Assumes payload symbols are spread uniformly over the classes; a
    /// skewed payload can still exhaust one bucket below this size.
    pub fn capacity(&self) -> u64 {
        self.capacity_factor * self.min_size() as u64
    }

    /// Finds the first symbol (ascending) whose bucket is smaller than its
    /// demand in `histogram`. Returns `(symbol, required, available)`.
    pub fn first_shortfall(&self, histogram: &[usize]) -> Option<(usize, usize, usize)> {
        histogram
            .iter()
            .zip(&self.buckets)
            .enumerate()
            .find(|(_, (need, bucket))| **need > bucket.len())
            .map(|(symbol, (need, bucket))| (symbol, *need, bucket.len()))
    }

    /// Starts handing out edges from the buckets.
    pub fn cursor(&self) -> BucketCursor<'_> {
        BucketCursor {
            partition: self,
            next: vec![0; self.buckets.len()],
        }
    }
}

/// Hands out unused edge indices per bucket, in original order.
#[derive(Debug)]
pub struct BucketCursor<'a> {
    partition: &'a Partition,
    next: Vec<usize>,
}

impl<'a> BucketCursor<'a> {
    /// Next unused edge of the `symbol` bucket, or `None` when exhausted.
    pub fn take(&mut self, symbol: usize) -> Option<usize> {
        let index = *self.partition.buckets[symbol].get(self.next[symbol])?;
        self.next[symbol] += 1;
        Some(index)
    }

    /// Number of edges consumed from `symbol`'s bucket.
    pub fn used(&self, symbol: usize) -> usize {
        self.next[symbol]
    }

    /// Every edge not yet handed out, bucket by bucket in symbol order.
    pub fn leftovers(self) -> impl Iterator<Item = usize> + 'a {
        let partition = self.partition;
        self.next
            .into_iter()
            .enumerate()
            .flat_map(move |(symbol, start)| partition.buckets[symbol][start..].iter().copied())
    }
}

/// Builds a lookup of per-symbol counts for a symbol stream.
pub fn histogram(symbols: &[usize], alphabet: usize) -> Vec<usize> {
    let mut counts = vec![0; alphabet];
    for &symbol in symbols {
        counts[symbol] += 1;
    }
    counts
}
