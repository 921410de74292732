//! BYMOND: bytes in the modulo of node-degree sums.
//!
//! Every edge carries one byte: `(degree(source) + degree(target)) mod 256`.
//! Encoding reorders the cover edge list so that, read in order, the edges
//! spell out `[width][length][payload]` (see [`frame_payload`]); unused
//! edges follow bucket by bucket, then the whole list is shuffled with the
//! seed. The node/edge multiset is never changed.

use super::ensure_consistent;
use super::header::{frame_payload, split_payload};
use super::partition::{histogram, symbol_of, Classifier, ModSumClassifier, Partition};
use super::permute::{resolve_seed, SeededPermutation};
use super::stats::CodecStats;
use crate::error::{Result, StegoError, SymbolClass};
use crate::graph::{EdgeList, EdgeRow, Graph};
use crate::report::{NullSink, ProgressSink};

/// Modulo-sum byte codec.
///
/// Like [`Bind`](super::Bind), it caches the partition computed by
/// [`estimate_capacity_bytes`](Self::estimate_capacity_bytes) for the next
/// `encode`.
#[derive(Debug, Clone, Default)]
pub struct Bymond {
    partition: Option<Partition>,
}

impl Bymond {
    /// Creates a codec with no capacity estimate yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the cached partition.
    pub fn reset(&mut self) {
        self.partition = None;
    }

    /// Whether a capacity estimate is cached.
    pub fn is_estimated(&self) -> bool {
        self.partition.is_some()
    }

    /// Cached capacity estimate in bytes.
    pub fn estimated_capacity_bytes(&self) -> Option<u64> {
        self.partition.as_ref().map(Partition::capacity)
    }

    /// Sizes of the 256 buckets of the cached partition.
    pub fn bucket_sizes(&self) -> Option<Vec<usize>> {
        self.partition.as_ref().map(Partition::sizes)
    }

    /// Classifies the cover edges into 256 buckets and returns
    /// `256 * min(bucket sizes)` bytes.
    pub fn estimate_capacity_bytes<G: Graph>(&mut self, graph: &G, cover: &[EdgeRow<G::Node>]) -> u64 {
        let partition = Partition::build::<G, ModSumClassifier>(graph, cover);
        let capacity = partition.capacity();
        self.partition = Some(partition);
        capacity
    }

    /// Hides `msg` in the order of `cover`.
    pub fn encode<G>(
        &mut self,
        graph: &G,
        cover: &[EdgeRow<G::Node>],
        msg: &[u8],
        seed: Option<u64>,
    ) -> Result<(EdgeList<G::Node>, CodecStats)>
    where
        G: Graph,
        G::Node: Clone,
    {
        self.encode_with_sink(graph, cover, msg, seed, &mut NullSink)
    }

    /// Hides `msg`, reporting to `sink`.
    pub fn encode_with_sink<G>(
        &mut self,
        graph: &G,
        cover: &[EdgeRow<G::Node>],
        msg: &[u8],
        seed: Option<u64>,
        sink: &mut dyn ProgressSink,
    ) -> Result<(EdgeList<G::Node>, CodecStats)>
    where
        G: Graph,
        G::Node: Clone,
    {
        ensure_consistent(graph, cover)?;
        sink.message(&format!("Num. Nodes in the Cover Network: {}", graph.num_nodes()));
        sink.message(&format!("Num. Edges in the Cover Network: {}", graph.num_edges()));

        if self
            .partition
            .as_ref()
            .is_some_and(|p| p.num_edges() != cover.len())
        {
            self.partition = None;
        }
        let fresh = self.partition.is_none();
        let partition: &Partition = self
            .partition
            .get_or_insert_with(|| Partition::build::<G, ModSumClassifier>(graph, cover));
        if fresh {
            sink.message(&format!("Estimated Max. Message Bytes: {}", partition.capacity()));
        }

        let data = frame_payload(msg);
        let symbols: Vec<usize> = data.iter().map(|&b| b as usize).collect();
        let counts = histogram(&symbols, ModSumClassifier::ALPHABET);
        if let Some((value, required, available)) = partition.first_shortfall(&counts) {
            return Err(StegoError::Capacity {
                class: SymbolClass::ModSum(value as u8),
                required: required as u64,
                available: available as u64,
            });
        }

        let mut cursor = partition.cursor();
        let mut order: Vec<usize> = Vec::with_capacity(cover.len());
        for (done, &symbol) in symbols.iter().enumerate() {
            let index = cursor.take(symbol).ok_or(StegoError::Capacity {
                class: SymbolClass::ModSum(symbol as u8),
                required: counts[symbol] as u64,
                available: partition.bucket(symbol).len() as u64,
            })?;
            order.push(index);
            sink.progress(done + 1, symbols.len());
        }
        order.extend(cursor.leftovers());

        let assembled: EdgeList<G::Node> = order.iter().map(|&i| cover[i].clone()).collect();
        let permutation = SeededPermutation::new(assembled.len(), resolve_seed(seed));
        let stego = permutation.scramble(assembled);

        let mut stats = CodecStats::new();
        stats.insert("cnet_num_nodes", graph.num_nodes());
        stats.insert("cnet_num_edges", graph.num_edges());
        stats.insert("cel_num_edges", cover.len());
        for (value, size) in partition.sizes().into_iter().enumerate() {
            stats.insert(format!("cel_num_edges_{value:03}"), size);
        }
        stats.insert("cel_num_edges_encoded", data.len());
        stats.insert("estimated_max_msg_size", partition.capacity());
        stats.insert("encoded_msg_size", msg.len());

        Ok((stego, stats))
    }

    /// Recovers the payload hidden in `stego`.
    pub fn decode<G: Graph>(
        &self,
        graph: &G,
        stego: &[EdgeRow<G::Node>],
        seed: Option<u64>,
    ) -> Result<(Vec<u8>, CodecStats)> {
        self.decode_with_sink(graph, stego, seed, &mut NullSink)
    }

    /// Recovers the payload, reporting to `sink`.
    pub fn decode_with_sink<G: Graph>(
        &self,
        graph: &G,
        stego: &[EdgeRow<G::Node>],
        seed: Option<u64>,
        sink: &mut dyn ProgressSink,
    ) -> Result<(Vec<u8>, CodecStats)> {
        ensure_consistent(graph, stego)?;

        let stream: Vec<u8> = stego
            .iter()
            .map(|row| symbol_of::<G, ModSumClassifier>(graph, row) as u8)
            .collect();
        let permutation = SeededPermutation::new(stream.len(), resolve_seed(seed));
        let stream = permutation.unscramble(stream);

        let msg = split_payload(&stream)?.to_vec();
        sink.message(&format!("Decoded message length: {} bytes", msg.len()));
        sink.progress(msg.len(), msg.len());

        let mut stats = CodecStats::new();
        stats.insert("snet_num_nodes", graph.num_nodes());
        stats.insert("snet_num_edges", graph.num_edges());
        stats.insert("sel_num_edges", stego.len());
        stats.insert("decoded_msg_size", msg.len());

        Ok((msg, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyGraph;
    use std::collections::HashSet;

    /// Graph whose degrees are fixed by node ID: sources `0..n` have degree
    /// equal to their ID and targets (offset by `TARGET_BASE`) degree 0, so
    /// edge `i` carries residue `i mod 256`.
    struct ResidueGraph {
        edges: HashSet<(u32, u32)>,
    }

    const TARGET_BASE: u32 = 1_000_000;

    impl ResidueGraph {
        fn with_edges(n: u32) -> (Self, Vec<EdgeRow<u32>>) {
            let rows: Vec<EdgeRow<u32>> = (0..n).map(|i| EdgeRow::new(i, TARGET_BASE + i)).collect();
            let edges = rows.iter().map(|r| (r.source, r.target)).collect();
            (Self { edges }, rows)
        }
    }

    impl Graph for ResidueGraph {
        type Node = u32;

        fn degree(&self, node: &u32) -> usize {
            if *node < TARGET_BASE {
                *node as usize
            } else {
                0
            }
        }

        fn num_nodes(&self) -> usize {
            2 * self.edges.len()
        }

        fn num_edges(&self) -> usize {
            self.edges.len()
        }

        fn has_edge(&self, a: &u32, b: &u32) -> bool {
            self.edges.contains(&(*a, *b))
        }

        fn add_edge(&mut self, a: u32, b: u32) {
            self.edges.insert((a, b));
        }
    }

    /// A path `0 - 1 - ... - n`: inner edges have degree sum 4 and both end
    /// edges have sum 3.
    fn path(n: usize) -> (AdjacencyGraph<usize>, Vec<EdgeRow<usize>>) {
        let edges: Vec<EdgeRow<usize>> = (0..n).map(|i| EdgeRow::new(i, i + 1)).collect();
        let g = AdjacencyGraph::from_edges(&edges, false);
        (g, edges)
    }

    #[test]
    fn test_roundtrip_preserves_edge_multiset() {
        let (g, cover) = ResidueGraph::with_edges(2560);
        let mut codec = Bymond::new();
        assert_eq!(codec.estimate_capacity_bytes(&g, &cover), 2560);

        let (stego, stats) = codec.encode(&g, &cover, b"steganog!", Some(42)).unwrap();
        assert_eq!(stats.get("encoded_msg_size"), Some(9));
        assert_eq!(stats.get("cel_num_edges_encoded"), Some(11));
        assert_eq!(stats.get("cel_num_edges_000"), Some(10));
        assert_eq!(stats.get("cel_num_edges_255"), Some(10));

        let mut before = cover.clone();
        let mut after = stego.clone();
        before.sort();
        after.sort();
        assert_eq!(before, after);

        let (decoded, stats) = codec.decode(&g, &stego, Some(42)).unwrap();
        assert_eq!(decoded, b"steganog!");
        assert_eq!(stats.get("decoded_msg_size"), Some(9));
    }

    #[test]
    fn test_roundtrip_every_byte_value() {
        let (g, cover) = ResidueGraph::with_edges(2560);
        let mut codec = Bymond::new();
        let msg: Vec<u8> = (0..=255u8).collect();

        let (stego, _) = codec.encode(&g, &cover, &msg, Some(3)).unwrap();
        let (decoded, _) = codec.decode(&g, &stego, Some(3)).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_capacity_error_reports_byte_value() {
        let (g, edges) = path(10);
        let mut codec = Bymond::new();
        assert_eq!(codec.estimate_capacity_bytes(&g, &edges), 0);

        // The frame of an empty payload is [1, 0]; residue 0 comes first.
        let err = codec.encode(&g, &edges, b"", None).unwrap_err();
        match err {
            StegoError::Capacity { class, required, available } => {
                assert_eq!(class, SymbolClass::ModSum(0));
                assert_eq!(required, 1);
                assert_eq!(available, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_skewed_payload_exhausts_one_bucket() {
        let (g, cover) = ResidueGraph::with_edges(2560);
        let mut codec = Bymond::new();

        let err = codec.encode(&g, &cover, &[b'a'; 11], None).unwrap_err();
        assert!(matches!(
            err,
            StegoError::Capacity { class: SymbolClass::ModSum(b'a'), required: 11, available: 10 }
        ));
    }

    #[test]
    fn test_wrong_seed_scrambles_payload() {
        let (g, cover) = ResidueGraph::with_edges(2560);
        let mut codec = Bymond::new();
        let msg = b"a fairly long secret message";

        let (stego, _) = codec.encode(&g, &cover, msg, Some(77)).unwrap();
        let result = codec.decode(&g, &stego, Some(78));
        assert!(result.map_or(true, |(decoded, _)| decoded != msg));
    }

    #[test]
    fn test_default_seed_matches_explicit_one() {
        let (g, cover) = ResidueGraph::with_edges(2560);
        let mut codec = Bymond::new();

        let (a, _) = codec.encode(&g, &cover, b"seed", None).unwrap();
        let (b, _) = codec.encode(&g, &cover, b"seed", Some(1)).unwrap();
        let (c, _) = codec.encode(&g, &cover, b"seed", Some(0)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_decode_rejects_foreign_rows() {
        let (g, cover) = ResidueGraph::with_edges(300);
        let mut stego = cover.clone();
        stego[5] = EdgeRow::new(5, 6);
        assert!(matches!(
            Bymond::new().decode(&g, &stego, None),
            Err(StegoError::InconsistentGraph(_))
        ));
    }
}
