//! BYNIS: bytes in the node-ID sums of a synthetic network.
//!
//! No cover is needed. Each byte of `[width][length][payload]` becomes one
//! new edge `(source, target)` with `(source + target) mod 256 == byte`.
//! Sources walk a descending reference degree sequence so the synthetic
//! network inherits a realistic degree skew.

use super::header::{decode_header, frame_payload, header_width};
use super::permute::{resolve_seed, seeded_rng};
use super::stats::CodecStats;
use crate::error::{Result, StegoError};
use crate::graph::{powerlaw_cluster_degrees, AdjacencyGraph, EdgeList, EdgeRow, Graph};
use crate::report::{NullSink, ProgressSink};
use crate::DEFAULT_MAX_RETRIES;

/// ChaCha stream id reserved for reference-graph generation.
pub const STREAM_SYNTHESIS: u64 = 0x5359_4E54;

/// Triangle-closing probability of the generated reference graph.
const TRIANGLE_PROBABILITY: f64 = 0.1;

/// Options for [`Bynis::encode`].
#[derive(Debug, Clone, PartialEq)]
pub struct BynisOptions {
    /// Seeds the reference graph generator. `None` and `0` mean the default.
    pub seed: Option<u64>,
    /// Degree sequence to mimic. Generated when absent.
    pub reference_degrees: Option<Vec<usize>>,
    /// Build a directed network.
    pub directed: bool,
    /// Collision probes allowed per edge.
    pub max_retries: usize,
}

impl Default for BynisOptions {
    fn default() -> Self {
        Self {
            seed: None,
            reference_degrees: None,
            directed: false,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Synthetic-network byte codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bynis;

/// Output of [`Bynis::encode`].
#[derive(Debug, Clone)]
pub struct Synthesized {
    /// Stego rows in payload order.
    pub edges: EdgeList<i64>,
    /// The network built from those rows.
    pub graph: AdjacencyGraph<i64>,
    /// Encode statistics.
    pub stats: CodecStats,
}

impl Bynis {
    pub fn new() -> Self {
        Self
    }

    /// Order-of-magnitude node count for `n_bytes` of framed data:
    /// `10^round(log10(n_bytes))`.
    pub fn estimate_node_count(n_bytes: usize) -> usize {
        if n_bytes == 0 {
            return 1;
        }
        let exponent = (n_bytes as f64).log10().round() as i32;
        10f64.powi(exponent).ceil() as usize
    }

    /// Smallest power of two covering `n_nodes`, at least 256.
    ///
    /// Every data byte is offset by this so targets stay clear of the low
    /// IDs used as sources.
    pub fn id_offset(n_nodes: usize) -> i64 {
        n_nodes.next_power_of_two().max(256) as i64
    }

    /// Synthesizes a network that carries `msg`.
    pub fn encode(&self, msg: &[u8], options: &BynisOptions) -> Result<Synthesized> {
        self.encode_with_sink(msg, options, &mut NullSink)
    }

    /// Synthesizes a network that carries `msg`, reporting to `sink`.
    pub fn encode_with_sink(
        &self,
        msg: &[u8],
        options: &BynisOptions,
        sink: &mut dyn ProgressSink,
    ) -> Result<Synthesized> {
        let data = frame_payload(msg);
        let n_nodes = Self::estimate_node_count(data.len());
        let offset = Self::id_offset(n_nodes);

        let mut degrees = match &options.reference_degrees {
            Some(degrees) => degrees.clone(),
            None => {
                let m = data.len() / n_nodes + 1;
                let n = n_nodes.max(m + 1);
                let mut rng = seeded_rng(resolve_seed(options.seed), STREAM_SYNTHESIS);
                sink.message(&format!(
                    "Generating reference network: {n} nodes, {m} edges per node"
                ));
                powerlaw_cluster_degrees(n, m, TRIANGLE_PROBABILITY, &mut rng)?
            }
        };
        degrees.sort_unstable_by(|a, b| b.cmp(a));

        let mut used = vec![0usize; degrees.len()];
        let mut graph = AdjacencyGraph::new(options.directed);
        let mut edges: EdgeList<i64> = Vec::with_capacity(data.len());
        let mut cur_num = 0usize;
        let mut num_try_rename = 0usize;

        for (done, &byte) in data.iter().enumerate() {
            while cur_num < degrees.len() && used[cur_num] >= degrees[cur_num] {
                cur_num += 1;
            }
            if cur_num == degrees.len() {
                return Err(StegoError::Synthesis(format!(
                    "reference degree sequence ran out after {done} of {} edges",
                    data.len()
                )));
            }

            let source = cur_num as i64;
            let mut target = i64::from(byte) + offset - source;
            let mut j = 1i64;
            loop {
                if target < 0 {
                    return Err(StegoError::Synthesis(format!(
                        "negative target node ID {target} for source {source}"
                    )));
                }
                if !graph.has_edge(&source, &target) {
                    break;
                }
                if j as usize > options.max_retries {
                    return Err(StegoError::Synthesis(format!(
                        "no free target for source {source} after {} retries",
                        options.max_retries
                    )));
                }
                num_try_rename += 1;
                target += 256 * j;
                j += 1;
            }

            graph.add_edge(source, target);
            used[cur_num] += 1;
            edges.push(EdgeRow::new(source, target));
            sink.progress(done + 1, data.len());
        }

        sink.message(&format!(
            "Num. Nodes in the Synthetic Stego Network: {}",
            graph.num_nodes()
        ));
        sink.message(&format!(
            "Num. Edges in the Synthetic Stego Network: {}",
            graph.num_edges()
        ));

        let mut stats = CodecStats::new();
        stats.insert("snet_num_nodes", graph.num_nodes());
        stats.insert("snet_num_edges", graph.num_edges());
        stats.insert("msg_bytewidth", header_width(msg.len() as u64));
        stats.insert("encoded_msg_size", msg.len());
        stats.insert("num_try_rename", num_try_rename);

        Ok(Synthesized {
            edges,
            graph,
            stats,
        })
    }

    /// Reads the payload back from the rows of a synthetic network.
    ///
    /// `_seed` is accepted for symmetry with the other codecs; the byte
    /// stream does not depend on it.
    pub fn decode(
        &self,
        stego: &[EdgeRow<i64>],
        _seed: Option<u64>,
        directed: bool,
    ) -> Result<(Vec<u8>, CodecStats)> {
        self.decode_with_sink(stego, directed, &mut NullSink)
    }

    /// Reads the payload back, reporting to `sink`.
    pub fn decode_with_sink(
        &self,
        stego: &[EdgeRow<i64>],
        directed: bool,
        sink: &mut dyn ProgressSink,
    ) -> Result<(Vec<u8>, CodecStats)> {
        let Some(first) = stego.first() else {
            return Err(StegoError::MalformedHeader("empty edge list".to_string()));
        };
        let prefix_len = 1 + row_byte(first) as usize;
        let prefix: Vec<u8> = stego.iter().take(prefix_len).map(row_byte).collect();
        let (len, consumed) = decode_header(&prefix)?;

        let rows = &stego[consumed..];
        let len = usize::try_from(len)
            .ok()
            .filter(|&len| len <= rows.len())
            .ok_or_else(|| {
                StegoError::MalformedHeader(format!(
                    "declared length {len} exceeds the {} rows remaining",
                    rows.len()
                ))
            })?;

        let mut graph = AdjacencyGraph::new(directed);
        let mut msg = Vec::with_capacity(len);
        for (done, row) in rows[..len].iter().enumerate() {
            graph.add_edge(row.source, row.target);
            msg.push(row_byte(row));
            sink.progress(done + 1, len);
        }
        sink.message(&format!("Decoded message length: {len} bytes"));

        let mut stats = CodecStats::new();
        stats.insert("snet_num_nodes", graph.num_nodes());
        stats.insert("snet_num_edges", graph.num_edges());
        stats.insert("decoded_msg_size", msg.len());

        Ok((msg, stats))
    }
}

/// Byte carried by one row: endpoint sum modulo 256.
fn row_byte(row: &EdgeRow<i64>) -> u8 {
    row.source.wrapping_add(row.target).rem_euclid(256) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::header::encode_header;

    fn flat_reference(nodes: usize, degree: usize) -> BynisOptions {
        BynisOptions {
            reference_degrees: Some(vec![degree; nodes]),
            ..BynisOptions::default()
        }
    }

    #[test]
    fn test_estimate_node_count() {
        assert_eq!(Bynis::estimate_node_count(0), 1);
        assert_eq!(Bynis::estimate_node_count(2), 1);
        assert_eq!(Bynis::estimate_node_count(4), 10);
        assert_eq!(Bynis::estimate_node_count(31), 10);
        assert_eq!(Bynis::estimate_node_count(32), 100);
        assert_eq!(Bynis::estimate_node_count(1000), 1000);
    }

    #[test]
    fn test_id_offset() {
        assert_eq!(Bynis::id_offset(10), 256);
        assert_eq!(Bynis::id_offset(1000), 1024);
        assert_eq!(Bynis::id_offset(1024), 1024);
    }

    #[test]
    fn test_rows_carry_framed_bytes() {
        let out = Bynis::new().encode(b"hi", &flat_reference(4, 10)).unwrap();

        let expected = [1u8, 2, b'h', b'i'];
        assert_eq!(out.edges.len(), expected.len());
        for (row, &byte) in out.edges.iter().zip(&expected) {
            assert_eq!(row.source, 0);
            assert_eq!(row.target, 256 + i64::from(byte));
        }
        assert_eq!(out.stats.get("msg_bytewidth"), Some(1));
        assert_eq!(out.stats.get("encoded_msg_size"), Some(2));
        assert_eq!(out.stats.get("snet_num_edges"), Some(4));
    }

    #[test]
    fn test_collision_moves_target_by_256() {
        let bynis = Bynis::new();
        let out = bynis.encode(b"aa", &flat_reference(4, 10)).unwrap();

        let first = &out.edges[2];
        let second = &out.edges[3];
        assert_eq!(first.source, second.source);
        assert_eq!(second.target, first.target + 256);
        assert_eq!(out.stats.get("num_try_rename"), Some(1));

        let (decoded, _) = bynis.decode(&out.edges, None, false).unwrap();
        assert_eq!(decoded, b"aa");
    }

    #[test]
    fn test_sources_advance_with_degree_slots() {
        // Degrees sort to [3, 2, 1]; six framed bytes fill all slots.
        let options = BynisOptions {
            reference_degrees: Some(vec![1, 3, 2]),
            ..BynisOptions::default()
        };
        let out = Bynis::new().encode(b"abcd", &options).unwrap();
        let sources: Vec<i64> = out.edges.iter().map(|r| r.source).collect();
        assert_eq!(sources, vec![0, 0, 0, 1, 1, 2]);
        for (row, &byte) in out.edges.iter().zip(&[1u8, 4, b'a', b'b', b'c', b'd']) {
            assert_eq!(row_byte(row), byte);
        }
    }

    #[test]
    fn test_exhausted_reference_is_synthesis_error() {
        let options = BynisOptions {
            reference_degrees: Some(vec![1, 1]),
            ..BynisOptions::default()
        };
        let err = Bynis::new().encode(b"abc", &options).unwrap_err();
        assert!(matches!(err, StegoError::Synthesis(_)));
    }

    #[test]
    fn test_retry_bound_is_enforced() {
        let options = BynisOptions {
            max_retries: 2,
            ..flat_reference(1, 100)
        };
        // Four equal bytes need three probes for the last one.
        let err = Bynis::new().encode(&[7, 7, 7, 7], &options).unwrap_err();
        assert!(matches!(err, StegoError::Synthesis(_)));

        let options = BynisOptions {
            max_retries: 3,
            ..flat_reference(1, 100)
        };
        assert!(Bynis::new().encode(&[7, 7, 7, 7], &options).is_ok());
    }

    #[test]
    fn test_generated_reference_roundtrip() {
        let bynis = Bynis::new();
        let msg: Vec<u8> = (0..=255u8).cycle().take(700).collect();
        let options = BynisOptions {
            seed: Some(5),
            ..BynisOptions::default()
        };

        let out = bynis.encode(&msg, &options).unwrap();
        assert_eq!(out.edges.len(), msg.len() + 3);
        assert_eq!(out.graph.num_edges(), out.edges.len());

        let again = bynis.encode(&msg, &options).unwrap();
        assert_eq!(out.edges, again.edges);

        let (decoded, stats) = bynis.decode(&out.edges, Some(5), false).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(stats.get("decoded_msg_size"), Some(700));
    }

    #[test]
    fn test_decode_rejects_bad_headers() {
        let bynis = Bynis::new();
        assert!(matches!(
            bynis.decode(&[], None, false),
            Err(StegoError::MalformedHeader(_))
        ));

        // Width tag 3.
        let rows = vec![EdgeRow::new(0i64, 3)];
        assert!(matches!(
            bynis.decode(&rows, None, false),
            Err(StegoError::MalformedHeader(_))
        ));

        // Declares five bytes, carries one.
        let header = encode_header(5);
        let mut rows: Vec<EdgeRow<i64>> = header
            .iter()
            .map(|&b| EdgeRow::new(0, 256 + i64::from(b)))
            .collect();
        rows.push(EdgeRow::new(0, 300));
        assert!(matches!(
            bynis.decode(&rows, None, false),
            Err(StegoError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_row_byte_is_euclidean() {
        assert_eq!(row_byte(&EdgeRow::new(-1, 0)), 255);
        assert_eq!(row_byte(&EdgeRow::new(300, 5)), 49);
    }
}
