//! BIND: bits in node-degree parity.
//!
//! Every edge carries two bits: the parity of its source degree and the
//! parity of its target degree. Encoding reorders the cover edge list so
//! that, read in order, the parities spell out
//! `[byte length: fixed-width field][payload bits]`; unused edges follow,
//! then the whole list is shuffled with the seed.
//!
//! The length field width is a function of the edge count only (see
//! [`bit_header_width`]), so the decoder can recompute it from the stego
//! graph. The node/edge multiset is never changed.

use bitvec::prelude::*;

use super::header::bit_header_width;
use super::partition::{histogram, symbol_of, Classifier, ParityClassifier, Partition};
use super::permute::{resolve_seed, SeededPermutation};
use super::stats::CodecStats;
use super::ensure_consistent;
use crate::error::{ParityClass, Result, StegoError, SymbolClass};
use crate::graph::{EdgeList, EdgeRow, Graph};
use crate::report::{NullSink, ProgressSink};

/// Parity-class bit codec.
///
/// Holds the partition of the last estimated cover edge list; an `encode`
/// that follows `estimate_capacity_bits` reuses it without reclassifying.
#[derive(Debug, Clone, Default)]
pub struct Bind {
    partition: Option<Partition>,
}

impl Bind {
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

    /// Cached capacity estimate in bits.
    pub fn estimated_capacity_bits(&self) -> Option<u64> {
        self.partition.as_ref().map(Partition::capacity)
    }

    /// Classifies the cover edges into EE/EO/OE/OO and returns
    /// `8 * min(bucket sizes)` bits.
    pub fn estimate_capacity_bits<G: Graph>(&mut self, graph: &G, cover: &[EdgeRow<G::Node>]) -> u64 {
        let partition = Partition::build::<G, ParityClassifier>(graph, cover);
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

    /// Hides a bit payload; its length must be a whole number of bytes.
    pub fn encode_bits<G>(
        &mut self,
        graph: &G,
        cover: &[EdgeRow<G::Node>],
        bits: &BitSlice<u8, Msb0>,
        seed: Option<u64>,
    ) -> Result<(EdgeList<G::Node>, CodecStats)>
    where
        G: Graph,
        G::Node: Clone,
    {
        if bits.len() % 8 != 0 {
            return Err(StegoError::InvalidPayload(format!(
                "{} bits is not a whole number of bytes",
                bits.len()
            )));
        }
        let bytes: Vec<u8> = bits.chunks(8).map(pack_byte).collect();
        self.encode(graph, cover, &bytes, seed)
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
        sink.message(&format!("Num. Nodes: {}", graph.num_nodes()));
        sink.message(&format!("Num. Edges: {}", graph.num_edges()));

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
            .get_or_insert_with(|| Partition::build::<G, ParityClassifier>(graph, cover));
        if fresh {
            sink.message(&format!("Estimated Max. Message Bits: {}", partition.capacity()));
        }
        for class in ParityClass::ALL {
            sink.message(&format!(
                "Num. Edges ({class}): {}",
                partition.bucket(class.symbol() as usize).len()
            ));
        }

        let width = bit_header_width(cover.len());
        let symbols = symbol_stream(msg, width)?;
        let counts = histogram(&symbols, ParityClassifier::ALPHABET);
        for class in ParityClass::ALL {
            sink.message(&format!(
                "Num. Two Bit Units ({class}): {}",
                counts[class.symbol() as usize]
            ));
        }
        if let Some((symbol, required, available)) = partition.first_shortfall(&counts) {
            return Err(StegoError::Capacity {
                class: SymbolClass::Parity(ParityClass::from_symbol(symbol as u8)),
                required: required as u64,
                available: available as u64,
            });
        }

        let mut cursor = partition.cursor();
        let mut order: Vec<usize> = Vec::with_capacity(cover.len());
        for (done, &symbol) in symbols.iter().enumerate() {
            let index = cursor.take(symbol).ok_or(StegoError::Capacity {
                class: SymbolClass::Parity(ParityClass::from_symbol(symbol as u8)),
                required: counts[symbol] as u64,
                available: partition.bucket(symbol).len() as u64,
            })?;
            order.push(index);
            sink.progress(2 * (done + 1), 2 * symbols.len());
        }
        order.extend(cursor.leftovers());

        let assembled: EdgeList<G::Node> = order.iter().map(|&i| cover[i].clone()).collect();
        let permutation = SeededPermutation::new(assembled.len(), resolve_seed(seed));
        let stego = permutation.scramble(assembled);

        let mut stats = CodecStats::new();
        stats.insert("cnet_num_nodes", graph.num_nodes());
        stats.insert("cnet_num_edges", graph.num_edges());
        stats.insert("cel_num_edges", cover.len());
        for class in ParityClass::ALL {
            stats.insert(
                format!("cel_num_edges_{}", class.as_str()),
                partition.bucket(class.symbol() as usize).len(),
            );
        }
        stats.insert("cel_num_edges_encoded", symbols.len());
        stats.insert("estimated_max_msg_bits", partition.capacity());
        stats.insert("encoded_msg_bits", 8 * msg.len());

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

    /// Recovers the payload as bits.
    pub fn decode_bits<G: Graph>(
        &self,
        graph: &G,
        stego: &[EdgeRow<G::Node>],
        seed: Option<u64>,
    ) -> Result<(BitVec<u8, Msb0>, CodecStats)> {
        let (bytes, stats) = self.decode(graph, stego, seed)?;
        Ok((BitVec::from_vec(bytes), stats))
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

        let symbols: Vec<usize> = stego
            .iter()
            .map(|row| symbol_of::<G, ParityClassifier>(graph, row))
            .collect();
        let permutation = SeededPermutation::new(symbols.len(), resolve_seed(seed));
        let symbols = permutation.unscramble(symbols);

        let width = bit_header_width(graph.num_edges()) as usize;
        let header_symbols = width / 2;
        if symbols.len() < header_symbols {
            return Err(StegoError::MalformedHeader(format!(
                "{}-bit length field needs {header_symbols} edges, {} available",
                width,
                symbols.len()
            )));
        }

        let mut n_bytes: u64 = 0;
        for &symbol in &symbols[..header_symbols] {
            n_bytes = (n_bytes << 2) | symbol as u64;
        }
        sink.message(&format!("Decoded message length: {n_bytes} bytes"));

        let available = symbols.len() - header_symbols;
        let needed = usize::try_from(n_bytes)
            .ok()
            .and_then(|n| n.checked_mul(4))
            .filter(|&needed| needed <= available)
            .ok_or_else(|| {
                StegoError::MalformedHeader(format!(
                    "declared length {n_bytes} bytes needs more than the {available} edges left"
                ))
            })?;

        let body = &symbols[header_symbols..header_symbols + needed];
        let msg: Vec<u8> = body
            .chunks(4)
            .map(|quad| quad.iter().fold(0u8, |acc, &s| (acc << 2) | s as u8))
            .collect();
        sink.progress(needed, needed);

        let mut stats = CodecStats::new();
        stats.insert("snet_num_nodes", graph.num_nodes());
        stats.insert("snet_num_edges", graph.num_edges());
        stats.insert("sel_num_edges", stego.len());
        stats.insert("decoded_msg_bits", 8 * msg.len());

        Ok((msg, stats))
    }
}

/// `[n_bytes: width bits][payload bits]`, split into 2-bit symbols.
fn symbol_stream(msg: &[u8], width: u32) -> Result<Vec<usize>> {
    let n_bytes = msg.len() as u64;
    let max = if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    };
    if n_bytes > max {
        return Err(StegoError::Capacity {
            class: SymbolClass::Header,
            required: n_bytes,
            available: max,
        });
    }

    let mut bits: BitVec<u8, Msb0> = BitVec::with_capacity(width as usize + 8 * msg.len());
    for shift in (0..width).rev() {
        bits.push(shift < 64 && (n_bytes >> shift) & 1 == 1);
    }
    bits.extend_from_bitslice(msg.view_bits::<Msb0>());

    Ok(bits
        .chunks(2)
        .map(|pair| (usize::from(pair[0]) << 1) | usize::from(pair[1]))
        .collect())
}

fn pack_byte(bits: &BitSlice<u8, Msb0>) -> u8 {
    bits.iter().fold(0u8, |acc, bit| (acc << 1) | u8::from(*bit))
}
