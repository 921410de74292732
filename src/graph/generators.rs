//! Random graph generators for reference degree sequences.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, StegoError};
use crate::graph::{EdgeList, EdgeRow};

/// Degree sequence of a Holme-Kim power-law cluster graph.
///
/// Growth model: start from `m` isolated nodes, then attach each new node to
/// `m` existing nodes chosen by preferential attachment. After each
/// attachment, with probability `p` the next link closes a triangle with a
/// random neighbor of the previous target instead.
///
/// The result is indexed by node id (`0..n`), not sorted.
pub fn powerlaw_cluster_degrees<R: Rng + ?Sized>(
    n: usize,
    m: usize,
    p: f64,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if m < 1 || m >= n {
        return Err(StegoError::Synthesis(format!(
            "power-law cluster graph needs 1 <= m < n (m={m}, n={n})"
        )));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(StegoError::Synthesis(format!(
            "triangle probability must be within [0, 1] (p={p})"
        )));
    }

    let mut adjacency: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
    let mut repeated: Vec<usize> = (0..m).collect();

    for source in m..n {
        let mut targets = random_subset(&repeated, m, rng);
        let mut target = pop_target(&mut targets)?;
        link(&mut adjacency, source, target);
        repeated.push(target);

        let mut count = 1;
        while count < m {
            if rng.gen::<f64>() < p {
                let neighborhood: Vec<usize> = adjacency[target]
                    .iter()
                    .copied()
                    .filter(|&nbr| nbr != source && !adjacency[source].contains(&nbr))
                    .collect();
                if let Some(&nbr) = neighborhood.choose(rng) {
                    link(&mut adjacency, source, nbr);
                    repeated.push(nbr);
                    count += 1;
                    continue;
                }
            }
            target = pop_target(&mut targets)?;
            link(&mut adjacency, source, target);
            repeated.push(target);
            count += 1;
        }
        repeated.extend(std::iter::repeat(source).take(m));
    }

    Ok(adjacency.iter().map(BTreeSet::len).collect())
}

/// Edge list of a uniform random simple graph with `n` nodes and `m` edges
/// (Erdős-Rényi G(n, m)), in generation order.
pub fn gnm_random_edges<R: Rng + ?Sized>(n: usize, m: usize, rng: &mut R) -> Result<EdgeList<usize>> {
    let max_edges = n.saturating_mul(n.saturating_sub(1)) / 2;
    if m > max_edges {
        return Err(StegoError::Synthesis(format!(
            "{n} nodes hold at most {max_edges} edges, {m} requested"
        )));
    }

    let mut seen: BTreeSet<(usize, usize)> = BTreeSet::new();
    let mut edges = Vec::with_capacity(m);
    while edges.len() < m {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a == b || !seen.insert((a.min(b), a.max(b))) {
            continue;
        }
        edges.push(EdgeRow::new(a, b));
    }
    Ok(edges)
}

/// Picks `m` distinct values from `seq`, weighted by multiplicity.
fn random_subset<R: Rng + ?Sized>(seq: &[usize], m: usize, rng: &mut R) -> Vec<usize> {
    let mut chosen: Vec<usize> = Vec::with_capacity(m);
    while chosen.len() < m {
        if let Some(&x) = seq.choose(rng) {
            if !chosen.contains(&x) {
                chosen.push(x);
            }
        }
    }
    chosen
}

fn pop_target(targets: &mut Vec<usize>) -> Result<usize> {
    targets
        .pop()
        .ok_or_else(|| StegoError::Synthesis("ran out of attachment targets".to_string()))
}

fn link(adjacency: &mut [BTreeSet<usize>], a: usize, b: usize) {
    adjacency[a].insert(b);
    adjacency[b].insert(a);
}
