//! Pair-group (arithmetic mean) hierarchical clustering.
//!
//! Cluster ids follow the linkage convention: taxa are `0..n`, and the k-th merge
//! (1-based) creates cluster `n + k - 1`.

use std::io;

use bit_set::BitSet;

use crate::error::{SeqError, SeqResult};

use super::distance::DistanceMatrix;
use super::tree::{ClusterNode, Dendrogram, PhyloTree};

/// How the distance from a freshly merged cluster to the others is averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairGroupMethod {
    /// UPGMA: mean over all member pairs, i.e. weighted by cluster size.
    Unweighted,
    /// WPGMA: plain mean of the two merged clusters' distances.
    Weighted,
}

impl PairGroupMethod {
    fn name(self) -> &'static str {
        match self {
            PairGroupMethod::Unweighted => "upgma",
            PairGroupMethod::Weighted => "wpgma",
        }
    }

    #[inline]
    fn merged_distance(self, d_im: f64, d_jm: f64, size_i: usize, size_j: usize) -> f64 {
        match self {
            PairGroupMethod::Unweighted => {
                (size_i as f64 * d_im + size_j as f64 * d_jm) / (size_i + size_j) as f64
            }
            PairGroupMethod::Weighted => (d_im + d_jm) / 2.0,
        }
    }
}

/// One merge event: clusters `a` and `b` joined at `height`, giving `size` taxa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkageRecord {
    pub a: usize,
    pub b: usize,
    pub height: f64,
    pub size: usize,
}

impl LinkageRecord {
    /// `[a, b, height, size]`, the row layout of a scipy linkage matrix.
    pub fn as_row(&self) -> [f64; 4] {
        [self.a as f64, self.b as f64, self.height, self.size as f64]
    }
}

pub fn linkage_matrix(records: &[LinkageRecord]) -> Vec<[f64; 4]> {
    records.iter().map(LinkageRecord::as_row).collect()
}

/// Writes the linkage table as CSV with a `cluster_a,cluster_b,height,size` header.
pub fn write_linkage_csv<W: io::Write>(records: &[LinkageRecord], writer: W) -> SeqResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["cluster_a", "cluster_b", "height", "size"])?;
    for r in records {
        wtr.write_record(&[
            r.a.to_string(),
            r.b.to_string(),
            format!("{:?}", r.height),
            r.size.to_string(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn upgma(dist: &DistanceMatrix) -> SeqResult<Dendrogram> {
    pair_group(dist, PairGroupMethod::Unweighted)
}

pub fn wpgma(dist: &DistanceMatrix) -> SeqResult<Dendrogram> {
    pair_group(dist, PairGroupMethod::Weighted)
}

/// Repeatedly merges the closest pair of active clusters until one remains.
///
/// Ties go to the lexicographically smallest `(id_a, id_b)` pair.
pub fn pair_group(dist: &DistanceMatrix, method: PairGroupMethod) -> SeqResult<Dendrogram> {
    let n = dist.n();
    if n < 2 {
        return Err(SeqError::InsufficientData {
            method: method.name(),
            needed: 2,
            n,
        });
    }

    // Working distance matrix: (2n-1) x (2n-1) to hold every merged cluster.
    let cap = 2 * n - 1;
    let mut d = vec![0.0f64; cap * cap];
    for i in 0..n {
        for j in 0..n {
            d[i * cap + j] = dist.get(i, j);
        }
    }

    let mut nodes: Vec<Option<ClusterNode>> = Vec::with_capacity(cap);
    for (i, label) in dist.labels().iter().enumerate() {
        nodes.push(Some(ClusterNode::leaf(i, label)));
    }

    let mut active = BitSet::with_capacity(cap);
    for i in 0..n {
        active.insert(i);
    }
    let mut cluster_size = vec![1usize; cap];
    let mut linkage = Vec::with_capacity(n - 1);

    while active.len() > 1 {
        let mut min_d = f64::INFINITY;
        let mut min_i = 0;
        let mut min_j = 0;
        for i in active.iter() {
            for j in active.iter().filter(|&j| j > i) {
                if d[i * cap + j] < min_d {
                    min_d = d[i * cap + j];
                    min_i = i;
                    min_j = j;
                }
            }
        }

        let u = nodes.len();
        let h = min_d / 2.0;
        let si = cluster_size[min_i];
        let sj = cluster_size[min_j];
        cluster_size[u] = si + sj;

        active.remove(min_i);
        active.remove(min_j);
        for k in active.iter() {
            let duk = method.merged_distance(d[min_i * cap + k], d[min_j * cap + k], si, sj);
            d[u * cap + k] = duk;
            d[k * cap + u] = duk;
        }
        active.insert(u);

        let (left, right) = take_pair(&mut nodes, min_i, min_j)?;
        nodes.push(Some(ClusterNode::group(h, left, right)));
        linkage.push(LinkageRecord {
            a: min_i,
            b: min_j,
            height: h,
            size: si + sj,
        });

        log::debug!(
            "{}: merged {} + {} -> {} at height {:.6} ({} taxa)",
            method.name(),
            min_i,
            min_j,
            u,
            h,
            si + sj
        );
    }

    let root = nodes
        .pop()
        .flatten()
        .ok_or_else(|| SeqError::malformed("clustering produced no root"))?;
    let tree = PhyloTree::new(root, dist.labels().to_vec());
    Ok(Dendrogram::new(tree, linkage))
}

/// Moves two active subtrees out of the node arena.
pub(crate) fn take_pair(
    nodes: &mut [Option<ClusterNode>],
    i: usize,
    j: usize,
) -> SeqResult<(ClusterNode, ClusterNode)> {
    match (nodes[i].take(), nodes[j].take()) {
        (Some(left), Some(right)) => Ok((left, right)),
        _ => Err(SeqError::malformed(format!(
            "cluster {i} or {j} was merged twice"
        ))),
    }
}
