use bit_set::BitSet;

use crate::error::{SeqError, SeqResult};

use super::cluster::take_pair;
use super::distance::DistanceMatrix;
use super::tree::{ClusterNode, PhyloTree};

/// Neighbor joining (Saitou & Nei).
///
/// While more than three nodes are active, joins the pair minimizing
/// `Q(i, j) = (n - 2) * d(i, j) - r(i) - r(j)`, where `r` is the row sum over active nodes.
/// The last three nodes are resolved with the three-point formula, and the final pair is
/// split at the midpoint of their distance. New node ids continue from `n` in join order.
pub fn neighbor_joining(dist: &DistanceMatrix) -> SeqResult<PhyloTree> {
    let n = dist.n();
    if n < 3 {
        return Err(SeqError::InsufficientData {
            method: "neighbor joining",
            needed: 3,
            n,
        });
    }

    // n leaves + (n - 2) internal joins + 1 final split
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

    while active.len() > 3 {
        let r = active.len() as f64;

        let mut row_sum = vec![0.0f64; cap];
        for i in active.iter() {
            for j in active.iter() {
                row_sum[i] += d[i * cap + j];
            }
        }

        let mut min_q = f64::INFINITY;
        let mut min_i = 0;
        let mut min_j = 0;
        for i in active.iter() {
            for j in active.iter().filter(|&j| j > i) {
                let q = (r - 2.0) * d[i * cap + j] - row_sum[i] - row_sum[j];
                if q < min_q {
                    min_q = q;
                    min_i = i;
                    min_j = j;
                }
            }
        }

        let dij = d[min_i * cap + min_j];
        let li = dij / 2.0 + (row_sum[min_i] - row_sum[min_j]) / (2.0 * (r - 2.0));
        let lj = dij - li;

        let u = join(&mut nodes, &mut active, &mut d, cap, min_i, min_j, (li, lj))?;
        log::debug!(
            "nj: joined {} ({:.6}) + {} ({:.6}) -> {}",
            min_i,
            li,
            min_j,
            lj,
            u
        );
    }

    // Three left: join the two lowest ids with the three-point formula.
    let mut rest = active.iter();
    let (Some(a), Some(b), Some(c)) = (rest.next(), rest.next(), rest.next()) else {
        return Err(SeqError::malformed("neighbor joining lost track of active nodes"));
    };
    let dab = d[a * cap + b];
    let la = (dab + d[a * cap + c] - d[b * cap + c]) / 2.0;
    let lb = dab - la;
    let u = join(&mut nodes, &mut active, &mut d, cap, a, b, (la, lb))?;

    // Final two-way split at the midpoint.
    let duc = d[u * cap + c];
    let (left, right) = take_pair(&mut nodes, c, u)?;
    let root = ClusterNode::joined((duc / 2.0, duc / 2.0), left, right);
    log::debug!("nj: final split {} + {} at distance {:.6}", c, u, duc);

    Ok(PhyloTree::new(root, dist.labels().to_vec()))
}

/// Replaces active nodes `i` and `j` by a new node holding both, and fills its distances
/// to every other active node. Returns the new node id.
fn join(
    nodes: &mut Vec<Option<ClusterNode>>,
    active: &mut BitSet,
    d: &mut [f64],
    cap: usize,
    i: usize,
    j: usize,
    lengths: (f64, f64),
) -> SeqResult<usize> {
    let u = nodes.len();
    let dij = d[i * cap + j];

    active.remove(i);
    active.remove(j);
    for k in active.iter() {
        let duk = (d[i * cap + k] + d[j * cap + k] - dij) / 2.0;
        d[u * cap + k] = duk;
        d[k * cap + u] = duk;
    }
    active.insert(u);

    let (left, right) = take_pair(nodes, i, j)?;
    nodes.push(Some(ClusterNode::joined(lengths, left, right)));
    Ok(u)
}
