pub mod cluster;
pub mod distance;
pub mod newick;
pub mod nj;
pub mod tree;

pub use cluster::{
    linkage_matrix, pair_group, upgma, wpgma, write_linkage_csv, LinkageRecord, PairGroupMethod,
};
pub use distance::{jc_distance, jc_distance_matrix, pairwise_jc_matrix, DistanceMatrix};
pub use newick::to_newick;
pub use nj::neighbor_joining;
pub use tree::{ClusterNode, Dendrogram, PhyloTree};

#[cfg(test)]
mod tests;
