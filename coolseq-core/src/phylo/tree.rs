use std::fmt;

use super::cluster::LinkageRecord;

/// Node of a distance-based tree. Every branch owns its two children.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterNode {
    /// An input taxon: its row index in the distance matrix and its label.
    Leaf { index: usize, label: Box<str> },
    /// Pair-group merge at a single height (half the merge distance).
    Group {
        height: f64,
        left: Box<ClusterNode>,
        right: Box<ClusterNode>,
    },
    /// Neighbor-joining merge with one branch length per child, `(left, right)`.
    Joined {
        lengths: (f64, f64),
        left: Box<ClusterNode>,
        right: Box<ClusterNode>,
    },
}

impl ClusterNode {
    pub fn leaf(index: usize, label: &str) -> Self {
        ClusterNode::Leaf {
            index,
            label: label.into(),
        }
    }

    pub fn group(height: f64, left: ClusterNode, right: ClusterNode) -> Self {
        ClusterNode::Group {
            height,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn joined(lengths: (f64, f64), left: ClusterNode, right: ClusterNode) -> Self {
        ClusterNode::Joined {
            lengths,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ClusterNode::Leaf { .. })
    }

    /// Children of a branch, `None` for a leaf.
    pub fn children(&self) -> Option<(&ClusterNode, &ClusterNode)> {
        match self {
            ClusterNode::Leaf { .. } => None,
            ClusterNode::Group { left, right, .. } | ClusterNode::Joined { left, right, .. } => {
                Some((&**left, &**right))
            }
        }
    }

    /// Merge height of a pair-group node; leaves sit at height 0.
    pub fn height(&self) -> Option<f64> {
        match self {
            ClusterNode::Leaf { .. } => Some(0.0),
            ClusterNode::Group { height, .. } => Some(*height),
            ClusterNode::Joined { .. } => None,
        }
    }

    /// Taxon indices under this node, left to right.
    pub fn leaf_indices(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<usize>) {
        match self {
            ClusterNode::Leaf { index, .. } => out.push(*index),
            ClusterNode::Group { left, right, .. } | ClusterNode::Joined { left, right, .. } => {
                left.collect_leaves(out);
                right.collect_leaves(out);
            }
        }
    }

    pub fn num_leaves(&self) -> usize {
        match self.children() {
            None => 1,
            Some((l, r)) => l.num_leaves() + r.num_leaves(),
        }
    }
}

/// Single-quoted string literal with `\\` and `'` escaped.
fn write_quoted(f: &mut fmt::Formatter<'_>, label: &str) -> fmt::Result {
    f.write_str("'")?;
    for ch in label.chars() {
        match ch {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            _ => write!(f, "{ch}")?,
        }
    }
    f.write_str("'")
}

/// Nested tuple form: `(index, 'label')`, `(height, left, right)` or
/// `((left_length, right_length), left, right)`.
impl fmt::Display for ClusterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterNode::Leaf { index, label } => {
                write!(f, "({index}, ")?;
                write_quoted(f, label)?;
                f.write_str(")")
            }
            ClusterNode::Group {
                height,
                left,
                right,
            } => write!(f, "({height:?}, {left}, {right})"),
            ClusterNode::Joined {
                lengths: (l, r),
                left,
                right,
            } => write!(f, "(({l:?}, {r:?}), {left}, {right})"),
        }
    }
}

/// A finished tree together with the taxon names it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct PhyloTree {
    root: ClusterNode,
    names: Vec<Box<str>>,
}

impl PhyloTree {
    pub(crate) fn new(root: ClusterNode, names: Vec<Box<str>>) -> Self {
        Self { root, names }
    }

    pub fn root(&self) -> &ClusterNode {
        &self.root
    }

    pub fn names(&self) -> &[Box<str>] {
        &self.names
    }

    pub fn num_leaves(&self) -> usize {
        self.root.num_leaves()
    }

    pub fn into_parts(self) -> (ClusterNode, Vec<Box<str>>) {
        (self.root, self.names)
    }
}

/// Pair-group clustering output: the rooted tree plus its merge history.
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram {
    tree: PhyloTree,
    linkage: Vec<LinkageRecord>,
}

impl Dendrogram {
    pub(crate) fn new(tree: PhyloTree, linkage: Vec<LinkageRecord>) -> Self {
        Self { tree, linkage }
    }

    pub fn tree(&self) -> &PhyloTree {
        &self.tree
    }

    pub fn root(&self) -> &ClusterNode {
        self.tree.root()
    }

    pub fn names(&self) -> &[Box<str>] {
        self.tree.names()
    }

    /// Merge events in chronological order.
    pub fn linkage(&self) -> &[LinkageRecord] {
        &self.linkage
    }

    pub fn into_parts(self) -> (ClusterNode, Vec<LinkageRecord>, Vec<Box<str>>) {
        let (root, names) = self.tree.into_parts();
        (root, self.linkage, names)
    }
}
