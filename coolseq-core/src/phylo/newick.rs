use super::tree::{ClusterNode, PhyloTree};

/// Newick string for a tree. Pair-group branches get `parent height - child height`,
/// neighbor-joining branches carry their stored lengths.
pub fn to_newick(tree: &PhyloTree) -> String {
    let mut s = String::new();
    write_subtree(tree.root(), &mut s);
    s.push(';');
    s
}

fn needs_quoting(label: &str) -> bool {
    label.chars().any(|ch| {
        ch.is_whitespace() || matches!(ch, ':' | ',' | '(' | ')' | ';' | '[' | ']' | '\'')
    })
}

fn write_label(out: &mut String, label: &str) {
    if label.is_empty() {
        return;
    }
    if needs_quoting(label) {
        out.push('\'');
        for ch in label.chars() {
            if ch == '\'' {
                out.push_str("''");
            } else {
                out.push(ch);
            }
        }
        out.push('\'');
    } else {
        out.push_str(label);
    }
}

fn write_subtree(node: &ClusterNode, out: &mut String) {
    match node {
        ClusterNode::Leaf { label, .. } => write_label(out, label),
        ClusterNode::Group {
            height,
            left,
            right,
        } => {
            let lengths = (
                height - left.height().unwrap_or(0.0),
                height - right.height().unwrap_or(0.0),
            );
            write_pair(left, right, lengths, out);
        }
        ClusterNode::Joined {
            lengths,
            left,
            right,
        } => write_pair(left, right, *lengths, out),
    }
}

fn write_pair(left: &ClusterNode, right: &ClusterNode, lengths: (f64, f64), out: &mut String) {
    out.push('(');
    write_subtree(left, out);
    out.push_str(&format!(":{:.6}", lengths.0));
    out.push(',');
    write_subtree(right, out);
    out.push_str(&format!(":{:.6}", lengths.1));
    out.push(')');
}
