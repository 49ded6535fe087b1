use std::collections::BTreeSet;

use crate::hierarchy::Node;

/// Collect every raw column name referenced by an indicator node,
/// duplicates collapsed. This is the allowlist the aggregator filters
/// the raw dataset against.
pub fn required_columns(tree: &Node) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    collect(tree, &mut out);
    out
}

fn collect(node: &Node, out: &mut BTreeSet<String>) {
    if let Some(cols) = &node.columns {
        out.extend(cols.iter().cloned());
    }
    for child in node.children.iter().flatten() {
        collect(child, out);
    }
}
