//! Group nodes by node type.

use super::schema::AggregatedSize;
use crate::graph::{Node, NodeType};
use log::debug;
use std::collections::HashMap;

/// Partition nodes by type, summing `self_size` and counting members
///
/// One pass over `nodes`. Buckets come back sorted by shallow size
/// (descending), ties broken by name.
pub fn group_by_type(nodes: &[Node]) -> Vec<AggregatedSize> {
    let mut buckets: HashMap<NodeType, AggregatedSize> = HashMap::new();

    for node in nodes {
        let bucket = buckets
            .entry(node.node_type)
            .or_insert_with(|| AggregatedSize::new(node.node_type.as_str()));
        bucket.shallow_size += node.self_size;
        bucket.object_count += 1;
    }

    let mut types: Vec<AggregatedSize> = buckets.into_values().collect();
    sort_buckets(&mut types);

    debug!("Grouped {} nodes into {} type buckets", nodes.len(), types.len());

    types
}

/// Shallow size descending, then name ascending
fn sort_buckets(buckets: &mut [AggregatedSize]) {
    buckets.sort_by(|a, b| {
        b.shallow_size
            .cmp(&a.shallow_size)
            .then_with(|| a.name.cmp(&b.name))
    });
}
