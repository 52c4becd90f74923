//! Group nodes by constructor/prototype name.
//!
//! For string and regexp nodes the snapshot stores the literal value in
//! `name`, so those are bucketed under their type name instead.

use super::schema::AggregatedPrototypeSize;
use crate::graph::{Graph, Node};
use crate::retained::{BreakdownStore, SizeBreakdown};
use crate::utils::config::VALUE_NAMED_TYPES;
use crate::utils::error::RetainedSizeError;
use log::debug;
use std::collections::HashMap;

/// Bucket key a node is grouped under
pub fn prototype_key(node: &Node) -> &str {
    let type_name = node.node_type.as_str();
    if VALUE_NAMED_TYPES.contains(&type_name) {
        type_name
    } else {
        &node.name
    }
}

/// Partition nodes by prototype, folding in retained sizes and breakdowns
///
/// `store` must hold a resolved breakdown for every node of `graph`.
///
/// # Errors
/// * `RetainedSizeError::Unresolved` - a node has no breakdown (unresolved or released)
pub fn group_by_prototype(
    graph: &Graph,
    store: &BreakdownStore,
) -> Result<Vec<AggregatedPrototypeSize>, RetainedSizeError> {
    let mut buckets: HashMap<&str, AggregatedPrototypeSize> = HashMap::new();

    for (index, node) in graph.nodes().iter().enumerate() {
        let breakdown = store
            .breakdown(index)
            .ok_or(RetainedSizeError::Unresolved(node.id))?;
        let retained = breakdown.total_size();

        let key = prototype_key(node);
        let bucket = buckets
            .entry(key)
            .or_insert_with(|| AggregatedPrototypeSize {
                name: key.to_string(),
                node_type: node.node_type.as_str().to_string(),
                shallow_size: 0,
                object_count: 0,
                retained_size: 0,
                sub_types: SizeBreakdown::new(),
            });

        bucket.shallow_size += node.self_size;
        bucket.object_count += 1;
        bucket.retained_size += retained;
        bucket.sub_types.merge_from(breakdown);
    }

    let mut prototypes: Vec<AggregatedPrototypeSize> = buckets.into_values().collect();
    prototypes.sort_by(|a, b| {
        b.shallow_size
            .cmp(&a.shallow_size)
            .then_with(|| a.name.cmp(&b.name))
    });

    debug!(
        "Grouped {} nodes into {} prototype buckets",
        graph.len(),
        prototypes.len()
    );

    Ok(prototypes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, EdgeType, NodeType};
    use crate::progress::NoProgress;
    use crate::retained::RetainedSizeCalculator;

    fn resolve(graph: &Graph) -> BreakdownStore {
        RetainedSizeCalculator::new(graph)
            .resolve_all(&mut NoProgress)
            .unwrap()
    }

    #[test]
    fn test_strings_grouped_under_type() {
        let graph = Graph::new(
            vec![
                Node::new(1, NodeType::String, "foo", 10),
                Node::new(2, NodeType::String, "bar", 12),
                Node::new(3, NodeType::String, "foo", 10),
                Node::new(4, NodeType::Object, "MyClass", 64),
            ],
            vec![],
        )
        .unwrap();

        let prototypes = group_by_prototype(&graph, &resolve(&graph)).unwrap();
        assert_eq!(prototypes.len(), 2);

        let strings = prototypes.iter().find(|p| p.name == "string").unwrap();
        assert_eq!(strings.object_count, 3);
        assert_eq!(strings.shallow_size, 32);

        let my_class = prototypes.iter().find(|p| p.name == "MyClass").unwrap();
        assert_eq!(my_class.object_count, 1);
        assert_eq!(my_class.node_type, "object");
    }

    #[test]
    fn test_regexp_key() {
        let node = Node::new(1, NodeType::Regexp, "/a+b/g", 32);
        assert_eq!(prototype_key(&node), "regexp");

        let closure = Node::new(2, NodeType::Closure, "handler", 32);
        assert_eq!(prototype_key(&closure), "handler");
    }

    #[test]
    fn test_retained_and_subtypes_fold_members() {
        // Window -> Foo#1, Window -> Foo#2
        let graph = Graph::new(
            vec![
                Node::new(1, NodeType::Object, "Window", 100),
                Node::new(2, NodeType::Object, "Foo", 10),
                Node::new(3, NodeType::Object, "Foo", 20),
            ],
            vec![
                Edge::new(EdgeType::Property, "a", 1, 2),
                Edge::new(EdgeType::Property, "b", 1, 3),
            ],
        )
        .unwrap();

        let prototypes = group_by_prototype(&graph, &resolve(&graph)).unwrap();
        let foo = prototypes.iter().find(|p| p.name == "Foo").unwrap();

        assert_eq!(foo.shallow_size, 30);
        assert_eq!(foo.retained_size, 110 + 120);

        let objects = foo.sub_types.get(NodeType::Object).unwrap();
        assert_eq!(objects.shallow_size, 230);
        assert_eq!(objects.object_count, 4);
    }

    #[test]
    fn test_released_store_is_rejected() {
        let graph = Graph::new(vec![Node::new(7, NodeType::Code, "fn", 8)], vec![]).unwrap();
        let mut store = resolve(&graph);
        store.release_breakdowns();

        assert_eq!(
            group_by_prototype(&graph, &store).unwrap_err(),
            RetainedSizeError::Unresolved(7)
        );
    }
}
