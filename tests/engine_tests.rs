use heapgraph_studio::aggregator::{group_by_prototype, group_by_type};
use heapgraph_studio::engine::HeapEngine;
use heapgraph_studio::graph::{parse_graph, Edge, EdgeType, Graph, Node, NodeType};
use heapgraph_studio::progress::{NoProgress, RateLimited};
use heapgraph_studio::query::{apply, Direction, QueryParams};
use heapgraph_studio::retained::{merge_subtypes, RetainedSizeCalculator, SizeBreakdown};
use heapgraph_studio::utils::error::{EngineError, QueryError, RetainedSizeError};
use heapgraph_studio::utils::EngineConfig;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;

fn sample_document() -> serde_json::Value {
    json!({
        "nodes": [
            { "id": 1, "type": "synthetic", "name": "(GC roots)", "self_size": 0 },
            { "id": 2, "type": "object", "name": "Window", "self_size": 120 },
            { "id": 3, "type": "object", "name": "MyClass", "self_size": 48 },
            { "id": 4, "type": "object", "name": "MyClass", "self_size": 48 },
            { "id": 5, "type": "array", "name": "Array", "self_size": 32 },
            { "id": 6, "type": "string", "name": "foo", "self_size": 16 },
            { "id": 7, "type": "concatenated string", "name": "foobar", "self_size": 24 },
            { "id": 8, "type": "closure", "name": "handler", "self_size": 56 }
        ],
        "edges": [
            { "type": "element", "name": "1", "from": 1, "to": 2 },
            { "type": "property", "name": "a", "from": 2, "to": 3 },
            { "type": "property", "name": "b", "from": 2, "to": 4 },
            { "type": "property", "name": "items", "from": 3, "to": 5 },
            { "type": "element", "name": "0", "from": 5, "to": 6 },
            { "type": "property", "name": "peer", "from": 4, "to": 3 },
            { "type": "property", "name": "peer", "from": 3, "to": 4 },
            { "type": "context", "name": "self", "from": 8, "to": 4 },
            { "type": "internal", "name": "label", "from": 4, "to": 7 }
        ]
    })
}

fn sample_graph() -> Graph {
    parse_graph(&sample_document()).unwrap()
}

fn breakdown(entries: &[(NodeType, u64)]) -> SizeBreakdown {
    entries.iter().copied().collect()
}

#[test]
fn test_empty_graph_yields_empty_collections() {
    let graph = Graph::default();
    let store = RetainedSizeCalculator::new(&graph)
        .resolve_all(&mut NoProgress)
        .unwrap();

    assert!(group_by_type(graph.nodes()).is_empty());
    assert!(group_by_prototype(&graph, &store).unwrap().is_empty());
    assert_eq!(store.component_count(), 0);
}

#[test]
fn test_type_buckets_account_for_every_byte() {
    let graph = sample_graph();
    let types = group_by_type(graph.nodes());

    let bucket_total: u64 = types.iter().map(|t| t.shallow_size).sum();
    let bucket_count: u64 = types.iter().map(|t| t.object_count).sum();

    assert_eq!(bucket_total, graph.total_self_size());
    assert_eq!(bucket_count, graph.len() as u64);
}

#[test]
fn test_merge_subtypes_is_associative_with_overlapping_keys() {
    let a = breakdown(&[(NodeType::Object, 10), (NodeType::String, 4)]);
    let b = breakdown(&[(NodeType::String, 6), (NodeType::Array, 8), (NodeType::Array, 2)]);
    let c = breakdown(&[(NodeType::Object, 1), (NodeType::Closure, 30)]);

    let left = merge_subtypes(&merge_subtypes(&a, &b), &c);
    let right = merge_subtypes(&a, &merge_subtypes(&b, &c));

    assert_eq!(left, right);
    assert_eq!(left.total_size(), 61);
    assert_eq!(left.total_count(), 7);
}

#[test]
fn test_two_node_cycle_resolves_once() {
    let graph = Graph::new(
        vec![
            Node::new(1, NodeType::Object, "A", 10),
            Node::new(2, NodeType::Object, "B", 20),
        ],
        vec![
            Edge::new(EdgeType::Property, "b", 1, 2),
            Edge::new(EdgeType::Property, "a", 2, 1),
        ],
    )
    .unwrap();

    let store = RetainedSizeCalculator::new(&graph)
        .resolve_all(&mut NoProgress)
        .unwrap();

    assert_eq!(store.component_count(), 1);
    assert_eq!(store.slot_of(0), store.slot_of(1));
    assert_eq!(store.retained_size(0), Some(30));
    assert_eq!(store.retained_size(1), Some(30));
}

#[test]
fn test_prototype_grouping_example() {
    let graph = Graph::new(
        vec![
            Node::new(1, NodeType::String, "foo", 8),
            Node::new(2, NodeType::String, "bar", 8),
            Node::new(3, NodeType::String, "foo", 8),
            Node::new(4, NodeType::Object, "MyClass", 40),
        ],
        vec![],
    )
    .unwrap();
    let store = RetainedSizeCalculator::new(&graph)
        .resolve_all(&mut NoProgress)
        .unwrap();

    let prototypes = group_by_prototype(&graph, &store).unwrap();
    let counts: HashMap<&str, u64> = prototypes
        .iter()
        .map(|p| (p.name.as_str(), p.object_count))
        .collect();

    assert_eq!(prototypes.len(), 2);
    assert_eq!(counts.get("string"), Some(&3));
    assert_eq!(counts.get("MyClass"), Some(&1));
}

#[test]
fn test_query_pipeline_example() {
    let types = group_by_type(sample_graph().nodes());

    let params = QueryParams::new()
        .filter("name", "array")
        .order_by("shallowSize", Direction::Desc)
        .first(1);
    let result = apply(&types, &params).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].name, "array");
    assert_eq!(result[0].shallow_size, 32);

    let missing = apply(&types, &QueryParams::new().filter("name", "regexp").first(1)).unwrap();
    assert!(missing.is_empty());
}

#[test]
fn test_loading_twice_is_deterministic() {
    let first = HeapEngine::default();
    let second = HeapEngine::default();
    first.load(sample_graph(), &mut NoProgress).unwrap();
    second.load(sample_graph(), &mut NoProgress).unwrap();

    let by_name = |engine: &HeapEngine| {
        engine
            .prototypes(&QueryParams::new())
            .unwrap()
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect::<HashMap<_, _>>()
    };

    assert_eq!(by_name(&first), by_name(&second));
    assert_eq!(
        first.types(&QueryParams::new()).unwrap(),
        second.types(&QueryParams::new()).unwrap()
    );
}

#[test]
fn test_unknown_field_fails_loudly() {
    let engine = HeapEngine::default();
    engine.load(sample_graph(), &mut NoProgress).unwrap();

    let err = engine
        .types(&QueryParams::new().filter("doesNotExist", "x"))
        .unwrap_err();

    match err {
        EngineError::Query(QueryError::InvalidField {
            collection, field, ..
        }) => {
            assert_eq!(collection, "types");
            assert_eq!(field, "doesNotExist");
        }
        other => panic!("expected InvalidField, got {other:?}"),
    }
}

#[test]
fn test_cycle_with_downstream_retainers() {
    let graph = sample_graph();
    let mut calculator = RetainedSizeCalculator::new(&graph);

    // MyClass pair (3, 4) forms a unit retained by Window, roots and handler
    let pair = calculator.compute_breakdown(3).unwrap().clone();
    assert_eq!(pair.total_size(), 120 + 48 + 48 + 56);
    assert_eq!(calculator.compute_breakdown(4).unwrap(), &pair);

    // Label is retained through the pair
    let label = calculator.compute_breakdown(7).unwrap();
    assert_eq!(label.total_size(), pair.total_size() + 24);

    assert!(matches!(
        calculator.compute_breakdown(99),
        Err(RetainedSizeError::Unresolved(99))
    ));
}

#[test]
fn test_progress_does_not_change_results() {
    let graph = sample_graph();
    let mut seen = Vec::new();

    let quiet = RetainedSizeCalculator::new(&graph)
        .resolve_all(&mut NoProgress)
        .unwrap();
    let noisy = {
        let mut sink = RateLimited::new(3, |done, total| seen.push((done, total)));
        RetainedSizeCalculator::new(&graph)
            .resolve_all(&mut sink)
            .unwrap()
    };

    for index in 0..graph.len() {
        assert_eq!(quiet.retained_size(index), noisy.retained_size(index));
    }
    assert_eq!(seen, vec![(1, 8), (4, 8), (7, 8), (8, 8)]);
}

#[test]
fn test_release_breakdowns_is_config_driven() {
    let engine = HeapEngine::new(EngineConfig {
        release_breakdowns: true,
        ..Default::default()
    });
    let snapshot = engine.load(sample_graph(), &mut NoProgress).unwrap();

    assert!(snapshot.store().is_released());
    assert_eq!(engine.retained_size(6).unwrap(), Some(120 + 48 + 48 + 56 + 32 + 16));
}

#[test]
fn test_stacked_diamonds_load_without_overflow() {
    let levels = 70u64;
    let mut nodes = vec![Node::new(0, NodeType::Object, "Top", 1)];
    let mut edges = Vec::new();
    for i in 0..levels {
        let (top, left, right, next) = (i * 3, i * 3 + 1, i * 3 + 2, i * 3 + 3);
        nodes.push(Node::new(left, NodeType::Object, "Left", 1));
        nodes.push(Node::new(right, NodeType::Object, "Right", 1));
        nodes.push(Node::new(next, NodeType::Object, "Top", 1));
        edges.push(Edge::new(EdgeType::Property, "l", top, left));
        edges.push(Edge::new(EdgeType::Property, "r", top, right));
        edges.push(Edge::new(EdgeType::Property, "n", left, next));
        edges.push(Edge::new(EdgeType::Property, "n", right, next));
    }
    let graph = Graph::new(nodes, edges).unwrap();
    let total = graph.total_self_size();

    let engine = HeapEngine::default();
    engine.load(graph, &mut NoProgress).unwrap();

    assert_eq!(total, 211);
    assert_eq!(engine.retained_size(levels * 3).unwrap(), Some(total));
    assert_eq!(engine.retained_size(4).unwrap(), Some(5));
}
