//! Reader for the JSON object-graph interchange.
//!
//! The heap snapshot format itself is decoded upstream; this reader accepts
//! the already-parsed shape:
//!
//! ```json
//! { "nodes": [{"id": 1, "type": "object", "name": "Foo", "self_size": 32}],
//!   "edges": [{"type": "property", "name": "bar", "from": 1, "to": 2}] }
//! ```

use super::schema::{Edge, Node};
use super::store::Graph;
use crate::utils::error::ParseError;
use log::{debug, info, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct GraphDocument {
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

/// Parse an object graph from an already-decoded JSON value
///
/// # Errors
/// * `ParseError::InvalidFormat` - the value is not an object with a `nodes` array
/// * `ParseError::JsonError` - a node or edge record is malformed
/// * `ParseError::DuplicateNode` / `ParseError::DanglingEdge` - inconsistent records
pub fn parse_graph(raw: &serde_json::Value) -> Result<Graph, ParseError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| ParseError::InvalidFormat("expected a JSON object".to_string()))?;

    match obj.get("nodes") {
        Some(serde_json::Value::Array(_)) => {}
        Some(_) => {
            return Err(ParseError::InvalidFormat(
                "'nodes' must be an array".to_string(),
            ))
        }
        None => {
            return Err(ParseError::InvalidFormat(
                "missing 'nodes' array".to_string(),
            ))
        }
    }

    if !obj.contains_key("edges") {
        warn!("Graph has no 'edges' array; every node will only retain itself");
    }

    let document = GraphDocument::deserialize(raw)?;
    debug!(
        "Decoded {} node records and {} edge records",
        document.nodes.len(),
        document.edges.len()
    );

    Graph::new(document.nodes, document.edges)
}

/// Read and parse an object graph file
pub fn load_graph_file(path: impl AsRef<Path>) -> Result<Graph, ParseError> {
    let path = path.as_ref();
    info!("Reading object graph from: {}", path.display());

    let file = File::open(path)?;
    let raw: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;

    parse_graph(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_graph() {
        let raw = json!({
            "nodes": [
                {"id": 1, "type": "object", "name": "Foo", "self_size": 32},
                {"id": 2, "type": "string", "name": "bar", "self_size": 16, "trace_node_id": 4}
            ],
            "edges": [
                {"type": "property", "name": "label", "from": 1, "to": 2}
            ]
        });

        let graph = parse_graph(&raw).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.node_by_id(2).unwrap().trace_node_id, 4);
        assert_eq!(graph.node_by_id(2).unwrap().in_edges, vec![0]);
    }

    #[test]
    fn test_edges_optional() {
        let raw = json!({"nodes": [{"id": 1, "type": "number", "name": "smi", "self_size": 0}]});
        let graph = parse_graph(&raw).unwrap();
        assert_eq!(graph.edges().len(), 0);
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            parse_graph(&json!([1, 2, 3])),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_graph(&json!({"nodes": {}})),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_node_type() {
        let raw = json!({"nodes": [{"id": 1, "type": "teapot", "name": "x", "self_size": 1}]});
        assert!(matches!(parse_graph(&raw), Err(ParseError::JsonError(_))));
    }
}
