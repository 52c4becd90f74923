//! Node and edge records of a heap object graph.
//!
//! Field names follow the heap snapshot vocabulary (`self_size`,
//! `trace_node_id`, `type`) so parsed snapshots map onto them directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot-assigned node identifier
pub type NodeId = u64;

/// Index into the graph's edge table
pub type EdgeId = usize;

/// Kind of heap object a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Hidden,
    Array,
    String,
    Object,
    Code,
    Closure,
    Regexp,
    Number,
    Native,
    Synthetic,
    #[serde(rename = "concatenated-string", alias = "concatenated string")]
    ConcatenatedString,
    #[serde(rename = "sliced-string", alias = "sliced string")]
    SlicedString,
    Symbol,
    #[serde(rename = "bigint")]
    BigInt,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Hidden => "hidden",
            NodeType::Array => "array",
            NodeType::String => "string",
            NodeType::Object => "object",
            NodeType::Code => "code",
            NodeType::Closure => "closure",
            NodeType::Regexp => "regexp",
            NodeType::Number => "number",
            NodeType::Native => "native",
            NodeType::Synthetic => "synthetic",
            NodeType::ConcatenatedString => "concatenated-string",
            NodeType::SlicedString => "sliced-string",
            NodeType::Symbol => "symbol",
            NodeType::BigInt => "bigint",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of reference an edge represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    Context,
    Element,
    Property,
    Internal,
    Hidden,
    Shortcut,
    Weak,
}

/// A single heap object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Constructor name, or the literal value for string/regexp nodes
    pub name: String,

    /// Bytes owned directly by this object
    pub self_size: u64,

    /// Allocation trace id (0 when allocation tracking was off)
    #[serde(default)]
    pub trace_node_id: u64,

    /// Outgoing edges, in snapshot order
    #[serde(default, skip_deserializing)]
    pub out_edges: Vec<EdgeId>,

    /// Incoming edges, in snapshot order
    #[serde(default, skip_deserializing)]
    pub in_edges: Vec<EdgeId>,
}

impl Node {
    pub fn new(id: NodeId, node_type: NodeType, name: impl Into<String>, self_size: u64) -> Self {
        Self {
            id,
            node_type,
            name: name.into(),
            self_size,
            trace_node_id: 0,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        }
    }

    pub fn edge_count(&self) -> usize {
        self.out_edges.len()
    }
}

/// A reference from one node to another. Edges never own their endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "type")]
    pub edge_type: EdgeType,

    #[serde(default)]
    pub name: String,

    pub from: NodeId,

    pub to: NodeId,
}

impl Edge {
    pub fn new(edge_type: EdgeType, name: impl Into<String>, from: NodeId, to: NodeId) -> Self {
        Self {
            edge_type,
            name: name.into(),
            from,
            to,
        }
    }
}
