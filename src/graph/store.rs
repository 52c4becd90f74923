//! Immutable node/edge store.
//!
//! Built once from parsed records. Adjacency lists on each node are derived
//! from the edge table in input order, and every edge endpoint is resolved to
//! a dense node index up front so traversals never hash.

use super::schema::{Edge, EdgeId, Node, NodeId};
use crate::utils::error::ParseError;
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<NodeId, usize>,
    edge_source: Vec<usize>,
    edge_target: Vec<usize>,
}

impl Graph {
    /// Build a graph from node and edge records
    ///
    /// Any edge lists already present on the nodes are replaced.
    ///
    /// # Errors
    /// * `ParseError::DuplicateNode` - two nodes share an id
    /// * `ParseError::DanglingEdge` - an edge names a node that does not exist
    pub fn new(mut nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, ParseError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter_mut().enumerate() {
            if index.insert(node.id, i).is_some() {
                return Err(ParseError::DuplicateNode(node.id));
            }
            node.out_edges.clear();
            node.in_edges.clear();
        }

        let mut edge_source = Vec::with_capacity(edges.len());
        let mut edge_target = Vec::with_capacity(edges.len());

        for (edge_id, edge) in edges.iter().enumerate() {
            let from = *index.get(&edge.from).ok_or(ParseError::DanglingEdge {
                edge: edge_id,
                node: edge.from,
            })?;
            let to = *index.get(&edge.to).ok_or(ParseError::DanglingEdge {
                edge: edge_id,
                node: edge.to,
            })?;

            nodes[from].out_edges.push(edge_id);
            nodes[to].in_edges.push(edge_id);
            edge_source.push(from);
            edge_target.push(to);
        }

        debug!("Built graph: {} nodes, {} edges", nodes.len(), edges.len());

        Ok(Self {
            nodes,
            edges,
            index,
            edge_source,
            edge_target,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).and_then(|i| self.nodes.get(i))
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Dense index of the node an edge starts at
    pub fn edge_source(&self, id: EdgeId) -> usize {
        self.edge_source[id]
    }

    /// Dense index of the node an edge points to
    pub fn edge_target(&self, id: EdgeId) -> usize {
        self.edge_target[id]
    }

    /// Indices of the nodes holding a reference to `index` (one per incoming edge)
    pub fn retainers(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.nodes[index]
            .in_edges
            .iter()
            .map(move |&edge| self.edge_source[edge])
    }

    pub fn total_self_size(&self) -> u64 {
        self.nodes.iter().map(|n| n.self_size).sum()
    }
}
