//! Heap object graph: records, the immutable store, and the interchange reader.

pub mod loader;
pub mod schema;
pub mod store;

// Re-export main types
pub use loader::{load_graph_file, parse_graph};
pub use schema::{Edge, EdgeId, EdgeType, Node, NodeId, NodeType};
pub use store::Graph;
