//! Heapgraph Studio
//!
//! Retained-size aggregation and querying for heap snapshot
//! object graphs.
//!
//! The crate loads a graph of nodes and directed edges, resolves a
//! per-type retainer breakdown for every node (cycles included, without
//! recursion), and aggregates nodes by type and by prototype name. The
//! aggregates can then be filtered, sorted and limited through
//! [`engine::HeapEngine`].
//!
//! ## Getting Started
//!
//! ```bash
//! heapgraph analyze --input graph.json --summary
//! heapgraph query --input graph.json --view prototypes --order-by retainedSize:desc --first 10
//! ```

pub mod aggregator;
pub mod commands;
pub mod engine;
pub mod graph;
pub mod output;
pub mod progress;
pub mod query;
pub mod retained;
pub mod utils;
