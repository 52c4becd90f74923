//! Retained-size computation over the retainer graph.
//!
//! This module turns an immutable [`Graph`](crate::graph::Graph) into:
//! - One `SizeBreakdown` per strongly-connected unit of retainers
//! - A per-node approximate retained size
//!
//! Resolution is memoized and iterative, so it is safe on cyclic graphs with
//! millions of nodes.

pub mod breakdown;
pub mod calculator;
pub mod scc;
pub mod store;

// Re-export main types and functions
pub use breakdown::{merge_subtypes, SizeBreakdown, TypeTotals};
pub use calculator::RetainedSizeCalculator;
pub use store::BreakdownStore;
