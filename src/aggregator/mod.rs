//! Aggregation of heap nodes into summary buckets.
//!
//! This module transforms a loaded graph into:
//! - Per-type buckets (shallow size and count)
//! - Per-prototype buckets (plus retained size and a per-type breakdown)

pub mod by_prototype;
pub mod by_type;
pub mod schema;

// Re-export main types and functions
pub use by_prototype::{group_by_prototype, prototype_key};
pub use by_type::group_by_type;
pub use schema::{AggregatedPrototypeSize, AggregatedSize};
