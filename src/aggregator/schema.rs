//! Aggregate bucket records.
//!
//! These are the shapes returned by the `types` and `prototypes` queries and
//! written into JSON reports.

use crate::retained::SizeBreakdown;
use serde::{Deserialize, Serialize};

/// One grouping bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedSize {
    /// Bucket key (node type or prototype name)
    pub name: String,

    /// Sum of member `self_size`
    pub shallow_size: u64,

    /// Number of member nodes
    pub object_count: u64,
}

impl AggregatedSize {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shallow_size: 0,
            object_count: 0,
        }
    }
}

/// Prototype bucket with retained totals and a per-type breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedPrototypeSize {
    pub name: String,

    /// Node type of the first member seen
    #[serde(rename = "type")]
    pub node_type: String,

    pub shallow_size: u64,

    pub object_count: u64,

    /// Sum of member retained sizes
    pub retained_size: u64,

    /// Member retainer breakdowns folded together
    pub sub_types: SizeBreakdown,
}
