//! Report schema written to disk.
//!
//! Schema is versioned to allow future evolution.

use crate::aggregator::{AggregatedPrototypeSize, AggregatedSize};
use crate::engine::LoadedSnapshot;
use crate::utils::config::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeapReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Where the graph was read from
    pub source: String,

    pub node_count: usize,

    pub edge_count: usize,

    /// Sum of every node's self_size
    pub total_shallow_size: u64,

    /// Number of retainer units resolved during load
    pub retainer_units: usize,

    /// Buckets by node type
    pub types: Vec<AggregatedSize>,

    /// Buckets by prototype, largest first (possibly truncated)
    pub prototypes: Vec<AggregatedPrototypeSize>,

    /// Timestamp when the snapshot was loaded
    pub generated_at: String,
}

/// Build a report from a loaded snapshot
///
/// `top_prototypes` caps the prototype list; `None` keeps all of them.
pub fn to_report(
    snapshot: &LoadedSnapshot,
    source: &str,
    top_prototypes: Option<usize>,
) -> HeapReport {
    let prototypes = snapshot.prototypes();
    let keep = top_prototypes.unwrap_or(prototypes.len());

    HeapReport {
        version: SCHEMA_VERSION.to_string(),
        source: source.to_string(),
        node_count: snapshot.graph().len(),
        edge_count: snapshot.graph().edges().len(),
        total_shallow_size: snapshot.graph().total_self_size(),
        retainer_units: snapshot.store().component_count(),
        types: snapshot.types().to_vec(),
        prototypes: prototypes.iter().take(keep).cloned().collect(),
        generated_at: snapshot.loaded_at().to_rfc3339(),
    }
}
