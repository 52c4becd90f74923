use crate::aggregator::{AggregatedPrototypeSize, AggregatedSize};
use crate::graph::Node;
use crate::query::Queryable;
use crate::utils::config::SCHEMA_VERSION;

/// Display queryable fields per view
pub fn display_schema(show_details: bool) {
    println!("Heapgraph Studio Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    println!("Queryable fields:");
    println!("  types:      {}", AggregatedSize::field_names().join(", "));
    println!(
        "  prototypes: {}",
        AggregatedPrototypeSize::field_names().join(", ")
    );
    println!("  nodes:      {}", Node::field_names().join(", "));
    println!();

    if show_details {
        println!("Report Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  source: string             - Graph file the report was built from");
        println!("  node_count: number         - Nodes in the graph");
        println!("  edge_count: number         - Edges in the graph");
        println!("  total_shallow_size: number - Sum of every node's self_size");
        println!("  retainer_units: number     - Strongly-connected retainer units");
        println!("  types: array               - Buckets by node type");
        println!("    name, shallowSize, objectCount");
        println!("  prototypes: array          - Buckets by prototype name");
        println!("    name, type, shallowSize, objectCount, retainedSize");
        println!("    subTypes: array          - Retainer breakdown by node type");
        println!("  generated_at: string       - ISO 8601 timestamp");
    } else {
        println!("Use --show for the full report structure");
    }
}

/// Display version information
pub fn display_version() {
    println!("Heapgraph Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Retained-size aggregation and querying for heap snapshot object graphs.");
}
