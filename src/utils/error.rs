//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::graph::NodeId;
use thiserror::Error;

/// Errors that can occur while reading the object graph interchange
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read graph file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid graph format: {0}")]
    InvalidFormat(String),

    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),

    #[error("Edge {edge} references unknown node {node}")]
    DanglingEdge { edge: usize, node: NodeId },
}

/// Errors raised by the query pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unknown field '{field}' for {collection} (known: {known})")]
    InvalidField {
        collection: &'static str,
        field: String,
        known: String,
    },

    #[error("Invalid sort direction '{0}' (expected asc or desc)")]
    InvalidDirection(String),
}

/// Errors raised while resolving retained-size breakdowns
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetainedSizeError {
    #[error("Breakdown resolution did not converge after {passes} queue passes ({pending} units pending)")]
    CycleUnresolved { passes: usize, pending: usize },

    #[error("No breakdown resolved for node {0}")]
    Unresolved(NodeId),

    #[error("Node index {0} is outside the graph")]
    MissingNode(usize),
}

/// Top-level engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to load heap graph: {0}")]
    ParseFailure(#[from] ParseError),

    #[error("No heap snapshot has been loaded")]
    NotLoaded,

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    RetainedSize(#[from] RetainedSizeError),
}

/// Errors that can occur during report output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
