//! Load pipeline and the read operations served from a loaded snapshot.
//!
//! A load runs Graph → RetainedSizeCalculator → Aggregator once and freezes
//! the result in a [`LoadedSnapshot`]. The engine swaps the new snapshot in
//! only after every stage succeeded, so a failed load leaves the previous
//! one serving. Readers clone an `Arc` and never block each other.

use crate::aggregator::{group_by_prototype, group_by_type, AggregatedPrototypeSize, AggregatedSize};
use crate::graph::{load_graph_file, Graph, Node, NodeId};
use crate::progress::ProgressSink;
use crate::query::{apply, QueryParams};
use crate::retained::{BreakdownStore, RetainedSizeCalculator, SizeBreakdown};
use crate::utils::config::EngineConfig;
use crate::utils::error::{EngineError, ParseError, RetainedSizeError};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

/// Everything derived from one graph. Immutable once built.
#[derive(Debug)]
pub struct LoadedSnapshot {
    graph: Graph,
    store: BreakdownStore,
    types: Vec<AggregatedSize>,
    prototypes: Vec<AggregatedPrototypeSize>,
    loaded_at: DateTime<Utc>,
}

impl LoadedSnapshot {
    /// Resolve retained sizes and build both aggregate collections
    pub fn build(
        graph: Graph,
        config: &EngineConfig,
        progress: &mut dyn ProgressSink,
    ) -> Result<Self, RetainedSizeError> {
        let mut store = RetainedSizeCalculator::new(&graph)
            .with_max_queue_passes(config.max_queue_passes)
            .resolve_all(progress)?;

        let types = group_by_type(graph.nodes());
        let prototypes = group_by_prototype(&graph, &store)?;

        if config.release_breakdowns {
            store.release_breakdowns();
        }

        Ok(Self {
            graph,
            store,
            types,
            prototypes,
            loaded_at: Utc::now(),
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn types(&self) -> &[AggregatedSize] {
        &self.types
    }

    pub fn prototypes(&self) -> &[AggregatedPrototypeSize] {
        &self.prototypes
    }

    pub fn store(&self) -> &BreakdownStore {
        &self.store
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn retained_size(&self, node_id: NodeId) -> Option<u64> {
        self.graph
            .index_of(node_id)
            .and_then(|i| self.store.retained_size(i))
    }

    /// Per-type retainer breakdown, unless breakdowns were released
    pub fn breakdown(&self, node_id: NodeId) -> Option<&SizeBreakdown> {
        self.graph
            .index_of(node_id)
            .and_then(|i| self.store.breakdown(i))
    }
}

/// Owner of the currently served snapshot
#[derive(Debug, Default)]
pub struct HeapEngine {
    config: EngineConfig,
    current: RwLock<Option<Arc<LoadedSnapshot>>>,
}

impl HeapEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            current: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a snapshot from `graph` and start serving it
    ///
    /// # Errors
    /// * `EngineError::RetainedSize` - breakdown resolution failed; the previous
    ///   snapshot, if any, keeps serving
    pub fn load(
        &self,
        graph: Graph,
        progress: &mut dyn ProgressSink,
    ) -> Result<Arc<LoadedSnapshot>, EngineError> {
        let start = Instant::now();
        info!(
            "Loading heap graph: {} nodes, {} edges",
            graph.len(),
            graph.edges().len()
        );

        let snapshot = self.commit(LoadedSnapshot::build(graph, &self.config, progress))?;

        info!(
            "Snapshot ready in {:.2}s: {} type buckets, {} prototype buckets",
            start.elapsed().as_secs_f64(),
            snapshot.types.len(),
            snapshot.prototypes.len()
        );

        Ok(snapshot)
    }

    /// Load the outcome of an external parser
    ///
    /// # Errors
    /// * `EngineError::ParseFailure` - the parser failed; previous state keeps serving
    pub fn load_from(
        &self,
        parsed: Result<Graph, ParseError>,
        progress: &mut dyn ProgressSink,
    ) -> Result<Arc<LoadedSnapshot>, EngineError> {
        match parsed {
            Ok(graph) => self.load(graph, progress),
            Err(e) => {
                warn!("Graph parse failed, keeping previous snapshot: {}", e);
                Err(EngineError::ParseFailure(e))
            }
        }
    }

    /// Read a JSON object graph from disk and load it
    pub fn load_file(
        &self,
        path: impl AsRef<Path>,
        progress: &mut dyn ProgressSink,
    ) -> Result<Arc<LoadedSnapshot>, EngineError> {
        self.load_from(load_graph_file(path), progress)
    }

    pub fn is_loaded(&self) -> bool {
        self.read_slot().is_some()
    }

    /// The snapshot currently being served
    ///
    /// # Errors
    /// * `EngineError::NotLoaded` - no load has succeeded yet
    pub fn snapshot(&self) -> Result<Arc<LoadedSnapshot>, EngineError> {
        self.read_slot().clone().ok_or(EngineError::NotLoaded)
    }

    /// `types` read operation
    pub fn types(&self, params: &QueryParams) -> Result<Vec<AggregatedSize>, EngineError> {
        let snapshot = self.snapshot()?;
        Ok(apply(snapshot.types(), params)?)
    }

    /// `prototypes` read operation
    pub fn prototypes(
        &self,
        params: &QueryParams,
    ) -> Result<Vec<AggregatedPrototypeSize>, EngineError> {
        let snapshot = self.snapshot()?;
        Ok(apply(snapshot.prototypes(), params)?)
    }

    /// `nodes` read operation over the raw node list
    pub fn nodes(&self, params: &QueryParams) -> Result<Vec<Node>, EngineError> {
        let snapshot = self.snapshot()?;
        Ok(apply(snapshot.graph().nodes(), params)?)
    }

    /// Bucket for one node type name
    pub fn type_by_name(&self, name: &str) -> Result<Option<AggregatedSize>, EngineError> {
        let snapshot = self.snapshot()?;
        Ok(snapshot.types().iter().find(|t| t.name == name).cloned())
    }

    /// Bucket for one prototype name
    pub fn prototype_by_name(
        &self,
        name: &str,
    ) -> Result<Option<AggregatedPrototypeSize>, EngineError> {
        let snapshot = self.snapshot()?;
        Ok(snapshot.prototypes().iter().find(|p| p.name == name).cloned())
    }

    /// Approximate retained size of one node
    pub fn retained_size(&self, node_id: NodeId) -> Result<Option<u64>, EngineError> {
        Ok(self.snapshot()?.retained_size(node_id))
    }

    /// Swap a finished build in; a failed build leaves the slot untouched
    fn commit(
        &self,
        built: Result<LoadedSnapshot, RetainedSizeError>,
    ) -> Result<Arc<LoadedSnapshot>, EngineError> {
        let snapshot = match built {
            Ok(snapshot) => Arc::new(snapshot),
            Err(e) => {
                warn!("Load aborted, keeping previous snapshot: {}", e);
                return Err(e.into());
            }
        };

        *self.write_slot() = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    // The slot only ever holds a fully built Arc, so a poisoned lock still
    // guards consistent data.
    fn read_slot(&self) -> RwLockReadGuard<'_, Option<Arc<LoadedSnapshot>>> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_slot(&self) -> RwLockWriteGuard<'_, Option<Arc<LoadedSnapshot>>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, EdgeType, NodeType};
    use crate::progress::NoProgress;
    use crate::utils::error::QueryError;

    fn small_graph() -> Graph {
        Graph::new(
            vec![
                Node::new(1, NodeType::Object, "Window", 100),
                Node::new(2, NodeType::Array, "Array", 40),
                Node::new(3, NodeType::String, "hello", 16),
            ],
            vec![
                Edge::new(EdgeType::Property, "items", 1, 2),
                Edge::new(EdgeType::Element, "0", 2, 3),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_queries_before_load_fail() {
        let engine = HeapEngine::default();

        assert!(matches!(
            engine.types(&QueryParams::new()),
            Err(EngineError::NotLoaded)
        ));
        assert!(matches!(
            engine.prototypes(&QueryParams::new()),
            Err(EngineError::NotLoaded)
        ));
        assert!(matches!(
            engine.nodes(&QueryParams::new()),
            Err(EngineError::NotLoaded)
        ));
        assert!(!engine.is_loaded());
    }

    #[test]
    fn test_load_and_query() {
        let engine = HeapEngine::default();
        engine.load(small_graph(), &mut NoProgress).unwrap();

        let types = engine.types(&QueryParams::new()).unwrap();
        assert_eq!(types.len(), 3);
        assert_eq!(engine.retained_size(3).unwrap(), Some(156));
        assert_eq!(
            engine.type_by_name("array").unwrap().map(|t| t.shallow_size),
            Some(40)
        );
        assert!(engine.prototype_by_name("Nope").unwrap().is_none());
    }

    #[test]
    fn test_failed_parse_keeps_previous_snapshot() {
        let engine = HeapEngine::default();
        engine.load(small_graph(), &mut NoProgress).unwrap();

        let err = engine
            .load_from(Err(ParseError::DuplicateNode(1)), &mut NoProgress)
            .unwrap_err();
        assert!(matches!(err, EngineError::ParseFailure(_)));
        assert_eq!(engine.types(&QueryParams::new()).unwrap().len(), 3);
    }

    #[test]
    fn test_unresolved_cycle_keeps_previous_snapshot() {
        let engine = HeapEngine::default();
        let first = engine.load(small_graph(), &mut NoProgress).unwrap();

        let err = engine
            .commit(Err(RetainedSizeError::CycleUnresolved {
                passes: 64,
                pending: 2,
            }))
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::RetainedSize(RetainedSizeError::CycleUnresolved { .. })
        ));

        assert!(Arc::ptr_eq(&first, &engine.snapshot().unwrap()));
        assert_eq!(engine.types(&QueryParams::new()).unwrap().len(), 3);
        assert_eq!(engine.retained_size(3).unwrap(), Some(156));
    }

    #[test]
    fn test_diamond_retained_size_counts_each_node_once() {
        let engine = HeapEngine::default();
        let diamond = Graph::new(
            vec![
                Node::new(1, NodeType::Object, "A", 100),
                Node::new(2, NodeType::Object, "B", 10),
                Node::new(3, NodeType::Object, "C", 20),
                Node::new(4, NodeType::Object, "D", 1),
            ],
            vec![
                Edge::new(EdgeType::Property, "b", 1, 2),
                Edge::new(EdgeType::Property, "c", 1, 3),
                Edge::new(EdgeType::Property, "d", 2, 4),
                Edge::new(EdgeType::Property, "d", 3, 4),
            ],
        )
        .unwrap();
        engine.load(diamond, &mut NoProgress).unwrap();

        assert_eq!(engine.retained_size(4).unwrap(), Some(131));
    }

    #[test]
    fn test_query_error_leaves_aggregates_intact() {
        let engine = HeapEngine::default();
        engine.load(small_graph(), &mut NoProgress).unwrap();

        let err = engine
            .prototypes(&QueryParams::new().filter("bogus", "1"))
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Query(QueryError::InvalidField { .. })
        ));
        assert_eq!(engine.prototypes(&QueryParams::new()).unwrap().len(), 3);
    }

    #[test]
    fn test_reload_replaces_snapshot() {
        let engine = HeapEngine::default();
        engine.load(small_graph(), &mut NoProgress).unwrap();

        let other = Graph::new(vec![Node::new(9, NodeType::Code, "fn", 8)], vec![]).unwrap();
        engine.load(other, &mut NoProgress).unwrap();

        assert_eq!(engine.nodes(&QueryParams::new()).unwrap().len(), 1);
        assert_eq!(engine.retained_size(1).unwrap(), None);
    }

    #[test]
    fn test_release_breakdowns_keeps_retained_sizes() {
        let engine = HeapEngine::new(EngineConfig {
            release_breakdowns: true,
            ..Default::default()
        });
        let snapshot = engine.load(small_graph(), &mut NoProgress).unwrap();

        assert!(snapshot.breakdown(3).is_none());
        assert_eq!(snapshot.retained_size(2), Some(140));
        let window = engine.prototype_by_name("Window").unwrap().unwrap();
        assert_eq!(window.retained_size, 100);
    }

    #[test]
    fn test_empty_graph() {
        let engine = HeapEngine::default();
        let snapshot = engine.load(Graph::default(), &mut NoProgress).unwrap();

        assert!(snapshot.types().is_empty());
        assert!(snapshot.prototypes().is_empty());
        assert_eq!(snapshot.store().component_count(), 0);
    }
}
