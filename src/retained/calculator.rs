//! Memoized retained-size breakdowns.
//!
//! A node's breakdown covers the node itself plus everything reachable by
//! following incoming edges. Nodes that retain each other form one unit
//! with a single shared breakdown:
//!
//! ```text
//! breakdown(U) = shallow sizes of the distinct nodes in U and upstream of U
//! ```
//!
//! Every retainer is counted once per unit, however many paths lead to it.
//! A unit with a single upstream unit extends that unit's breakdown; a unit
//! where several upstream units meet walks its retainers with a visited set.
//! This is still the documented approximation, not a dominator-tree
//! retained size.

use super::breakdown::SizeBreakdown;
use super::scc::{SccFinder, Unit};
use super::store::BreakdownStore;
use crate::graph::{Graph, Node, NodeId};
use crate::progress::ProgressSink;
use crate::utils::config::DEFAULT_MAX_QUEUE_PASSES;
use crate::utils::error::RetainedSizeError;
use log::{debug, info};
use std::collections::{HashSet, VecDeque};
use std::time::Instant;

pub struct RetainedSizeCalculator<'g> {
    graph: &'g Graph,
    store: BreakdownStore,
    finder: SccFinder,
    max_queue_passes: usize,
}

impl<'g> RetainedSizeCalculator<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            store: BreakdownStore::with_nodes(graph.len()),
            finder: SccFinder::new(graph.len()),
            max_queue_passes: DEFAULT_MAX_QUEUE_PASSES,
        }
    }

    pub fn with_max_queue_passes(mut self, passes: usize) -> Self {
        self.max_queue_passes = passes.max(1);
        self
    }

    pub fn store(&self) -> &BreakdownStore {
        &self.store
    }

    pub fn into_store(self) -> BreakdownStore {
        self.store
    }

    /// Breakdown of everything retaining `node_id`, itself included.
    ///
    /// Resolves and caches the node's unit and every unit upstream of it on
    /// first call; later calls are lookups.
    ///
    /// # Errors
    /// * `RetainedSizeError::Unresolved` - no node with that id
    /// * `RetainedSizeError::CycleUnresolved` - the work queue stopped converging
    pub fn compute_breakdown(&mut self, node_id: NodeId) -> Result<&SizeBreakdown, RetainedSizeError> {
        let index = self
            .graph
            .index_of(node_id)
            .ok_or(RetainedSizeError::Unresolved(node_id))?;

        self.resolve_from(index)?;

        self.store
            .breakdown(index)
            .ok_or(RetainedSizeError::Unresolved(node_id))
    }

    /// Resolve every node in the graph and hand back the finished store
    pub fn resolve_all(
        mut self,
        progress: &mut dyn ProgressSink,
    ) -> Result<BreakdownStore, RetainedSizeError> {
        let start = Instant::now();
        let total = self.graph.len();

        for index in 0..total {
            self.resolve_from(index)?;
            progress.report(index + 1, total);
        }

        info!(
            "Resolved {} nodes into {} retainer units in {:.2}s",
            total,
            self.store.component_count(),
            start.elapsed().as_secs_f64()
        );

        Ok(self.store)
    }

    fn resolve_from(&mut self, index: usize) -> Result<(), RetainedSizeError> {
        if self.store.is_resolved(index) {
            return Ok(());
        }

        let store = &self.store;
        let units = self
            .finder
            .units_from(self.graph, index, |i| store.is_resolved(i));

        self.resolve_units(units)
    }

    /// Drain units in emission order, deferring any whose upstream units
    /// are not yet resolved.
    fn resolve_units(&mut self, units: Vec<Unit>) -> Result<(), RetainedSizeError> {
        let mut queue: VecDeque<Unit> = units.into();
        let mut passes = 0;

        while !queue.is_empty() {
            if passes == self.max_queue_passes {
                return Err(RetainedSizeError::CycleUnresolved {
                    passes,
                    pending: queue.len(),
                });
            }
            passes += 1;

            let mut progressed = false;
            for _ in 0..queue.len() {
                let Some(unit) = queue.pop_front() else {
                    break;
                };

                match self.try_resolve(&unit)? {
                    Some(breakdown) => {
                        self.store.insert_unit(&unit.members, breakdown);
                        progressed = true;
                    }
                    None => {
                        debug!(
                            "Deferring unit {} ({} members): upstream unresolved",
                            unit.id,
                            unit.members.len()
                        );
                        queue.push_back(unit);
                    }
                }
            }

            if !progressed {
                return Err(RetainedSizeError::CycleUnresolved {
                    passes,
                    pending: queue.len(),
                });
            }
        }

        Ok(())
    }

    /// Build the unit's breakdown, or `None` if an upstream unit is pending
    fn try_resolve(&self, unit: &Unit) -> Result<Option<SizeBreakdown>, RetainedSizeError> {
        let mut own = SizeBreakdown::new();
        let mut upstream = HashSet::new();

        for &member in &unit.members {
            let node = self.node_at(member)?;
            own.add_node(node.node_type, node.self_size);

            for retainer in self.graph.retainers(member) {
                if self.finder.unit_of(retainer) == Some(unit.id) {
                    continue;
                }
                match self.store.slot_of(retainer) {
                    Some(slot) => {
                        upstream.insert(slot);
                    }
                    None => return Ok(None),
                }
            }
        }

        if upstream.is_empty() {
            return Ok(Some(own));
        }

        // A single upstream unit shares no node with this one
        if upstream.len() == 1 {
            let single = upstream
                .iter()
                .next()
                .and_then(|&slot| self.store.slot_breakdown(slot));
            if let Some(parent) = single {
                let mut merged = parent.clone();
                merged.merge_from(&own);
                return Ok(Some(merged));
            }
        }

        self.collect_retainers(unit).map(Some)
    }

    /// Sum every node reachable over incoming edges from the unit, once each
    fn collect_retainers(&self, unit: &Unit) -> Result<SizeBreakdown, RetainedSizeError> {
        let mut visited: HashSet<usize> = unit.members.iter().copied().collect();
        let mut pending = unit.members.clone();
        let mut breakdown = SizeBreakdown::new();

        while let Some(index) = pending.pop() {
            let node = self.node_at(index)?;
            breakdown.add_node(node.node_type, node.self_size);

            for retainer in self.graph.retainers(index) {
                if visited.insert(retainer) {
                    pending.push(retainer);
                }
            }
        }

        debug!(
            "Unit {} merges several retainer paths: {} distinct retainers",
            unit.id,
            visited.len()
        );

        Ok(breakdown)
    }

    fn node_at(&self, index: usize) -> Result<&'g Node, RetainedSizeError> {
        self.graph
            .node(index)
            .ok_or(RetainedSizeError::MissingNode(index))
    }
}
