//! Append-only arena of resolved breakdowns.
//!
//! Every member of a strongly-connected unit points at the same slot.
//! Slots are written once and never touched again, except that the maps can
//! be dropped wholesale once aggregation no longer needs them.

use super::breakdown::SizeBreakdown;

#[derive(Debug, Clone, Default)]
pub struct BreakdownStore {
    slot_of: Vec<Option<u32>>,
    breakdowns: Vec<SizeBreakdown>,
    totals: Vec<u64>,
    released: bool,
}

impl BreakdownStore {
    pub fn with_nodes(node_count: usize) -> Self {
        Self {
            slot_of: vec![None; node_count],
            ..Default::default()
        }
    }

    pub fn is_resolved(&self, index: usize) -> bool {
        matches!(self.slot_of.get(index), Some(Some(_)))
    }

    /// Record the shared breakdown of a unit. Returns the slot id.
    ///
    /// Members that already hold a slot keep it.
    pub(crate) fn insert_unit(&mut self, members: &[usize], breakdown: SizeBreakdown) -> u32 {
        let slot = self.breakdowns.len() as u32;
        self.totals.push(breakdown.total_size());
        self.breakdowns.push(breakdown);

        for &member in members {
            if let Some(entry) = self.slot_of.get_mut(member) {
                if entry.is_none() {
                    *entry = Some(slot);
                }
            }
        }
        slot
    }

    pub fn slot_of(&self, index: usize) -> Option<u32> {
        self.slot_of.get(index).copied().flatten()
    }

    /// Breakdown of a node's retainer set, while maps are still held
    pub fn breakdown(&self, index: usize) -> Option<&SizeBreakdown> {
        if self.released {
            return None;
        }
        self.slot_of(index)
            .and_then(|slot| self.breakdowns.get(slot as usize))
    }

    pub(crate) fn slot_breakdown(&self, slot: u32) -> Option<&SizeBreakdown> {
        self.breakdowns.get(slot as usize)
    }

    /// Approximate retained size of a node. Survives `release_breakdowns`.
    pub fn retained_size(&self, index: usize) -> Option<u64> {
        self.slot_of(index)
            .and_then(|slot| self.totals.get(slot as usize))
            .copied()
    }

    /// Number of units resolved so far (one breakdown computation each)
    pub fn component_count(&self) -> usize {
        self.totals.len()
    }

    pub fn node_count(&self) -> usize {
        self.slot_of.len()
    }

    /// Drop the per-unit maps, keeping retained totals
    pub fn release_breakdowns(&mut self) {
        self.breakdowns = Vec::new();
        self.released = true;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}
