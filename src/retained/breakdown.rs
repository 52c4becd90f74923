//! Per-type size summaries and their merge.

use crate::graph::NodeType;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Summed shallow size and member count for one type key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTotals {
    pub shallow_size: u64,
    pub object_count: u64,
}

impl TypeTotals {
    fn absorb(&mut self, other: TypeTotals) {
        self.shallow_size += other.shallow_size;
        self.object_count += other.object_count;
    }
}

/// Shallow sizes and counts of a node set, grouped by node type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeBreakdown {
    entries: HashMap<NodeType, TypeTotals>,
}

impl SizeBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one node of `node_type` weighing `self_size` bytes
    pub fn add_node(&mut self, node_type: NodeType, self_size: u64) {
        self.entries.entry(node_type).or_default().absorb(TypeTotals {
            shallow_size: self_size,
            object_count: 1,
        });
    }

    pub fn get(&self, node_type: NodeType) -> Option<TypeTotals> {
        self.entries.get(&node_type).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeType, TypeTotals)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }

    /// Sum of shallow sizes over every type key
    pub fn total_size(&self) -> u64 {
        self.entries.values().map(|t| t.shallow_size).sum()
    }

    pub fn total_count(&self) -> u64 {
        self.entries.values().map(|t| t.object_count).sum()
    }

    /// Entries ordered by shallow size descending, then type name
    pub fn sorted_entries(&self) -> Vec<(NodeType, TypeTotals)> {
        let mut entries: Vec<(NodeType, TypeTotals)> = self.iter().collect();
        entries.sort_by(|a, b| {
            b.1.shallow_size
                .cmp(&a.1.shallow_size)
                .then_with(|| a.0.as_str().cmp(b.0.as_str()))
        });
        entries
    }

    /// Fold `other` into `self` key by key
    pub fn merge_from(&mut self, other: &SizeBreakdown) {
        for (node_type, totals) in &other.entries {
            self.entries.entry(*node_type).or_default().absorb(*totals);
        }
    }
}

impl FromIterator<(NodeType, u64)> for SizeBreakdown {
    fn from_iter<I: IntoIterator<Item = (NodeType, u64)>>(iter: I) -> Self {
        let mut breakdown = SizeBreakdown::new();
        for (node_type, self_size) in iter {
            breakdown.add_node(node_type, self_size);
        }
        breakdown
    }
}

/// Wire form of one breakdown entry, shaped like an aggregate bucket
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BreakdownEntry {
    name: NodeType,
    shallow_size: u64,
    object_count: u64,
}

impl Serialize for SizeBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.sorted_entries().into_iter().map(|(name, totals)| {
            BreakdownEntry {
                name,
                shallow_size: totals.shallow_size,
                object_count: totals.object_count,
            }
        }))
    }
}

impl<'de> Deserialize<'de> for SizeBreakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut breakdown = SizeBreakdown::new();
        for entry in Vec::<BreakdownEntry>::deserialize(deserializer)? {
            breakdown.entries.entry(entry.name).or_default().absorb(TypeTotals {
                shallow_size: entry.shallow_size,
                object_count: entry.object_count,
            });
        }
        Ok(breakdown)
    }
}

/// Key-wise sum of two breakdowns.
///
/// Commutative and associative, so callers may merge in any order. The
/// smaller map is folded into a copy of the larger one.
pub fn merge_subtypes(a: &SizeBreakdown, b: &SizeBreakdown) -> SizeBreakdown {
    let (large, small) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut merged = large.clone();
    merged.merge_from(small);
    merged
}
