//! Queryable field sets for each collection.

use crate::aggregator::{AggregatedPrototypeSize, AggregatedSize};
use crate::graph::Node;
use crate::utils::error::QueryError;
use std::cmp::Ordering;

/// Value of one field of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Int(u64),
    Text(&'a str),
}

impl FieldValue<'_> {
    /// String equality against a filter value
    pub fn matches(&self, value: &str) -> bool {
        match self {
            FieldValue::Int(n) => n.to_string() == value,
            FieldValue::Text(s) => *s == value,
        }
    }

    /// Numbers compare numerically, text lexicographically
    pub fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Text(b)) => a.to_string().as_str().cmp(*b),
            (FieldValue::Text(a), FieldValue::Int(b)) => (*a).cmp(b.to_string().as_str()),
        }
    }
}

/// A collection element the query pipeline can filter and sort
pub trait Queryable {
    /// Collection name used in error messages
    const COLLECTION: &'static str;

    /// Canonical field names, each with its accepted aliases
    const FIELDS: &'static [(&'static str, &'static [&'static str])];

    /// Value of a canonical field
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;

    /// Map a caller-supplied field name to its canonical form
    fn resolve_field(name: &str) -> Result<&'static str, QueryError> {
        Self::FIELDS
            .iter()
            .find(|(canonical, aliases)| *canonical == name || aliases.contains(&name))
            .map(|(canonical, _)| *canonical)
            .ok_or_else(|| QueryError::InvalidField {
                collection: Self::COLLECTION,
                field: name.to_string(),
                known: Self::field_names().join(", "),
            })
    }

    fn field_names() -> Vec<&'static str> {
        Self::FIELDS.iter().map(|(canonical, _)| *canonical).collect()
    }
}

impl Queryable for AggregatedSize {
    const COLLECTION: &'static str = "types";
    const FIELDS: &'static [(&'static str, &'static [&'static str])] = &[
        ("name", &["key"]),
        ("shallowSize", &["shallow_size", "self_size"]),
        ("objectCount", &["object_count"]),
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => Some(FieldValue::Text(&self.name)),
            "shallowSize" => Some(FieldValue::Int(self.shallow_size)),
            "objectCount" => Some(FieldValue::Int(self.object_count)),
            _ => None,
        }
    }
}

impl Queryable for AggregatedPrototypeSize {
    const COLLECTION: &'static str = "prototypes";
    const FIELDS: &'static [(&'static str, &'static [&'static str])] = &[
        ("name", &["key"]),
        ("type", &["node_type"]),
        ("shallowSize", &["shallow_size", "self_size"]),
        ("objectCount", &["object_count"]),
        ("retainedSize", &["retained_size"]),
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "name" => Some(FieldValue::Text(&self.name)),
            "type" => Some(FieldValue::Text(&self.node_type)),
            "shallowSize" => Some(FieldValue::Int(self.shallow_size)),
            "objectCount" => Some(FieldValue::Int(self.object_count)),
            "retainedSize" => Some(FieldValue::Int(self.retained_size)),
            _ => None,
        }
    }
}

impl Queryable for Node {
    const COLLECTION: &'static str = "nodes";
    const FIELDS: &'static [(&'static str, &'static [&'static str])] = &[
        ("id", &[]),
        ("type", &["node_type"]),
        ("name", &[]),
        ("self_size", &["shallowSize", "selfSize"]),
        ("edge_count", &["edgeCount"]),
        ("trace_node_id", &["traceNodeId"]),
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "id" => Some(FieldValue::Int(self.id)),
            "type" => Some(FieldValue::Text(self.node_type.as_str())),
            "name" => Some(FieldValue::Text(&self.name)),
            "self_size" => Some(FieldValue::Int(self.self_size)),
            "edge_count" => Some(FieldValue::Int(self.edge_count() as u64)),
            "trace_node_id" => Some(FieldValue::Int(self.trace_node_id)),
            _ => None,
        }
    }
}
