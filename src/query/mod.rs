//! Read-only query pipeline over aggregate collections.
//!
//! Stateless: every call produces a new sequence and never touches shared state.

pub mod engine;
pub mod fields;
pub mod predicate;

// Re-export main types and functions
pub use engine::apply;
pub use fields::{FieldValue, Queryable};
pub use predicate::{Direction, OrderBy, Predicate, QueryParams};
