//! Query parameters and their validated forms.
//!
//! Raw parameters arrive as loosely typed field/value pairs. They are checked
//! against the target collection's field set before any element is touched,
//! so an unknown field fails instead of matching nothing.

use super::fields::Queryable;
use crate::utils::error::QueryError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Keep elements whose `field` equals `value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: String,
    pub value: String,
}

/// Sort by `field`; direction defaults to ascending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    #[serde(default)]
    pub direction: Option<String>,
}

/// Optional filter, ordering and limit for one read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[serde(default)]
    pub filter: Option<Predicate>,
    #[serde(default)]
    pub order_by: Option<OrderBy>,
    #[serde(default)]
    pub first: Option<i64>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter = Some(Predicate {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction: Some(direction.as_str().to_string()),
        });
        self
    }

    pub fn first(mut self, n: i64) -> Self {
        self.first = Some(n);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(QueryError::InvalidDirection(s.to_string())),
        }
    }
}

/// A filter whose field is known to exist on the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    field: &'static str,
    value: String,
}

impl FieldFilter {
    pub fn new<T: Queryable>(predicate: &Predicate) -> Result<Self, QueryError> {
        Ok(Self {
            field: T::resolve_field(&predicate.field)?,
            value: predicate.value.clone(),
        })
    }

    pub fn matches<T: Queryable>(&self, item: &T) -> bool {
        item.field(self.field)
            .is_some_and(|v| v.matches(&self.value))
    }
}

/// An ordering whose field is known to exist on the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOrder {
    field: &'static str,
    direction: Direction,
}

impl FieldOrder {
    pub fn new<T: Queryable>(order: &OrderBy) -> Result<Self, QueryError> {
        let field = T::resolve_field(&order.field)?;
        let direction = match &order.direction {
            Some(d) => d.parse()?,
            None => Direction::Asc,
        };
        Ok(Self { field, direction })
    }

    pub fn compare<T: Queryable>(&self, a: &T, b: &T) -> Ordering {
        let ordering = match (a.field(self.field), b.field(self.field)) {
            (Some(x), Some(y)) => x.compare(&y),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        match self.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}
