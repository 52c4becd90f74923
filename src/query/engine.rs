//! Filter → order → limit pipeline over an aggregate collection.

use super::fields::Queryable;
use super::predicate::{FieldFilter, FieldOrder, QueryParams};
use crate::utils::error::QueryError;
use log::debug;

/// Apply `params` to `collection`, returning a new sequence
///
/// Stages run in a fixed order and absent stages are skipped:
/// 1. filter: string equality on one field
/// 2. order: stable sort on one field, ties keep input order
/// 3. first: keep the first `n` elements; `n <= 0` keeps none
///
/// Fields are validated before any element is read. The input is never modified.
///
/// # Errors
/// * `QueryError::InvalidField` - filter or order names a field the collection lacks
/// * `QueryError::InvalidDirection` - order direction is not asc/desc
pub fn apply<T: Queryable + Clone>(collection: &[T], params: &QueryParams) -> Result<Vec<T>, QueryError> {
    let filter = params
        .filter
        .as_ref()
        .map(FieldFilter::new::<T>)
        .transpose()?;
    let order = params
        .order_by
        .as_ref()
        .map(FieldOrder::new::<T>)
        .transpose()?;

    let mut view: Vec<T> = match &filter {
        Some(filter) => collection
            .iter()
            .filter(|item| filter.matches(*item))
            .cloned()
            .collect(),
        None => collection.to_vec(),
    };

    if let Some(order) = &order {
        view.sort_by(|a, b| order.compare(a, b));
    }

    if let Some(first) = params.first {
        let keep = usize::try_from(first).unwrap_or(0);
        view.truncate(keep);
    }

    debug!(
        "Query over {}: {} of {} elements",
        T::COLLECTION,
        view.len(),
        collection.len()
    );

    Ok(view)
}
