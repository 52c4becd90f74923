//! Query command implementation.
//! Loads a graph and prints one filtered/sorted/limited view as JSON.

use super::analyze::resolve_config;
use super::models::{QueryArgs, View};
use crate::engine::HeapEngine;
use crate::output::to_pretty_string;
use crate::progress::LogProgress;
use crate::query::{OrderBy, Predicate, QueryParams};
use anyhow::{Context, Result};

/// Execute the query command and return the rendered JSON
pub fn execute_query(args: QueryArgs) -> Result<String> {
    let params = build_params(&args)?;

    let config = resolve_config(args.config.as_deref())?;
    let engine = HeapEngine::new(config);
    let mut progress = LogProgress::new(engine.config().progress_every);

    engine
        .load_file(&args.input, &mut progress)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let json = match args.view {
        View::Types => to_pretty_string(&engine.types(&params)?)?,
        View::Prototypes => to_pretty_string(&engine.prototypes(&params)?)?,
        View::Nodes => to_pretty_string(&engine.nodes(&params)?)?,
    };

    Ok(json)
}

/// Turn CLI strings into query parameters
pub fn build_params(args: &QueryArgs) -> Result<QueryParams> {
    Ok(QueryParams {
        filter: args.filter.as_deref().map(parse_filter).transpose()?,
        order_by: args.order_by.as_deref().map(parse_order_by).transpose()?,
        first: args.first,
    })
}

/// Parse `field=value`
pub fn parse_filter(raw: &str) -> Result<Predicate> {
    let (field, value) = raw
        .split_once('=')
        .with_context(|| format!("Filter '{}' must look like field=value", raw))?;

    if field.trim().is_empty() {
        anyhow::bail!("Filter '{}' has an empty field name", raw);
    }

    Ok(Predicate {
        field: field.trim().to_string(),
        value: value.to_string(),
    })
}

/// Parse `field` or `field:direction`
pub fn parse_order_by(raw: &str) -> Result<OrderBy> {
    let (field, direction) = match raw.split_once(':') {
        Some((field, direction)) => (field, Some(direction.to_string())),
        None => (raw, None),
    };

    if field.trim().is_empty() {
        anyhow::bail!("Order '{}' has an empty field name", raw);
    }

    Ok(OrderBy {
        field: field.trim().to_string(),
        direction,
    })
}
