//! Left join of customer attributes onto sales rows.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use polars::prelude::{Column, DataFrame, IdxCa, IdxSize, NewChunkedArray};
use tracing::{debug, info};

use etl_common::any_to_i64;
use etl_model::columns;

use crate::error::{Result, TransformError};
use crate::frame_utils::{column_values, require_column};

/// Customer columns carried onto every sales row.
const CUSTOMER_ATTRIBUTES: [&str; 3] = [
    columns::CUSTOMER_NAME,
    columns::EMAIL,
    columns::CUSTOMER_TENURE,
];

/// Attaches name, email and tenure of the matching customer to each sales row.
///
/// Every sales row appears exactly once in the output and in input order.
/// Rows without a matching customer get nulls. When the customer frame
/// repeats an identifier, the first occurrence wins.
pub fn merge_customer_attributes(sales: &DataFrame, customers: &DataFrame) -> Result<DataFrame> {
    let left = require_column(sales, columns::CUSTOMER_ID)?.dtype();
    let right = require_column(customers, columns::CUSTOMER_ID)?.dtype();
    if left != right {
        return Err(TransformError::JoinKeyMismatch {
            column: columns::CUSTOMER_ID.to_string(),
            left: left.clone(),
            right: right.clone(),
        });
    }

    let mut first_row: HashMap<i64, IdxSize> = HashMap::new();
    for (idx, id) in column_values(customers, columns::CUSTOMER_ID, any_to_i64)?
        .into_iter()
        .enumerate()
    {
        let Some(id) = id else { continue };
        if let Entry::Vacant(slot) = first_row.entry(id) {
            slot.insert(idx as IdxSize);
        } else {
            debug!(customer_id = id, "duplicate customer id ignored");
        }
    }

    let lookups: Vec<Option<IdxSize>> =
        column_values(sales, columns::CUSTOMER_ID, any_to_i64)?
            .into_iter()
            .map(|id| id.and_then(|id| first_row.get(&id).copied()))
            .collect();
    let unmatched = lookups.iter().filter(|row| row.is_none()).count();

    let mut attributes = Vec::with_capacity(CUSTOMER_ATTRIBUTES.len());
    for name in CUSTOMER_ATTRIBUTES {
        attributes.push(require_column(customers, name)?.clone());
    }
    let picked = DataFrame::new(attributes)?
        .take(&IdxCa::from_slice_options("row".into(), &lookups))?;

    let mut base = sales.clone();
    for name in CUSTOMER_ATTRIBUTES {
        if base.column(name).is_ok() {
            base = base.drop(name)?;
        }
    }
    let picked_columns: Vec<Column> = picked.get_columns().to_vec();
    let merged = base.hstack(&picked_columns)?;

    info!(rows = merged.height(), unmatched, "customer attributes merged");
    Ok(merged)
}
