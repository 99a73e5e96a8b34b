//! Eager loading for related entities.
//!
//! This module implements the selectinload strategy: instead of one query per
//! parent (N+1), related rows for a whole result set are fetched with a single
//! `IN (...)` query and stitched back to their parents by key.
//!
//! # Strategy
//!
//! 1. Collect the distinct parent keys
//! 2. Run one related query constrained to those keys
//! 3. Group the hydrated results by the key column of each row

use crate::connection::Connection;
use crate::executor::{PressError, PressExecutor};
use crate::model::Entity;
use crate::query::execution::hydrate;
use crate::query::SelectQuery;
use crate::relation::def::RelationDef;
use std::collections::HashMap;

#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// Sorted, de-duplicated parent keys
pub fn distinct_keys<I: IntoIterator<Item = i64>>(keys: I) -> Vec<i64> {
    let mut keys: Vec<i64> = keys.into_iter().collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

/// Run a related query and group its results by parent key
///
/// Result order inside each group follows the query's own ordering, so an
/// `order_by` on `query` is preserved per parent.
///
/// # Errors
///
/// Returns `PressError` if the query fails, a row lacks the key column, or a
/// related entity fails to hydrate.
pub fn load_grouped<R, E>(
    rel: &RelationDef,
    query: SelectQuery<'_, R, E>,
) -> Result<HashMap<i64, Vec<R>>, PressError>
where
    R: Entity,
    E: PressExecutor,
{
    let rows = query.rows()?;

    let key_column = rel.key_column();
    let keys = rows
        .iter()
        .map(|row| row.get::<i64>(&key_column))
        .collect::<Result<Vec<_>, _>>()?;

    let mut models = hydrate::<R>(&rows)?;
    if query.eager && !models.is_empty() {
        R::eager_load(&mut models, query.conn)?;
    }

    let mut grouped: HashMap<i64, Vec<R>> = HashMap::new();
    for (key, model) in keys.into_iter().zip(models) {
        grouped.entry(key).or_default().push(model);
    }

    log::debug!(
        "eager loaded `{}`: {} parent key(s) matched",
        rel.name,
        grouped.len()
    );
    Ok(grouped)
}

/// Load a one-to-many relation for every key
///
/// # Errors
///
/// Returns any error from [`load_grouped`].
pub fn load_has_many<R, E>(
    rel: &RelationDef,
    conn: &Connection<E>,
    keys: &[i64],
) -> Result<HashMap<i64, Vec<R>>, PressError>
where
    R: Entity,
    E: PressExecutor,
{
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::eager_load_span(rel.name, keys.len()).entered();

    if keys.is_empty() {
        return Ok(HashMap::new());
    }
    load_grouped(rel, rel.query_for_many(conn, keys))
}

/// Load a many-to-one relation for every key
///
/// # Errors
///
/// Returns any error from [`load_grouped`].
pub fn load_belongs_to<R, E>(
    rel: &RelationDef,
    conn: &Connection<E>,
    keys: &[i64],
) -> Result<HashMap<i64, R>, PressError>
where
    R: Entity,
    E: PressExecutor,
{
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::eager_load_span(rel.name, keys.len()).entered();

    if keys.is_empty() {
        return Ok(HashMap::new());
    }
    let grouped = load_grouped(rel, rel.query_for_many::<R, E>(conn, keys))?;
    Ok(grouped
        .into_iter()
        .filter_map(|(key, mut models)| {
            if models.is_empty() {
                None
            } else {
                Some((key, models.swap_remove(0)))
            }
        })
        .collect())
}

/// Load a pivot relation through a prepared query
///
/// `query` is normally `rel.query_for_many(conn, keys)` with extra ordering
/// applied, e.g. menu items sorted by `menu_order`. No query runs when `keys`
/// is empty.
///
/// # Errors
///
/// Returns any error from [`load_grouped`].
pub fn load_many_to_many<R, E>(
    rel: &RelationDef,
    keys: &[i64],
    query: SelectQuery<'_, R, E>,
) -> Result<HashMap<i64, Vec<R>>, PressError>
where
    R: Entity,
    E: PressExecutor,
{
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::eager_load_span(rel.name, keys.len()).entered();

    if keys.is_empty() {
        return Ok(HashMap::new());
    }
    load_grouped(rel, query)
}
