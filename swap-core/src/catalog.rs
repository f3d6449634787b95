//! Item catalog - read/seed/reset access to the `items` table.
//!
//! Every function takes any SQLite executor, so callers can run them against
//! the pool directly or inside an open transaction.

use std::collections::BTreeSet;

use chrono::Utc;
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqliteExecutor};

use crate::models::{Item, NewItem};
use crate::SwapError;

const ITEM_COLUMNS: &str = "id, title, description, price, category, condition, seller_id, \
     seller_name, images, tags, distance, created_at, updated_at";

/// Every item in the catalog. Callers must not depend on the order.
pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Item>, SwapError>
where
    E: SqliteExecutor<'e>,
{
    let items = sqlx::query_as::<_, Item>(&format!(
        "SELECT {} FROM items ORDER BY created_at, id",
        ITEM_COLUMNS
    ))
    .fetch_all(executor)
    .await?;
    Ok(items)
}

pub async fn get<'e, E>(executor: E, id: &str) -> Result<Item, SwapError>
where
    E: SqliteExecutor<'e>,
{
    find(executor, id)
        .await?
        .ok_or_else(|| SwapError::NotFound(id.to_string()))
}

pub async fn find<'e, E>(executor: E, id: &str) -> Result<Option<Item>, SwapError>
where
    E: SqliteExecutor<'e>,
{
    let item = sqlx::query_as::<_, Item>(&format!(
        "SELECT {} FROM items WHERE id = ?1",
        ITEM_COLUMNS
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(item)
}

/// Case-insensitive substring match on `category`. The needle is matched
/// literally, `%` and `_` carry no wildcard meaning.
pub async fn filter_by_category<'e, E>(executor: E, needle: &str) -> Result<Vec<Item>, SwapError>
where
    E: SqliteExecutor<'e>,
{
    let items = sqlx::query_as::<_, Item>(&format!(
        "SELECT {} FROM items WHERE instr(lower(category), lower(?1)) > 0 ORDER BY created_at, id",
        ITEM_COLUMNS
    ))
    .bind(needle)
    .fetch_all(executor)
    .await?;
    Ok(items)
}

pub async fn distinct_categories<'e, E>(executor: E) -> Result<BTreeSet<String>, SwapError>
where
    E: SqliteExecutor<'e>,
{
    let rows: Vec<(String,)> = sqlx::query_as("SELECT DISTINCT category FROM items")
        .fetch_all(executor)
        .await?;
    Ok(rows.into_iter().map(|(c,)| c).collect())
}

pub async fn count<'e, E>(executor: E) -> Result<i64, SwapError>
where
    E: SqliteExecutor<'e>,
{
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items")
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

pub async fn insert<'e, E>(executor: E, new_item: NewItem) -> Result<Item, SwapError>
where
    E: SqliteExecutor<'e>,
{
    new_item.validate()?;
    let item = new_item.into_item(Utc::now());

    sqlx::query(&format!(
        "INSERT INTO items ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        ITEM_COLUMNS
    ))
    .bind(&item.id)
    .bind(&item.title)
    .bind(&item.description)
    .bind(item.price)
    .bind(&item.category)
    .bind(&item.condition)
    .bind(&item.seller_id)
    .bind(&item.seller_name)
    .bind(Json(&item.images))
    .bind(Json(&item.tags))
    .bind(item.distance)
    .bind(item.created_at)
    .bind(item.updated_at)
    .execute(executor)
    .await?;

    Ok(item)
}

/// Remove every item. Returns the number of rows deleted.
pub async fn delete_all<'e, E>(executor: E) -> Result<u64, SwapError>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM items").execute(executor).await?;
    Ok(result.rows_affected())
}

/// Insert `initial_items` only when the catalog is empty.
///
/// Returns the number of items inserted (0 when the catalog already had rows).
/// Run it inside a transaction for all-or-nothing seeding.
pub async fn seed(
    conn: &mut SqliteConnection,
    initial_items: Vec<NewItem>,
) -> Result<usize, SwapError> {
    if count(&mut *conn).await? > 0 {
        tracing::info!("Catalog already populated, skipping seed");
        return Ok(0);
    }

    let total = initial_items.len();
    for item in initial_items {
        insert(&mut *conn, item).await?;
    }

    tracing::info!(items = total, "Seeded catalog with sample data");
    Ok(total)
}
