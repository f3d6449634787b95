//! View tracking subsystem - records item views and exposes the history.

use sqlx::SqlitePool;
use swap_core::api::{ItemResponse, ItemViewsResponse};
use swap_core::{catalog, ledger, SwapError};

/// Look up the item and append a view, both inside one transaction, so a
/// view is never recorded for an item that does not exist at commit time.
///
/// The transaction takes the write lock up front (`BEGIN IMMEDIATE`), so
/// concurrent writers queue on the busy timeout instead of failing with
/// SQLITE_BUSY when the read lock is upgraded.
pub async fn view_item(
    pool: &SqlitePool,
    item_id: &str,
    user_id: Option<&str>,
) -> Result<ItemResponse, SwapError> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    // NotFound drops `tx`, which rolls back
    let item = catalog::get(&mut *tx, item_id).await?;
    let view = ledger::record(&mut *tx, item_id, user_id).await?;

    tx.commit().await?;

    tracing::info!(
        item_id,
        view_id = view.id,
        anonymous = user_id.is_none(),
        "Item viewed"
    );

    Ok(ItemResponse::found(item, "Item view recorded successfully"))
}

pub async fn view_history(pool: &SqlitePool) -> Result<ItemViewsResponse, SwapError> {
    let views = ledger::list_all(pool).await?;
    Ok(ItemViewsResponse {
        total: views.len(),
        views,
    })
}
