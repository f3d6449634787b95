//! View ledger - append-only log of item views.
//!
//! The ledger does not check that `item_id` exists in the catalog; callers
//! that need that guarantee check and record inside one transaction.

use chrono::Utc;
use sqlx::SqliteExecutor;

use crate::models::ItemView;
use crate::SwapError;

pub async fn record<'e, E>(
    executor: E,
    item_id: &str,
    user_id: Option<&str>,
) -> Result<ItemView, SwapError>
where
    E: SqliteExecutor<'e>,
{
    let view = sqlx::query_as::<_, ItemView>(
        r#"
        INSERT INTO item_views (item_id, user_id, timestamp)
        VALUES (?1, ?2, ?3)
        RETURNING id, item_id, user_id, timestamp
        "#,
    )
    .bind(item_id)
    .bind(user_id)
    .bind(Utc::now())
    .fetch_one(executor)
    .await?;

    tracing::debug!(view_id = view.id, item_id, "Recorded item view");
    Ok(view)
}

pub async fn list_all<'e, E>(executor: E) -> Result<Vec<ItemView>, SwapError>
where
    E: SqliteExecutor<'e>,
{
    let views = sqlx::query_as::<_, ItemView>(
        "SELECT id, item_id, user_id, timestamp FROM item_views ORDER BY id",
    )
    .fetch_all(executor)
    .await?;
    Ok(views)
}

pub async fn count<'e, E>(executor: E) -> Result<i64, SwapError>
where
    E: SqliteExecutor<'e>,
{
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM item_views")
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

pub async fn delete_all<'e, E>(executor: E) -> Result<u64, SwapError>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM item_views").execute(executor).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;

    #[tokio::test]
    async fn test_record_appends_one_entry() {
        let pool = memory_pool().await.unwrap();
        let before = Utc::now();

        let view = record(&pool, "item_1", Some("user_7")).await.unwrap();
        let views = list_all(&pool).await.unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(views[0], view);
        assert_eq!(view.item_id, "item_1");
        assert_eq!(view.user_id.as_deref(), Some("user_7"));
        assert!(view.timestamp >= before);
    }

    #[tokio::test]
    async fn test_anonymous_view_and_increasing_ids() {
        let pool = memory_pool().await.unwrap();
        let first = record(&pool, "item_1", None).await.unwrap();
        let second = record(&pool, "item_1", None).await.unwrap();

        assert!(first.user_id.is_none());
        assert!(second.id > first.id);
        assert_eq!(count(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_orphaned_item_id_is_tolerated() {
        let pool = memory_pool().await.unwrap();
        let view = record(&pool, "no_such_item", None).await.unwrap();
        assert_eq!(view.item_id, "no_such_item");
    }

    #[tokio::test]
    async fn test_delete_all_clears_ledger() {
        let pool = memory_pool().await.unwrap();
        record(&pool, "item_1", None).await.unwrap();
        record(&pool, "item_2", Some("u")).await.unwrap();

        assert_eq!(delete_all(&pool).await.unwrap(), 2);
        assert!(list_all(&pool).await.unwrap().is_empty());
    }
}
