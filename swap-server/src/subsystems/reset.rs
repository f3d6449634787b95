//! Reset subsystem - wipe both tables and reseed the sample catalog.

use sqlx::SqlitePool;
use swap_core::{catalog, ledger, seed, SwapError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResetReport {
    pub views_deleted: u64,
    pub items_deleted: u64,
    pub items_seeded: usize,
}

/// Clear the ledger and the catalog, then reseed, as one transaction.
pub async fn reset_all(pool: &SqlitePool) -> Result<ResetReport, SwapError> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let views_deleted = ledger::delete_all(&mut *tx).await?;
    let items_deleted = catalog::delete_all(&mut *tx).await?;
    let items_seeded = catalog::seed(&mut *tx, seed::sample_items()).await?;

    tx.commit().await?;

    let report = ResetReport {
        views_deleted,
        items_deleted,
        items_seeded,
    };
    tracing::info!(
        views_deleted = report.views_deleted,
        items_deleted = report.items_deleted,
        items_seeded = report.items_seeded,
        "All data reset"
    );
    Ok(report)
}
