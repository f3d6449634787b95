//! Storefront subsystem - read-only catalog queries behind the store pages.

use sqlx::SqlitePool;
use swap_core::api::{CategoriesResponse, ItemResponse, ItemsByCategoryResponse, StorePageResponse};
use swap_core::{catalog, SwapError};

pub async fn store_page(pool: &SqlitePool) -> Result<StorePageResponse, SwapError> {
    let items = catalog::list_all(pool).await?;
    let categories = catalog::distinct_categories(pool).await?;

    tracing::debug!(items = items.len(), categories = categories.len(), "Loaded store page");

    Ok(StorePageResponse {
        success: true,
        total_items: items.len(),
        items,
        categories: categories.into_iter().collect(),
    })
}

pub async fn item_details(pool: &SqlitePool, item_id: &str) -> Result<ItemResponse, SwapError> {
    let item = catalog::get(pool, item_id).await?;
    Ok(ItemResponse::found(item, "Item retrieved successfully"))
}

pub async fn categories(pool: &SqlitePool) -> Result<CategoriesResponse, SwapError> {
    let categories = catalog::distinct_categories(pool).await?;
    Ok(CategoriesResponse {
        categories: categories.into_iter().collect(),
    })
}

pub async fn items_by_category(
    pool: &SqlitePool,
    category: &str,
) -> Result<ItemsByCategoryResponse, SwapError> {
    let items = catalog::filter_by_category(pool, category).await?;
    Ok(ItemsByCategoryResponse {
        total: items.len(),
        items,
    })
}
