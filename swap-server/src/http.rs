//! Swap marketplace HTTP REST API
//!
//! Axum-based HTTP server exposing the item catalog and the view ledger.
//!
//! Each endpoint has a thin axum handler that delegates to an inner function
//! returning `(StatusCode, serde_json::Value)`. The inner functions can be
//! called directly from tests without going through axum dispatch.
//!
//! Endpoints:
//! - GET    /                              - liveness check
//! - GET    /health                        - health check with DB status
//! - GET    /version                       - server version info
//! - GET    /api/store                     - all items, categories and total
//! - POST   /api/item/view                 - record a view and return the item
//! - GET    /api/item/:item_id             - fetch a single item
//! - GET    /api/item-views                - full view history
//! - GET    /api/categories                - distinct categories
//! - GET    /api/items/category/:category  - items whose category contains the text
//! - DELETE /api/reset                     - wipe both tables and reseed

use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;
use swap_core::api::{ErrorResponse, ItemViewRequest, MessageResponse, StatusResponse};
use swap_core::{catalog, SwapConfig, SwapError};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::subsystems::{reset, storefront, views};

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub pool: SqlitePool,
    pub config: SwapConfig,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    let cors_allow_any = state.config.http.cors_allow_any;

    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/api/store", get(store_handler))
        .route("/api/item/view", post(view_item_handler))
        .route("/api/item/:item_id", get(item_handler))
        .route("/api/item-views", get(item_views_handler))
        .route("/api/categories", get(categories_handler))
        .route("/api/items/category/:category", get(items_by_category_handler))
        .route("/api/reset", delete(reset_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_allow_any {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    pool: SqlitePool,
    config: SwapConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = config.http.bind_addr();
    let state = Arc::new(HttpState { pool, config });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Swap HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Inner (directly testable) functions
// ============================================================================

/// Inner liveness check (pure, no IO).
pub fn root_inner() -> serde_json::Value {
    to_json(&StatusResponse {
        status: "healthy".to_string(),
        message: "Swap marketplace API is running".to_string(),
    })
}

/// Inner version (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "service": "swap-server",
    })
}

/// Inner health check - probes the DB and returns (status_code, json_body).
pub async fn health_inner(pool: &SqlitePool) -> (StatusCode, serde_json::Value) {
    let sqlite_ver = match swap_core::db::health_check(pool).await {
        Ok(v) => v,
        Err(e) => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({
                    "status": "unhealthy",
                    "error": e.to_string(),
                }),
            );
        }
    };

    let items = match catalog::count(pool).await {
        Ok(n) => serde_json::json!(n),
        Err(e) => serde_json::json!(format!("unavailable: {}", e)),
    };

    (
        StatusCode::OK,
        serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "database": format!("sqlite {}", sqlite_ver),
            "items": items,
        }),
    )
}

pub async fn store_inner(pool: &SqlitePool) -> (StatusCode, serde_json::Value) {
    respond(storefront::store_page(pool).await)
}

pub async fn item_inner(pool: &SqlitePool, item_id: &str) -> (StatusCode, serde_json::Value) {
    respond(storefront::item_details(pool, item_id).await)
}

pub async fn view_item_inner(
    pool: &SqlitePool,
    req: ItemViewRequest,
) -> (StatusCode, serde_json::Value) {
    respond(views::view_item(pool, &req.item_id, req.user_id.as_deref()).await)
}

pub async fn item_views_inner(pool: &SqlitePool) -> (StatusCode, serde_json::Value) {
    respond(views::view_history(pool).await)
}

pub async fn categories_inner(pool: &SqlitePool) -> (StatusCode, serde_json::Value) {
    respond(storefront::categories(pool).await)
}

pub async fn items_by_category_inner(
    pool: &SqlitePool,
    category: &str,
) -> (StatusCode, serde_json::Value) {
    respond(storefront::items_by_category(pool, category).await)
}

pub async fn reset_inner(pool: &SqlitePool) -> (StatusCode, serde_json::Value) {
    respond(reset::reset_all(pool).await.map(|_| MessageResponse {
        message: "All data reset successfully".to_string(),
    }))
}

// ============================================================================
// Axum handler wrappers (thin - delegate to inner functions)
// ============================================================================

pub async fn root_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(root_inner()))
}

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state.pool).await;
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn store_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = store_inner(&state.pool).await;
    (status, Json(body))
}

pub async fn item_handler(
    State(state): State<Arc<HttpState>>,
    Path(item_id): Path<String>,
) -> impl IntoResponse {
    let (status, body) = item_inner(&state.pool, &item_id).await;
    (status, Json(body))
}

pub async fn view_item_handler(
    State(state): State<Arc<HttpState>>,
    payload: Result<Json<ItemViewRequest>, JsonRejection>,
) -> impl IntoResponse {
    let (status, body) = match payload {
        Ok(Json(req)) => view_item_inner(&state.pool, req).await,
        Err(rejection) => {
            tracing::debug!("Rejected view request: {}", rejection.body_text());
            (rejection.status(), to_json(&ErrorResponse::new(rejection.body_text())))
        }
    };
    (status, Json(body))
}

pub async fn item_views_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = item_views_inner(&state.pool).await;
    (status, Json(body))
}

pub async fn categories_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = categories_inner(&state.pool).await;
    (status, Json(body))
}

pub async fn items_by_category_handler(
    State(state): State<Arc<HttpState>>,
    Path(category): Path<String>,
) -> impl IntoResponse {
    let (status, body) = items_by_category_inner(&state.pool, &category).await;
    (status, Json(body))
}

pub async fn reset_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = reset_inner(&state.pool).await;
    (status, Json(body))
}

// ============================================================================
// Helpers
// ============================================================================

/// Map a subsystem result to an HTTP status and JSON body.
pub fn respond<T: Serialize>(
    result: std::result::Result<T, SwapError>,
) -> (StatusCode, serde_json::Value) {
    match result {
        Ok(data) => (StatusCode::OK, to_json(&data)),
        Err(e) => error_to_http(&e),
    }
}

/// NotFound is the only error raised deliberately; everything else is an
/// internal error carrying the error text.
pub fn error_to_http(err: &SwapError) -> (StatusCode, serde_json::Value) {
    let status = match err {
        SwapError::NotFound(_) => StatusCode::NOT_FOUND,
        SwapError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match err {
        SwapError::NotFound(id) => format!("Item not found: {}", id),
        other => other.to_string(),
    };

    if status.is_server_error() {
        tracing::error!("Request failed: {}", message);
    }

    (status, to_json(&ErrorResponse::new(message)))
}

fn to_json<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        let message = format!("failed to serialize response: {}", e);
        serde_json::json!({
            "error": message,
            "detail": message,
            "status": "error",
        })
    })
}

// ============================================================================
// Unit Tests - call inner functions directly
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use swap_core::db::memory_pool;
    use swap_core::seed::seed_sample_data;

    async fn seeded_pool() -> SqlitePool {
        let pool = memory_pool().await.unwrap();
        seed_sample_data(&pool).await.unwrap();
        pool
    }

    // ========================================================================
    // TEST 1: root and version are pure
    // ========================================================================
    #[test]
    fn test_root_and_version_inner() {
        let root = root_inner();
        assert_eq!(root["status"], "healthy");
        assert!(root["message"].is_string());

        let v = version_inner();
        assert_eq!(v["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(v["service"], "swap-server");
    }

    // ========================================================================
    // TEST 2: error mapping
    // ========================================================================
    #[test]
    fn test_error_to_http_not_found_is_404() {
        let (status, body) = error_to_http(&SwapError::NotFound("item_9".to_string()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "Item not found: item_9");
        assert_eq!(body["detail"], "Item not found: item_9");
    }

    #[test]
    fn test_error_to_http_other_is_500() {
        let (status, body) = error_to_http(&SwapError::Database(sqlx::Error::PoolClosed));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("closed pool"));
    }

    #[test]
    fn test_error_to_http_validation_is_400() {
        let (status, _) = error_to_http(&SwapError::Validation("bad".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // ========================================================================
    // TEST 3: health reports the sqlite version and item count
    // ========================================================================
    #[tokio::test]
    async fn test_health_inner_ok() {
        let pool = seeded_pool().await;
        let (status, body) = health_inner(&pool).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["database"].as_str().unwrap().starts_with("sqlite "));
        assert_eq!(body["items"], 4);
    }

    #[tokio::test]
    async fn test_health_inner_closed_pool_is_unavailable() {
        let pool = seeded_pool().await;
        pool.close().await;
        let (status, body) = health_inner(&pool).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");
    }

    // ========================================================================
    // TEST 4: store page shape
    // ========================================================================
    #[tokio::test]
    async fn test_store_inner_shape() {
        let pool = seeded_pool().await;
        let (status, body) = store_inner(&pool).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["total_items"], 4);
        assert_eq!(body["items"].as_array().unwrap().len(), 4);
        assert!(body["items"][0]["images"].is_array());
        assert!(body["items"][0]["tags"].is_array());
        assert!(body["items"][0]["created_at"].is_string());
    }

    // ========================================================================
    // TEST 5: storage failure surfaces as 500
    // ========================================================================
    #[tokio::test]
    async fn test_store_inner_storage_error_is_500() {
        let pool = seeded_pool().await;
        pool.close().await;
        let (status, body) = store_inner(&pool).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
    }

    // ========================================================================
    // TEST 6: item lookup
    // ========================================================================
    #[tokio::test]
    async fn test_item_inner_found_and_missing() {
        let pool = seeded_pool().await;

        let (status, body) = item_inner(&pool, "item_2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["item"]["id"], "item_2");
        assert!(body["message"].is_string());

        let (status, body) = item_inner(&pool, "nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nope"));
    }

    // ========================================================================
    // TEST 7: view recording
    // ========================================================================
    #[tokio::test]
    async fn test_view_item_inner_records_view() {
        let pool = seeded_pool().await;
        let req = ItemViewRequest {
            item_id: "item_1".to_string(),
            user_id: None,
        };

        let (status, body) = view_item_inner(&pool, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["item"]["title"], "MacBook Pro 13-inch");

        let (status, body) = item_views_inner(&pool).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["views"][0]["item_id"], "item_1");
        assert!(body["views"][0]["user_id"].is_null());
    }

    #[tokio::test]
    async fn test_view_item_inner_unknown_is_404() {
        let pool = seeded_pool().await;
        let req = ItemViewRequest {
            item_id: "ghost".to_string(),
            user_id: Some("user_1".to_string()),
        };

        let (status, _) = view_item_inner(&pool, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = item_views_inner(&pool).await;
        assert_eq!(body["total"], 0);
    }

    // ========================================================================
    // TEST 8: categories and filtering
    // ========================================================================
    #[tokio::test]
    async fn test_categories_and_filter_inner() {
        let pool = seeded_pool().await;

        let (status, body) = categories_inner(&pool).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["categories"].as_array().unwrap().len(), 4);

        let (status, body) = items_by_category_inner(&pool, "CLOTH").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["category"], "Clothing");
    }

    // ========================================================================
    // TEST 9: reset
    // ========================================================================
    #[tokio::test]
    async fn test_reset_inner_message() {
        let pool = seeded_pool().await;
        let (status, body) = reset_inner(&pool).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "All data reset successfully");
    }
}
