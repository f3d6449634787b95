//! JSON request/response bodies shared by the HTTP server and the CLI.

use serde::{Deserialize, Serialize};

use crate::models::{Item, ItemView};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemViewRequest {
    pub item_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse {
    pub success: bool,
    pub message: String,
    pub item: Option<Item>,
}

impl ItemResponse {
    pub fn found(item: Item, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            item: Some(item),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorePageResponse {
    pub success: bool,
    pub items: Vec<Item>,
    pub total_items: usize,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsByCategoryResponse {
    pub items: Vec<Item>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemViewsResponse {
    pub views: Vec<ItemView>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

/// Standard error body: `{"error": "...", "detail": "...", "status": "error"}`.
/// `detail` repeats `error` for web clients that read that key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub detail: String,
    pub status: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        let error = msg.into();
        Self {
            detail: error.clone(),
            error,
            status: "error".to_string(),
        }
    }
}
