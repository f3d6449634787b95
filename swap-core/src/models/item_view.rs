use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in the view ledger. `user_id` is `None` for anonymous viewers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItemView {
    pub id: i64,
    pub item_id: String,
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}
