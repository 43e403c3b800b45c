//! Item database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the item table
#[derive(Debug, Clone, FromRow)]
pub struct ItemModel {
    pub item_id: String,
    pub created_date: DateTime<Utc>,
}
