use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    /// `None` leaves the category links untouched; `Some` replaces them.
    pub category_ids: Option<Vec<i64>>,
}
