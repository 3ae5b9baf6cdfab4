use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
