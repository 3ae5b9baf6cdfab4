use chrono::{DateTime, Utc};

use crate::domain::users::user::User;

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user together with its customer profile.
#[derive(Debug, Clone)]
pub struct CustomerAccount {
    pub user: User,
    pub customer: Customer,
}
