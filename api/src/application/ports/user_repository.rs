use async_trait::async_trait;

use crate::domain::users::user::{Role, User};

// Lookups return soft-deleted rows as well; callers decide through `User::is_active`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        email: &str,
        password_hash: Option<&str>,
        role: Role,
    ) -> anyhow::Result<User>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    /// True when a user other than `except` already uses `email`.
    async fn email_taken(&self, email: &str, except: Option<i64>) -> anyhow::Result<bool>;
    /// Sets `deleted_at`; returns false when the user is unknown or already deleted.
    async fn soft_delete(&self, id: i64) -> anyhow::Result<bool>;
}
