use async_trait::async_trait;

use crate::domain::catalog::category::{Category, CategoryFields};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Category>>;
    async fn find(&self, id: i64) -> anyhow::Result<Option<Category>>;
    async fn create(&self, fields: &CategoryFields) -> anyhow::Result<Category>;
    async fn update(&self, id: i64, fields: &CategoryFields) -> anyhow::Result<Option<Category>>;
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
    /// Subset of `ids` that exist.
    async fn existing_ids(&self, ids: &[i64]) -> anyhow::Result<Vec<i64>>;
}
