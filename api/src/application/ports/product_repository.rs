use async_trait::async_trait;

use crate::domain::catalog::category::Category;
use crate::domain::catalog::product::{Product, ProductFields};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Product>>;
    async fn find(&self, id: i64) -> anyhow::Result<Option<Product>>;
    async fn create(&self, fields: &ProductFields) -> anyhow::Result<Product>;
    async fn update(&self, id: i64, fields: &ProductFields) -> anyhow::Result<Option<Product>>;
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
    async fn categories_of(&self, id: i64) -> anyhow::Result<Vec<Category>>;
}
