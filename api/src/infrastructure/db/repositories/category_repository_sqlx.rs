use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::category_repository::CategoryRepository;
use crate::domain::catalog::category::{Category, CategoryFields};
use crate::infrastructure::db::PgPool;

pub(crate) fn category_from_row(r: &PgRow) -> Category {
    Category {
        id: r.get("id"),
        name: r.get("name"),
        description: r.get("description"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

pub struct SqlxCategoryRepository {
    pub pool: PgPool,
}

impl SqlxCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn list(&self) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, name, description, created_at, updated_at FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn find(&self, id: i64) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(category_from_row))
    }

    async fn create(&self, fields: &CategoryFields) -> anyhow::Result<Category> {
        let row = sqlx::query(
            r#"INSERT INTO categories (name, description) VALUES ($1, $2)
               RETURNING id, name, description, created_at, updated_at"#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(category_from_row(&row))
    }

    async fn update(&self, id: i64, fields: &CategoryFields) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query(
            r#"UPDATE categories SET name = $2, description = $3, updated_at = now()
               WHERE id = $1
               RETURNING id, name, description, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(category_from_row))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn existing_ids(&self, ids: &[i64]) -> anyhow::Result<Vec<i64>> {
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM categories WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(found)
    }
}
