use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use super::category_repository_sqlx::category_from_row;
use crate::application::ports::product_repository::ProductRepository;
use crate::domain::catalog::category::Category;
use crate::domain::catalog::product::{Product, ProductFields};
use crate::infrastructure::db::PgPool;

fn product_from_row(r: &PgRow) -> Product {
    Product {
        id: r.get("id"),
        name: r.get("name"),
        description: r.get("description"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

async fn replace_links(
    conn: &mut sqlx::PgConnection,
    product_id: i64,
    category_ids: &[i64],
) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM category_product WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
    sqlx::query(
        r#"INSERT INTO category_product (category_id, product_id)
           SELECT DISTINCT unnest($2::BIGINT[]), $1"#,
    )
    .bind(product_id)
    .bind(category_ids)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub struct SqlxProductRepository {
    pub pool: PgPool,
}

impl SqlxProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for SqlxProductRepository {
    async fn list(&self) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query(
            "SELECT id, name, description, created_at, updated_at FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(product_from_row).collect())
    }

    async fn find(&self, id: i64) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at, updated_at FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(product_from_row))
    }

    async fn create(&self, fields: &ProductFields) -> anyhow::Result<Product> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(
            r#"INSERT INTO products (name, description) VALUES ($1, $2)
               RETURNING id, name, description, created_at, updated_at"#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .fetch_one(&mut *tx)
        .await?;
        let product = product_from_row(&row);
        if let Some(ids) = &fields.category_ids {
            replace_links(&mut tx, product.id, ids).await?;
        }
        tx.commit().await?;
        Ok(product)
    }

    async fn update(&self, id: i64, fields: &ProductFields) -> anyhow::Result<Option<Product>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(
            r#"UPDATE products SET name = $2, description = $3, updated_at = now()
               WHERE id = $1
               RETURNING id, name, description, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        if let Some(ids) = &fields.category_ids {
            replace_links(&mut tx, id, ids).await?;
        }
        tx.commit().await?;
        Ok(Some(product_from_row(&row)))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn categories_of(&self, id: i64) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query(
            r#"SELECT c.id, c.name, c.description, c.created_at, c.updated_at
               FROM categories c
               JOIN category_product cp ON cp.category_id = c.id
               WHERE cp.product_id = $1
               ORDER BY c.id"#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(category_from_row).collect())
    }
}
