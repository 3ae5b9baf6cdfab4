use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::setting_repository::SettingRepository;
use crate::domain::settings::setting::Setting;
use crate::infrastructure::db::{PgPool, unique_on};

fn setting_from_row(r: &PgRow) -> Setting {
    Setting {
        key: r.get("key"),
        value: r.get("value"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

pub struct SqlxSettingRepository {
    pub pool: PgPool,
}

impl SqlxSettingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingRepository for SqlxSettingRepository {
    async fn list(&self) -> anyhow::Result<Vec<Setting>> {
        let rows = sqlx::query("SELECT key, value, created_at, updated_at FROM settings ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(setting_from_row).collect())
    }

    async fn find(&self, key: &str) -> anyhow::Result<Option<Setting>> {
        let row = sqlx::query("SELECT key, value, created_at, updated_at FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(setting_from_row))
    }

    async fn create(&self, key: &str, value: &str) -> anyhow::Result<Setting> {
        let row = sqlx::query(
            r#"INSERT INTO settings (key, value) VALUES ($1, $2)
               RETURNING key, value, created_at, updated_at"#,
        )
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await
        .map_err(unique_on("key"))?;
        Ok(setting_from_row(&row))
    }

    async fn update(&self, key: &str, value: &str) -> anyhow::Result<Option<Setting>> {
        let row = sqlx::query(
            r#"UPDATE settings SET value = $2, updated_at = now() WHERE key = $1
               RETURNING key, value, created_at, updated_at"#,
        )
        .bind(key)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(setting_from_row))
    }

    async fn delete(&self, key: &str) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM settings WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
