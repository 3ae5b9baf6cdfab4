use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::user::{Role, User};
use crate::infrastructure::db::{PgPool, unique_on};

/// Column list shared by every query returning a [`User`]; expects `users u`
/// joined with `roles r`.
pub(crate) const USER_COLUMNS: &str = "u.id, u.email, u.password_hash, u.role_id, r.name AS role, \
     u.deleted_at, u.created_at, u.updated_at";

pub(crate) fn user_from_row(r: &PgRow) -> anyhow::Result<User> {
    let role: String = r.get("role");
    let role = Role::parse(&role).ok_or_else(|| anyhow::anyhow!("unknown role {role}"))?;
    Ok(User {
        id: r.get("id"),
        email: r.get("email"),
        password_hash: r.get("password_hash"),
        role_id: r.get("role_id"),
        role,
        deleted_at: r.get("deleted_at"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(
        &self,
        email: &str,
        password_hash: Option<&str>,
        role: Role,
    ) -> anyhow::Result<User> {
        let sql = format!(
            r#"WITH u AS (
                 INSERT INTO users (email, password_hash, role_id)
                 SELECT $1, $2, id FROM roles WHERE name = $3
                 RETURNING *
               )
               SELECT {USER_COLUMNS} FROM u JOIN roles r ON r.id = u.role_id"#
        );
        let row = sqlx::query(&sql)
            .bind(email)
            .bind(password_hash)
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(unique_on("email"))?;
        user_from_row(&row)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.email = $1"
        );
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.id = $1"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn email_taken(&self, email: &str, except: Option<i64>) -> anyhow::Result<bool> {
        let n = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(1) FROM users WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(n > 0)
    }

    async fn soft_delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(
            "UPDATE users SET deleted_at = now(), updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}
