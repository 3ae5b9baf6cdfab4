use sqlx::{Pool, Postgres};

use crate::application::ports::UniqueViolation;

pub type PgPool = Pool<Postgres>;

pub async fn connect_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    // Uses compile-time embedded migrations under ./migrations
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Surfaces a unique-constraint violation (SQLSTATE 23505) as
/// [`UniqueViolation`] on `field`.
pub(crate) fn unique_on(field: &'static str) -> impl FnOnce(sqlx::Error) -> anyhow::Error {
    move |err| {
        if matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation()) {
            UniqueViolation { field }.into()
        } else {
            err.into()
        }
    }
}

pub mod repositories;
