use async_trait::async_trait;

use crate::application::ports::health_probe::HealthProbe;
use crate::infrastructure::db::PgPool;

pub struct SqlxHealthProbe {
    pub pool: PgPool,
}

impl SqlxHealthProbe {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthProbe for SqlxHealthProbe {
    async fn ping(&self) -> bool {
        match sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = ?e, "database_ping_failed");
                false
            }
        }
    }
}
