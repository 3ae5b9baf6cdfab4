use std::sync::Arc;

use crate::application::ports::address_repository::{AddressRepository, AddressWriteMode};
use crate::application::ports::category_repository::CategoryRepository;
use crate::application::ports::customer_repository::CustomerRepository;
use crate::application::ports::health_probe::HealthProbe;
use crate::application::ports::product_repository::ProductRepository;
use crate::application::ports::setting_repository::SettingRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::address_repository_sqlx::SqlxAddressRepository;
use crate::infrastructure::db::repositories::category_repository_sqlx::SqlxCategoryRepository;
use crate::infrastructure::db::repositories::customer_repository_sqlx::SqlxCustomerRepository;
use crate::infrastructure::db::repositories::health_probe_sqlx::SqlxHealthProbe;
use crate::infrastructure::db::repositories::product_repository_sqlx::SqlxProductRepository;
use crate::infrastructure::db::repositories::setting_repository_sqlx::SqlxSettingRepository;
use crate::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use crate::infrastructure::memory::MemoryDatabase;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    customer_repo: Arc<dyn CustomerRepository>,
    address_repo: Arc<dyn AddressRepository>,
    product_repo: Arc<dyn ProductRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    setting_repo: Arc<dyn SettingRepository>,
    health_probe: Arc<dyn HealthProbe>,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        customer_repo: Arc<dyn CustomerRepository>,
        address_repo: Arc<dyn AddressRepository>,
        product_repo: Arc<dyn ProductRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        setting_repo: Arc<dyn SettingRepository>,
        health_probe: Arc<dyn HealthProbe>,
    ) -> Self {
        Self {
            user_repo,
            customer_repo,
            address_repo,
            product_repo,
            category_repo,
            setting_repo,
            health_probe,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(SqlxUserRepository::new(pool.clone())),
            Arc::new(SqlxCustomerRepository::new(pool.clone())),
            Arc::new(SqlxAddressRepository::new(pool.clone())),
            Arc::new(SqlxProductRepository::new(pool.clone())),
            Arc::new(SqlxCategoryRepository::new(pool.clone())),
            Arc::new(SqlxSettingRepository::new(pool.clone())),
            Arc::new(SqlxHealthProbe::new(pool)),
        )
    }

    /// Every port served by one shared [`MemoryDatabase`].
    pub fn in_memory(db: MemoryDatabase) -> Self {
        let db = Arc::new(db);
        Self::new(
            db.clone(),
            db.clone(),
            db.clone(),
            db.clone(),
            db.clone(),
            db.clone(),
            db,
        )
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn customer_repo(&self) -> Arc<dyn CustomerRepository> {
        self.services.customer_repo.clone()
    }

    pub fn address_repo(&self) -> Arc<dyn AddressRepository> {
        self.services.address_repo.clone()
    }

    pub fn address_write_mode(&self) -> AddressWriteMode {
        self.cfg.address_write_mode
    }

    pub fn product_repo(&self) -> Arc<dyn ProductRepository> {
        self.services.product_repo.clone()
    }

    pub fn category_repo(&self) -> Arc<dyn CategoryRepository> {
        self.services.category_repo.clone()
    }

    pub fn setting_repo(&self) -> Arc<dyn SettingRepository> {
        self.services.setting_repo.clone()
    }

    pub fn health_probe(&self) -> Arc<dyn HealthProbe> {
        self.services.health_probe.clone()
    }
}
