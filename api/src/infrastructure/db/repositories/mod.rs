pub mod address_repository_sqlx;
pub mod category_repository_sqlx;
pub mod customer_repository_sqlx;
pub mod health_probe_sqlx;
pub mod product_repository_sqlx;
pub mod setting_repository_sqlx;
pub mod user_repository_sqlx;
