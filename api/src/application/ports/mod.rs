pub mod address_repository;
pub mod category_repository;
pub mod customer_repository;
pub mod health_probe;
pub mod product_repository;
pub mod setting_repository;
pub mod user_repository;

/// A write collided with a uniqueness constraint on `field`.
///
/// Adapters return it inside their `anyhow::Error` so use cases can answer
/// with a `unique` validation error when a concurrent writer won the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("duplicate value for {field}")]
pub struct UniqueViolation {
    pub field: &'static str,
}

impl UniqueViolation {
    pub fn field_of(err: &anyhow::Error) -> Option<&'static str> {
        err.downcast_ref::<Self>().map(|v| v.field)
    }
}
