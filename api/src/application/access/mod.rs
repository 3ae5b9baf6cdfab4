use crate::application::ports::customer_repository::CustomerRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::customers::customer::Customer;
use crate::domain::users::user::{Role, User};

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

// Presentation resolves the caller's user id from the bearer token; everything
// below only trusts that id.

pub async fn require_user<U>(users: &U, user_id: i64) -> Result<User, AccessError>
where
    U: UserRepository + ?Sized,
{
    match users.find_by_id(user_id).await? {
        Some(user) if user.is_active() => Ok(user),
        _ => Err(AccessError::Unauthorized),
    }
}

pub async fn require_admin<U>(users: &U, user_id: i64) -> Result<User, AccessError>
where
    U: UserRepository + ?Sized,
{
    let user = require_user(users, user_id).await?;
    if user.role == Role::Admin {
        Ok(user)
    } else {
        Err(AccessError::Forbidden)
    }
}

/// The caller's own customer record, provided it is `customer_id`.
pub async fn resolve_customer<U, C>(
    users: &U,
    customers: &C,
    user_id: i64,
    customer_id: i64,
) -> Result<Customer, AccessError>
where
    U: UserRepository + ?Sized,
    C: CustomerRepository + ?Sized,
{
    let user = require_user(users, user_id).await?;
    match customers.find_by_user(user.id).await? {
        Some(customer) if customer.id == customer_id => Ok(customer),
        _ => Err(AccessError::Unauthorized),
    }
}
