pub mod create_address;
pub mod delete_address;
pub mod get_address;
pub mod list_addresses;
pub mod update_address;

use crate::application::ports::address_repository::AddressRepository;
use crate::domain::addresses::policy::PolicyViolation;

#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("Address not found")]
    NotFound,
    /// The address exists but belongs to another customer.
    #[error("Unauthorized")]
    NotOwned,
    #[error(transparent)]
    Policy(#[from] PolicyViolation),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Tells apart an address owned by someone else from one that never existed.
async fn missing<R: AddressRepository + ?Sized>(repo: &R, address_id: i64) -> AddressError {
    match repo.owner_of(address_id).await {
        Ok(Some(_)) => AddressError::NotOwned,
        Ok(None) => AddressError::NotFound,
        Err(e) => AddressError::Store(e),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::create_address::CreateAddress;
    use crate::application::ports::address_repository::AddressWriteMode;
    use crate::domain::addresses::address::{Address, AddressFields};
    use crate::infrastructure::memory::MemoryDatabase;

    pub fn paris() -> AddressFields {
        AddressFields {
            street1: "rue de la paix".into(),
            street2: None,
            city: "Paris".into(),
            zip: "75000".into(),
            country: "France".into(),
        }
    }

    pub async fn seed(db: &MemoryDatabase, customer_id: i64, count: usize) -> Vec<Address> {
        let uc = CreateAddress {
            repo: db,
            mode: AddressWriteMode::Atomic,
        };
        let mut out = Vec::new();
        for _ in 0..count {
            out.push(uc.execute(customer_id, &paris()).await.unwrap());
        }
        out
    }
}
