use crate::application::ports::address_repository::{AddressRepository, AddressWriteMode};
use crate::domain::addresses::address::Address;

pub struct ListAddresses<'a, R: AddressRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: AddressRepository + ?Sized> ListAddresses<'a, R> {
    pub async fn execute(&self, customer_id: i64) -> anyhow::Result<Vec<Address>> {
        // Read-only, no lock needed.
        let mut session = self
            .repo
            .open(customer_id, AddressWriteMode::Sequential)
            .await?;
        session.list().await
    }
}
