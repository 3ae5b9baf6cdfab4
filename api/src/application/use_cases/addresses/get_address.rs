use super::{AddressError, missing};
use crate::application::ports::address_repository::{AddressRepository, AddressWriteMode};
use crate::domain::addresses::address::Address;

pub struct GetAddress<'a, R: AddressRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: AddressRepository + ?Sized> GetAddress<'a, R> {
    pub async fn execute(&self, customer_id: i64, address_id: i64) -> Result<Address, AddressError> {
        let mut session = self
            .repo
            .open(customer_id, AddressWriteMode::Sequential)
            .await?;
        match session.find(address_id).await? {
            Some(address) => Ok(address),
            None => Err(missing(self.repo, address_id).await),
        }
    }
}
