use crate::application::ports::address_repository::{AddressRepository, AddressWriteMode};
use crate::domain::addresses::address::{Address, AddressFields};
use crate::domain::addresses::policy::DefaultAddressPolicy;

pub struct CreateAddress<'a, R: AddressRepository + ?Sized> {
    pub repo: &'a R,
    pub mode: AddressWriteMode,
}

impl<'a, R: AddressRepository + ?Sized> CreateAddress<'a, R> {
    /// The customer's first address becomes its default.
    pub async fn execute(
        &self,
        customer_id: i64,
        fields: &AddressFields,
    ) -> anyhow::Result<Address> {
        let mut session = self.repo.open(customer_id, self.mode).await?;
        let current = session.find_default().await?;
        let is_default = DefaultAddressPolicy::flag_for_new(current.as_ref());
        let address = session.insert(fields, is_default).await?;
        session.commit().await?;
        tracing::debug!(
            customer_id,
            address_id = address.id,
            is_default,
            "address_created"
        );
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::addresses::list_addresses::ListAddresses;
    use crate::application::use_cases::addresses::tests::paris;
    use crate::infrastructure::memory::MemoryDatabase;

    #[tokio::test]
    async fn only_the_first_address_is_default() {
        for mode in [AddressWriteMode::Atomic, AddressWriteMode::Sequential] {
            let db = MemoryDatabase::new();
            let uc = CreateAddress { repo: &db, mode };
            let first = uc.execute(7, &paris()).await.unwrap();
            let second = uc.execute(7, &paris()).await.unwrap();
            assert!(first.is_default);
            assert!(!second.is_default);
            assert_eq!(second.customer_id, 7);

            let all = ListAddresses { repo: &db }.execute(7).await.unwrap();
            assert!(DefaultAddressPolicy::holds(&all));
        }
    }

    #[tokio::test]
    async fn defaults_are_tracked_per_customer() {
        let db = MemoryDatabase::new();
        let uc = CreateAddress {
            repo: &db,
            mode: AddressWriteMode::Atomic,
        };
        uc.execute(1, &paris()).await.unwrap();
        let other = uc.execute(2, &paris()).await.unwrap();
        assert!(other.is_default);
    }

    #[tokio::test]
    async fn concurrent_atomic_creates_keep_a_single_default() {
        let db = MemoryDatabase::new();
        let mut tasks = Vec::new();
        for _ in 0..8 {
            let db = db.clone();
            tasks.push(tokio::spawn(async move {
                CreateAddress {
                    repo: &db,
                    mode: AddressWriteMode::Atomic,
                }
                .execute(3, &paris())
                .await
                .unwrap()
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        let all = ListAddresses { repo: &db }.execute(3).await.unwrap();
        assert_eq!(all.len(), 8);
        assert!(DefaultAddressPolicy::holds(&all));
    }
}
