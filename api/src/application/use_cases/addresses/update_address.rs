use super::{AddressError, missing};
use crate::application::ports::address_repository::{AddressRepository, AddressWriteMode};
use crate::domain::addresses::address::{Address, AddressFields};
use crate::domain::addresses::policy::DefaultAddressPolicy;

pub struct UpdateAddress<'a, R: AddressRepository + ?Sized> {
    pub repo: &'a R,
    pub mode: AddressWriteMode,
}

impl<'a, R: AddressRepository + ?Sized> UpdateAddress<'a, R> {
    /// Rewrites the target and makes it the customer's default. Returns the
    /// customer's whole address set as persisted.
    pub async fn execute(
        &self,
        customer_id: i64,
        address_id: i64,
        fields: &AddressFields,
    ) -> Result<Vec<Address>, AddressError> {
        let mut session = self.repo.open(customer_id, self.mode).await?;
        let mut addresses = session.list().await?;
        if !DefaultAddressPolicy::promote(&mut addresses, address_id, fields) {
            drop(session);
            return Err(missing(self.repo, address_id).await);
        }
        for address in addresses.iter_mut() {
            *address = session.save(address).await?;
        }
        session.commit().await?;
        tracing::debug!(customer_id, address_id, "address_promoted");
        Ok(addresses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::addresses::list_addresses::ListAddresses;
    use crate::application::use_cases::addresses::tests::{paris, seed};
    use crate::infrastructure::memory::MemoryDatabase;

    fn lyon() -> AddressFields {
        AddressFields {
            street1: "place Bellecour".into(),
            street2: Some("bat. B".into()),
            city: "Lyon".into(),
            zip: "69002".into(),
            country: "France".into(),
        }
    }

    #[tokio::test]
    async fn update_moves_the_default_flag() {
        for mode in [AddressWriteMode::Atomic, AddressWriteMode::Sequential] {
            let db = MemoryDatabase::new();
            let seeded = seed(&db, 1, 2).await;
            let (d1, d2) = (&seeded[0], &seeded[1]);

            let updated = UpdateAddress { repo: &db, mode }
                .execute(1, d2.id, &lyon())
                .await
                .unwrap();
            assert_eq!(updated.len(), 2);
            assert_eq!(updated[0].id, d1.id);
            assert!(!updated[0].is_default);
            assert!(updated[1].is_default);
            assert_eq!(updated[1].city, "Lyon");
            assert_eq!(updated[1].street2.as_deref(), Some("bat. B"));

            let stored = ListAddresses { repo: &db }.execute(1).await.unwrap();
            assert_eq!(stored, updated);
        }
    }

    #[tokio::test]
    async fn updating_the_current_default_keeps_it() {
        let db = MemoryDatabase::new();
        let seeded = seed(&db, 1, 1).await;
        let updated = UpdateAddress {
            repo: &db,
            mode: AddressWriteMode::Atomic,
        }
        .execute(1, seeded[0].id, &paris())
        .await
        .unwrap();
        assert!(updated[0].is_default);
    }

    #[tokio::test]
    async fn foreign_target_changes_nothing() {
        let db = MemoryDatabase::new();
        let mine = seed(&db, 1, 2).await;
        let theirs = seed(&db, 2, 1).await;
        let uc = UpdateAddress {
            repo: &db,
            mode: AddressWriteMode::Atomic,
        };

        let res = uc.execute(1, theirs[0].id, &lyon()).await;
        assert!(matches!(res, Err(AddressError::NotOwned)));
        let res = uc.execute(1, 404, &lyon()).await;
        assert!(matches!(res, Err(AddressError::NotFound)));

        assert_eq!(ListAddresses { repo: &db }.execute(1).await.unwrap(), mine);
        assert_eq!(ListAddresses { repo: &db }.execute(2).await.unwrap(), theirs);
    }
}
