use super::{AddressError, missing};
use crate::application::ports::address_repository::{AddressRepository, AddressWriteMode};
use crate::domain::addresses::policy::DefaultAddressPolicy;

pub struct DeleteAddress<'a, R: AddressRepository + ?Sized> {
    pub repo: &'a R,
    pub mode: AddressWriteMode,
}

impl<'a, R: AddressRepository + ?Sized> DeleteAddress<'a, R> {
    /// Existence is checked before the default protection, so an unknown id
    /// always reports `NotFound`.
    pub async fn execute(&self, customer_id: i64, address_id: i64) -> Result<(), AddressError> {
        let mut session = self.repo.open(customer_id, self.mode).await?;
        let Some(address) = session.find(address_id).await? else {
            drop(session);
            return Err(missing(self.repo, address_id).await);
        };
        DefaultAddressPolicy::check_delete(&address)?;
        session.delete(address.id).await?;
        session.commit().await?;
        tracing::debug!(customer_id, address_id, "address_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::addresses::get_address::GetAddress;
    use crate::application::use_cases::addresses::tests::seed;
    use crate::domain::addresses::policy::PolicyViolation;
    use crate::infrastructure::memory::MemoryDatabase;

    fn uc(db: &MemoryDatabase) -> DeleteAddress<'_, MemoryDatabase> {
        DeleteAddress {
            repo: db,
            mode: AddressWriteMode::Atomic,
        }
    }

    #[tokio::test]
    async fn default_address_is_protected() {
        let db = MemoryDatabase::new();
        let seeded = seed(&db, 1, 2).await;
        let res = uc(&db).execute(1, seeded[0].id).await;
        assert!(matches!(
            res,
            Err(AddressError::Policy(PolicyViolation::DefaultAddressProtected))
        ));
        assert!(GetAddress { repo: &db }.execute(1, seeded[0].id).await.is_ok());
    }

    #[tokio::test]
    async fn non_default_address_is_removed_for_good() {
        let db = MemoryDatabase::new();
        let seeded = seed(&db, 1, 2).await;
        uc(&db).execute(1, seeded[1].id).await.unwrap();
        assert!(matches!(
            GetAddress { repo: &db }.execute(1, seeded[1].id).await,
            Err(AddressError::NotFound)
        ));
        assert!(matches!(
            uc(&db).execute(1, seeded[1].id).await,
            Err(AddressError::NotFound)
        ));
    }

    #[tokio::test]
    async fn another_customers_address_is_not_owned() {
        let db = MemoryDatabase::new();
        seed(&db, 1, 1).await;
        let theirs = seed(&db, 2, 2).await;
        assert!(matches!(
            uc(&db).execute(1, theirs[1].id).await,
            Err(AddressError::NotOwned)
        ));
        assert!(GetAddress { repo: &db }.execute(2, theirs[1].id).await.is_ok());
    }
}
