use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::OwnedMutexGuard;

use super::{MemoryDatabase, next};
use crate::application::ports::address_repository::{
    AddressRepository, AddressSession, AddressWriteMode,
};
use crate::domain::addresses::address::{Address, AddressFields};

struct Staged {
    _guard: OwnedMutexGuard<()>,
    rows: Vec<Address>,
}

/// Sequential sessions write straight into the shared state; atomic ones
/// work on a private copy of the customer's rows and publish it on commit.
pub struct MemoryAddressSession {
    db: MemoryDatabase,
    customer_id: i64,
    staged: Option<Staged>,
}

impl MemoryAddressSession {
    fn with_rows<T>(&mut self, f: impl FnOnce(&mut Vec<Address>) -> T) -> T {
        match &mut self.staged {
            Some(staged) => f(&mut staged.rows),
            None => f(&mut self.db.state().addresses),
        }
    }
}

#[async_trait]
impl AddressSession for MemoryAddressSession {
    async fn list(&mut self) -> anyhow::Result<Vec<Address>> {
        let customer_id = self.customer_id;
        Ok(self.with_rows(|rows| {
            rows.iter()
                .filter(|a| a.customer_id == customer_id)
                .cloned()
                .collect()
        }))
    }

    async fn find(&mut self, address_id: i64) -> anyhow::Result<Option<Address>> {
        let customer_id = self.customer_id;
        Ok(self.with_rows(|rows| {
            rows.iter()
                .find(|a| a.customer_id == customer_id && a.id == address_id)
                .cloned()
        }))
    }

    async fn find_default(&mut self) -> anyhow::Result<Option<Address>> {
        let customer_id = self.customer_id;
        Ok(self.with_rows(|rows| {
            rows.iter()
                .find(|a| a.customer_id == customer_id && a.is_default)
                .cloned()
        }))
    }

    async fn insert(
        &mut self,
        fields: &AddressFields,
        is_default: bool,
    ) -> anyhow::Result<Address> {
        let id = next(&mut self.db.state().seq.addresses);
        let now = Utc::now();
        let address = Address {
            id,
            street1: fields.street1.clone(),
            street2: fields.street2.clone(),
            city: fields.city.clone(),
            zip: fields.zip.clone(),
            country: fields.country.clone(),
            is_default,
            customer_id: self.customer_id,
            created_at: now,
            updated_at: now,
        };
        self.with_rows(|rows| rows.push(address.clone()));
        Ok(address)
    }

    async fn save(&mut self, address: &Address) -> anyhow::Result<Address> {
        let customer_id = self.customer_id;
        self.with_rows(|rows| {
            let row = rows
                .iter_mut()
                .find(|a| a.customer_id == customer_id && a.id == address.id)
                .ok_or_else(|| anyhow::anyhow!("address {} not found", address.id))?;
            *row = Address {
                updated_at: Utc::now(),
                ..address.clone()
            };
            Ok(row.clone())
        })
    }

    async fn delete(&mut self, address_id: i64) -> anyhow::Result<bool> {
        let customer_id = self.customer_id;
        Ok(self.with_rows(|rows| {
            let before = rows.len();
            rows.retain(|a| !(a.customer_id == customer_id && a.id == address_id));
            rows.len() != before
        }))
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        let MemoryAddressSession {
            db,
            customer_id,
            staged,
        } = *self;
        if let Some(staged) = staged {
            let mut state = db.state();
            state.addresses.retain(|a| a.customer_id != customer_id);
            state.addresses.extend(staged.rows);
            state.addresses.sort_by_key(|a| a.id);
        }
        Ok(())
    }
}

#[async_trait]
impl AddressRepository for MemoryDatabase {
    async fn open(
        &self,
        customer_id: i64,
        mode: AddressWriteMode,
    ) -> anyhow::Result<Box<dyn AddressSession>> {
        let staged = match mode {
            AddressWriteMode::Sequential => None,
            AddressWriteMode::Atomic => {
                let guard = self.address_lock(customer_id).lock_owned().await;
                let rows = self
                    .state()
                    .addresses
                    .iter()
                    .filter(|a| a.customer_id == customer_id)
                    .cloned()
                    .collect();
                Some(Staged {
                    _guard: guard,
                    rows,
                })
            }
        };
        Ok(Box::new(MemoryAddressSession {
            db: self.clone(),
            customer_id,
            staged,
        }))
    }

    async fn owner_of(&self, address_id: i64) -> anyhow::Result<Option<i64>> {
        Ok(self
            .state()
            .addresses
            .iter()
            .find(|a| a.id == address_id)
            .map(|a| a.customer_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(street: &str) -> AddressFields {
        AddressFields {
            street1: street.into(),
            street2: None,
            city: "Paris".into(),
            zip: "75000".into(),
            country: "France".into(),
        }
    }

    #[tokio::test]
    async fn atomic_session_discards_writes_without_commit() {
        let db = MemoryDatabase::new();
        {
            let mut session = db.open(1, AddressWriteMode::Atomic).await.unwrap();
            session.insert(&fields("a"), true).await.unwrap();
        }
        let mut session = db.open(1, AddressWriteMode::Sequential).await.unwrap();
        assert!(session.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn atomic_session_publishes_on_commit() {
        let db = MemoryDatabase::new();
        let mut session = db.open(1, AddressWriteMode::Atomic).await.unwrap();
        let first = session.insert(&fields("a"), true).await.unwrap();
        session.commit().await.unwrap();

        assert_eq!(db.owner_of(first.id).await.unwrap(), Some(1));
        let mut reader = db.open(1, AddressWriteMode::Sequential).await.unwrap();
        assert_eq!(reader.list().await.unwrap(), vec![first]);
    }

    #[tokio::test]
    async fn atomic_sessions_only_wait_for_the_same_customer() {
        use std::time::Duration;
        use tokio::time::timeout;

        let db = MemoryDatabase::new();
        let held = db.open(1, AddressWriteMode::Atomic).await.unwrap();

        let other = timeout(Duration::from_secs(1), db.open(2, AddressWriteMode::Atomic)).await;
        assert!(other.is_ok(), "customer 2 waited on customer 1's lock");

        let same = timeout(
            Duration::from_millis(50),
            db.open(1, AddressWriteMode::Atomic),
        )
        .await;
        assert!(same.is_err(), "customer 1 opened a second atomic session");

        drop(held);
        let reopened = timeout(Duration::from_secs(1), db.open(1, AddressWriteMode::Atomic)).await;
        assert!(reopened.is_ok());
    }

    #[tokio::test]
    async fn sessions_are_scoped_to_their_customer() {
        let db = MemoryDatabase::new();
        let mut one = db.open(1, AddressWriteMode::Sequential).await.unwrap();
        let mine = one.insert(&fields("mine"), true).await.unwrap();
        let mut two = db.open(2, AddressWriteMode::Sequential).await.unwrap();
        two.insert(&fields("theirs"), true).await.unwrap();

        assert!(two.find(mine.id).await.unwrap().is_none());
        assert!(!two.delete(mine.id).await.unwrap());
        assert_eq!(one.list().await.unwrap().len(), 1);
        assert_eq!(db.owner_of(mine.id).await.unwrap(), Some(1));
    }
}
