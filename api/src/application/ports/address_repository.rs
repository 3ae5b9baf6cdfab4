use async_trait::async_trait;

use crate::domain::addresses::address::{Address, AddressFields};

/// How a session persists its writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressWriteMode {
    /// One transaction per session, holding a lock on the customer row.
    #[default]
    Atomic,
    /// Every statement commits on its own.
    Sequential,
}

impl AddressWriteMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" | "transactional" => Some(Self::Atomic),
            "sequential" => Some(Self::Sequential),
            _ => None,
        }
    }
}

/// Address store scoped to a single customer.
///
/// Sessions opened in `Atomic` mode discard their writes unless `commit`
/// is called; `Sequential` sessions have nothing left to commit.
#[async_trait]
pub trait AddressSession: Send {
    /// All addresses of the customer, in insertion order.
    async fn list(&mut self) -> anyhow::Result<Vec<Address>>;
    async fn find(&mut self, address_id: i64) -> anyhow::Result<Option<Address>>;
    async fn find_default(&mut self) -> anyhow::Result<Option<Address>>;
    async fn insert(&mut self, fields: &AddressFields, is_default: bool)
    -> anyhow::Result<Address>;
    async fn save(&mut self, address: &Address) -> anyhow::Result<Address>;
    /// Hard delete.
    async fn delete(&mut self, address_id: i64) -> anyhow::Result<bool>;
    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn open(
        &self,
        customer_id: i64,
        mode: AddressWriteMode,
    ) -> anyhow::Result<Box<dyn AddressSession>>;

    /// Owning customer of an address, whoever that is.
    async fn owner_of(&self, address_id: i64) -> anyhow::Result<Option<i64>>;
}
