use async_trait::async_trait;

use crate::domain::customers::customer::{Customer, CustomerAccount};

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Creates a passwordless `customer` user and its profile together.
    async fn create_account(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> anyhow::Result<CustomerAccount>;

    async fn find_by_user(&self, user_id: i64) -> anyhow::Result<Option<Customer>>;

    /// Active users holding the `customer` role, with their profiles.
    async fn list_accounts(&self) -> anyhow::Result<Vec<CustomerAccount>>;

    // Active users only
    async fn get_account(&self, user_id: i64) -> anyhow::Result<Option<CustomerAccount>>;

    async fn update_account(
        &self,
        user_id: i64,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> anyhow::Result<Option<CustomerAccount>>;
}
