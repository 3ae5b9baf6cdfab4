use async_trait::async_trait;

use crate::domain::settings::setting::Setting;

#[async_trait]
pub trait SettingRepository: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Setting>>;
    async fn find(&self, key: &str) -> anyhow::Result<Option<Setting>>;
    async fn create(&self, key: &str, value: &str) -> anyhow::Result<Setting>;
    async fn update(&self, key: &str, value: &str) -> anyhow::Result<Option<Setting>>;
    async fn delete(&self, key: &str) -> anyhow::Result<bool>;
}
