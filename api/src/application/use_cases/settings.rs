use crate::application::ports::UniqueViolation;
use crate::application::ports::setting_repository::SettingRepository;
use crate::application::validation::ValidationErrors;
use crate::application::validation::schemas::SettingInput;
use crate::domain::settings::setting::Setting;

#[derive(Debug, thiserror::Error)]
pub enum SettingError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("Setting not found")]
    NotFound,
    #[error(transparent)]
    Store(anyhow::Error),
}

impl From<anyhow::Error> for SettingError {
    fn from(e: anyhow::Error) -> Self {
        match UniqueViolation::field_of(&e) {
            Some(field) => Self::Validation(ValidationErrors::single("unique", field)),
            None => Self::Store(e),
        }
    }
}

pub struct ListSettings<'a, R: SettingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: SettingRepository + ?Sized> ListSettings<'a, R> {
    pub async fn execute(&self) -> anyhow::Result<Vec<Setting>> {
        self.repo.list().await
    }
}

pub struct GetSetting<'a, R: SettingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: SettingRepository + ?Sized> GetSetting<'a, R> {
    pub async fn execute(&self, key: &str) -> Result<Setting, SettingError> {
        self.repo.find(key).await?.ok_or(SettingError::NotFound)
    }
}

pub struct CreateSetting<'a, R: SettingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: SettingRepository + ?Sized> CreateSetting<'a, R> {
    pub async fn execute(&self, input: &SettingInput) -> Result<Setting, SettingError> {
        if self.repo.find(&input.key).await?.is_some() {
            return Err(ValidationErrors::single("unique", "key").into());
        }
        Ok(self.repo.create(&input.key, &input.value).await?)
    }
}

pub struct UpdateSetting<'a, R: SettingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: SettingRepository + ?Sized> UpdateSetting<'a, R> {
    pub async fn execute(&self, input: &SettingInput) -> Result<Setting, SettingError> {
        self.repo
            .update(&input.key, &input.value)
            .await?
            .ok_or(SettingError::NotFound)
    }
}

pub struct DeleteSetting<'a, R: SettingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: SettingRepository + ?Sized> DeleteSetting<'a, R> {
    pub async fn execute(&self, key: &str) -> Result<(), SettingError> {
        if self.repo.delete(key).await? {
            Ok(())
        } else {
            Err(SettingError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryDatabase;

    fn input(key: &str, value: &str) -> SettingInput {
        SettingInput {
            key: key.into(),
            value: value.into(),
        }
    }

    #[tokio::test]
    async fn keys_are_unique() {
        let db = MemoryDatabase::new();
        let uc = CreateSetting { repo: &db };
        uc.execute(&input("currency", "EUR")).await.unwrap();
        assert!(matches!(
            uc.execute(&input("currency", "USD")).await,
            Err(SettingError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_insert_past_the_lookup_reads_as_unique() {
        let db = MemoryDatabase::new();
        db.create("currency", "EUR").await.unwrap();
        let err: SettingError = db.create("currency", "USD").await.unwrap_err().into();
        match err {
            SettingError::Validation(errors) => {
                assert_eq!(errors, ValidationErrors::single("unique", "key"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_and_delete_by_key() {
        let db = MemoryDatabase::new();
        CreateSetting { repo: &db }
            .execute(&input("currency", "EUR"))
            .await
            .unwrap();
        let updated = UpdateSetting { repo: &db }
            .execute(&input("currency", "USD"))
            .await
            .unwrap();
        assert_eq!(updated.value, "USD");
        assert!(matches!(
            UpdateSetting { repo: &db }.execute(&input("missing", "x")).await,
            Err(SettingError::NotFound)
        ));

        DeleteSetting { repo: &db }.execute("currency").await.unwrap();
        assert!(matches!(
            GetSetting { repo: &db }.execute("currency").await,
            Err(SettingError::NotFound)
        ));
        assert!(ListSettings { repo: &db }.execute().await.unwrap().is_empty());
    }
}
