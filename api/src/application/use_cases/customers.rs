use crate::application::ports::UniqueViolation;
use crate::application::ports::customer_repository::CustomerRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::validation::ValidationErrors;
use crate::application::validation::schemas::CustomerInput;
use crate::domain::customers::customer::CustomerAccount;

#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("Customer not found")]
    NotFound,
    #[error(transparent)]
    Store(anyhow::Error),
}

impl From<anyhow::Error> for CustomerError {
    // A concurrent insert can still win after `ensure_email_free`.
    fn from(e: anyhow::Error) -> Self {
        match UniqueViolation::field_of(&e) {
            Some(field) => Self::Validation(ValidationErrors::single("unique", field)),
            None => Self::Store(e),
        }
    }
}

async fn ensure_email_free<U: UserRepository + ?Sized>(
    users: &U,
    email: &str,
    except: Option<i64>,
) -> Result<(), CustomerError> {
    if users.email_taken(email, except).await? {
        return Err(ValidationErrors::single("unique", "email").into());
    }
    Ok(())
}

pub struct CreateCustomer<'a, U, C>
where
    U: UserRepository + ?Sized,
    C: CustomerRepository + ?Sized,
{
    pub users: &'a U,
    pub customers: &'a C,
}

impl<'a, U, C> CreateCustomer<'a, U, C>
where
    U: UserRepository + ?Sized,
    C: CustomerRepository + ?Sized,
{
    pub async fn execute(&self, input: &CustomerInput) -> Result<CustomerAccount, CustomerError> {
        ensure_email_free(self.users, &input.email, None).await?;
        let account = self
            .customers
            .create_account(&input.email, &input.first_name, &input.last_name)
            .await?;
        tracing::info!(user_id = account.user.id, customer_id = account.customer.id, "customer_created");
        Ok(account)
    }
}

pub struct ListCustomers<'a, C: CustomerRepository + ?Sized> {
    pub customers: &'a C,
}

impl<'a, C: CustomerRepository + ?Sized> ListCustomers<'a, C> {
    pub async fn execute(&self) -> anyhow::Result<Vec<CustomerAccount>> {
        self.customers.list_accounts().await
    }
}

pub struct GetCustomer<'a, C: CustomerRepository + ?Sized> {
    pub customers: &'a C,
}

impl<'a, C: CustomerRepository + ?Sized> GetCustomer<'a, C> {
    pub async fn execute(&self, user_id: i64) -> Result<CustomerAccount, CustomerError> {
        self.customers
            .get_account(user_id)
            .await?
            .ok_or(CustomerError::NotFound)
    }
}

pub struct UpdateCustomer<'a, U, C>
where
    U: UserRepository + ?Sized,
    C: CustomerRepository + ?Sized,
{
    pub users: &'a U,
    pub customers: &'a C,
}

impl<'a, U, C> UpdateCustomer<'a, U, C>
where
    U: UserRepository + ?Sized,
    C: CustomerRepository + ?Sized,
{
    pub async fn execute(
        &self,
        user_id: i64,
        input: &CustomerInput,
    ) -> Result<CustomerAccount, CustomerError> {
        if self.customers.get_account(user_id).await?.is_none() {
            return Err(CustomerError::NotFound);
        }
        ensure_email_free(self.users, &input.email, Some(user_id)).await?;
        self.customers
            .update_account(user_id, &input.email, &input.first_name, &input.last_name)
            .await?
            .ok_or(CustomerError::NotFound)
    }
}

pub struct DeleteCustomer<'a, U, C>
where
    U: UserRepository + ?Sized,
    C: CustomerRepository + ?Sized,
{
    pub users: &'a U,
    pub customers: &'a C,
}

impl<'a, U, C> DeleteCustomer<'a, U, C>
where
    U: UserRepository + ?Sized,
    C: CustomerRepository + ?Sized,
{
    /// Soft delete: the user row stays, flagged with `deleted_at`.
    pub async fn execute(&self, user_id: i64) -> Result<(), CustomerError> {
        if self.customers.get_account(user_id).await?.is_none() {
            return Err(CustomerError::NotFound);
        }
        if !self.users.soft_delete(user_id).await? {
            return Err(CustomerError::NotFound);
        }
        tracing::info!(user_id, "customer_soft_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::domain::users::user::{Role, User};
    use crate::infrastructure::memory::MemoryDatabase;

    /// Reports every email as free, like a reader that ran before a
    /// concurrent insert committed.
    struct StaleUsers(MemoryDatabase);

    #[async_trait]
    impl UserRepository for StaleUsers {
        async fn create_user(
            &self,
            email: &str,
            password_hash: Option<&str>,
            role: Role,
        ) -> anyhow::Result<User> {
            self.0.create_user(email, password_hash, role).await
        }

        async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
            self.0.find_by_email(email).await
        }

        async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
            self.0.find_by_id(id).await
        }

        async fn email_taken(&self, _email: &str, _except: Option<i64>) -> anyhow::Result<bool> {
            Ok(false)
        }

        async fn soft_delete(&self, id: i64) -> anyhow::Result<bool> {
            self.0.soft_delete(id).await
        }
    }

    fn input(email: &str) -> CustomerInput {
        CustomerInput {
            email: email.into(),
            first_name: "Jeanne".into(),
            last_name: "Dupont".into(),
        }
    }

    #[tokio::test]
    async fn email_must_be_unique_on_create() {
        let db = MemoryDatabase::new();
        let uc = CreateCustomer {
            users: &db,
            customers: &db,
        };
        uc.execute(&input("jeanne@domain.tld")).await.unwrap();
        let err = uc.execute(&input("jeanne@domain.tld")).await.unwrap_err();
        match err {
            CustomerError::Validation(errors) => {
                assert_eq!(errors.0[0].code, "unique");
                assert_eq!(errors.0[0].field.as_deref(), Some("email"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn email_collision_at_insert_reads_as_unique() {
        let db = MemoryDatabase::new();
        let stale = StaleUsers(db.clone());
        let uc = CreateCustomer {
            users: &stale,
            customers: &db,
        };
        uc.execute(&input("jeanne@domain.tld")).await.unwrap();
        let err = uc.execute(&input("jeanne@domain.tld")).await.unwrap_err();
        match err {
            CustomerError::Validation(errors) => {
                assert_eq!(errors, ValidationErrors::single("unique", "email"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_may_keep_its_own_email() {
        let db = MemoryDatabase::new();
        let created = CreateCustomer {
            users: &db,
            customers: &db,
        }
        .execute(&input("jeanne@domain.tld"))
        .await
        .unwrap();
        let mut changed = input("jeanne@domain.tld");
        changed.last_name = "Martin".into();
        let updated = UpdateCustomer {
            users: &db,
            customers: &db,
        }
        .execute(created.user.id, &changed)
        .await
        .unwrap();
        assert_eq!(updated.customer.last_name, "Martin");
        assert_eq!(updated.customer.id, created.customer.id);
    }

    #[tokio::test]
    async fn deleted_customers_disappear() {
        let db = MemoryDatabase::new();
        let created = CreateCustomer {
            users: &db,
            customers: &db,
        }
        .execute(&input("gone@domain.tld"))
        .await
        .unwrap();
        let delete = DeleteCustomer {
            users: &db,
            customers: &db,
        };
        delete.execute(created.user.id).await.unwrap();

        assert!(matches!(
            GetCustomer { customers: &db }.execute(created.user.id).await,
            Err(CustomerError::NotFound)
        ));
        assert!(ListCustomers { customers: &db }.execute().await.unwrap().is_empty());
        assert!(matches!(
            delete.execute(created.user.id).await,
            Err(CustomerError::NotFound)
        ));
        // The row is kept.
        let user = db.find_by_id(created.user.id).await.unwrap().unwrap();
        assert!(user.deleted_at.is_some());
    }
}
