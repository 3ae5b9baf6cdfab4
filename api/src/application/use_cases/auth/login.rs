use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

use super::AuthError;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::user::User;

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    /// Unknown, soft-deleted and passwordless users all fail the same way.
    pub async fn execute(&self, req: &LoginRequest) -> Result<User, AuthError> {
        let user = match self.repo.find_by_email(&req.email).await? {
            Some(u) if u.is_active() => u,
            _ => return Err(AuthError::InvalidCredentials),
        };
        let Some(hash) = user.password_hash.as_deref() else {
            return Err(AuthError::InvalidCredentials);
        };
        let parsed = PasswordHash::new(hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        if Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed)
            .is_ok()
        {
            Ok(user)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::auth::register::{Register, RegisterRequest};
    use crate::domain::users::user::Role;
    use crate::infrastructure::memory::MemoryDatabase;

    async fn registered(db: &MemoryDatabase) -> User {
        Register { repo: db }
            .execute(&RegisterRequest {
                email: "admin@domain.tld".into(),
                password: "s3cret".into(),
                role: Role::Admin,
            })
            .await
            .unwrap()
    }

    fn login(password: &str) -> LoginRequest {
        LoginRequest {
            email: "admin@domain.tld".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn correct_password_logs_in() {
        let db = MemoryDatabase::new();
        let user = registered(&db).await;
        assert_ne!(user.password_hash.as_deref(), Some("s3cret"));
        let logged = Login { repo: &db }.execute(&login("s3cret")).await.unwrap();
        assert_eq!(logged.id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_and_deleted_users_are_rejected() {
        let db = MemoryDatabase::new();
        let user = registered(&db).await;
        assert!(matches!(
            Login { repo: &db }.execute(&login("nope")).await,
            Err(AuthError::InvalidCredentials)
        ));
        db.soft_delete(user.id).await.unwrap();
        assert!(matches!(
            Login { repo: &db }.execute(&login("s3cret")).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn email_is_unique_on_register() {
        let db = MemoryDatabase::new();
        registered(&db).await;
        let again = Register { repo: &db }
            .execute(&RegisterRequest {
                email: "admin@domain.tld".into(),
                password: "other".into(),
                role: Role::Customer,
            })
            .await;
        assert!(matches!(again, Err(AuthError::Validation(_))));
    }
}
