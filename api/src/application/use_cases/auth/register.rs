use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use password_hash::rand_core::OsRng;

use super::AuthError;
use crate::application::ports::user_repository::UserRepository;
use crate::application::validation::ValidationErrors;
use crate::domain::users::user::{Role, User};

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string())
}

pub struct Register<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl<'a, R: UserRepository + ?Sized> Register<'a, R> {
    pub async fn execute(&self, req: &RegisterRequest) -> Result<User, AuthError> {
        if self.repo.email_taken(&req.email, None).await? {
            return Err(ValidationErrors::single("unique", "email").into());
        }
        let hash = hash_password(&req.password)?;
        let user = self
            .repo
            .create_user(&req.email, Some(&hash), req.role)
            .await?;
        tracing::info!(user_id = user.id, role = user.role.as_str(), "user_registered");
        Ok(user)
    }
}
