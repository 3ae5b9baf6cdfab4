pub mod login;
pub mod me;
pub mod register;

use crate::application::ports::UniqueViolation;
use crate::application::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Store(anyhow::Error),
}

impl From<anyhow::Error> for AuthError {
    fn from(e: anyhow::Error) -> Self {
        match UniqueViolation::field_of(&e) {
            Some(field) => Self::Validation(ValidationErrors::single("unique", field)),
            None => Self::Store(e),
        }
    }
}
