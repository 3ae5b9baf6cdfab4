//! Uniform error envelope for every handler.
//!
//! Failures render as `{"errors": [{"code", "field"?, "message"}]}`; the one
//! exception is a failed login, which answers `{"message": ...}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::access::AccessError;
use crate::application::use_cases::addresses::AddressError;
use crate::application::use_cases::auth::AuthError;
use crate::application::use_cases::catalog::CatalogError;
use crate::application::use_cases::customers::CustomerError;
use crate::application::use_cases::settings::SettingError;
use crate::application::validation::{FieldError, ValidationErrors};
use crate::domain::addresses::policy::PolicyViolation;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorItem {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// Same list as `Validation`, answered with 422.
    #[error("unprocessable: {0}")]
    Unprocessable(ValidationErrors),
    #[error("invalid json: {0}")]
    InvalidJson(String),
    #[error("invalid path parameter: {0}")]
    InvalidParam(String),
    #[error("Invalid data")]
    InvalidData,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("You can not delete your default address")]
    DefaultAddress,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

fn item(code: &str, field: Option<&str>, message: impl Into<String>) -> ErrorItem {
    ErrorItem {
        code: code.to_string(),
        field: field.map(str::to_string),
        message: message.into(),
    }
}

impl From<FieldError> for ErrorItem {
    fn from(e: FieldError) -> Self {
        ErrorItem {
            code: e.code,
            field: e.field,
            message: e.message,
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidJson(_)
            | Self::InvalidParam(_)
            | Self::InvalidData
            | Self::DefaultAddress
            | Self::Store(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn items(self) -> Vec<ErrorItem> {
        match self {
            Self::Validation(errors) | Self::Unprocessable(errors) => {
                errors.0.into_iter().map(ErrorItem::from).collect()
            }
            Self::InvalidJson(detail) => vec![item("invalid_json", None, detail)],
            Self::InvalidParam(detail) => vec![item("invalid_param", None, detail)],
            Self::InvalidData => vec![item("invalid_data", None, "Invalid data")],
            Self::Unauthorized => vec![item("unauthorized", None, "Unauthorized")],
            Self::Forbidden => vec![item("forbidden", None, "Forbidden")],
            Self::NotFound(message) => vec![item("not_found", None, message)],
            Self::DefaultAddress => vec![item(
                "default_address",
                Some("id_default"),
                PolicyViolation::DefaultAddressProtected.to_string(),
            )],
            Self::InvalidCredentials => Vec::new(),
            // Store details stay in the logs.
            Self::Store(_) => vec![item(
                "store_failure",
                None,
                "The request could not be processed",
            )],
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Store(e) = &self {
            tracing::error!(error = ?e, "store_failure");
        }
        let status = self.status();
        if matches!(self, Self::InvalidCredentials) {
            let body = MessageBody {
                message: self.to_string(),
            };
            return (status, Json(body)).into_response();
        }
        (status, Json(ErrorBody { errors: self.items() })).into_response()
    }
}

impl From<AccessError> for ApiError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::Unauthorized => Self::Unauthorized,
            AccessError::Forbidden => Self::Forbidden,
            AccessError::Store(e) => Self::Store(e),
        }
    }
}

impl From<AddressError> for ApiError {
    fn from(e: AddressError) -> Self {
        match e {
            AddressError::NotFound => Self::NotFound("Address not found"),
            AddressError::NotOwned => Self::Unauthorized,
            AddressError::Policy(PolicyViolation::DefaultAddressProtected) => Self::DefaultAddress,
            AddressError::Store(e) => Self::Store(e),
        }
    }
}

impl From<CustomerError> for ApiError {
    fn from(e: CustomerError) -> Self {
        match e {
            CustomerError::Validation(errors) => Self::Validation(errors),
            CustomerError::NotFound => Self::NotFound("Customer not found"),
            CustomerError::Store(e) => Self::Store(e),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Validation(errors) => Self::Validation(errors),
            CatalogError::ProductNotFound => Self::NotFound("Product not found"),
            CatalogError::CategoryNotFound => Self::NotFound("Category not found"),
            CatalogError::Store(e) => Self::Store(e),
        }
    }
}

impl From<SettingError> for ApiError {
    fn from(e: SettingError) -> Self {
        match e {
            SettingError::Validation(errors) => Self::Validation(errors),
            SettingError::NotFound => Self::NotFound("Setting not found"),
            SettingError::Store(e) => Self::Store(e),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(errors) => Self::Validation(errors),
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::Store(e) => Self::Store(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn default_address_carries_its_field() {
        let (status, body) = body_of(ApiError::DefaultAddress).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({"errors": [{
                "code": "default_address",
                "field": "id_default",
                "message": "You can not delete your default address"
            }]})
        );
    }

    #[tokio::test]
    async fn store_failures_hide_their_cause() {
        let (status, body) = body_of(ApiError::Store(anyhow::anyhow!("connection reset"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "store_failure");
        assert!(!body.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn unauthorized_omits_the_field_key() {
        let (status, body) = body_of(AddressError::NotOwned.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["errors"][0].get("field").is_none());
        assert_eq!(body["errors"][0]["code"], "unauthorized");
    }
}
