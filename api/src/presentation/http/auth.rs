use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::{StatusCode, request::Parts},
    routing::{get, post},
};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::{ApiError, ErrorBody, MessageBody};
use super::payload::Payload;
use crate::application::access;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::me::GetMe;
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::application::validation::schemas;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::users::user::{Role, User};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// `customer` (default) or `admin`
    pub role: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub role: String,
    pub role_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            email: u.email,
            role: u.role.as_str().to_string(),
            role_id: u.role_id,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenCredentials {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub credentials: TokenCredentials,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/v1/register", tag = "Auth", request_body = RegisterRequest, security(()), responses(
    (status = 201, body = UserResponse),
    (status = 400, body = ErrorBody)
))]
pub async fn register(
    State(ctx): State<AppContext>,
    Payload(body): Payload,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let input = schemas::register_input(&body)?;
    let role = input
        .role
        .as_deref()
        .and_then(Role::parse)
        .unwrap_or(Role::Customer);
    let repo = ctx.user_repo();
    let uc = RegisterUc {
        repo: repo.as_ref(),
    };
    let dto = RegisterDto {
        email: input.email,
        password: input.password,
        role,
    };
    let user = uc.execute(&dto).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(post, path = "/api/v1/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, body = LoginResponse),
    (status = 401, body = MessageBody),
    (status = 422, body = ErrorBody)
))]
pub async fn login(
    State(ctx): State<AppContext>,
    Payload(body): Payload,
) -> Result<Json<LoginResponse>, ApiError> {
    let input = schemas::credentials(&body).map_err(ApiError::Unprocessable)?;
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        email: input.email,
        password: input.password,
    };
    let user = uc.execute(&dto).await?;
    let (token, expires_at) = issue_token(&ctx.cfg, user.id)?;
    tracing::info!(user_id = user.id, "user_logged_in");
    Ok(Json(LoginResponse {
        credentials: TokenCredentials {
            kind: "bearer",
            token,
            expires_at,
        },
        user: user.into(),
    }))
}

#[utoipa::path(get, path = "/api/v1/me", tag = "Auth", responses(
    (status = 200, body = UserResponse),
    (status = 401, body = ErrorBody)
))]
pub async fn me(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = validate_bearer(&ctx.cfg, bearer)?;
    let repo = ctx.user_repo();
    let uc = GetMe {
        repo: repo.as_ref(),
    };
    let user = uc.execute(user_id).await?.ok_or(ApiError::Unauthorized)?;
    Ok(Json(user.into()))
}

// --- Bearer extractor & JWT utils ---

pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|auth| auth.strip_prefix("Bearer "))
            .map(|t| Bearer(t.trim().to_string()))
            .ok_or(ApiError::Unauthorized)
    }
}

/// Id of the user the token was issued to.
pub(crate) fn validate_bearer(cfg: &Config, bearer: Bearer) -> Result<i64, ApiError> {
    let data = jsonwebtoken::decode::<Claims>(
        &bearer.0,
        &DecodingKey::from_secret(cfg.jwt_secret_pem.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthorized)?;
    data.claims.sub.parse().map_err(|_| ApiError::Unauthorized)
}

pub(crate) fn issue_token(cfg: &Config, user_id: i64) -> anyhow::Result<(String, DateTime<Utc>)> {
    let ttl = TimeDelta::try_seconds(cfg.jwt_expires_secs)
        .ok_or_else(|| anyhow::anyhow!("token lifetime out of range"))?;
    let expires_at = Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| anyhow::anyhow!("token expiry out of range"))?;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: expires_at.timestamp().max(0) as usize,
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret_pem.as_bytes()),
    )?;
    Ok((token, expires_at))
}

/// Validates the bearer and requires the `admin` role.
pub(crate) async fn require_admin(ctx: &AppContext, bearer: Bearer) -> Result<User, ApiError> {
    let user_id = validate_bearer(&ctx.cfg, bearer)?;
    let users = ctx.user_repo();
    Ok(access::require_admin(users.as_ref(), user_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::from_lookup(|_| None).unwrap()
    }

    #[test]
    fn issued_tokens_validate_to_their_user() {
        let cfg = config();
        let (token, expires_at) = issue_token(&cfg, 42).unwrap();
        assert!(expires_at > Utc::now());
        assert_eq!(validate_bearer(&cfg, Bearer(token)).unwrap(), 42);
    }

    #[test]
    fn oversized_lifetime_is_an_error_not_a_panic() {
        let mut cfg = config();
        cfg.jwt_expires_secs = i64::MAX / 10;
        assert!(issue_token(&cfg, 1).is_err());
    }
}
