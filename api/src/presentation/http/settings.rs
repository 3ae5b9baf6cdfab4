use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::auth::{Bearer, require_admin};
use super::errors::{ApiError, ErrorBody};
use super::params::Params;
use super::payload::Payload;
use crate::application::use_cases::settings::{
    CreateSetting, DeleteSetting, GetSetting, ListSettings, UpdateSetting,
};
use crate::application::validation::schemas;
use crate::bootstrap::app_context::AppContext;
use crate::domain::settings::setting::Setting;

#[derive(Debug, Serialize, ToSchema)]
pub struct SettingResponse {
    pub key: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Setting> for SettingResponse {
    fn from(s: Setting) -> Self {
        SettingResponse {
            key: s.key,
            value: s.value,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SettingList {
    pub data: Vec<SettingResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SettingRequest {
    pub key: String,
    pub value: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/settings",
            get(list_settings).post(create_setting).put(update_setting),
        )
        .route("/settings/:key", get(get_setting).delete(delete_setting))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/v1/settings", tag = "Settings", responses(
    (status = 200, body = SettingList),
    (status = 403, body = ErrorBody)
))]
pub async fn list_settings(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<Json<SettingList>, ApiError> {
    require_admin(&ctx, bearer).await?;
    let repo = ctx.setting_repo();
    let uc = ListSettings {
        repo: repo.as_ref(),
    };
    let rows = uc.execute().await?;
    Ok(Json(SettingList {
        data: rows.into_iter().map(SettingResponse::from).collect(),
    }))
}

#[utoipa::path(get, path = "/api/v1/settings/{key}", tag = "Settings",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 200, body = SettingResponse),
        (status = 404, body = ErrorBody)
    ))]
pub async fn get_setting(
    State(ctx): State<AppContext>,
    Params(key): Params<String>,
    bearer: Bearer,
) -> Result<Json<SettingResponse>, ApiError> {
    require_admin(&ctx, bearer).await?;
    let repo = ctx.setting_repo();
    let uc = GetSetting {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(&key).await?.into()))
}

#[utoipa::path(post, path = "/api/v1/settings", tag = "Settings", request_body = SettingRequest, responses(
    (status = 200, body = SettingResponse),
    (status = 400, body = ErrorBody)
))]
pub async fn create_setting(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Payload(body): Payload,
) -> Result<Json<SettingResponse>, ApiError> {
    require_admin(&ctx, bearer).await?;
    let input = schemas::setting_input(&body)?;
    let repo = ctx.setting_repo();
    let uc = CreateSetting {
        repo: repo.as_ref(),
    };
    let setting = uc.execute(&input).await?;
    tracing::info!(key = %setting.key, "setting_created");
    Ok(Json(setting.into()))
}

#[utoipa::path(put, path = "/api/v1/settings", tag = "Settings", request_body = SettingRequest, responses(
    (status = 200, body = SettingResponse),
    (status = 400, description = "Invalid data", body = ErrorBody),
    (status = 404, body = ErrorBody)
))]
pub async fn update_setting(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Payload(body): Payload,
) -> Result<Json<SettingResponse>, ApiError> {
    require_admin(&ctx, bearer).await?;
    let input = schemas::setting_input(&body).map_err(|_| ApiError::InvalidData)?;
    let repo = ctx.setting_repo();
    let uc = UpdateSetting {
        repo: repo.as_ref(),
    };
    let setting = uc.execute(&input).await?;
    tracing::info!(key = %setting.key, "setting_updated");
    Ok(Json(setting.into()))
}

#[utoipa::path(delete, path = "/api/v1/settings/{key}", tag = "Settings",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 204),
        (status = 404, body = ErrorBody)
    ))]
pub async fn delete_setting(
    State(ctx): State<AppContext>,
    Params(key): Params<String>,
    bearer: Bearer,
) -> Result<StatusCode, ApiError> {
    require_admin(&ctx, bearer).await?;
    let repo = ctx.setting_repo();
    let uc = DeleteSetting {
        repo: repo.as_ref(),
    };
    uc.execute(&key).await?;
    tracing::info!(%key, "setting_deleted");
    Ok(StatusCode::NO_CONTENT)
}
