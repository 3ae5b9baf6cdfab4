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
use crate::application::use_cases::catalog::{
    CreateCategory, DeleteCategory, GetCategory, ListCategories, UpdateCategory,
};
use crate::application::validation::schemas;
use crate::bootstrap::app_context::AppContext;
use crate::domain::catalog::category::Category;

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        CategoryResponse {
            id: c.id,
            name: c.name,
            description: c.description,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryData {
    pub data: CategoryResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub data: Vec<CategoryResponse>,
}

impl From<Vec<Category>> for CategoryList {
    fn from(rows: Vec<Category>) -> Self {
        CategoryList {
            data: rows.into_iter().map(CategoryResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub name: String,
    pub description: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/v1/categories", tag = "Categories", security(()), responses(
    (status = 200, body = CategoryList)
))]
pub async fn list_categories(
    State(ctx): State<AppContext>,
) -> Result<Json<CategoryList>, ApiError> {
    let repo = ctx.category_repo();
    let uc = ListCategories {
        categories: repo.as_ref(),
    };
    Ok(Json(uc.execute().await?.into()))
}

#[utoipa::path(get, path = "/api/v1/categories/{id}", tag = "Categories", security(()),
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, body = CategoryData),
        (status = 404, body = ErrorBody)
    ))]
pub async fn get_category(
    State(ctx): State<AppContext>,
    Params(id): Params<i64>,
) -> Result<Json<CategoryData>, ApiError> {
    let repo = ctx.category_repo();
    let uc = GetCategory {
        categories: repo.as_ref(),
    };
    Ok(Json(CategoryData {
        data: uc.execute(id).await?.into(),
    }))
}

#[utoipa::path(post, path = "/api/v1/categories", tag = "Categories", request_body = CategoryRequest, responses(
    (status = 201, body = CategoryList),
    (status = 400, body = ErrorBody),
    (status = 403, body = ErrorBody)
))]
pub async fn create_category(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Payload(body): Payload,
) -> Result<(StatusCode, Json<CategoryList>), ApiError> {
    require_admin(&ctx, bearer).await?;
    let fields = schemas::category_fields(&body)?;
    let repo = ctx.category_repo();
    let uc = CreateCategory {
        categories: repo.as_ref(),
    };
    let category = uc.execute(&fields).await?;
    Ok((StatusCode::CREATED, Json(vec![category].into())))
}

#[utoipa::path(put, path = "/api/v1/categories/{id}", tag = "Categories",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, body = CategoryList),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody)
    ))]
pub async fn update_category(
    State(ctx): State<AppContext>,
    Params(id): Params<i64>,
    bearer: Bearer,
    Payload(body): Payload,
) -> Result<Json<CategoryList>, ApiError> {
    require_admin(&ctx, bearer).await?;
    let fields = schemas::category_fields(&body)?;
    let repo = ctx.category_repo();
    let uc = UpdateCategory {
        categories: repo.as_ref(),
    };
    let category = uc.execute(id, &fields).await?;
    Ok(Json(vec![category].into()))
}

#[utoipa::path(delete, path = "/api/v1/categories/{id}", tag = "Categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 204),
        (status = 404, body = ErrorBody)
    ))]
pub async fn delete_category(
    State(ctx): State<AppContext>,
    Params(id): Params<i64>,
    bearer: Bearer,
) -> Result<StatusCode, ApiError> {
    require_admin(&ctx, bearer).await?;
    let repo = ctx.category_repo();
    let uc = DeleteCategory {
        categories: repo.as_ref(),
    };
    uc.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
