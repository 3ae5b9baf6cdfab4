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
use super::categories::CategoryList;
use super::errors::{ApiError, ErrorBody};
use super::params::Params;
use super::payload::Payload;
use crate::application::use_cases::catalog::{
    CreateProduct, DeleteProduct, GetProduct, GetProductCategories, ListProducts, UpdateProduct,
};
use crate::application::validation::schemas;
use crate::bootstrap::app_context::AppContext;
use crate::domain::catalog::product::Product;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            description: p.description,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductData {
    pub data: ProductResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub data: Vec<ProductResponse>,
}

impl From<Vec<Product>> for ProductList {
    fn from(rows: Vec<Product>) -> Self {
        ProductList {
            data: rows.into_iter().map(ProductResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub name: String,
    pub description: String,
    /// Replaces the product's category links when present.
    pub categories: Option<Vec<i64>>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/:id/categories", get(product_categories))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/v1/products", tag = "Products", security(()), responses(
    (status = 200, body = ProductList)
))]
pub async fn list_products(State(ctx): State<AppContext>) -> Result<Json<ProductList>, ApiError> {
    let repo = ctx.product_repo();
    let uc = ListProducts {
        products: repo.as_ref(),
    };
    Ok(Json(uc.execute().await?.into()))
}

#[utoipa::path(get, path = "/api/v1/products/{id}", tag = "Products", security(()),
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, body = ProductData),
        (status = 404, body = ErrorBody)
    ))]
pub async fn get_product(
    State(ctx): State<AppContext>,
    Params(id): Params<i64>,
) -> Result<Json<ProductData>, ApiError> {
    let repo = ctx.product_repo();
    let uc = GetProduct {
        products: repo.as_ref(),
    };
    let product = uc.execute(id).await?;
    Ok(Json(ProductData {
        data: product.into(),
    }))
}

#[utoipa::path(get, path = "/api/v1/products/{id}/categories", tag = "Products", security(()),
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, body = CategoryList),
        (status = 404, body = ErrorBody)
    ))]
pub async fn product_categories(
    State(ctx): State<AppContext>,
    Params(id): Params<i64>,
) -> Result<Json<CategoryList>, ApiError> {
    let repo = ctx.product_repo();
    let uc = GetProductCategories {
        products: repo.as_ref(),
    };
    Ok(Json(uc.execute(id).await?.into()))
}

#[utoipa::path(post, path = "/api/v1/products", tag = "Products", request_body = ProductRequest, responses(
    (status = 201, body = ProductList),
    (status = 400, body = ErrorBody),
    (status = 403, body = ErrorBody)
))]
pub async fn create_product(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Payload(body): Payload,
) -> Result<(StatusCode, Json<ProductList>), ApiError> {
    require_admin(&ctx, bearer).await?;
    let fields = schemas::product_fields(&body)?;
    let products = ctx.product_repo();
    let categories = ctx.category_repo();
    let uc = CreateProduct {
        products: products.as_ref(),
        categories: categories.as_ref(),
    };
    let product = uc.execute(&fields).await?;
    tracing::info!(product_id = product.id, "product_created");
    Ok((StatusCode::CREATED, Json(vec![product].into())))
}

#[utoipa::path(put, path = "/api/v1/products/{id}", tag = "Products",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductRequest,
    responses(
        (status = 200, body = ProductList),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody)
    ))]
pub async fn update_product(
    State(ctx): State<AppContext>,
    Params(id): Params<i64>,
    bearer: Bearer,
    Payload(body): Payload,
) -> Result<Json<ProductList>, ApiError> {
    require_admin(&ctx, bearer).await?;
    let fields = schemas::product_fields(&body)?;
    let products = ctx.product_repo();
    let categories = ctx.category_repo();
    let uc = UpdateProduct {
        products: products.as_ref(),
        categories: categories.as_ref(),
    };
    let product = uc.execute(id, &fields).await?;
    Ok(Json(vec![product].into()))
}

#[utoipa::path(delete, path = "/api/v1/products/{id}", tag = "Products",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204),
        (status = 404, body = ErrorBody)
    ))]
pub async fn delete_product(
    State(ctx): State<AppContext>,
    Params(id): Params<i64>,
    bearer: Bearer,
) -> Result<StatusCode, ApiError> {
    require_admin(&ctx, bearer).await?;
    let repo = ctx.product_repo();
    let uc = DeleteProduct {
        products: repo.as_ref(),
    };
    uc.execute(id).await?;
    tracing::info!(product_id = id, "product_deleted");
    Ok(StatusCode::NO_CONTENT)
}
