use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::auth::{Bearer, UserResponse, require_admin};
use super::errors::{ApiError, ErrorBody};
use super::params::Params;
use super::payload::Payload;
use crate::application::use_cases::customers::{
    CreateCustomer, DeleteCustomer, GetCustomer, ListCustomers, UpdateCustomer,
};
use crate::application::validation::schemas;
use crate::bootstrap::app_context::AppContext;
use crate::domain::customers::customer::{Customer, CustomerAccount};

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        CustomerResponse {
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            user_id: c.user_id,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// A user with its customer profile nested under `customer`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerAccountResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub customer: CustomerResponse,
}

impl From<CustomerAccount> for CustomerAccountResponse {
    fn from(a: CustomerAccount) -> Self {
        CustomerAccountResponse {
            user: a.user.into(),
            customer: a.customer.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerList {
    pub data: Vec<CustomerAccountResponse>,
}

impl From<Vec<CustomerAccount>> for CustomerList {
    fn from(rows: Vec<CustomerAccount>) -> Self {
        CustomerList {
            data: rows.into_iter().map(CustomerAccountResponse::from).collect(),
        }
    }
}

#[derive(Debug, serde::Deserialize, ToSchema)]
pub struct CustomerRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

pub fn routes(ctx: AppContext) -> Router {
    // `:id` is the user id.
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/:id",
            get(get_customer)
                .put(update_customer)
                .delete(delete_customer),
        )
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/v1/customers", tag = "Customers", request_body = CustomerRequest, security(()), responses(
    (status = 201, body = CustomerList),
    (status = 400, body = ErrorBody)
))]
pub async fn create_customer(
    State(ctx): State<AppContext>,
    Payload(body): Payload,
) -> Result<(StatusCode, Json<CustomerList>), ApiError> {
    let input = schemas::customer_input(&body)?;
    let users = ctx.user_repo();
    let customers = ctx.customer_repo();
    let uc = CreateCustomer {
        users: users.as_ref(),
        customers: customers.as_ref(),
    };
    let account = uc.execute(&input).await?;
    Ok((StatusCode::CREATED, Json(vec![account].into())))
}

#[utoipa::path(get, path = "/api/v1/customers", tag = "Customers", responses(
    (status = 200, body = CustomerList),
    (status = 401, body = ErrorBody),
    (status = 403, body = ErrorBody)
))]
pub async fn list_customers(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<Json<CustomerList>, ApiError> {
    require_admin(&ctx, bearer).await?;
    let customers = ctx.customer_repo();
    let uc = ListCustomers {
        customers: customers.as_ref(),
    };
    Ok(Json(uc.execute().await?.into()))
}

#[utoipa::path(get, path = "/api/v1/customers/{id}", tag = "Customers",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, body = CustomerList),
        (status = 404, body = ErrorBody)
    ))]
pub async fn get_customer(
    State(ctx): State<AppContext>,
    Params(user_id): Params<i64>,
    bearer: Bearer,
) -> Result<Json<CustomerList>, ApiError> {
    require_admin(&ctx, bearer).await?;
    let customers = ctx.customer_repo();
    let uc = GetCustomer {
        customers: customers.as_ref(),
    };
    let account = uc.execute(user_id).await?;
    Ok(Json(vec![account].into()))
}

#[utoipa::path(put, path = "/api/v1/customers/{id}", tag = "Customers",
    params(("id" = i64, Path, description = "User id")),
    request_body = CustomerRequest,
    responses(
        (status = 200, body = CustomerList),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody)
    ))]
pub async fn update_customer(
    State(ctx): State<AppContext>,
    Params(user_id): Params<i64>,
    bearer: Bearer,
    Payload(body): Payload,
) -> Result<Json<CustomerList>, ApiError> {
    require_admin(&ctx, bearer).await?;
    let users = ctx.user_repo();
    let customers = ctx.customer_repo();
    // Unknown ids answer 404 whatever the body.
    GetCustomer {
        customers: customers.as_ref(),
    }
    .execute(user_id)
    .await?;
    let input = schemas::customer_input(&body)?;
    let uc = UpdateCustomer {
        users: users.as_ref(),
        customers: customers.as_ref(),
    };
    let account = uc.execute(user_id, &input).await?;
    tracing::info!(user_id, "customer_updated");
    Ok(Json(vec![account].into()))
}

#[utoipa::path(delete, path = "/api/v1/customers/{id}", tag = "Customers",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204),
        (status = 404, body = ErrorBody)
    ))]
pub async fn delete_customer(
    State(ctx): State<AppContext>,
    Params(user_id): Params<i64>,
    bearer: Bearer,
) -> Result<StatusCode, ApiError> {
    require_admin(&ctx, bearer).await?;
    let users = ctx.user_repo();
    let customers = ctx.customer_repo();
    let uc = DeleteCustomer {
        users: users.as_ref(),
        customers: customers.as_ref(),
    };
    uc.execute(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
