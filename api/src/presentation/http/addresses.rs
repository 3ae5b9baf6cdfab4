use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::auth::{Bearer, validate_bearer};
use super::errors::{ApiError, ErrorBody};
use super::params::Params;
use super::payload::Payload;
use crate::application::access;
use crate::application::use_cases::addresses::create_address::CreateAddress;
use crate::application::use_cases::addresses::delete_address::DeleteAddress;
use crate::application::use_cases::addresses::get_address::GetAddress;
use crate::application::use_cases::addresses::list_addresses::ListAddresses;
use crate::application::use_cases::addresses::update_address::UpdateAddress;
use crate::application::validation::schemas;
use crate::bootstrap::app_context::AppContext;
use crate::domain::addresses::address::Address;
use crate::domain::customers::customer::Customer;

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressResponse {
    pub id: i64,
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    /// Whether this is the customer's default address.
    pub id_default: bool,
    pub customer_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Address> for AddressResponse {
    fn from(a: Address) -> Self {
        AddressResponse {
            id: a.id,
            street1: a.street1,
            street2: a.street2,
            city: a.city,
            zip: a.zip,
            country: a.country,
            id_default: a.is_default,
            customer_id: a.customer_id,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressList {
    pub data: Vec<AddressResponse>,
}

impl From<Vec<Address>> for AddressList {
    fn from(rows: Vec<Address>) -> Self {
        AddressList {
            data: rows.into_iter().map(AddressResponse::from).collect(),
        }
    }
}

#[derive(Debug, serde::Deserialize, ToSchema)]
pub struct AddressRequest {
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
}

pub fn routes(ctx: AppContext) -> Router {
    // `:id` is the customer id; customers.rs shares the segment.
    Router::new()
        .route(
            "/customers/:id/addresses",
            get(list_addresses).post(create_address),
        )
        .route(
            "/customers/:id/addresses/:address_id",
            get(get_address).put(update_address).delete(delete_address),
        )
        .with_state(ctx)
}

async fn owning_customer(
    ctx: &AppContext,
    user_id: i64,
    customer_id: i64,
) -> Result<Customer, ApiError> {
    let users = ctx.user_repo();
    let customers = ctx.customer_repo();
    Ok(access::resolve_customer(users.as_ref(), customers.as_ref(), user_id, customer_id).await?)
}

#[utoipa::path(get, path = "/api/v1/customers/{customerId}/addresses", tag = "Addresses",
    params(("customerId" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, body = AddressList),
        (status = 401, body = ErrorBody)
    ))]
pub async fn list_addresses(
    State(ctx): State<AppContext>,
    Params(customer_id): Params<i64>,
    bearer: Bearer,
) -> Result<Json<AddressList>, ApiError> {
    let user_id = validate_bearer(&ctx.cfg, bearer)?;
    let customer = owning_customer(&ctx, user_id, customer_id).await?;
    let repo = ctx.address_repo();
    let uc = ListAddresses {
        repo: repo.as_ref(),
    };
    let rows = uc.execute(customer.id).await?;
    Ok(Json(rows.into()))
}

#[utoipa::path(get, path = "/api/v1/customers/{customerId}/addresses/{addressId}", tag = "Addresses",
    params(
        ("customerId" = i64, Path, description = "Customer id"),
        ("addressId" = i64, Path, description = "Address id")
    ),
    responses(
        (status = 200, body = AddressList),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    ))]
pub async fn get_address(
    State(ctx): State<AppContext>,
    Params((customer_id, address_id)): Params<(i64, i64)>,
    bearer: Bearer,
) -> Result<Json<AddressList>, ApiError> {
    let user_id = validate_bearer(&ctx.cfg, bearer)?;
    let customer = owning_customer(&ctx, user_id, customer_id).await?;
    let repo = ctx.address_repo();
    let uc = GetAddress {
        repo: repo.as_ref(),
    };
    let address = uc.execute(customer.id, address_id).await?;
    Ok(Json(vec![address].into()))
}

#[utoipa::path(post, path = "/api/v1/customers/{customerId}/addresses", tag = "Addresses",
    params(("customerId" = i64, Path, description = "Customer id")),
    request_body = AddressRequest,
    responses(
        (status = 201, body = AddressList),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody)
    ))]
pub async fn create_address(
    State(ctx): State<AppContext>,
    Params(customer_id): Params<i64>,
    bearer: Bearer,
    Payload(body): Payload,
) -> Result<(StatusCode, Json<AddressList>), ApiError> {
    let user_id = validate_bearer(&ctx.cfg, bearer)?;
    let fields = schemas::address_fields(&body)?;
    let customer = owning_customer(&ctx, user_id, customer_id).await?;
    let repo = ctx.address_repo();
    let uc = CreateAddress {
        repo: repo.as_ref(),
        mode: ctx.address_write_mode(),
    };
    let address = uc.execute(customer.id, &fields).await?;
    Ok((StatusCode::CREATED, Json(vec![address].into())))
}

#[utoipa::path(put, path = "/api/v1/customers/{customerId}/addresses/{addressId}", tag = "Addresses",
    params(
        ("customerId" = i64, Path, description = "Customer id"),
        ("addressId" = i64, Path, description = "Address id")
    ),
    request_body = AddressRequest,
    responses(
        (status = 200, description = "Every address of the customer; the target is now the default", body = AddressList),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    ))]
pub async fn update_address(
    State(ctx): State<AppContext>,
    Params((customer_id, address_id)): Params<(i64, i64)>,
    bearer: Bearer,
    Payload(body): Payload,
) -> Result<Json<AddressList>, ApiError> {
    let user_id = validate_bearer(&ctx.cfg, bearer)?;
    let fields = schemas::address_fields(&body)?;
    let customer = owning_customer(&ctx, user_id, customer_id).await?;
    let repo = ctx.address_repo();
    let uc = UpdateAddress {
        repo: repo.as_ref(),
        mode: ctx.address_write_mode(),
    };
    let rows = uc.execute(customer.id, address_id, &fields).await?;
    Ok(Json(rows.into()))
}

#[utoipa::path(delete, path = "/api/v1/customers/{customerId}/addresses/{addressId}", tag = "Addresses",
    params(
        ("customerId" = i64, Path, description = "Customer id"),
        ("addressId" = i64, Path, description = "Address id")
    ),
    responses(
        (status = 204),
        (status = 400, description = "Default address", body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    ))]
pub async fn delete_address(
    State(ctx): State<AppContext>,
    Params((customer_id, address_id)): Params<(i64, i64)>,
    bearer: Bearer,
) -> Result<StatusCode, ApiError> {
    let user_id = validate_bearer(&ctx.cfg, bearer)?;
    let customer = owning_customer(&ctx, user_id, customer_id).await?;
    let repo = ctx.address_repo();
    let uc = DeleteAddress {
        repo: repo.as_ref(),
        mode: ctx.address_write_mode(),
    };
    uc.execute(customer.id, address_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
