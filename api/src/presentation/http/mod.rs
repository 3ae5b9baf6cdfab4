pub mod addresses;
pub mod auth;
pub mod categories;
pub mod customers;
pub mod errors;
pub mod health;
pub mod params;
pub mod payload;
pub mod products;
pub mod settings;


use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::bootstrap::app_context::AppContext;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        auth::me,
        customers::create_customer,
        customers::list_customers,
        customers::get_customer,
        customers::update_customer,
        customers::delete_customer,
        addresses::list_addresses,
        addresses::get_address,
        addresses::create_address,
        addresses::update_address,
        addresses::delete_address,
        products::list_products,
        products::get_product,
        products::product_categories,
        products::create_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        settings::list_settings,
        settings::get_setting,
        settings::create_setting,
        settings::update_setting,
        settings::delete_setting,
        health::health,
    ),
    components(schemas(
        errors::ErrorItem,
        errors::ErrorBody,
        errors::MessageBody,
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::LoginResponse,
        auth::TokenCredentials,
        auth::UserResponse,
        customers::CustomerRequest,
        customers::CustomerResponse,
        customers::CustomerAccountResponse,
        customers::CustomerList,
        addresses::AddressRequest,
        addresses::AddressResponse,
        addresses::AddressList,
        products::ProductRequest,
        products::ProductResponse,
        products::ProductData,
        products::ProductList,
        categories::CategoryRequest,
        categories::CategoryResponse,
        categories::CategoryData,
        categories::CategoryList,
        settings::SettingRequest,
        settings::SettingResponse,
        settings::SettingList,
        health::HealthResp,
    )),
    tags(
        (name = "Auth", description = "Authentication"),
        (name = "Customers", description = "Customer accounts"),
        (name = "Addresses", description = "Customer addresses and the default address"),
        (name = "Products", description = "Catalog products"),
        (name = "Categories", description = "Catalog categories"),
        (name = "Settings", description = "Key/value settings"),
        (name = "Health", description = "System health checks")
    )
)]
pub struct ApiDoc;

/// Every HTTP route of the service, without the transport layers added in `main`.
pub fn router(ctx: AppContext) -> Router {
    let v1 = Router::new()
        .merge(auth::routes(ctx.clone()))
        .merge(customers::routes(ctx.clone()))
        .merge(addresses::routes(ctx.clone()))
        .merge(products::routes(ctx.clone()))
        .merge(categories::routes(ctx.clone()))
        .merge(settings::routes(ctx.clone()));

    Router::new()
        .nest("/api/v1", v1)
        .nest("/api", health::routes(ctx))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
}
