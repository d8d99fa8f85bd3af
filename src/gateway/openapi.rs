//! OpenAPI / Swagger UI documentation.
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fulfilment Core API",
        version = "0.1.0",
        description = "Order-fulfilment orchestration gateway: orders, deliveries, warehouse stock and driver dispatch."
    ),
    paths(
        crate::gateway::handlers::orders::create_order,
        crate::gateway::handlers::orders::list_orders,
        crate::gateway::handlers::orders::get_order,
        crate::gateway::handlers::orders::check_order_status,
        crate::gateway::handlers::orders::assign_driver,
        crate::gateway::handlers::orders::complete_delivery,
        crate::gateway::handlers::deliveries::list_deliveries,
        crate::gateway::handlers::store::get_stock,
        crate::gateway::handlers::store::get_available_drivers,
    ),
    components(schemas(
        crate::gateway::handlers::orders::CreateOrderRequest,
        crate::gateway::handlers::orders::RequestedItemDto,
    )),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;
