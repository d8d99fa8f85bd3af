//! HTTP gateway: binds the Fulfilment Orchestrator behind an axum router.

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::auth_middleware;
use openapi::ApiDoc;
use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/stock", get(handlers::store::get_stock))
        .route("/drivers", get(handlers::store::get_available_drivers));

    let private_routes = Router::new()
        .route(
            "/orders",
            post(handlers::orders::create_order).get(handlers::orders::list_orders),
        )
        .route("/orders/{order_id}", get(handlers::orders::get_order))
        .route(
            "/orders/{order_id}/status",
            get(handlers::orders::check_order_status),
        )
        .route(
            "/orders/{order_id}/assign-driver",
            post(handlers::orders::assign_driver),
        )
        .route(
            "/orders/{order_id}/complete",
            post(handlers::orders::complete_delivery),
        )
        .route("/deliveries", get(handlers::deliveries::list_deliveries))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(private_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

/// Starts the HTTP gateway and blocks until the listener is closed.
pub async fn run_server(http_addr: &str, state: AppState) -> std::io::Result<()> {
    let app = build_router(state);
    let listener = TcpListener::bind(http_addr).await?;
    tracing::info!(addr = http_addr, "fulfilment gateway listening");
    axum::serve(listener, app).await
}
