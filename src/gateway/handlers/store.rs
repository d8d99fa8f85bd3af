use axum::extract::State;

use crate::contracts::types::{Driver, Stock};
use crate::gateway::state::AppState;
use crate::gateway::types::{ok, ApiResult};

/// GET /stock — current warehouse stock (read-only, no auth requirement
/// beyond what the router-level middleware already applies).
#[utoipa::path(get, path = "/stock", responses((status = 200, description = "Warehouse stock snapshot")))]
pub async fn get_stock(State(state): State<AppState>) -> ApiResult<Vec<Stock>> {
    let stock = state.fulfilment.get_warehouse_stock().await?;
    ok(stock)
}

/// GET /drivers — currently available drivers.
#[utoipa::path(get, path = "/drivers", responses((status = 200, description = "Available drivers")))]
pub async fn get_available_drivers(State(state): State<AppState>) -> ApiResult<Vec<Driver>> {
    let drivers = state.fulfilment.get_available_drivers().await?;
    ok(drivers)
}
