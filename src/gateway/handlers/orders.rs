use axum::extract::{Path, State};
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::AuthenticatedUser;
use crate::contracts::types::{AssignDriverResult, Order, RequestedItem};
use crate::gateway::state::AppState;
use crate::gateway::types::{ok, ApiError, ApiResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub delivery_address: String,
    pub items: Vec<RequestedItemDto>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RequestedItemDto {
    pub product_name: String,
    pub quantity: i32,
}

impl From<RequestedItemDto> for RequestedItem {
    fn from(dto: RequestedItemDto) -> Self {
        RequestedItem {
            product_name: dto.product_name,
            quantity: dto.quantity,
        }
    }
}

/// POST /orders — UC-1 Create Order.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses((status = 200, description = "Order created"))
)]
pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateOrderRequest>,
) -> ApiResult<Order> {
    if req.items.is_empty() {
        return Err(ApiError::bad_request("order must contain at least one item"));
    }
    let items: Vec<RequestedItem> = req.items.into_iter().map(Into::into).collect();
    let order = state
        .fulfilment
        .create_order(user.user_id, &req.delivery_address, &items)
        .await?;
    ok(order)
}

/// GET /orders — list the caller's orders.
#[utoipa::path(get, path = "/orders", responses((status = 200, description = "Orders for the caller")))]
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<Order>> {
    let orders = state.fulfilment.get_orders_by_user(user.user_id).await?;
    ok(orders)
}

/// GET /orders/:order_id
#[utoipa::path(get, path = "/orders/{order_id}", responses((status = 200, description = "Order details")))]
pub async fn get_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(order_id): Path<i64>,
) -> ApiResult<Order> {
    let order = state
        .fulfilment
        .get_order_details(user.user_id, order_id)
        .await?;
    ok(order)
}

/// GET /orders/:order_id/status
#[utoipa::path(get, path = "/orders/{order_id}/status", responses((status = 200, description = "Order status")))]
pub async fn check_order_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(order_id): Path<i64>,
) -> ApiResult<Order> {
    let order = state
        .fulfilment
        .check_order_status(user.user_id, order_id)
        .await?;
    ok(order)
}

/// POST /orders/:order_id/assign-driver — UC-2 Assign Driver.
#[utoipa::path(
    post,
    path = "/orders/{order_id}/assign-driver",
    responses((status = 200, description = "Assignment attempt result"))
)]
pub async fn assign_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(order_id): Path<i64>,
) -> ApiResult<AssignDriverResult> {
    let result = state
        .fulfilment
        .assign_driver(user.user_id, order_id)
        .await?;
    ok(result)
}

/// POST /orders/:order_id/complete — UC-3 Complete Delivery.
#[utoipa::path(
    post,
    path = "/orders/{order_id}/complete",
    responses((status = 200, description = "Order marked delivered"))
)]
pub async fn complete_delivery(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(order_id): Path<i64>,
) -> ApiResult<Order> {
    let order = state
        .fulfilment
        .complete_delivery(user.user_id, order_id)
        .await?;
    ok(order)
}
