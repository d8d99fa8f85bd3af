use axum::extract::State;
use axum::Extension;

use crate::auth::AuthenticatedUser;
use crate::contracts::types::Order;
use crate::gateway::state::AppState;
use crate::gateway::types::{ok, ApiResult};

/// GET /deliveries — orders currently in_progress or delivered for the caller.
#[utoipa::path(get, path = "/deliveries", responses((status = 200, description = "Deliveries for the caller")))]
pub async fn list_deliveries(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<Order>> {
    let deliveries = state.fulfilment.get_deliveries(user.user_id).await?;
    ok(deliveries)
}
