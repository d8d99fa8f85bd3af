use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::BearerAuthenticator;
use crate::fulfilment::FulfilmentOrchestrator;

/// Shared gateway state: the orchestrator handlers call into, and the
/// authenticator the JWT middleware verifies bearer tokens against.
#[derive(Clone)]
pub struct AppState {
    pub fulfilment: Arc<FulfilmentOrchestrator>,
    pub authenticator: Arc<dyn BearerAuthenticator>,
}

impl FromRef<AppState> for Arc<dyn BearerAuthenticator> {
    fn from_ref(state: &AppState) -> Self {
        state.authenticator.clone()
    }
}
