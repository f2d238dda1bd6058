use axum::{Json, extract::State};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::app_state::AppState;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: String,
    search_provider: String,
    search_available: bool,
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let search_available = state.relay.provider_available();
    debug!(search_available, "health check");
    Json(HealthResponse {
        status: "OK".to_string(),
        search_provider: state.relay.provider_name().to_string(),
        search_available,
    })
}
