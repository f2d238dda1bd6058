//! HTTP surface over the relay.

pub mod dtos;
pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    app_state::AppState,
    health,
    relay::{RelayedResult, SearchRelayResponse},
    resolver::{OutcomeKind, ResolutionOutcome},
};

#[derive(OpenApi)]
#[openapi(
    paths(health::health_check, handlers::search, handlers::resolve),
    components(schemas(
        dtos::ErrorResponse,
        dtos::ResolveRequest,
        SearchRelayResponse,
        RelayedResult,
        ResolutionOutcome,
        OutcomeKind,
        health::HealthResponse
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "relay", description = "Search and soft-redirect resolution")
    )
)]
pub struct ApiDoc;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/v1/search", get(handlers::search))
        .route("/v1/resolve", post(handlers::resolve))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
