use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{
    api::dtos::{ErrorResponse, ResolveRequest, SearchParams},
    app_state::AppState,
    relay::SearchRelayResponse,
    resolver::ResolutionOutcome,
    search::SearchError,
};

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

fn search_error_response(err: SearchError) -> Response {
    warn!(error = %err, "search failed");
    match err {
        SearchError::InvalidQuery { reason } => error_response(StatusCode::BAD_REQUEST, reason),
        SearchError::RateLimited { retry_after_secs } => {
            let mut response = error_response(StatusCode::TOO_MANY_REQUESTS, "Search provider rate limited");
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after_secs));
            response
        }
        SearchError::NoApiKey { .. } => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, "Search provider not configured")
        }
        SearchError::Timeout { .. } => {
            error_response(StatusCode::GATEWAY_TIMEOUT, "Search provider timed out")
        }
        SearchError::ApiError { .. } | SearchError::Client(_) => {
            error_response(StatusCode::BAD_GATEWAY, "Search provider error")
        }
    }
}

#[utoipa::path(
    get,
    path = "/v1/search",
    tag = "relay",
    params(SearchParams),
    responses(
        (status = 200, description = "Results with resolved content, in provider order", body = SearchRelayResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 429, description = "Provider rate limited", body = ErrorResponse),
        (status = 502, description = "Provider error", body = ErrorResponse),
        (status = 503, description = "Provider not configured", body = ErrorResponse),
        (status = 504, description = "Provider timed out", body = ErrorResponse)
    )
)]
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    if let Err(error) = params.validate() {
        return error_response(StatusCode::BAD_REQUEST, error);
    }

    match state
        .relay
        .search(&params.q, params.limit, params.max_content_length)
        .await
    {
        Ok(response) => Json(response).into_response(),
        Err(err) => search_error_response(err),
    }
}

#[utoipa::path(
    post,
    path = "/v1/resolve",
    tag = "relay",
    request_body = ResolveRequest,
    responses(
        (status = 200, description = "Resolution outcome; failures are reported as sentinel content", body = ResolutionOutcome),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn resolve(State(state): State<AppState>, Json(payload): Json<ResolveRequest>) -> Response {
    if let Err(error) = payload.validate() {
        return error_response(StatusCode::BAD_REQUEST, error);
    }

    let outcome = state
        .relay
        .resolve_one(payload.url.trim(), payload.max_content_length)
        .await;
    Json(outcome).into_response()
}
