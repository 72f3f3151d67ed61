use crate::error::{MockError, MockResult};
use crate::state::AppState;
use crate::store::{ZoneQuery, ZoneSelector};
use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use serde::Deserialize;
use shared::{Zone, ZoneDraft, ZonePagedQueryResponse, ZoneUpdate};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    limit: Option<u32>,
    offset: Option<u32>,
    #[serde(rename = "where")]
    predicate: Option<String>,
    sort: Option<String>,
    with_total: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParams {
    version: Option<i64>,
    #[serde(default)]
    data_erasure: bool,
}

/// POST /{projectKey}/zones
async fn create_zone(
    State(state): State<Arc<AppState>>,
    Path(project_key): Path<String>,
    Json(draft): Json<ZoneDraft>,
) -> MockResult<(StatusCode, Json<Zone>)> {
    let zone = state.store.create(&project_key, draft).await?;
    Ok((StatusCode::CREATED, Json(zone)))
}

/// GET /{projectKey}/zones
async fn query_zones(
    State(state): State<Arc<AppState>>,
    Path(project_key): Path<String>,
    Query(params): Query<QueryParams>,
) -> MockResult<Json<ZonePagedQueryResponse>> {
    let query = ZoneQuery {
        limit: params.limit,
        offset: params.offset,
        predicate: params.predicate,
        sort: params.sort,
        with_total: params.with_total,
    };
    Ok(Json(state.store.query(&project_key, &query).await?))
}

/// GET /{projectKey}/zones/{ID} and /{projectKey}/zones/key={key}
async fn get_zone(
    State(state): State<Arc<AppState>>,
    Path((project_key, selector)): Path<(String, String)>,
) -> MockResult<Json<Zone>> {
    let selector = ZoneSelector::parse(&selector);
    Ok(Json(state.store.get(&project_key, &selector).await?))
}

/// POST /{projectKey}/zones/{ID} — apply update actions
async fn update_zone(
    State(state): State<Arc<AppState>>,
    Path((project_key, selector)): Path<(String, String)>,
    Json(update): Json<ZoneUpdate>,
) -> MockResult<Json<Zone>> {
    let selector = ZoneSelector::parse(&selector);
    Ok(Json(state.store.update(&project_key, &selector, update).await?))
}

/// DELETE /{projectKey}/zones/{ID}?version=N
async fn delete_zone(
    State(state): State<Arc<AppState>>,
    Path((project_key, selector)): Path<(String, String)>,
    Query(params): Query<DeleteParams>,
) -> MockResult<Json<Zone>> {
    let version = params.version.ok_or_else(|| {
        MockError::invalid_operation("Missing required query parameter 'version'.")
    })?;
    if params.data_erasure {
        tracing::debug!(selector = %selector, "dataErasure requested");
    }

    let selector = ZoneSelector::parse(&selector);
    Ok(Json(
        state.store.delete(&project_key, &selector, version).await?,
    ))
}

/// Check the Bearer token (only when one is configured)
fn verify_token(state: &AppState, headers: &HeaderMap) -> bool {
    let Some(expected) = &state.token else {
        return true;
    };

    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected)
}

async fn require_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, MockError> {
    if !verify_token(&state, request.headers()) {
        tracing::warn!(uri = %request.uri(), "Rejected request without valid token");
        return Err(MockError::unauthorized());
    }
    Ok(next.run(request).await)
}

pub fn router(state: Arc<AppState>) -> Router {
    use tower::limit::ConcurrencyLimitLayer;

    // At most 100 in-flight requests
    let concurrency_limit = ConcurrencyLimitLayer::new(100);

    Router::new()
        .route("/{project_key}/zones", get(query_zones).post(create_zone))
        .route(
            "/{project_key}/zones/{selector}",
            get(get_zone).post(update_zone).delete(delete_zone),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token))
        .layer(concurrency_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
