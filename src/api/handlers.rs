use crate::api::AppState;
use crate::auth::Identity;
use crate::error::Result;
use crate::metrics::gather_metrics;
use crate::search::{
    AutocompleteRequest, AutocompleteResponse, ContractSearchRequest, ContractSearchResponse,
    SearchAllRequest, SearchAllResponse, UserSearchRequest, UserSearchResponse,
    VendorSearchRequest, VendorSearchResponse,
};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Prometheus text exposition
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        gather_metrics(),
    )
}

/// Unified search across contracts, vendors and users
pub async fn search_all(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SearchAllRequest>,
) -> Result<Json<SearchAllResponse>> {
    let identity = Identity::from_headers(&headers);
    let response = state.search.search_all(identity.as_ref(), request).await?;
    Ok(Json(response))
}

/// Contract search with filters, sort and pagination
pub async fn search_contracts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ContractSearchRequest>,
) -> Result<Json<ContractSearchResponse>> {
    let identity = Identity::from_headers(&headers);
    let response = state
        .search
        .search_contracts_with_advanced_filters(identity.as_ref(), request)
        .await?;
    Ok(Json(response))
}

/// Vendor search with contract aggregates
pub async fn search_vendors(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<VendorSearchRequest>,
) -> Result<Json<VendorSearchResponse>> {
    let identity = Identity::from_headers(&headers);
    let response = state
        .search
        .search_vendors_with_filters(identity.as_ref(), request)
        .await?;
    Ok(Json(response))
}

/// User directory search
pub async fn search_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UserSearchRequest>,
) -> Result<Json<UserSearchResponse>> {
    let identity = Identity::from_headers(&headers);
    let response = state
        .search
        .search_users_within_enterprise(identity.as_ref(), request)
        .await?;
    Ok(Json(response))
}

/// Suggestions for a partial query: `?query=ac&type=vendors&limit=5`
pub async fn autocomplete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(request): Query<AutocompleteRequest>,
) -> Result<Json<AutocompleteResponse>> {
    let identity = Identity::from_headers(&headers);
    let response = state.search.autocomplete(identity.as_ref(), request).await?;
    Ok(Json(response))
}
