//! Saved card endpoints.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use meishi_core::error::MeishiError;
use meishi_core::traits::StoredCard;

use super::owner;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const DEFAULT_RECENT_LIMIT: usize = 10;

/// Response listing cards.
#[derive(Debug, Serialize)]
pub struct CardsResponse {
    pub results: Vec<StoredCard>,
}

/// Query parameters for recent cards.
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// Most recent cards of the caller.
/// GET /v1/cards
pub async fn recent_cards(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Json<CardsResponse>> {
    let owner = owner(&headers)?;
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let results = state.store.recent(&owner, limit).await?;
    Ok(Json(CardsResponse { results }))
}

/// Every card of the caller.
/// GET /v1/cards/all
pub async fn all_cards(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<CardsResponse>> {
    let owner = owner(&headers)?;
    let results = state.store.all(&owner).await?;
    Ok(Json(CardsResponse { results }))
}

/// Query parameters for card search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Cards whose name, company or email contains a keyword.
/// GET /v1/cards/search
pub async fn search_cards(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<CardsResponse>> {
    let owner = owner(&headers)?;
    let keyword = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::validation("Query parameter 'q' is required"))?;

    let results = state.store.search(&owner, keyword).await?;
    Ok(Json(CardsResponse { results }))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub id: String,
    pub deleted: bool,
}

/// Delete one of the caller's cards.
/// DELETE /v1/cards/:id
pub async fn delete_card(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let owner = owner(&headers)?;
    if !state.store.delete(&owner, &id).await? {
        return Err(MeishiError::not_found(id).into());
    }
    Ok(Json(DeleteResponse { id, deleted: true }))
}

#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub owner: String,
    pub scans: u64,
}

/// Number of scans the caller has made.
/// GET /v1/usage
pub async fn usage(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<UsageResponse>> {
    let owner = owner(&headers)?;
    let scans = state.store.usage(&owner).await?;
    Ok(Json(UsageResponse { owner, scans }))
}
