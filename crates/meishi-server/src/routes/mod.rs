//! Route definitions for the REST API.

mod cards;
mod health;
mod scan;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderMap,
    routing::{delete, get, post},
    Router,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Header carrying the identifier of the calling user.
pub const OWNER_HEADER: &str = "x-user-id";

/// Owner of the request, taken from the `X-User-Id` header.
pub(crate) fn owner(headers: &HeaderMap) -> ApiResult<String> {
    headers
        .get(OWNER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request("Missing X-User-Id header"))
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.settings.max_upload_bytes;

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Scanning
        .route("/v1/scan", post(scan::scan_card))
        // Saved cards
        .route("/v1/cards", get(cards::recent_cards))
        .route("/v1/cards/all", get(cards::all_cards))
        .route("/v1/cards/search", get(cards::search_cards))
        .route("/v1/cards/:id", delete(cards::delete_card))
        // Usage
        .route("/v1/usage", get(cards::usage))
        .layer(DefaultBodyLimit::max(body_limit))
        // Attach state
        .with_state(state)
}

pub use cards::*;
pub use health::*;
pub use scan::*;
