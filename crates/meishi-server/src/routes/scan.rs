//! Photo scanning endpoint.

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde::Serialize;
use tracing::{info, warn};

use meishi_core::traits::StoredCard;
use meishi_core::types::ScanOutcome;

use super::owner;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Response for a scan.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    /// Machine-readable outcome (`cards`, `no_text_detected`, ...).
    pub status: String,
    /// Human-readable summary.
    pub message: String,
    /// Cards saved by this scan.
    pub cards: Vec<StoredCard>,
}

fn outcome_message(outcome: &ScanOutcome) -> String {
    match outcome {
        ScanOutcome::Cards { records } => format!("Registered {} card(s)", records.len()),
        ScanOutcome::NoTextDetected => "No text was detected in the photo".to_string(),
        ScanOutcome::NoClustersAccepted { .. } => {
            "Text was found but no business card could be located".to_string()
        }
        ScanOutcome::NoUsableFields { .. } => {
            "Cards were found but no name, company or email could be read".to_string()
        }
    }
}

/// Scan a photo and save every card found.
/// POST /v1/scan
pub async fn scan_card(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<ScanResponse>> {
    let owner = owner(&headers)?;

    let scan = state.pipeline.scan(&body);
    let outcome = match state.settings.scan_timeout {
        Some(limit) => tokio::time::timeout(limit, scan).await.map_err(|_| {
            warn!(owner = %owner, timeout_ms = limit.as_millis() as u64, "Scan timed out");
            ApiError::gateway_timeout(format!(
                "Scan did not finish within {} seconds",
                limit.as_secs_f32()
            ))
        })??,
        None => scan.await?,
    };

    let scans = state.store.record_usage(&owner).await?;
    let message = outcome_message(&outcome);
    let status = outcome.status().to_string();

    let mut cards = Vec::new();
    for record in outcome.into_records() {
        cards.push(state.store.save(&owner, &record).await?);
    }

    info!(owner = %owner, status = %status, cards = cards.len(), scans, "Scan stored");

    Ok(Json(ScanResponse {
        status,
        message,
        cards,
    }))
}
