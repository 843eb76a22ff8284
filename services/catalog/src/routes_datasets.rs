use axum::{extract::{Path, State}, http::StatusCode, Json};
use registry::DatasetStatus;
use serde_json::json;
use tracing::error;

use crate::presenter::ListingEntry;
use crate::state::SharedState;
use crate::types::DatasetProbeResult;

pub async fn list_datasets(State(state): State<SharedState>) -> Json<Vec<ListingEntry>> {
    Json(state.listing.clone())
}

pub async fn get_metadata(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DatasetProbeResult>), (StatusCode, Json<serde_json::Value>)> {
    // blocking file read + hash
    let prober = state.prober.clone();
    let probed = tokio::task::spawn_blocking(move || prober.probe(&id))
        .await
        .map_err(|e| {
            error!("metadata: probe task failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))
        })?
        .map_err(|e| (e.status_code(), Json(json!({"error": e.to_string()}))))?;

    let code = match probed.status {
        DatasetStatus::Available => StatusCode::OK,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    };
    Ok((code, Json(probed)))
}
