//! Dataset upload and inspection

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::dataset::{Dataset, DatasetInfo};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    /// Original file name, used as a format hint
    pub name: Option<String>,
}

/// POST /api/dataset?name=<file>
///
/// Body is the raw file. On success the upload replaces the active dataset;
/// on failure the previous dataset stays active.
pub async fn upload_dataset(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> ApiResult<Json<DatasetInfo>> {
    info!(
        "Upload received: {} ({} bytes)",
        query.name.as_deref().unwrap_or("<unnamed>"),
        body.len()
    );

    let name = query.name.clone();
    let loaded = tokio::task::spawn_blocking(move || Dataset::from_bytes(&body, name.as_deref()))
        .await
        .map_err(|e| ApiError::Internal(format!("load task failed: {}", e)))?;

    let dataset = match loaded {
        Ok(dataset) => dataset,
        Err(e) => {
            warn!("Upload rejected: {}", e);
            return Err(e.into());
        }
    };

    let dataset = state.replace_dataset(dataset).await;
    Ok(Json(dataset.info()))
}

/// GET /api/dataset
pub async fn get_dataset(State(state): State<AppState>) -> ApiResult<Json<DatasetInfo>> {
    let dataset = state.require_dataset().await?;
    Ok(Json(dataset.info()))
}
