//! Means table download

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use esr_common::filter;
use esr_common::stats;

use super::stats::StatsRequest;
use crate::error::ApiResult;
use crate::AppState;

/// POST /api/export/means.csv
///
/// Means table of the filtered selection as a CSV attachment named after
/// the number of selected participants.
pub async fn export_means_csv(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(req) = payload?;
    let dataset = state.require_dataset().await?;
    let spec = req.filters.to_spec()?;
    let selected = filter::apply(&dataset.table, &spec)?;

    let csv = stats::means_csv(&stats::means_table(&selected))?;
    let file_name = stats::export_file_name(selected.len());
    info!("Exporting {} ({} bytes)", file_name, csv.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        csv,
    )
        .into_response())
}
