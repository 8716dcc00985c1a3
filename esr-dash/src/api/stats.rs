//! Statistics endpoints
//!
//! Every endpoint takes a `FilterSelection` (plus operation parameters),
//! filters the active dataset and answers with
//! `{dataset_id, n_selected, n_total, data}`. Responses are memoized per
//! dataset; an empty selection yields count-0 / null results, not an error.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use esr_common::filter::{self, FilterSelection};
use esr_common::schema::{self, Dimension, DIMENSIONS};
use esr_common::stats::{self, ItemMean};
use esr_common::{Error, Table};

use crate::cache::CacheKey;
use crate::error::ApiResult;
use crate::AppState;

/// Request carrying only a filter selection
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatsRequest {
    pub filters: FilterSelection,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ItemsRequest {
    pub filters: FilterSelection,
    /// Dimension short or display name; all 27 items when absent
    pub dimension: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GroupedRequest {
    #[serde(default)]
    pub filters: FilterSelection,
    pub group_column: String,
    /// Defaults to the four dimension totals
    #[serde(default)]
    pub value_columns: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse<T> {
    pub dataset_id: Uuid,
    pub n_selected: usize,
    pub n_total: usize,
    pub data: T,
}

/// Ranked item means of one dimension
#[derive(Debug, Serialize)]
pub struct DimensionItemMeans {
    pub dimension: &'static str,
    pub short_name: &'static str,
    pub items: Vec<ItemMean>,
}

/// Filter the active dataset and run `compute`, through the memo cache
///
/// `params` are the operation parameters besides the filters; together
/// with the canonical filter selection they form the cache key.
async fn memoized<P, T, F>(
    state: &AppState,
    operation: &'static str,
    filters: &FilterSelection,
    params: &P,
    compute: F,
) -> ApiResult<Json<Value>>
where
    P: Serialize,
    T: Serialize,
    F: FnOnce(&Table) -> esr_common::Result<T>,
{
    let dataset = state.require_dataset().await?;
    let key = CacheKey::new(operation, dataset.id, &(filters.canonical(), params))?;

    if let Some(hit) = state.cache.get(&key).await {
        return Ok(Json((*hit).clone()));
    }

    let spec = filters.to_spec()?;
    let selected = filter::apply(&dataset.table, &spec)?;
    let data = compute(&selected)?;

    let body = serde_json::to_value(StatsResponse {
        dataset_id: dataset.id,
        n_selected: selected.len(),
        n_total: dataset.rows(),
        data,
    })?;
    state.cache.insert(key, Arc::new(body.clone())).await;
    Ok(Json(body))
}

fn find_dimension(key: &str) -> esr_common::Result<&'static Dimension> {
    schema::dimension(key).ok_or_else(|| Error::InvalidInput(format!("unknown dimension '{}'", key)))
}

/// POST /api/stats/overview
pub async fn overview(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;
    memoized(&state, "overview", &req.filters, &(), stats::overview).await
}

/// POST /api/stats/items
pub async fn items(
    State(state): State<AppState>,
    payload: Result<Json<ItemsRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;
    let items: Vec<&'static str> = match req.dimension.as_deref() {
        Some(key) => find_dimension(key)?.items.to_vec(),
        None => schema::all_items(),
    };
    memoized(&state, "items", &req.filters, &req.dimension, |t| {
        stats::item_statistics(t, &items)
    })
    .await
}

/// POST /api/stats/dimensions
pub async fn dimensions(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;
    memoized(&state, "dimensions", &req.filters, &(), stats::all_dimension_statistics).await
}

/// POST /api/stats/grouped
///
/// Groups follow the registry's canonical order when the grouping column
/// has one.
pub async fn grouped(
    State(state): State<AppState>,
    payload: Result<Json<GroupedRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;
    let params = (&req.group_column, &req.value_columns);
    memoized(&state, "grouped", &req.filters, &params, |t| {
        match &req.value_columns {
            Some(columns) => {
                let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
                let order = schema::canonical_order(&req.group_column);
                stats::grouped_statistics(t, &req.group_column, &columns, order.as_deref())
            }
            None => stats::grouped_dimension_totals(t, &req.group_column),
        }
    })
    .await
}

/// POST /api/stats/correlation
pub async fn correlation(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;
    memoized(&state, "correlation", &req.filters, &(), stats::correlation_matrix).await
}

/// POST /api/stats/item-means
pub async fn item_means(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;
    memoized(&state, "item-means", &req.filters, &(), |t| {
        DIMENSIONS
            .iter()
            .map(|dim| {
                Ok(DimensionItemMeans {
                    dimension: dim.name,
                    short_name: dim.short_name,
                    items: stats::item_means_ranked(t, dim)?,
                })
            })
            .collect::<esr_common::Result<Vec<_>>>()
    })
    .await
}

/// POST /api/stats/summary
pub async fn summary(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;
    memoized(&state, "summary", &req.filters, &(), stats::demographic_summary).await
}

/// POST /api/stats/means
pub async fn means(
    State(state): State<AppState>,
    payload: Result<Json<StatsRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;
    memoized(&state, "means", &req.filters, &(), |t| Ok(stats::means_table(t))).await
}
