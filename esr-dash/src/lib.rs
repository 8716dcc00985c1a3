//! esr-dash library - survey dashboard service
//!
//! Holds one active dataset in memory and serves filtered statistics over
//! HTTP. Replacing the dataset clears the memoization layer and notifies
//! SSE subscribers.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod api;
pub mod cache;
pub mod dataset;
pub mod error;
pub mod events;

use cache::StatsCache;
use dataset::Dataset;
use error::{ApiError, ApiResult};
use events::{DashEvent, EventBus};

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    dataset: Arc<RwLock<Option<Arc<Dataset>>>>,
    pub cache: Arc<StatsCache>,
    pub events: Arc<EventBus>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create new application state with no dataset loaded
    pub fn new() -> Self {
        Self {
            dataset: Arc::new(RwLock::new(None)),
            cache: Arc::new(StatsCache::new()),
            events: Arc::new(EventBus::new(100)),
        }
    }

    /// Snapshot of the active dataset
    pub async fn dataset(&self) -> Option<Arc<Dataset>> {
        self.dataset.read().await.clone()
    }

    /// Snapshot of the active dataset, or 404
    pub async fn require_dataset(&self) -> ApiResult<Arc<Dataset>> {
        self.dataset()
            .await
            .ok_or_else(|| ApiError::NotFound("no dataset loaded".to_string()))
    }

    /// Make `dataset` the active one
    ///
    /// The swap and the cache reset happen under the same write lock, so no
    /// reader can observe the new dataset with results of the old one.
    pub async fn replace_dataset(&self, dataset: Dataset) -> Arc<Dataset> {
        let dataset = Arc::new(dataset);
        {
            let mut active = self.dataset.write().await;
            *active = Some(Arc::clone(&dataset));
            self.cache.reset(dataset.id).await;
        }

        info!(
            "Active dataset {} ({} rows, sha256 {})",
            dataset.id,
            dataset.rows(),
            dataset.content_hash
        );
        self.events.emit_lossy(DashEvent::DatasetLoaded {
            dataset_id: dataset.id,
            name: dataset.name.clone(),
            rows: dataset.rows(),
            timestamp: dataset.loaded_at,
        });
        dataset
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/schema", get(api::get_schema))
        .route(
            "/api/dataset",
            get(api::get_dataset)
                .post(api::upload_dataset)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/stats/overview", post(api::overview))
        .route("/api/stats/items", post(api::items))
        .route("/api/stats/dimensions", post(api::dimensions))
        .route("/api/stats/grouped", post(api::grouped))
        .route("/api/stats/correlation", post(api::correlation))
        .route("/api/stats/item-means", post(api::item_means))
        .route("/api/stats/summary", post(api::summary))
        .route("/api/stats/means", post(api::means))
        .route("/api/export/means.csv", post(api::export_means_csv))
        .route("/api/events", get(api::event_stream));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
