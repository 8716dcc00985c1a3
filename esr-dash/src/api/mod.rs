//! HTTP API handlers for esr-dash

pub mod dataset;
pub mod export;
pub mod health;
pub mod schema;
pub mod sse;
pub mod stats;

pub use dataset::{get_dataset, upload_dataset};
pub use export::export_means_csv;
pub use health::health_routes;
pub use schema::get_schema;
pub use sse::event_stream;
pub use stats::{
    correlation, dimensions, grouped, item_means, items, means, overview, summary,
};
