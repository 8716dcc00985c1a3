//! # ESR Common Library
//!
//! Data layer of the relationship-survey dashboard:
//! - Schema registry (dimensions, items, categorical variables)
//! - Loading workbooks / delimited files into an in-memory table
//! - Code-to-label mapping
//! - Filtering, aggregation, correlations and means export
//! - Configuration loading

pub mod config;
pub mod error;
pub mod filter;
pub mod labeler;
pub mod loader;
pub mod schema;
pub mod stats;
pub mod table;

pub use error::{Error, Result};
pub use filter::{DurationRange, FilterSelection, FilterSpec};
pub use table::{Table, Value};
