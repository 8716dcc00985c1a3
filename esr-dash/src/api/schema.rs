//! Schema registry endpoint

use axum::Json;
use serde::Serialize;

use esr_common::schema::{
    self, CategoricalVariable, Dimension, DIMENSIONS, LABELED_VARIABLES,
};

/// Everything a client needs to build filters and label charts
#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub dimensions: &'static [Dimension],
    pub categorical: &'static [CategoricalVariable],
    pub likert_5: &'static [(i64, &'static str)],
    pub likert_4: &'static [(i64, &'static str)],
    pub relational_items: &'static [(&'static str, &'static str)],
    pub duration_column: &'static str,
    pub satisfaction_group_column: &'static str,
}

/// GET /api/schema
pub async fn get_schema() -> Json<SchemaResponse> {
    Json(SchemaResponse {
        dimensions: &DIMENSIONS,
        categorical: &LABELED_VARIABLES,
        likert_5: &schema::LIKERT_5_LABELS,
        likert_4: &schema::LIKERT_4_LABELS,
        relational_items: &schema::RELATIONAL_ITEMS,
        duration_column: schema::DURATION_COLUMN,
        satisfaction_group_column: schema::SATISFACTION_GROUP_COLUMN,
    })
}
