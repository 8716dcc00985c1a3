//! The active survey dataset
//!
//! One successful load = one `Dataset`, identified by a fresh UUID. The
//! labeled base table is immutable; every request filters a view of it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use esr_common::filter::{self, DurationRange};
use esr_common::labeler::{self, MissingMappingWarning};
use esr_common::{loader, Result, Table};

#[derive(Debug)]
pub struct Dataset {
    pub id: Uuid,
    /// File name given at upload, if any
    pub name: Option<String>,
    /// Hex SHA-256 of the uploaded bytes
    pub content_hash: String,
    pub loaded_at: DateTime<Utc>,
    /// Labeled table with the satisfaction grouping
    pub table: Table,
    pub duration_bounds: Option<DurationRange>,
    pub warnings: Vec<MissingMappingWarning>,
}

impl Dataset {
    /// Load, validate and label raw file bytes
    pub fn from_bytes(bytes: &[u8], name: Option<&str>) -> Result<Self> {
        let raw = loader::load_bytes(bytes, name)?;
        let labeled = labeler::apply_labels(&raw)?;
        let table = labeler::with_satisfaction_groups(&labeled)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.map(String::from),
            content_hash: format!("{:x}", Sha256::digest(bytes)),
            loaded_at: Utc::now(),
            duration_bounds: filter::duration_bounds(&table),
            warnings: labeler::missing_mappings(&table),
            table,
        })
    }

    pub fn rows(&self) -> usize {
        self.table.len()
    }

    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            id: self.id,
            name: self.name.clone(),
            content_hash: self.content_hash.clone(),
            loaded_at: self.loaded_at,
            rows: self.rows(),
            columns: self.table.column_names().map(String::from).collect(),
            duration_bounds: self.duration_bounds,
            warnings: self.warnings.clone(),
        }
    }
}

/// Dataset description returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub id: Uuid,
    pub name: Option<String>,
    pub content_hash: String,
    pub loaded_at: DateTime<Utc>,
    pub rows: usize,
    pub columns: Vec<String>,
    pub duration_bounds: Option<DurationRange>,
    pub warnings: Vec<MissingMappingWarning>,
}
