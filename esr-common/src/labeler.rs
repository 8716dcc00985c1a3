//! Derives human-readable label columns from coded categorical columns

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use crate::schema::{self, CategoricalVariable, LABELED_VARIABLES};
use crate::table::{Table, Value};
use crate::Result;

/// A coded value with no label in the registry
///
/// Not an error: the affected rows fall into the unlabeled bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingMappingWarning {
    pub column: String,
    /// Offending code as it appears in the data
    pub value: String,
    /// Number of rows carrying it
    pub rows: usize,
}

/// Return a copy of `table` with every `*_label` column derived
///
/// Existing label columns are recomputed from their source, so applying
/// this twice yields the same table.
pub fn apply_labels(table: &Table) -> Result<Table> {
    let mut labeled = table.clone();
    for var in LABELED_VARIABLES.iter() {
        labeled = label_variable(&labeled, var)?;
    }

    for w in missing_mappings(&labeled) {
        warn!(
            "No label for {}={} ({} row(s)); counted as unlabeled",
            w.column, w.value, w.rows
        );
    }
    Ok(labeled)
}

fn label_variable(table: &Table, var: &CategoricalVariable) -> Result<Table> {
    table.derive_column(var.column, var.label_column, |code| {
        code.as_code()
            .and_then(|c| var.label_for(c))
            .map(Value::from)
            .unwrap_or(Value::Missing)
    })
}

/// Distinct non-missing codes lacking a label, per labeled variable
///
/// Variables whose source column is absent are skipped.
pub fn missing_mappings(table: &Table) -> Vec<MissingMappingWarning> {
    let mut warnings = Vec::new();

    for var in LABELED_VARIABLES.iter() {
        let Some(codes) = table.column(var.column) else {
            continue;
        };

        let mut unmapped: BTreeMap<String, usize> = BTreeMap::new();
        for value in codes.iter() {
            if value.is_missing() {
                continue;
            }
            let mapped = value.as_code().and_then(|c| var.label_for(c)).is_some();
            if !mapped {
                *unmapped.entry(value.to_string()).or_default() += 1;
            }
        }

        warnings.extend(unmapped.into_iter().map(|(value, rows)| MissingMappingWarning {
            column: var.column.to_string(),
            value,
            rows,
        }));
    }

    warnings
}

/// Add the coarse `Satisfaction_group` column (Insatisfait / Satisfait)
pub fn with_satisfaction_groups(table: &Table) -> Result<Table> {
    table.derive_column(
        schema::SATISFACTION.column,
        schema::SATISFACTION_GROUP_COLUMN,
        |code| {
            code.as_code()
                .and_then(schema::satisfaction_group)
                .map(Value::from)
                .unwrap_or(Value::Missing)
        },
    )
}
