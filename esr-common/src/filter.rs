//! Row filtering by per-column inclusion lists and a duration range
//!
//! An empty inclusion list means "no constraint", mirroring a multi-select
//! where nothing (or everything) is selected. Rows with a missing value in
//! a constrained column never match.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::schema::{self, CategoricalVariable};
use crate::table::{Table, Value};
use crate::{Error, Result};

/// Inclusive range on relationship duration (months)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: f64,
    pub max: f64,
}

impl DurationRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(Error::InvalidInput(format!(
                "invalid duration range [{}, {}]",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, months: f64) -> bool {
        self.min <= months && months <= self.max
    }
}

/// Inclusion criteria applied by [`apply`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    allowed: BTreeMap<String, Vec<Value>>,
    duration: Option<DurationRange>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict `column` to `values`; an empty list leaves it unconstrained
    pub fn allow<V: Into<Value>>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.allowed
            .insert(column.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_duration(mut self, range: DurationRange) -> Self {
        self.duration = Some(range);
        self
    }

    pub fn duration(&self) -> Option<DurationRange> {
        self.duration
    }

    /// Columns carrying a non-empty inclusion list
    pub fn constrained_columns(&self) -> impl Iterator<Item = &str> {
        self.allowed
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(c, _)| c.as_str())
    }

    /// True when no row can be excluded
    pub fn is_unconstrained(&self) -> bool {
        self.duration.is_none() && self.constrained_columns().next().is_none()
    }
}

/// Filter selection as exposed to the dashboard UI
///
/// Codes refer to the registry mappings; absent or empty lists select all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSelection {
    pub age: Vec<i64>,
    pub genre: Vec<i64>,
    pub etude: Vec<i64>,
    pub cohabitation: Vec<i64>,
    pub satisfaction: Vec<i64>,
    pub duration: Option<DurationRange>,
}

impl FilterSelection {
    /// Same selection with every code list sorted and deduplicated
    ///
    /// Selections that filter identically compare (and serialize) equal.
    pub fn canonical(&self) -> Self {
        let norm = |codes: &[i64]| {
            let mut codes = codes.to_vec();
            codes.sort_unstable();
            codes.dedup();
            codes
        };
        Self {
            age: norm(&self.age),
            genre: norm(&self.genre),
            etude: norm(&self.etude),
            cohabitation: norm(&self.cohabitation),
            satisfaction: norm(&self.satisfaction),
            duration: self.duration,
        }
    }

    /// Validate codes against the registry and build the filter spec
    pub fn to_spec(&self) -> Result<FilterSpec> {
        let mut spec = FilterSpec::new();
        let pairs: [(&CategoricalVariable, &Vec<i64>); 5] = [
            (&schema::AGE, &self.age),
            (&schema::GENRE, &self.genre),
            (&schema::ETUDE, &self.etude),
            (&schema::COHABITATION, &self.cohabitation),
            (&schema::SATISFACTION, &self.satisfaction),
        ];

        for (var, codes) in pairs {
            if let Some(bad) = codes.iter().find(|&&c| !var.accepts(c)) {
                return Err(Error::InvalidInput(format!(
                    "{} has no code {}",
                    var.title, bad
                )));
            }
            spec = spec.allow(var.column, codes.iter().copied());
        }

        if let Some(range) = self.duration {
            spec = spec.with_duration(DurationRange::new(range.min, range.max)?);
        }
        Ok(spec)
    }
}

/// Rows of `table` satisfying every criterion of `spec`
///
/// A constrained column absent from the table is an error; the duration
/// range is skipped when the table has no duration column. An empty result
/// is a valid table.
pub fn apply(table: &Table, spec: &FilterSpec) -> Result<Table> {
    let constraints: Vec<(&str, &[Value])> = spec
        .allowed
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(column, values)| (column.as_str(), values.as_slice()))
        .collect();

    for (column, _) in &constraints {
        if !table.has_column(column) {
            return Err(Error::InvalidInput(format!(
                "cannot filter on unknown column '{}'",
                column
            )));
        }
    }

    let duration = match spec.duration {
        Some(range) if table.has_column(schema::DURATION_COLUMN) => Some(range),
        Some(_) => {
            debug!("No {} column; duration range ignored", schema::DURATION_COLUMN);
            None
        }
        None => None,
    };

    let filtered = table.retain(|row| {
        let categorical_ok = constraints.iter().all(|(column, allowed)| {
            row.get(column)
                .map(|v| allowed.iter().any(|a| v.matches(a)))
                .unwrap_or(false)
        });
        categorical_ok
            && duration.map_or(true, |range| {
                row.get(schema::DURATION_COLUMN)
                    .and_then(Value::as_f64)
                    .map(|months| range.contains(months))
                    .unwrap_or(false)
            })
    });

    debug!("Filter kept {} of {} rows", filtered.len(), table.len());
    Ok(filtered)
}

/// Observed duration range, the default bounds of the duration slider
pub fn duration_bounds(table: &Table) -> Option<DurationRange> {
    let column = table.column(schema::DURATION_COLUMN)?;
    column.numbers().fold(None, |acc, n| match acc {
        None => Some(DurationRange { min: n, max: n }),
        Some(r) => Some(DurationRange {
            min: r.min.min(n),
            max: r.max.max(n),
        }),
    })
}
