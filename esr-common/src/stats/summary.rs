//! Dashboard summaries built on the descriptive primitives

use serde::Serialize;
use std::collections::HashMap;

use super::descriptive::MeanStd;
use crate::schema::{self, Dimension, DIMENSIONS};
use crate::table::Table;
use crate::Result;

/// Mean and spread of one dimension total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalSummary {
    pub dimension: &'static str,
    pub short_name: &'static str,
    pub total_column: &'static str,
    #[serde(flatten)]
    pub stats: MeanStd,
}

/// Headline figures for the filtered sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub participants: usize,
    pub totals: Vec<TotalSummary>,
    /// `None` when the dataset has no duration column
    pub mean_duration: Option<f64>,
}

pub fn overview(table: &Table) -> Result<Overview> {
    let totals = DIMENSIONS
        .iter()
        .map(|dim| {
            let col = table.require(dim.total)?;
            Ok(TotalSummary {
                dimension: dim.name,
                short_name: dim.short_name,
                total_column: dim.total,
                stats: MeanStd::from_values(col.numbers()),
            })
        })
        .collect::<Result<_>>()?;

    Ok(Overview {
        participants: table.len(),
        totals,
        mean_duration: mean_of(table, schema::DURATION_COLUMN),
    })
}

fn mean_of(table: &Table, column: &str) -> Option<f64> {
    table
        .column(column)
        .map(|col| MeanStd::from_values(col.numbers()).mean)
}

/// Mean of one item, with its prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemMean {
    pub item: &'static str,
    pub label: Option<&'static str>,
    pub mean: f64,
}

/// Item means of a dimension, highest first (undefined means last)
pub fn item_means_ranked(table: &Table, dimension: &Dimension) -> Result<Vec<ItemMean>> {
    let mut means = dimension
        .items
        .iter()
        .map(|&item| {
            let col = table.require(item)?;
            Ok(ItemMean {
                item,
                label: dimension.item_label(item),
                mean: MeanStd::from_values(col.numbers()).mean,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    means.sort_by(|a, b| match (a.mean.is_nan(), b.mean.is_nan()) {
        (false, false) => b.mean.total_cmp(&a.mean),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    });
    Ok(means)
}

/// Count of one label value; `label: None` is the unlabeled bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCount {
    pub label: Option<String>,
    pub count: usize,
}

/// Sample composition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicSummary {
    pub participants: usize,
    pub age: Vec<LabelCount>,
    pub genre: Vec<LabelCount>,
    pub etude: Vec<LabelCount>,
    pub situation: Vec<LabelCount>,
    pub cohabitation: Vec<LabelCount>,
    pub mean_duration: Option<f64>,
    /// Mean and std of the satisfaction code (1-4)
    pub satisfaction: MeanStd,
    /// Percentage of respondents living together (code 1); `None` for an
    /// empty sample
    pub cohabitation_share: Option<f64>,
}

/// Composition of a labeled table
pub fn demographic_summary(table: &Table) -> Result<DemographicSummary> {
    let cohab = table.require(schema::COHABITATION.column)?;
    let living_together = cohab.iter().filter(|v| v.as_code() == Some(1)).count();
    let cohabitation_share =
        (!table.is_empty()).then(|| living_together as f64 / table.len() as f64 * 100.0);

    Ok(DemographicSummary {
        participants: table.len(),
        age: label_counts(table, schema::AGE.label_column)?,
        genre: label_counts(table, schema::GENRE.label_column)?,
        etude: label_counts(table, schema::ETUDE.label_column)?,
        situation: label_counts(table, schema::SITUATION.label_column)?,
        cohabitation: label_counts(table, schema::COHABITATION.label_column)?,
        mean_duration: mean_of(table, schema::DURATION_COLUMN),
        satisfaction: MeanStd::from_values(table.require(schema::SATISFACTION.column)?.numbers()),
        cohabitation_share,
    })
}

/// Value counts of a column, most frequent first
///
/// Ties keep first-appearance order; the unlabeled bucket, if any, is last.
pub fn label_counts(table: &Table, column: &str) -> Result<Vec<LabelCount>> {
    let col = table.require(column)?;
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut unlabeled = 0;

    for value in col.iter() {
        match value.group_key() {
            Some(key) => {
                let count = counts.entry(key.clone()).or_insert_with(|| {
                    order.push(key);
                    0
                });
                *count += 1;
            }
            None => unlabeled += 1,
        }
    }

    let mut result: Vec<LabelCount> = order
        .into_iter()
        .map(|label| LabelCount {
            count: counts[&label],
            label: Some(label),
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count));
    if unlabeled > 0 {
        result.push(LabelCount {
            label: None,
            count: unlabeled,
        });
    }
    Ok(result)
}

/// One line of the means table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeansRow {
    pub variable: String,
    #[serde(flatten)]
    pub stats: MeanStd,
}

/// Mean / std / N of every item, total and the duration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeansTable {
    pub rows: Vec<MeansRow>,
}

impl MeansTable {
    pub fn get(&self, variable: &str) -> Option<&MeansRow> {
        self.rows.iter().find(|r| r.variable == variable)
    }
}

/// Means table over whichever of the expected variables the table has
///
/// Items in dimension order, then totals, then the duration line.
pub fn means_table(table: &Table) -> MeansTable {
    let mut variables: Vec<(&str, String)> = schema::all_items()
        .into_iter()
        .chain(schema::total_columns())
        .map(|c| (c, c.to_string()))
        .collect();
    variables.push((
        schema::DURATION_COLUMN,
        schema::DURATION_MEANS_KEY.to_string(),
    ));

    let rows = variables
        .into_iter()
        .filter_map(|(column, variable)| {
            let col = table.column(column)?;
            Some(MeansRow {
                variable,
                stats: MeanStd::from_values(col.numbers()),
            })
        })
        .collect();

    MeansTable { rows }
}
