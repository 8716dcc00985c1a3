//! Item, dimension and grouped statistics
//!
//! Every function is a pure read of the table view it is given. Columns are
//! summarised independently (pairwise-complete), never case-complete.

use serde::Serialize;
use std::collections::HashMap;

use super::descriptive::{mean, MeanStd, StatisticsRecord};
use crate::schema::{self, Dimension, DIMENSIONS};
use crate::table::{ColumnView, Table, Value};
use crate::Result;

/// Statistics of one item column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStatistics {
    pub item: String,
    /// Prompt text when the item belongs to a dimension
    pub label: Option<&'static str>,
    #[serde(flatten)]
    pub stats: StatisticsRecord,
}

/// One record per requested column, computed independently
pub fn item_statistics(table: &Table, items: &[&str]) -> Result<Vec<ItemStatistics>> {
    items
        .iter()
        .map(|&item| {
            let column = table.require(item)?;
            Ok(ItemStatistics {
                item: item.to_string(),
                label: schema::item_label(item),
                stats: StatisticsRecord::from_values(column.numbers()),
            })
        })
        .collect()
}

/// Total-score and mean-of-items statistics for one dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionStatistics {
    pub dimension: &'static str,
    pub short_name: &'static str,
    pub total_column: &'static str,
    /// Over the precomputed total column
    pub total: StatisticsRecord,
    /// Over per-respondent means of the dimension items
    pub item_mean: StatisticsRecord,
}

/// Statistics of a dimension's total column and of its row-wise item mean
///
/// Each respondent's mean is taken over their non-missing items first; a
/// respondent with no item answered contributes nothing. Fails with
/// `MissingColumn` if the total or any item column is absent.
pub fn dimension_statistics(table: &Table, dimension: &Dimension) -> Result<DimensionStatistics> {
    let total = table.require(dimension.total)?;
    let items: Vec<ColumnView<'_>> = dimension
        .items
        .iter()
        .map(|item| table.require(item))
        .collect::<Result<_>>()?;

    let row_means = (0..table.len()).filter_map(|row| {
        let answered: Vec<f64> = items
            .iter()
            .filter_map(|col| col.get(row).and_then(Value::as_f64))
            .collect();
        (!answered.is_empty()).then(|| mean(&answered))
    });

    Ok(DimensionStatistics {
        dimension: dimension.name,
        short_name: dimension.short_name,
        total_column: dimension.total,
        total: StatisticsRecord::from_values(total.numbers()),
        item_mean: StatisticsRecord::from_values(row_means),
    })
}

/// [`dimension_statistics`] for the four registry dimensions
pub fn all_dimension_statistics(table: &Table) -> Result<Vec<DimensionStatistics>> {
    DIMENSIONS
        .iter()
        .map(|dim| dimension_statistics(table, dim))
        .collect()
}

/// Mean / std / count of one value column inside a group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    #[serde(flatten)]
    pub stats: MeanStd,
}

/// One group of a grouped-statistics result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStatistics {
    /// Group value; `None` is the missing / unlabeled bucket
    pub key: Option<String>,
    /// Rows in the group
    pub rows: usize,
    pub values: Vec<ColumnSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedStatistics {
    pub group_column: String,
    pub value_columns: Vec<String>,
    pub groups: Vec<GroupStatistics>,
}

impl GroupedStatistics {
    pub fn group(&self, key: Option<&str>) -> Option<&GroupStatistics> {
        self.groups.iter().find(|g| g.key.as_deref() == key)
    }
}

/// Per-group statistics of `value_columns`, grouped by `group_column`
///
/// Groups appear in order of first appearance. With an explicit `order`,
/// the listed keys come first in that order and any other key (including
/// the missing bucket) follows in appearance order.
pub fn grouped_statistics(
    table: &Table,
    group_column: &str,
    value_columns: &[&str],
    order: Option<&[String]>,
) -> Result<GroupedStatistics> {
    let group_col = table.require(group_column)?;
    let values: Vec<ColumnView<'_>> = value_columns
        .iter()
        .map(|c| table.require(c))
        .collect::<Result<_>>()?;

    // Row positions per key, keys in appearance order
    let mut keys: Vec<Option<String>> = Vec::new();
    let mut members: HashMap<Option<String>, Vec<usize>> = HashMap::new();
    for (pos, value) in group_col.iter().enumerate() {
        let key = value.group_key();
        members
            .entry(key.clone())
            .or_insert_with(|| {
                keys.push(key);
                Vec::new()
            })
            .push(pos);
    }

    if let Some(order) = order {
        let rank = |key: &Option<String>| {
            key.as_ref()
                .and_then(|k| order.iter().position(|o| o == k))
                .unwrap_or(order.len())
        };
        // stable: unlisted keys keep appearance order
        keys.sort_by_key(rank);
    }

    let groups = keys
        .into_iter()
        .map(|key| {
            let rows = members.remove(&key).unwrap_or_default();
            let values = values
                .iter()
                .map(|col| ColumnSummary {
                    column: col.name().to_string(),
                    stats: MeanStd::from_values(
                        rows.iter().filter_map(|&r| col.get(r).and_then(Value::as_f64)),
                    ),
                })
                .collect();
            GroupStatistics {
                key,
                rows: rows.len(),
                values,
            }
        })
        .collect();

    Ok(GroupedStatistics {
        group_column: group_column.to_string(),
        value_columns: value_columns.iter().map(|c| c.to_string()).collect(),
        groups,
    })
}

/// Dimension totals grouped by `group_column`, in the registry's canonical
/// order for that column when it has one
pub fn grouped_dimension_totals(table: &Table, group_column: &str) -> Result<GroupedStatistics> {
    let order = schema::canonical_order(group_column);
    grouped_statistics(
        table,
        group_column,
        &schema::total_columns(),
        order.as_deref(),
    )
}
