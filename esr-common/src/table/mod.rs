//! In-memory survey table
//!
//! Columns live in shared, immutable backing storage (`Arc<[Value]>`). A
//! `Table` is a list of columns plus a row selection into that storage, so
//! filtering produces a new view over the same rows and deriving a column
//! never touches the existing ones.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{Error, Result};

mod value;
pub use value::Value;

/// Named column over the full backing row range
#[derive(Debug, Clone)]
struct Column {
    name: String,
    values: Arc<[Value]>,
}

/// Immutable table view
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    /// Selected backing rows, in order
    rows: Arc<[usize]>,
}

impl Table {
    /// Build a table from named columns of equal length
    pub fn new(columns: Vec<(String, Vec<Value>)>) -> Result<Self> {
        let height = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut index = HashMap::with_capacity(columns.len());
        let mut cols = Vec::with_capacity(columns.len());

        for (pos, (name, values)) in columns.into_iter().enumerate() {
            if values.len() != height {
                return Err(Error::InvalidInput(format!(
                    "column '{}' has {} rows, expected {}",
                    name,
                    values.len(),
                    height
                )));
            }
            if index.insert(name.clone(), pos).is_some() {
                return Err(Error::InvalidInput(format!("duplicate column '{}'", name)));
            }
            cols.push(Column {
                name,
                values: values.into(),
            });
        }

        Ok(Self {
            columns: cols,
            index,
            rows: (0..height).collect(),
        })
    }

    /// Number of selected rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Backing row indices of the current selection
    ///
    /// Two views of the same loaded dataset share these indices, which
    /// makes row identity comparable across filters.
    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    /// Column restricted to the selected rows
    pub fn column(&self, name: &str) -> Option<ColumnView<'_>> {
        let col = &self.columns[*self.index.get(name)?];
        Some(ColumnView {
            name: &col.name,
            values: &col.values,
            rows: &self.rows,
        })
    }

    /// Like [`Table::column`], failing with `MissingColumn`
    pub fn require(&self, name: &str) -> Result<ColumnView<'_>> {
        self.column(name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Iterate the selected rows
    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(move |&row| RowView { table: self, row })
    }

    /// New view keeping only the selected rows accepted by `keep`
    pub fn retain(&self, mut keep: impl FnMut(&RowView<'_>) -> bool) -> Table {
        let rows: Arc<[usize]> = self
            .rows
            .iter()
            .copied()
            .filter(|&row| keep(&RowView { table: self, row }))
            .collect();
        Table {
            columns: self.columns.clone(),
            index: self.index.clone(),
            rows,
        }
    }

    /// New table with `target` derived from `source` cell by cell
    ///
    /// The derivation runs over every backing row, so the result keeps the
    /// current selection valid. An existing `target` column is replaced in
    /// place; otherwise the column is appended.
    pub fn derive_column(
        &self,
        source: &str,
        target: &str,
        f: impl Fn(&Value) -> Value,
    ) -> Result<Table> {
        let src = &self.columns[*self
            .index
            .get(source)
            .ok_or_else(|| Error::MissingColumn(source.to_string()))?];
        let derived: Arc<[Value]> = src.values.iter().map(f).collect();
        let column = Column {
            name: target.to_string(),
            values: derived,
        };

        let mut table = self.clone();
        match table.index.get(target) {
            Some(&pos) => table.columns[pos] = column,
            None => {
                table.index.insert(target.to_string(), table.columns.len());
                table.columns.push(column);
            }
        }
        Ok(table)
    }
}

impl PartialEq for Table {
    /// Equal when column names match in order and selected cells match
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() || self.columns.len() != other.columns.len() {
            return false;
        }
        self.columns.iter().zip(other.columns.iter()).all(|(a, b)| {
            a.name == b.name
                && self
                    .rows
                    .iter()
                    .zip(other.rows.iter())
                    .all(|(&ra, &rb)| a.values[ra] == b.values[rb])
        })
    }
}

/// Borrowed column restricted to a row selection
#[derive(Debug, Clone, Copy)]
pub struct ColumnView<'a> {
    name: &'a str,
    values: &'a [Value],
    rows: &'a [usize],
}

impl<'a> ColumnView<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell of the i-th selected row
    pub fn get(&self, i: usize) -> Option<&'a Value> {
        let values = self.values;
        self.rows.get(i).map(|&row| &values[row])
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Value> + 'a {
        let (values, rows) = (self.values, self.rows);
        rows.iter().map(move |&row| &values[row])
    }

    /// Per-row numeric view (`None` for missing or non-numeric cells)
    pub fn numeric(&self) -> Vec<Option<f64>> {
        self.iter().map(Value::as_f64).collect()
    }

    /// Non-missing numeric cells only
    pub fn numbers(&self) -> impl Iterator<Item = f64> + 'a {
        self.iter().filter_map(Value::as_f64)
    }
}

/// One selected row
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a Table,
    row: usize,
}

impl<'a> RowView<'a> {
    /// Backing row index
    pub fn index(&self) -> usize {
        self.row
    }

    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let table = self.table;
        let pos = *table.index.get(column)?;
        Some(&table.columns[pos].values[self.row])
    }
}
