//! Pearson correlation matrix over dimension totals

use serde::Serialize;

use crate::schema::DIMENSIONS;
use crate::table::Table;
use crate::Result;

/// Square correlation matrix with row/column labels
///
/// Exactly symmetric: each off-diagonal cell is computed once and mirrored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Display labels, one per row/column
    pub labels: Vec<String>,
    /// Source columns, aligned with `labels`
    pub columns: Vec<String>,
    /// Row-major grid; NaN serializes as `null`
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }
}

/// Correlations among the four dimension totals, labeled by dimension name
pub fn correlation_matrix(table: &Table) -> Result<CorrelationMatrix> {
    let columns: Vec<&str> = DIMENSIONS.iter().map(|d| d.total).collect();
    let mut matrix = correlation_matrix_for(table, &columns)?;
    matrix.labels = DIMENSIONS.iter().map(|d| d.name.to_string()).collect();
    Ok(matrix)
}

/// Pairwise-complete Pearson correlations among arbitrary numeric columns
///
/// A column with fewer than two values or no variance gets a NaN row and
/// column (diagonal included); otherwise the diagonal is 1.0. Off-diagonal
/// cells with fewer than two paired observations, or with a constant side
/// among the paired rows, are NaN.
pub fn correlation_matrix_for(table: &Table, columns: &[&str]) -> Result<CorrelationMatrix> {
    let data: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|c| table.require(c).map(|col| col.numeric()))
        .collect::<Result<_>>()?;

    let n = columns.len();
    let degenerate: Vec<bool> = data.iter().map(|col| !has_variance(col)).collect();
    let mut values = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        if degenerate[i] {
            continue;
        }
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            if degenerate[j] {
                continue;
            }
            let r = pearson(&data[i], &data[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        labels: columns.iter().map(|c| c.to_string()).collect(),
        columns: columns.iter().map(|c| c.to_string()).collect(),
        values,
    })
}

/// At least two values, not all equal
fn has_variance(column: &[Option<f64>]) -> bool {
    let mut present = column.iter().flatten();
    match present.next() {
        Some(first) => present.any(|v| v != first),
        None => false,
    }
}

/// Pearson r over rows where both sides are present, clamped to [-1, 1]
fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let (dx, dy) = (a - mean_x, b - mean_y);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}
