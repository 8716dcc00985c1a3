//! Descriptive statistics over non-missing values

use serde::Serialize;

/// mean / median / std / min / max / count bundle
///
/// With no values every float is NaN and `count` is 0. With a single value
/// `std_dev` is NaN (sample deviation is undefined). NaN serializes as
/// JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatisticsRecord {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl StatisticsRecord {
    /// Record for an empty input
    pub const EMPTY: StatisticsRecord = StatisticsRecord {
        mean: f64::NAN,
        median: f64::NAN,
        std_dev: f64::NAN,
        min: f64::NAN,
        max: f64::NAN,
        count: 0,
    };

    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return Self::EMPTY;
        }
        sorted.sort_by(f64::total_cmp);

        let mean = mean(&sorted);
        Self {
            mean,
            median: median_of_sorted(&sorted),
            std_dev: sample_std_dev(&sorted, mean),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            count: sorted.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Mean, std and count only (grouped statistics and the means table)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeanStd {
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl MeanStd {
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        let mean = mean(&values);
        Self {
            mean,
            std_dev: sample_std_dev(&values, mean),
            count: values.len(),
        }
    }
}

impl From<StatisticsRecord> for MeanStd {
    fn from(s: StatisticsRecord) -> Self {
        Self {
            mean: s.mean,
            std_dev: s.std_dev,
            count: s.count,
        }
    }
}

/// Arithmetic mean; NaN for no values
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (divisor N-1); NaN for N <= 1
pub fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() <= 1 {
        return f64::NAN;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        f64::NAN
    } else if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}
