//! Descriptive statistics behind the rules: growth over the period and
//! z-score outliers.

use serde::Serialize;

/// Values further than this many standard deviations from the mean are outliers.
pub const OUTLIER_Z_SCORE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outlier {
    /// Row position in the source column.
    pub row: usize,
    pub value: f64,
}

/// Per-column metrics. Built on demand and never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    pub column: String,
    /// Percentage change from first to last value; `None` when the first
    /// value is zero.
    pub growth_rate: Option<f64>,
    pub outliers: Vec<Outlier>,
}

/// Percentage change between the first and last value.
pub fn growth_rate(values: &[f64]) -> Option<f64> {
    let (&first, &last) = (values.first()?, values.last()?);
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first.abs() * 100.0)
}

/// Growth over the cells exactly as stored: a missing first or last cell
/// gives no growth.
pub fn growth_rate_raw(values: &[Option<f64>]) -> Option<f64> {
    let first = (*values.first()?)?;
    let last = (*values.last()?)?;
    growth_rate(&[first, last])
}

/// Flag values whose population z-score exceeds [`OUTLIER_Z_SCORE`].
/// A constant series never has outliers.
pub fn detect_outliers(values: &[(usize, f64)]) -> Vec<Outlier> {
    if values.is_empty() {
        return Vec::new();
    }
    let count = values.len() as f64;
    let mean = values.iter().map(|(_, v)| v).sum::<f64>() / count;
    let std_dev = (values
        .iter()
        .map(|(_, v)| (v - mean).powi(2))
        .sum::<f64>()
        / count)
        .sqrt();
    if std_dev == 0.0 {
        return Vec::new();
    }

    values
        .iter()
        .filter(|(_, v)| ((v - mean) / std_dev).abs() > OUTLIER_Z_SCORE)
        .map(|&(row, value)| Outlier { row, value })
        .collect()
}

/// Metrics for one column after dropping missing cells. Columns with fewer
/// than two values are skipped.
pub fn sample_column(column: &str, values: &[Option<f64>]) -> Option<MetricSample> {
    let present: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(row, v)| v.map(|v| (row, v)))
        .collect();
    if present.len() < 2 {
        return None;
    }

    let series: Vec<f64> = present.iter().map(|&(_, v)| v).collect();
    Some(MetricSample {
        column: column.to_string(),
        growth_rate: growth_rate(&series),
        outliers: detect_outliers(&present),
    })
}
