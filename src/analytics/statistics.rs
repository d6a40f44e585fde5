//! Backlog statistics: field breakdowns, story-point distribution and date range

use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::models::{parse_story_points, IssueField, RecordSet};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Statistical percentiles
#[derive(Debug, Clone, Serialize)]
pub struct Percentiles {
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

impl Percentiles {
    /// Calculate percentiles from a dataset
    pub fn from_data(mut data: Vec<f64>) -> Self {
        if data.is_empty() {
            return Self {
                p50: 0.0,
                p90: 0.0,
                p95: 0.0,
                p99: 0.0,
            };
        }

        data.sort_by(f64::total_cmp);

        Self {
            p50: percentile(&data, 50.0),
            p90: percentile(&data, 90.0),
            p95: percentile(&data, 95.0),
            p99: percentile(&data, 99.0),
        }
    }
}

/// Distribution statistics
#[derive(Debug, Clone, Serialize)]
pub struct Distribution {
    pub mean: f64,
    pub median: f64,
    pub mode: Option<f64>,
    pub std_dev: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl Distribution {
    /// Calculate distribution from a dataset
    pub fn from_data(data: &[f64]) -> AnalyticsResult<Self> {
        if data.is_empty() {
            return Err(AnalyticsError::InsufficientData(
                "Cannot calculate distribution from empty dataset".to_string(),
            ));
        }

        let count = data.len();
        let mean = data.iter().sum::<f64>() / count as f64;

        let mut sorted = data.to_vec();
        sorted.sort_by(f64::total_cmp);

        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        Ok(Self {
            mean,
            median,
            mode: calculate_mode(data),
            std_dev: variance.sqrt(),
            variance,
            min: sorted[0],
            max: sorted[count - 1],
            count,
        })
    }
}

/// Story-point statistics over the rows that carry a usable value
#[derive(Debug, Clone, Serialize)]
pub struct StoryPointStatistics {
    pub distribution: Distribution,
    pub percentiles: Percentiles,

    /// Total story points across the backlog
    pub total: f64,

    /// Rows whose value is missing or unparsable
    pub missing: usize,

    /// Row indices outside 1.5 × IQR
    pub outliers: Vec<usize>,
}

/// Earliest and latest `created_at`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
}

/// Descriptive statistics for a backlog export
#[derive(Debug, Clone, Serialize)]
pub struct BacklogStatistics {
    pub total_issues: usize,

    /// Distinct non-null statuses, `None` when the column is absent
    pub unique_statuses: Option<usize>,

    /// Distinct non-null priorities, `None` when the column is absent
    pub unique_priorities: Option<usize>,

    pub status_breakdown: BTreeMap<String, usize>,
    pub priority_breakdown: BTreeMap<String, usize>,
    pub story_points: Option<StoryPointStatistics>,
    pub created_range: Option<DateRange>,
}

impl BacklogStatistics {
    /// Compute statistics over every row of `records`
    pub fn from_records(records: &RecordSet) -> Self {
        let status_breakdown = breakdown(records, IssueField::Status);
        let priority_breakdown = breakdown(records, IssueField::Priority);

        Self {
            total_issues: records.len(),
            unique_statuses: records
                .has_field(IssueField::Status)
                .then(|| status_breakdown.len()),
            unique_priorities: records
                .has_field(IssueField::Priority)
                .then(|| priority_breakdown.len()),
            status_breakdown,
            priority_breakdown,
            story_points: story_point_statistics(records),
            created_range: created_range(records),
        }
    }
}

/// Counts of raw non-null values; differently padded spellings count separately
fn breakdown(records: &RecordSet, field: IssueField) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for value in records.column_values(field.column_name()).into_iter().flatten() {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    counts
}

fn story_point_statistics(records: &RecordSet) -> Option<StoryPointStatistics> {
    if !records.has_field(IssueField::StoryPoints) {
        return None;
    }

    let parsed: Vec<Option<f64>> = records
        .column_values(IssueField::StoryPoints.column_name())
        .into_iter()
        .map(|v| v.and_then(parse_story_points))
        .collect();

    let values: Vec<f64> = parsed.iter().flatten().copied().collect();
    let distribution = Distribution::from_data(&values).ok()?;

    // Outlier positions refer to rows, not to the filtered values
    let rows: Vec<usize> = parsed
        .iter()
        .enumerate()
        .filter_map(|(row, v)| v.map(|_| row))
        .collect();
    let outliers = detect_outliers(&values)
        .into_iter()
        .map(|idx| rows[idx])
        .collect();

    Some(StoryPointStatistics {
        total: values.iter().sum(),
        missing: parsed.len() - values.len(),
        percentiles: Percentiles::from_data(values),
        distribution,
        outliers,
    })
}

fn created_range(records: &RecordSet) -> Option<DateRange> {
    let dates: Vec<DateTime<Utc>> = records
        .column_values(IssueField::CreatedAt.column_name())
        .into_iter()
        .flatten()
        .filter_map(parse_timestamp)
        .collect();

    let earliest = dates.iter().min()?;
    let latest = dates.iter().max()?;
    Some(DateRange {
        earliest: *earliest,
        latest: *latest,
    })
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Indices of values outside 1.5 × IQR; fewer than 4 values never yield outliers
pub fn detect_outliers(data: &[f64]) -> Vec<usize> {
    if data.len() < 4 {
        return vec![];
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = percentile(&sorted, 25.0);
    let q3 = percentile(&sorted, 75.0);
    let iqr = q3 - q1;

    let lower_bound = q1 - 1.5 * iqr;
    let upper_bound = q3 + 1.5 * iqr;

    data.iter()
        .enumerate()
        .filter(|(_, &value)| value < lower_bound || value > upper_bound)
        .map(|(idx, _)| idx)
        .collect()
}

fn percentile(sorted_data: &[f64], percentile: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }

    let index = (percentile / 100.0) * (sorted_data.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted_data[lower]
    } else {
        let weight = index - lower as f64;
        sorted_data[lower] * (1.0 - weight) + sorted_data[upper] * weight
    }
}

/// Most frequent value at two-decimal precision; ties go to the smaller value
fn calculate_mode(data: &[f64]) -> Option<f64> {
    let mut frequency: BTreeMap<i64, usize> = BTreeMap::new();

    for &value in data {
        let rounded = (value * 100.0).round() as i64;
        *frequency.entry(rounded).or_insert(0) += 1;
    }

    frequency
        .into_iter()
        .fold(None, |best: Option<(i64, usize)>, (value, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((value, count)),
        })
        .filter(|(_, count)| *count > 1)
        .map(|(value, _)| value as f64 / 100.0)
}
