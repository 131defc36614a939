use crate::models::{DatedMetricSeries, MetricPoint};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Trend analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Slope per point, relative to the series mean, below which a trend is
    /// considered stable (default: 0.01 = 1%)
    pub stable_threshold: f64,

    /// Window length in days for period-over-period comparisons (default: 7)
    pub comparison_days: u32,
}

impl Default for TrendConfig {
    fn default() -> Self {
        TrendConfig {
            stable_threshold: 0.01,
            comparison_days: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Increasing,
    Stable,
    Decreasing,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Stable => write!(f, "stable"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
        }
    }
}

/// Aggregate statistics for a dated series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub count: usize,
    pub sum: f64,

    /// Arithmetic mean (0 for an empty series)
    pub mean: f64,

    /// Least-squares slope of value against chronological index
    pub slope: f64,

    pub min: f64,
    pub max: f64,

    /// Sample standard deviation (0 with fewer than two points)
    pub std_dev: f64,

    pub direction: TrendDirection,
}

/// Change relative to the previous period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RelativeChange {
    /// Percentage change against a non-zero baseline
    Percent(f64),
    /// Previous period was zero; carries the raw current total instead
    NoBaseline { current: f64 },
}

impl std::fmt::Display for RelativeChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelativeChange::Percent(pct) => write!(f, "{:+.1}%", pct),
            RelativeChange::NoBaseline { current } => write!(f, "no baseline, now {}", current),
        }
    }
}

/// Period-over-period comparison of totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub current_total: f64,
    pub previous_total: f64,
    pub absolute_change: f64,
    pub relative_change: RelativeChange,
}

/// Trend analysis over dated metric series
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl TrendAnalyzer {
    /// Create new analyzer with default configuration
    pub fn new() -> Self {
        TrendAnalyzer {
            config: TrendConfig::default(),
        }
    }

    /// Create new analyzer with custom configuration
    pub fn with_config(config: TrendConfig) -> Self {
        TrendAnalyzer { config }
    }

    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    /// Sum, mean, spread and OLS slope of a series
    pub fn summarize(&self, series: &DatedMetricSeries) -> TrendSummary {
        let values = series.values();
        let count = values.len();

        if count == 0 {
            return TrendSummary {
                count: 0,
                sum: 0.0,
                mean: 0.0,
                slope: 0.0,
                min: 0.0,
                max: 0.0,
                std_dev: 0.0,
                direction: TrendDirection::Stable,
            };
        }

        let sum: f64 = values.iter().sum();
        let mean = Statistics::mean(&values);
        let min = Statistics::min(&values);
        let max = Statistics::max(&values);
        let std_dev = if count > 1 {
            Statistics::std_dev(&values)
        } else {
            0.0
        };

        let slope = if min == max { 0.0 } else { Self::slope(&values) };
        let direction = self.direction(slope, mean);

        TrendSummary {
            count,
            sum,
            mean,
            slope,
            min,
            max,
            std_dev,
            direction,
        }
    }

    /// Ordinary least-squares slope of `values` against their index
    ///
    /// Returns 0 for fewer than two points or zero index variance.
    pub fn slope(values: &[f64]) -> f64 {
        let n = values.len();
        if n < 2 {
            return 0.0;
        }

        let x_mean = (n - 1) as f64 / 2.0;
        let y_mean = values.iter().sum::<f64>() / n as f64;

        let (covariance, variance) = values.iter().enumerate().fold(
            (0.0, 0.0),
            |(cov, var), (i, &y)| {
                let dx = i as f64 - x_mean;
                (cov + dx * (y - y_mean), var + dx * dx)
            },
        );

        if variance == 0.0 {
            0.0
        } else {
            covariance / variance
        }
    }

    fn direction(&self, slope: f64, mean: f64) -> TrendDirection {
        let relative = if mean.abs() > f64::EPSILON {
            slope / mean.abs()
        } else {
            slope
        };

        if relative > self.config.stable_threshold {
            TrendDirection::Increasing
        } else if relative < -self.config.stable_threshold {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }

    /// Compare a current total against the previous period's total
    pub fn compare_periods(current_total: f64, previous_total: f64) -> PeriodComparison {
        let relative_change = if previous_total == 0.0 {
            if current_total == 0.0 {
                RelativeChange::Percent(0.0)
            } else {
                RelativeChange::NoBaseline {
                    current: current_total,
                }
            }
        } else {
            RelativeChange::Percent((current_total - previous_total) / previous_total * 100.0)
        };

        PeriodComparison {
            current_total,
            previous_total,
            absolute_change: current_total - previous_total,
            relative_change,
        }
    }

    /// One point per calendar date, values summed, in date order
    pub fn daily_rollup(series: &DatedMetricSeries) -> DatedMetricSeries {
        let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for point in series.points() {
            *by_day.entry(point.date).or_insert(0.0) += point.value;
        }

        by_day
            .into_iter()
            .map(|(date, value)| MetricPoint { date, value })
            .collect::<Vec<_>>()
            .into()
    }

    /// Compare the `days` days ending on `end` against the `days` days before them
    ///
    /// Windows reaching past the earliest representable date start there.
    pub fn compare_windows(
        series: &DatedMetricSeries,
        end: NaiveDate,
        days: u32,
    ) -> PeriodComparison {
        let span = Days::new(u64::from(days));
        let current_start = end.checked_sub_days(span).unwrap_or(NaiveDate::MIN);
        let previous_start = current_start
            .checked_sub_days(span)
            .unwrap_or(NaiveDate::MIN);

        let total_between = |from: NaiveDate, to: NaiveDate| -> f64 {
            series
                .points()
                .iter()
                .filter(|p| p.date > from && p.date <= to)
                .map(|p| p.value)
                .sum()
        };

        let current = total_between(current_start, end);
        let previous = total_between(previous_start, current_start);

        tracing::debug!(%end, days, current, previous, "Window comparison");

        Self::compare_periods(current, previous)
    }
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
