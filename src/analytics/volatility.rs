//! Volatility of a daily exchange-rate history.
//!
//! The index is the population coefficient of variation, in percent:
//! `100 * sqrt(mean((r - μ)²)) / μ`. Dividing by the mean makes pairs of
//! very different magnitudes (EUR/USD near 1, USD/JPY near 150) comparable.

use crate::core::errors::AnalyticsError;
use crate::core::rate::{RatePoint, RateSeries};
use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mean and volatility of the points sharing one period key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAggregate {
    pub period_label: String,
    pub mean_rate: f64,
    pub volatility_pct: f64,
    /// Number of observations in the period.
    pub observations: usize,
}

/// Standard period keys for [`VolatilityEngine::aggregate_by_period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodGranularity {
    /// Month of year, labelled "Jan".."Dec".
    Month,
    /// Calendar quarter, labelled "Q1".."Q4".
    Quarter,
    /// Calendar year, labelled "2024".
    Year,
}

impl PeriodGranularity {
    pub fn key(self, date: NaiveDate) -> String {
        match self {
            PeriodGranularity::Month => date.format("%b").to_string(),
            PeriodGranularity::Quarter => format!("Q{}", date.month0() / 3 + 1),
            PeriodGranularity::Year => date.year().to_string(),
        }
    }
}

impl std::str::FromStr for PeriodGranularity {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            other => Err(AnalyticsError::invalid(
                "granularity",
                format!("expected month, quarter or year, got '{}'", other),
            )),
        }
    }
}

/// Population coefficient of variation of `rates`, in percent.
///
/// Fewer than two rates, or a zero mean, yield `0`.
///
/// # Examples
///
/// ```
/// use tariff_analytics::analytics::volatility::volatility_index;
///
/// assert_eq!(volatility_index(&[1.1, 1.1, 1.1]), 0.0);
/// assert!((volatility_index(&[1.0, 1.1, 0.9]) - 8.165).abs() < 0.001);
/// ```
pub fn volatility_index(rates: &[f64]) -> f64 {
    if rates.len() <= 1 {
        return 0.0;
    }
    let n = rates.len() as f64;
    let mean = rates.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }
    // Deviations are taken from the first rate so a flat history cancels to
    // exactly zero instead of leaving rounding residue from the mean.
    let shift = rates[0];
    let shifted_mean = rates.iter().map(|r| r - shift).sum::<f64>() / n;
    let variance = rates
        .iter()
        .map(|r| (r - shift - shifted_mean).powi(2))
        .sum::<f64>()
        / n;
    let index = 100.0 * variance.sqrt() / mean;
    if index.is_finite() {
        index.abs()
    } else {
        0.0
    }
}

/// Stateless volatility computations over rate histories.
pub struct VolatilityEngine;

impl VolatilityEngine {
    /// Volatility index over the whole series.
    pub fn compute_volatility(series: &RateSeries) -> f64 {
        let rates: Vec<f64> = series.rates().collect();
        let index = volatility_index(&rates);
        debug!("volatility over {} points: {:.4}%", rates.len(), index);
        index
    }

    /// Validate raw points, then compute their volatility index.
    pub fn compute_volatility_checked(points: &[RatePoint]) -> Result<f64, AnalyticsError> {
        let series = RateSeries::new(points.to_vec())?;
        Ok(Self::compute_volatility(&series))
    }

    /// Group the series by `period_key` and compute each group's mean and
    /// volatility against its own mean.
    ///
    /// Groups come out in order of first appearance, which for an ascending
    /// series is chronological.
    pub fn aggregate_by_period<F>(series: &RateSeries, period_key: F) -> Vec<PeriodAggregate>
    where
        F: Fn(NaiveDate) -> String,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<(String, Vec<f64>)> = Vec::new();

        for point in series.points() {
            let key = period_key(point.date);
            let slot = match index.get(&key) {
                Some(&slot) => slot,
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push((key, Vec::new()));
                    groups.len() - 1
                }
            };
            groups[slot].1.push(point.rate);
        }

        groups
            .into_iter()
            .map(|(label, rates)| PeriodAggregate {
                mean_rate: rates.iter().sum::<f64>() / rates.len() as f64,
                volatility_pct: volatility_index(&rates),
                observations: rates.len(),
                period_label: label,
            })
            .collect()
    }

    /// [`Self::aggregate_by_period`] with one of the standard granularities.
    pub fn aggregate(series: &RateSeries, granularity: PeriodGranularity) -> Vec<PeriodAggregate> {
        Self::aggregate_by_period(series, |date| granularity.key(date))
    }
}
