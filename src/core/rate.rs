use crate::core::currency::CurrencyPair;
use crate::core::errors::AnalyticsError;
use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One observed exchange rate on one day for a fixed currency pair.
///
/// Serializes as `{"date": "YYYY-MM-DD", "rate": 1.0842}`.
///
/// # Examples
///
/// ```
/// use tariff_analytics::core::rate::RatePoint;
/// use chrono::NaiveDate;
///
/// let point = RatePoint::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 1.0942);
/// assert_eq!(point.rate, 1.0942);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
}

impl RatePoint {
    pub fn new(date: NaiveDate, rate: f64) -> Self {
        Self { date, rate }
    }
}

/// A validated rate history: dates strictly ascending, rates positive and finite.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RateSeries {
    points: Vec<RatePoint>,
}

impl RateSeries {
    /// Validate an already-ordered sequence.
    pub fn new(points: Vec<RatePoint>) -> Result<Self, AnalyticsError> {
        for (i, point) in points.iter().enumerate() {
            if !point.rate.is_finite() || point.rate <= 0.0 {
                return Err(AnalyticsError::invalid(
                    "rate",
                    format!("must be positive, got {} on {}", point.rate, point.date),
                ));
            }
            if i > 0 && points[i - 1].date >= point.date {
                return Err(AnalyticsError::invalid(
                    "date",
                    format!(
                        "history must be strictly ascending, {} follows {}",
                        point.date,
                        points[i - 1].date
                    ),
                ));
            }
        }
        Ok(Self { points })
    }

    /// Build a series from raw feed rows the way the forex feed returns them:
    /// keyed by date in no particular order, occasionally with missing rates.
    ///
    /// Rows are sorted by date and non-finite rates are dropped. Duplicate
    /// dates and non-positive rates are still rejected.
    pub fn from_feed(mut points: Vec<RatePoint>) -> Result<Self, AnalyticsError> {
        let before = points.len();
        points.retain(|p| p.rate.is_finite());
        if points.len() < before {
            warn!("dropped {} non-finite rates from feed", before - points.len());
        }
        points.sort_by_key(|p| p.date);
        Self::new(points)
    }

    pub fn points(&self) -> &[RatePoint] {
        &self.points
    }

    pub fn rates(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.rate)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&RatePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&RatePoint> {
        self.points.last()
    }

    /// Arithmetic mean of all rates, `None` when empty.
    pub fn mean_rate(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.rates().sum::<f64>() / self.points.len() as f64)
    }
}

impl<'de> Deserialize<'de> for RateSeries {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let points = Vec::<RatePoint>::deserialize(deserializer)?;
        RateSeries::new(points).map_err(serde::de::Error::custom)
    }
}

/// Earliest year the rate feed publishes.
pub const FIRST_FEED_YEAR: i32 = 1999;
const LAST_QUERY_YEAR: i32 = 2100;

/// One forex analysis request: convert `amount` of `base` into `target`
/// and study the pair's history over calendar `year`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForexQuery {
    id: Uuid,
    pair: CurrencyPair,
    amount: f64,
    year: i32,
    created_at: DateTime<Utc>,
}

impl ForexQuery {
    pub fn new(pair: CurrencyPair, amount: f64, year: i32) -> Result<Self, AnalyticsError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AnalyticsError::invalid(
                "amount",
                format!("must be positive, got {}", amount),
            ));
        }
        if !(FIRST_FEED_YEAR..=LAST_QUERY_YEAR).contains(&year) {
            return Err(AnalyticsError::invalid(
                "year",
                format!(
                    "must be between {} and {}, got {}",
                    FIRST_FEED_YEAR, LAST_QUERY_YEAR, year
                ),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            pair,
            amount,
            year,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Inclusive date window the history is requested over.
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        // Year is range-checked in `new`, so both dates exist.
        let start = NaiveDate::from_ymd_opt(self.year, 1, 1).unwrap_or(NaiveDate::MIN);
        let end = NaiveDate::from_ymd_opt(self.year, 12, 31).unwrap_or(NaiveDate::MAX);
        (start, end)
    }

    /// Whether a point falls inside this query's window.
    pub fn covers(&self, point: &RatePoint) -> bool {
        let (start, end) = self.window();
        point.date >= start && point.date <= end
    }
}
