//! Synthetic exchange-rate histories.
//!
//! Generates business-day random walks shaped like the rate feed's output,
//! for demos, benchmarks and stress tests of the analytics.

use crate::core::errors::AnalyticsError;
use crate::core::rate::{RatePoint, RateSeries};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;

/// Configuration for generating a random rate history.
#[derive(Debug, Clone)]
pub struct RateWalkConfig {
    /// Calendar year to cover.
    pub year: i32,
    /// Rate on the first business day.
    pub start_rate: f64,
    /// Largest relative move in one day, e.g. 0.005 = ±0.5%.
    pub max_daily_move: f64,
    /// Skip Saturdays and Sundays, as the feed does.
    pub business_days_only: bool,
}

impl Default for RateWalkConfig {
    fn default() -> Self {
        Self {
            year: 2024,
            start_rate: 1.0,
            max_daily_move: 0.005,
            business_days_only: true,
        }
    }
}

/// Generate a random walk over `config.year`.
pub fn generate_rate_walk(config: &RateWalkConfig) -> Result<RateSeries, AnalyticsError> {
    generate_rate_walk_with(config, &mut rand::thread_rng())
}

/// [`generate_rate_walk`] with a caller-supplied generator (seeded in tests).
pub fn generate_rate_walk_with<R: Rng>(
    config: &RateWalkConfig,
    rng: &mut R,
) -> Result<RateSeries, AnalyticsError> {
    if !config.start_rate.is_finite() || config.start_rate <= 0.0 {
        return Err(AnalyticsError::invalid(
            "start_rate",
            format!("must be positive, got {}", config.start_rate),
        ));
    }
    if !(0.0..1.0).contains(&config.max_daily_move) {
        return Err(AnalyticsError::invalid(
            "max_daily_move",
            format!("must be in [0, 1), got {}", config.max_daily_move),
        ));
    }
    let start = NaiveDate::from_ymd_opt(config.year, 1, 1)
        .ok_or_else(|| AnalyticsError::invalid("year", format!("out of range: {}", config.year)))?;

    let mut points = Vec::new();
    let mut rate = config.start_rate;
    for date in start.iter_days().take_while(|d| d.year() == config.year) {
        if config.business_days_only && matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }
        points.push(RatePoint::new(date, rate));
        if config.max_daily_move > 0.0 {
            let shock = rng.gen_range(-config.max_daily_move..config.max_daily_move);
            rate *= 1.0 + shock;
        }
    }

    RateSeries::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::volatility::VolatilityEngine;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_business_days_of_leap_year() {
        let config = RateWalkConfig::default();
        let series = generate_rate_walk(&config).unwrap();
        // 2024 has 262 weekdays
        assert_eq!(series.len(), 262);
        assert!(series.rates().all(|r| r > 0.0));
        assert_eq!(series.first().unwrap().rate, 1.0);
    }

    #[test]
    fn test_calendar_days() {
        let config = RateWalkConfig {
            year: 2023,
            business_days_only: false,
            ..Default::default()
        };
        assert_eq!(generate_rate_walk(&config).unwrap().len(), 365);
    }

    #[test]
    fn test_flat_walk_has_zero_volatility() {
        let config = RateWalkConfig {
            max_daily_move: 0.0,
            start_rate: 83.2,
            ..Default::default()
        };
        let series = generate_rate_walk(&config).unwrap();
        assert_eq!(VolatilityEngine::compute_volatility(&series), 0.0);
    }

    #[test]
    fn test_seeded_walk_is_reproducible() {
        let config = RateWalkConfig::default();
        let a = generate_rate_walk_with(&config, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = generate_rate_walk_with(&config, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_bad_config() {
        let bad_rate = RateWalkConfig {
            start_rate: 0.0,
            ..Default::default()
        };
        assert!(generate_rate_walk(&bad_rate).is_err());

        let bad_move = RateWalkConfig {
            max_daily_move: 1.5,
            ..Default::default()
        };
        assert!(generate_rate_walk(&bad_move).is_err());
    }
}
