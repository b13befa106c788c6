//! Read-only analytics configuration.
//!
//! Every table the computations need (period multipliers, duty ratios,
//! tax splits, volatility thresholds) lives here and is passed by reference
//! into the functions that use it. [`AnalyticsConfig::default`] reproduces
//! the constants of the Tariff Analyser dashboards exactly; a JSON file can
//! override any subset of them.

use crate::core::errors::AnalyticsError;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One named historical period and the factor applied to an observed duty rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodMultiplier {
    pub label: String,
    pub multiplier: Decimal,
}

impl PeriodMultiplier {
    pub fn new(label: impl Into<String>, multiplier: Decimal) -> Self {
        Self {
            label: label.into(),
            multiplier,
        }
    }
}

/// Ordered period table. `base_period` names the entry whose added cost
/// feeds the duty breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTable {
    pub periods: Vec<PeriodMultiplier>,
    pub base_period: String,
}

impl Default for PeriodTable {
    fn default() -> Self {
        Self {
            periods: vec![
                PeriodMultiplier::new("Pre-Trump", dec!(0.5)),
                PeriodMultiplier::new("Trump Era", dec!(1.0)),
                PeriodMultiplier::new("Current", dec!(0.8)),
            ],
            base_period: "Trump Era".to_string(),
        }
    }
}

impl PeriodTable {
    pub fn multiplier(&self, label: &str) -> Option<Decimal> {
        self.periods
            .iter()
            .find(|p| p.label == label)
            .map(|p| p.multiplier)
    }

    fn validate(&self) -> Result<(), AnalyticsError> {
        if self.periods.is_empty() {
            return Err(AnalyticsError::Config("period table is empty".into()));
        }
        for (i, period) in self.periods.iter().enumerate() {
            if period.multiplier <= Decimal::ZERO {
                return Err(AnalyticsError::Config(format!(
                    "multiplier for '{}' must be positive, got {}",
                    period.label, period.multiplier
                )));
            }
            if self.periods[..i].iter().any(|p| p.label == period.label) {
                return Err(AnalyticsError::Config(format!(
                    "period '{}' listed twice",
                    period.label
                )));
            }
        }
        if self.multiplier(&self.base_period).is_none() {
            return Err(AnalyticsError::Config(format!(
                "base period '{}' is not in the period table",
                self.base_period
            )));
        }
        Ok(())
    }
}

/// Fractions of the base tariff charged as each additional duty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DutyRatios {
    pub anti_dumping: Decimal,
    pub countervailing: Decimal,
    pub section_301: Decimal,
}

impl Default for DutyRatios {
    fn default() -> Self {
        Self {
            anti_dumping: dec!(0.3),
            countervailing: dec!(0.2),
            section_301: dec!(0.36),
        }
    }
}

impl DutyRatios {
    fn validate(&self) -> Result<(), AnalyticsError> {
        for (name, ratio) in [
            ("anti_dumping", self.anti_dumping),
            ("countervailing", self.countervailing),
            ("section_301", self.section_301),
        ] {
            if ratio < Decimal::ZERO {
                return Err(AnalyticsError::Config(format!(
                    "duty ratio {} must be non-negative, got {}",
                    name, ratio
                )));
            }
        }
        Ok(())
    }
}

/// Cut-offs (in volatility percent) used to label a currency pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityThresholds {
    /// At or below: "Low volatility · Stable".
    pub stable_max: f64,
    /// Above: high risk, "moderate fluctuations" outlook.
    pub risk_above: f64,
    /// Above: hedging recommended.
    pub hedge_above: f64,
    /// Below: converting now is optimal.
    pub optimal_below: f64,
    /// Share of the converted amount reported as forex impact.
    pub impact_ratio: f64,
}

impl Default for VolatilityThresholds {
    fn default() -> Self {
        Self {
            stable_max: 5.0,
            risk_above: 3.0,
            hedge_above: 5.0,
            optimal_below: 2.0,
            impact_ratio: 0.012,
        }
    }
}

impl VolatilityThresholds {
    fn validate(&self) -> Result<(), AnalyticsError> {
        for (name, value) in [
            ("stable_max", self.stable_max),
            ("risk_above", self.risk_above),
            ("hedge_above", self.hedge_above),
            ("optimal_below", self.optimal_below),
            ("impact_ratio", self.impact_ratio),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalyticsError::Config(format!(
                    "volatility threshold {} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// How an industry's average tariff is split into tax components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxSplit {
    pub direct: Decimal,
    pub indirect: Decimal,
    pub withholding: Decimal,
}

impl TaxSplit {
    pub const fn new(direct: Decimal, indirect: Decimal, withholding: Decimal) -> Self {
        Self {
            direct,
            indirect,
            withholding,
        }
    }
}

/// Parameters for deriving per-industry tax rates from observed tariffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxPolicy {
    pub splits: BTreeMap<String, TaxSplit>,
    /// Split for industries missing from `splits`.
    pub default_split: TaxSplit,
    /// Average tariff assumed when no observations exist.
    pub fallback_tariff: Decimal,
    /// Lower bound on the direct tax percentage.
    pub direct_floor: Decimal,
    /// Flat indirect taxes added on top of the tariff-derived share.
    pub base_indirect: Decimal,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        let splits = [
            ("Agriculture", TaxSplit::new(dec!(0.3), dec!(0.5), dec!(0.2))),
            ("Automotive", TaxSplit::new(dec!(0.25), dec!(0.55), dec!(0.2))),
            ("Electronics", TaxSplit::new(dec!(0.2), dec!(0.6), dec!(0.2))),
            ("Steel", TaxSplit::new(dec!(0.35), dec!(0.45), dec!(0.2))),
            ("Textiles", TaxSplit::new(dec!(0.25), dec!(0.55), dec!(0.2))),
        ]
        .into_iter()
        .map(|(name, split)| (name.to_string(), split))
        .collect();

        Self {
            splits,
            default_split: TaxSplit::new(dec!(0.25), dec!(0.55), dec!(0.2)),
            fallback_tariff: dec!(3.5),
            direct_floor: dec!(0.1),
            base_indirect: dec!(8),
        }
    }
}

impl TaxPolicy {
    pub fn split_for(&self, industry: &str) -> TaxSplit {
        self.splits
            .get(industry)
            .copied()
            .unwrap_or(self.default_split)
    }

    fn validate(&self) -> Result<(), AnalyticsError> {
        let all = self
            .splits
            .iter()
            .map(|(name, split)| (name.as_str(), split))
            .chain(std::iter::once(("default", &self.default_split)));
        for (name, split) in all {
            if split.direct < Decimal::ZERO
                || split.indirect < Decimal::ZERO
                || split.withholding < Decimal::ZERO
            {
                return Err(AnalyticsError::Config(format!(
                    "tax split for '{}' has a negative share",
                    name
                )));
            }
        }
        if self.fallback_tariff < Decimal::ZERO
            || self.direct_floor < Decimal::ZERO
            || self.base_indirect < Decimal::ZERO
        {
            return Err(AnalyticsError::Config(
                "tax policy constants must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Top-level configuration passed into every analytics call.
///
/// # Examples
///
/// ```
/// use tariff_analytics::core::config::AnalyticsConfig;
/// use rust_decimal_macros::dec;
///
/// let config = AnalyticsConfig::from_json_str(r#"{ "shipment_value": 250000 }"#).unwrap();
/// assert_eq!(config.shipment_value, dec!(250000));
/// // Everything not mentioned keeps its default.
/// assert_eq!(config.periods.base_period, "Trump Era");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Notional shipment value the projected tariffs are applied to.
    pub shipment_value: Decimal,
    pub periods: PeriodTable,
    pub duty_ratios: DutyRatios,
    pub volatility: VolatilityThresholds,
    pub taxes: TaxPolicy,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            shipment_value: dec!(100000),
            periods: PeriodTable::default(),
            duty_ratios: DutyRatios::default(),
            volatility: VolatilityThresholds::default(),
            taxes: TaxPolicy::default(),
        }
    }
}

impl AnalyticsConfig {
    pub fn from_json_str(json: &str) -> Result<Self, AnalyticsError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AnalyticsError> {
        let path = path.as_ref();
        debug!("loading analytics config from {}", path.display());
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Check every table for out-of-domain values.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.shipment_value <= Decimal::ZERO {
            return Err(AnalyticsError::Config(format!(
                "shipment value must be positive, got {}",
                self.shipment_value
            )));
        }
        self.periods.validate()?;
        self.duty_ratios.validate()?;
        self.volatility.validate()?;
        self.taxes.validate()?;
        Ok(())
    }
}
