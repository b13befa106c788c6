use crate::core::config::{AnalyticsConfig, PeriodTable};
use crate::core::errors::AnalyticsError;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A duty rate projected into one historical period.
///
/// Serializes as one bar of the impact bar chart:
/// `{"period": "Trump Era", "tariffRate": 10.0, "additionalCost": 10000.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodProjection {
    #[serde(rename = "period")]
    pub period_label: String,
    /// Projected tariff, in percent.
    #[serde(rename = "tariffRate", with = "rust_decimal::serde::float")]
    pub tariff_rate_pct: Decimal,
    /// Tariff charged on the notional shipment.
    #[serde(rename = "additionalCost", with = "rust_decimal::serde::float")]
    pub additional_cost: Decimal,
}

/// Projects one observed duty rate across the configured periods.
pub struct TariffProjector;

impl TariffProjector {
    /// One projection per period, in table order.
    ///
    /// `tariff_rate_pct = duty_rate_pct * multiplier` and
    /// `additional_cost = shipment_value * tariff_rate_pct / 100`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tariff_analytics::analytics::projection::TariffProjector;
    /// use tariff_analytics::core::config::PeriodTable;
    /// use rust_decimal_macros::dec;
    ///
    /// let bars = TariffProjector::project(dec!(10), dec!(100000), &PeriodTable::default()).unwrap();
    /// assert_eq!(bars[0].period_label, "Pre-Trump");
    /// assert_eq!(bars[0].tariff_rate_pct, dec!(5));
    /// assert_eq!(bars[0].additional_cost, dec!(5000));
    /// ```
    pub fn project(
        duty_rate_pct: Decimal,
        shipment_value: Decimal,
        table: &PeriodTable,
    ) -> Result<Vec<PeriodProjection>, AnalyticsError> {
        if duty_rate_pct < Decimal::ZERO {
            return Err(AnalyticsError::invalid(
                "duty_rate_pct",
                format!("must be non-negative, got {}", duty_rate_pct),
            ));
        }
        if shipment_value <= Decimal::ZERO {
            return Err(AnalyticsError::invalid(
                "shipment_value",
                format!("must be positive, got {}", shipment_value),
            ));
        }

        let projections = table
            .periods
            .iter()
            .map(|period| {
                let overflow = || {
                    AnalyticsError::invalid(
                        "duty_rate_pct",
                        format!("{}% overflows when projected into '{}'", duty_rate_pct, period.label),
                    )
                };
                let tariff_rate_pct = duty_rate_pct.checked_mul(period.multiplier).ok_or_else(overflow)?;
                let additional_cost = shipment_value
                    .checked_mul(tariff_rate_pct)
                    .and_then(|cost| cost.checked_div(Decimal::ONE_HUNDRED))
                    .ok_or_else(overflow)?;
                Ok(PeriodProjection {
                    period_label: period.label.clone(),
                    tariff_rate_pct,
                    additional_cost,
                })
            })
            .collect::<Result<Vec<_>, AnalyticsError>>()?;

        debug!(
            "projected duty {}% over {} periods on shipment {}",
            duty_rate_pct,
            projections.len(),
            shipment_value
        );
        Ok(projections)
    }

    /// [`Self::project`] with the configured shipment value and period table.
    pub fn project_with(
        duty_rate_pct: Decimal,
        config: &AnalyticsConfig,
    ) -> Result<Vec<PeriodProjection>, AnalyticsError> {
        Self::project(duty_rate_pct, config.shipment_value, &config.periods)
    }

    /// Added cost of the table's base period, the input to the duty breakdown.
    pub fn base_cost(
        projections: &[PeriodProjection],
        table: &PeriodTable,
    ) -> Result<Decimal, AnalyticsError> {
        projections
            .iter()
            .find(|p| p.period_label == table.base_period)
            .map(|p| p.additional_cost)
            .ok_or_else(|| {
                AnalyticsError::invalid(
                    "base_period",
                    format!("'{}' not among the projections", table.base_period),
                )
            })
    }
}
