use crate::core::config::DutyRatios;
use crate::core::errors::AnalyticsError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A base tariff and the additional duties levied on top of it.
///
/// `total_duty_cost` is always the literal sum of the four components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyBreakdown {
    #[serde(with = "rust_decimal::serde::float")]
    pub base_tariff: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub anti_dumping: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub countervailing: Decimal,
    #[serde(rename = "section301", with = "rust_decimal::serde::float")]
    pub section_301: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_duty_cost: Decimal,
}

/// One named slice of the duty pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutySlice {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

impl DutyBreakdown {
    /// Pie chart slices, base tariff first.
    pub fn pie_slices(&self) -> Vec<DutySlice> {
        [
            ("Base Tariff", self.base_tariff),
            ("Anti-Dumping Duty", self.anti_dumping),
            ("Countervailing Duty", self.countervailing),
            ("Section 301 Tariff", self.section_301),
        ]
        .into_iter()
        .map(|(name, value)| DutySlice {
            name: name.to_string(),
            value,
        })
        .collect()
    }
}

/// Splits a base tariff into the fixed-ratio duty breakdown.
pub struct DutyDecomposer;

impl DutyDecomposer {
    /// # Examples
    ///
    /// ```
    /// use tariff_analytics::analytics::duty::DutyDecomposer;
    /// use tariff_analytics::core::config::DutyRatios;
    /// use rust_decimal_macros::dec;
    ///
    /// let b = DutyDecomposer::decompose(dec!(10000), &DutyRatios::default()).unwrap();
    /// assert_eq!(b.anti_dumping, dec!(3000));
    /// assert_eq!(b.total_duty_cost, dec!(18600));
    /// ```
    pub fn decompose(base_tariff: Decimal, ratios: &DutyRatios) -> Result<DutyBreakdown, AnalyticsError> {
        if base_tariff < Decimal::ZERO {
            return Err(AnalyticsError::invalid(
                "base_tariff",
                format!("must be non-negative, got {}", base_tariff),
            ));
        }
        let overflow = || {
            AnalyticsError::invalid(
                "base_tariff",
                format!("{} overflows the duty breakdown", base_tariff),
            )
        };
        let anti_dumping = base_tariff.checked_mul(ratios.anti_dumping).ok_or_else(overflow)?;
        let countervailing = base_tariff.checked_mul(ratios.countervailing).ok_or_else(overflow)?;
        let section_301 = base_tariff.checked_mul(ratios.section_301).ok_or_else(overflow)?;
        let total_duty_cost = [anti_dumping, countervailing, section_301]
            .into_iter()
            .try_fold(base_tariff, Decimal::checked_add)
            .ok_or_else(overflow)?;

        Ok(DutyBreakdown {
            base_tariff,
            anti_dumping,
            countervailing,
            section_301,
            total_duty_cost,
        })
    }
}
