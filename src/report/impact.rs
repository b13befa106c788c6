use crate::analytics::duty::{DutyBreakdown, DutyDecomposer, DutySlice};
use crate::analytics::projection::{PeriodProjection, TariffProjector};
use crate::core::config::AnalyticsConfig;
use crate::core::errors::AnalyticsError;
use crate::core::tariff::{TariffDataset, TariffFilter, TariffRow};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Response of the tariff impact analysis.
///
/// When no tariff row matches, every chart is empty and `summary` is `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffImpactReport {
    pub bar_chart: Vec<PeriodProjection>,
    pub pie_chart: Vec<DutySlice>,
    pub summary: Option<DutyBreakdown>,
}

impl TariffImpactReport {
    /// The "nothing matched" response.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
    }

    /// Select the first row matching `filter` and analyse it.
    pub fn build(
        dataset: &TariffDataset,
        filter: &TariffFilter,
        config: &AnalyticsConfig,
    ) -> Result<Self, AnalyticsError> {
        match dataset.select_first(filter) {
            Ok(row) => Self::for_row(row, config),
            Err(AnalyticsError::NoMatchingData { what }) => {
                warn!("no {} matched the impact filter, returning empty charts", what);
                Ok(Self::empty())
            }
            Err(e) => Err(e),
        }
    }

    /// Analyse one already-selected tariff row.
    ///
    /// The row's duty rate is projected over the configured periods, and the
    /// base period's added cost is split into the duty breakdown.
    pub fn for_row(row: &TariffRow, config: &AnalyticsConfig) -> Result<Self, AnalyticsError> {
        let bar_chart = TariffProjector::project_with(row.duty_rate, config)?;
        let base_tariff = TariffProjector::base_cost(&bar_chart, &config.periods)?;
        let summary = DutyDecomposer::decompose(base_tariff, &config.duty_ratios)?;
        debug!(
            "impact for {} {}: base tariff {}, total duty {}",
            row.product_category, row.year, summary.base_tariff, summary.total_duty_cost
        );

        Ok(Self {
            bar_chart,
            pie_chart: summary.pie_slices(),
            summary: Some(summary),
        })
    }
}

impl fmt::Display for TariffImpactReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Tariff Impact ===")?;
        let summary = match &self.summary {
            Some(summary) => summary,
            None => return writeln!(f, "No tariff row matched the filter."),
        };

        writeln!(f, "Period          Tariff %   Added Cost")?;
        for bar in &self.bar_chart {
            writeln!(
                f,
                "  {:<13} {:>8}   {:>10}",
                bar.period_label,
                bar.tariff_rate_pct.round_dp(2),
                bar.additional_cost.round_dp(2)
            )?;
        }

        writeln!(f, "\nDuty Breakdown:")?;
        for slice in &self.pie_chart {
            writeln!(f, "  {:<20} {:>12}", slice.name, slice.value.round_dp(2))?;
        }
        writeln!(f, "  {:<20} {:>12}", "Total Duty Cost", summary.total_duty_cost.round_dp(2))
    }
}
