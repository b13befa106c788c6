use crate::analytics::volatility::{PeriodAggregate, PeriodGranularity, VolatilityEngine};
use crate::core::config::VolatilityThresholds;
use crate::core::currency::CurrencyCode;
use crate::core::errors::AnalyticsError;
use crate::core::rate::{ForexQuery, RateSeries};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Response of a forex analysis.
///
/// Serializes as
/// `{ base, target, amount, latestRate, convertedAmount, volatilityIndex, history: [{date, rate}] }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForexReport {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    pub amount: f64,
    pub latest_rate: f64,
    pub converted_amount: f64,
    /// Volatility over the whole history, in percent, one decimal.
    pub volatility_index: f64,
    pub history: RateSeries,
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl ForexReport {
    /// Assemble the report for `query`.
    ///
    /// Points outside the query's calendar year are discarded. When
    /// `latest_rate` is `None` the last point of the history stands in for
    /// it, so an empty history is then an error.
    pub fn build(
        query: &ForexQuery,
        latest_rate: Option<f64>,
        history: RateSeries,
    ) -> Result<Self, AnalyticsError> {
        let history = if history.points().iter().all(|p| query.covers(p)) {
            history
        } else {
            let kept: Vec<_> = history
                .points()
                .iter()
                .copied()
                .filter(|p| query.covers(p))
                .collect();
            warn!(
                "dropped {} points outside {}",
                history.len() - kept.len(),
                query.year()
            );
            RateSeries::new(kept)?
        };

        let latest_rate = match latest_rate {
            Some(rate) => rate,
            None => history
                .last()
                .map(|p| p.rate)
                .ok_or_else(|| AnalyticsError::invalid("history", "no rates to take the latest from"))?,
        };
        if !latest_rate.is_finite() || latest_rate <= 0.0 {
            return Err(AnalyticsError::invalid(
                "latest_rate",
                format!("must be positive, got {}", latest_rate),
            ));
        }

        let volatility = VolatilityEngine::compute_volatility(&history);
        debug!(
            "forex {} {}: {} points, volatility {:.3}%",
            query.pair(),
            query.year(),
            history.len(),
            volatility
        );

        Ok(Self {
            base: query.pair().base.clone(),
            target: query.pair().target.clone(),
            amount: query.amount(),
            latest_rate,
            converted_amount: latest_rate * query.amount(),
            volatility_index: round_to_tenth(volatility),
            history,
        })
    }

    /// Monthly mean and volatility, as charted on the dashboard.
    pub fn monthly(&self) -> Vec<PeriodAggregate> {
        VolatilityEngine::aggregate(&self.history, PeriodGranularity::Month)
    }

    /// The yearly average is the mean of the monthly means, so every month
    /// weighs the same however many quotes it has.
    pub fn insights(&self, thresholds: &VolatilityThresholds) -> ForexInsights {
        let months = self.monthly();
        let average_rate = if months.is_empty() {
            self.latest_rate
        } else {
            months.iter().map(|m| m.mean_rate).sum::<f64>() / months.len() as f64
        };
        let deviation_pct = (self.latest_rate - average_rate) / average_rate * 100.0;
        let favorable_for = if deviation_pct > 0.0 {
            self.base.clone()
        } else {
            self.target.clone()
        };
        ForexInsights {
            stability: if self.volatility_index <= thresholds.stable_max {
                Stability::Stable
            } else {
                Stability::Volatile
            },
            average_rate,
            deviation_pct,
            favorable_for,
            outlook: if self.volatility_index > thresholds.risk_above {
                Outlook::ModerateFluctuations
            } else {
                Outlook::Stability
            },
        }
    }

    pub fn trade_impact(&self, thresholds: &VolatilityThresholds) -> TradeImpact {
        let vol = self.volatility_index;
        TradeImpact {
            forex_impact: (self.amount * self.latest_rate * thresholds.impact_ratio).round(),
            risk_level: if vol > thresholds.risk_above {
                RiskLevel::High
            } else {
                RiskLevel::Low
            },
            hedging_recommended: vol > thresholds.hedge_above,
            convert_now: vol < thresholds.optimal_below,
        }
    }
}

impl fmt::Display for ForexReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Forex Analysis: {}/{} ===", self.base, self.target)?;
        writeln!(f, "Latest Rate:      1 {} = {:.4} {}", self.base, self.latest_rate, self.target)?;
        writeln!(
            f,
            "Converted:        {:.2} {} = {:.2} {}",
            self.amount, self.base, self.converted_amount, self.target
        )?;
        writeln!(f, "Volatility Index: {:.1}%", self.volatility_index)?;
        writeln!(f, "Observations:     {}", self.history.len())?;

        let months = self.monthly();
        if !months.is_empty() {
            writeln!(f, "\nMonth   Mean Rate   Volatility")?;
            for m in &months {
                writeln!(
                    f,
                    "  {:<5} {:>9.4}   {:>6.2}%",
                    m.period_label, m.mean_rate, m.volatility_pct
                )?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stability {
    Stable,
    Volatile,
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stability::Stable => write!(f, "Low volatility · Stable"),
            Stability::Volatile => write!(f, "High volatility"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outlook {
    Stability,
    ModerateFluctuations,
}

impl fmt::Display for Outlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outlook::Stability => write!(f, "stability"),
            Outlook::ModerateFluctuations => write!(f, "moderate fluctuations"),
        }
    }
}

/// Narrative figures shown beside the forex charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForexInsights {
    pub stability: Stability,
    pub average_rate: f64,
    /// Latest rate relative to the period average, in percent.
    pub deviation_pct: f64,
    /// Holders of this currency benefit from the current deviation.
    pub favorable_for: CurrencyCode,
    pub outlook: Outlook,
}

impl fmt::Display for ForexInsights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stability: {}", self.stability)?;
        writeln!(
            f,
            "Current rate is {:.1}% {} the yearly average ({:.4}), favorable for {} holders",
            self.deviation_pct.abs(),
            if self.deviation_pct > 0.0 { "above" } else { "below" },
            self.average_rate,
            self.favorable_for
        )?;
        writeln!(f, "Projected trend suggests {} continuing into next quarter.", self.outlook)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    High,
}

/// Trade-impact panel figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeImpact {
    /// Expected cost of currency movement on the converted amount, whole units.
    pub forex_impact: f64,
    pub risk_level: RiskLevel,
    pub hedging_recommended: bool,
    /// Whether volatility is low enough to convert immediately.
    pub convert_now: bool,
}

impl fmt::Display for TradeImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forex Impact:  {:.0}", self.forex_impact)?;
        writeln!(f, "Risk Level:    {:?}", self.risk_level)?;
        writeln!(
            f,
            "Hedging:       {}",
            if self.hedging_recommended { "Recommended" } else { "Not Required" }
        )?;
        writeln!(
            f,
            "Best Time:     {}",
            if self.convert_now { "Now - Optimal" } else { "Mid-month" }
        )
    }
}
