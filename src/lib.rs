//! # tariff-analytics
//!
//! Analytics core of the Tariff Analyser: forex volatility, tariff
//! projections across historical periods, duty breakdowns and industry
//! tariff aggregations.
//!
//! Every computation is a pure function of its inputs and an injected,
//! read-only [`AnalyticsConfig`](core::config::AnalyticsConfig). Request
//! handling, persistence and charting belong to the caller.
//!
//! ## Architecture
//!
//! - **core** — Value types: rates, tariff rows, HTS records, currencies, config, errors
//! - **analytics** — Volatility engine, tariff projector, duty decomposer, industry aggregates
//! - **report** — JSON-compatible forex and tariff impact responses
//! - **simulation** — Synthetic rate histories for demos and stress tests

pub mod analytics;
pub mod core;
pub mod report;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::analytics::duty::{DutyBreakdown, DutyDecomposer};
    pub use crate::analytics::industry::{IndustryAggregator, TaxRateDeriver, TaxSummary};
    pub use crate::analytics::projection::{PeriodProjection, TariffProjector};
    pub use crate::analytics::volatility::{PeriodAggregate, PeriodGranularity, VolatilityEngine};
    pub use crate::core::config::AnalyticsConfig;
    pub use crate::core::currency::{CurrencyCode, CurrencyPair};
    pub use crate::core::errors::AnalyticsError;
    pub use crate::core::rate::{ForexQuery, RatePoint, RateSeries};
    pub use crate::core::tariff::{TariffDataset, TariffFilter, TariffRow};
    pub use crate::report::forex::ForexReport;
    pub use crate::report::impact::TariffImpactReport;
}
