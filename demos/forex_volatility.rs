//! Forex volatility example.
//!
//! Builds a synthetic year of USD/INR rates and shows the yearly index,
//! the monthly breakdown and the dashboard insights.

use tariff_analytics::analytics::volatility::{PeriodGranularity, VolatilityEngine};
use tariff_analytics::core::config::AnalyticsConfig;
use tariff_analytics::core::currency::{CurrencyCode, CurrencyPair};
use tariff_analytics::core::rate::ForexQuery;
use tariff_analytics::report::forex::ForexReport;
use tariff_analytics::simulation::rate_walk::{generate_rate_walk, RateWalkConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔══════════════════════════════════════════╗");
    println!("║  tariff-analytics: Forex Volatility      ║");
    println!("╚══════════════════════════════════════════╝\n");

    let config = AnalyticsConfig::default();

    // --- Scenario 1: a calm pair ---
    println!("━━━ Scenario 1: Calm USD/INR ━━━\n");

    let pair = CurrencyPair::new(CurrencyCode::new("USD"), CurrencyCode::new("INR"))?;
    let query = ForexQuery::new(pair, 10_000.0, 2024)?;
    let history = generate_rate_walk(&RateWalkConfig {
        start_rate: 83.1,
        max_daily_move: 0.002,
        ..Default::default()
    })?;

    let report = ForexReport::build(&query, None, history)?;
    println!("{}", report);
    println!("{}", report.insights(&config.volatility));
    println!("{}", report.trade_impact(&config.volatility));

    // --- Scenario 2: the same pair, swinging hard ---
    println!("━━━ Scenario 2: Turbulent USD/INR ━━━\n");

    let history = generate_rate_walk(&RateWalkConfig {
        start_rate: 83.1,
        max_daily_move: 0.03,
        ..Default::default()
    })?;
    let report = ForexReport::build(&query, None, history)?;
    println!("Volatility Index: {:.1}%", report.volatility_index);

    println!("\nQuarter  Mean Rate   Volatility");
    for q in VolatilityEngine::aggregate(&report.history, PeriodGranularity::Quarter) {
        println!("  {:<6} {:>9.4}   {:>6.2}%", q.period_label, q.mean_rate, q.volatility_pct);
    }
    println!();
    println!("{}", report.trade_impact(&config.volatility));

    Ok(())
}
