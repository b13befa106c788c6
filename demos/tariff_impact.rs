//! Tariff impact example.
//!
//! Selects a tariff row by filter and prints the period projection and
//! duty breakdown, then repeats the analysis with a custom period table.

use rust_decimal_macros::dec;
use tariff_analytics::core::config::{AnalyticsConfig, PeriodMultiplier, PeriodTable};
use tariff_analytics::core::tariff::{TariffDataset, TariffFilter, TariffRow};
use tariff_analytics::report::impact::TariffImpactReport;

fn row(rate: rust_decimal::Decimal, category: &str, origin: &str) -> TariffRow {
    TariffRow {
        duty_rate: rate,
        year: 2024,
        product_category: category.to_string(),
        subcategory: "General".to_string(),
        origin_country: origin.to_string(),
        destination_country: "US".to_string(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔══════════════════════════════════════════╗");
    println!("║  tariff-analytics: Tariff Impact         ║");
    println!("╚══════════════════════════════════════════╝\n");

    let dataset: TariffDataset = vec![
        row(dec!(7.5), "Electronics", "VN"),
        row(dec!(25), "Steel", "CN"),
        row(dec!(12), "Textiles", "IN"),
    ]
    .into_iter()
    .collect();

    // --- Scenario 1: default periods ---
    println!("━━━ Scenario 1: Chinese steel, default periods ━━━\n");

    let filter = TariffFilter {
        product_category: Some("Steel".into()),
        origin_country: Some("CN".into()),
        ..Default::default()
    };
    let report = TariffImpactReport::build(&dataset, &filter, &AnalyticsConfig::default())?;
    println!("{}", report);

    // --- Scenario 2: custom period table ---
    println!("━━━ Scenario 2: Custom escalation schedule ━━━\n");

    let config = AnalyticsConfig {
        shipment_value: dec!(250_000),
        periods: PeriodTable {
            periods: vec![
                PeriodMultiplier::new("2018", dec!(0.4)),
                PeriodMultiplier::new("2025", dec!(1.0)),
                PeriodMultiplier::new("2026 (proposed)", dec!(1.6)),
            ],
            base_period: "2025".into(),
        },
        ..Default::default()
    };
    config.validate()?;
    let report = TariffImpactReport::build(&dataset, &filter, &config)?;
    println!("{}", report);

    // --- Scenario 3: nothing matches ---
    println!("━━━ Scenario 3: No matching row ━━━\n");

    let filter = TariffFilter {
        origin_country: Some("BR".into()),
        ..Default::default()
    };
    let report = TariffImpactReport::build(&dataset, &filter, &AnalyticsConfig::default())?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
