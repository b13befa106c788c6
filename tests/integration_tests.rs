use approx::assert_relative_eq;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tariff_analytics::analytics::duty::DutyDecomposer;
use tariff_analytics::analytics::industry::IndustryAggregator;
use tariff_analytics::analytics::projection::TariffProjector;
use tariff_analytics::analytics::volatility::{volatility_index, PeriodGranularity, VolatilityEngine};
use tariff_analytics::core::config::{AnalyticsConfig, DutyRatios, PeriodTable};
use tariff_analytics::core::currency::{CurrencyCode, CurrencyPair};
use tariff_analytics::core::industry::{HtsDataset, HtsFilter};
use tariff_analytics::core::rate::{ForexQuery, RatePoint, RateSeries};
use tariff_analytics::core::tariff::{TariffDataset, TariffFilter};
use tariff_analytics::report::forex::ForexReport;
use tariff_analytics::report::impact::TariffImpactReport;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Flat history: three identical rates have no dispersion.
#[test]
fn scenario_identical_rates_zero_volatility() {
    let series = RateSeries::new(vec![
        RatePoint::new(date("2024-01-01"), 1.10),
        RatePoint::new(date("2024-01-02"), 1.10),
        RatePoint::new(date("2024-01-03"), 1.10),
    ])
    .unwrap();
    assert_eq!(VolatilityEngine::compute_volatility(&series), 0.0);
}

/// Mean 1.0, population variance 0.00667, index ≈ 8.16%.
#[test]
fn scenario_known_volatility() {
    let index = volatility_index(&[1.0, 1.1, 0.9]);
    assert_relative_eq!(index, 8.16, epsilon = 0.01);
}

#[test]
fn scenario_default_projection() {
    let bars = TariffProjector::project(dec!(10), dec!(100000), &PeriodTable::default()).unwrap();
    let got: Vec<(&str, Decimal, Decimal)> = bars
        .iter()
        .map(|b| (b.period_label.as_str(), b.tariff_rate_pct, b.additional_cost))
        .collect();
    assert_eq!(
        got,
        vec![
            ("Pre-Trump", dec!(5), dec!(5000)),
            ("Trump Era", dec!(10), dec!(10000)),
            ("Current", dec!(8), dec!(8000)),
        ]
    );
}

#[test]
fn scenario_default_decomposition() {
    let b = DutyDecomposer::decompose(dec!(10000), &DutyRatios::default()).unwrap();
    assert_eq!(b.anti_dumping, dec!(3000));
    assert_eq!(b.countervailing, dec!(2000));
    assert_eq!(b.section_301, dec!(3600));
    assert_eq!(b.total_duty_cost, dec!(18600));
}

/// Full forex pipeline: unordered feed rows → series → report → JSON.
#[test]
fn forex_pipeline_from_feed_json() {
    let feed: Vec<RatePoint> = serde_json::from_str(
        r#"[
            {"date": "2024-02-01", "rate": 0.92},
            {"date": "2024-01-02", "rate": 0.91},
            {"date": "2024-01-03", "rate": 0.93},
            {"date": "2024-02-02", "rate": 0.92}
        ]"#,
    )
    .unwrap();
    let history = RateSeries::from_feed(feed).unwrap();

    let pair = CurrencyPair::new(CurrencyCode::new("USD"), CurrencyCode::new("EUR")).unwrap();
    let query = ForexQuery::new(pair, 250.0, 2024).unwrap();
    let report = ForexReport::build(&query, None, history).unwrap();

    assert_eq!(report.latest_rate, 0.92);
    assert_relative_eq!(report.converted_amount, 230.0, epsilon = 1e-9);

    let months = report.monthly();
    assert_eq!(months.len(), 2);
    assert_eq!(months[0].period_label, "Jan");
    assert_relative_eq!(months[0].mean_rate, 0.92, epsilon = 1e-12);
    assert!(months[0].volatility_pct > 0.0);
    assert_eq!(months[1].period_label, "Feb");
    assert_eq!(months[1].volatility_pct, 0.0);

    let quarters = VolatilityEngine::aggregate(&report.history, PeriodGranularity::Quarter);
    assert_eq!(quarters.len(), 1);
    assert_eq!(quarters[0].observations, 4);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["target"], "EUR");
    assert_eq!(json["amount"].as_f64(), Some(250.0));
    assert_eq!(json["history"].as_array().unwrap().len(), 4);
    assert_eq!(json["history"][0]["date"], "2024-01-02");
}

/// Full impact pipeline over spreadsheet-style rows.
#[test]
fn tariff_impact_pipeline() {
    let dataset = TariffDataset::from_json_str(
        r#"[
            {"Duty Rate": 3.2, "Year": 2023, "Product Category": "Steel", "Subcategory": "Flat",
             "Origin Country": "CN", "Destination Country": "US"},
            {"Duty Rate": 25, "Year": 2024, "Product Category": "Steel", "Subcategory": "Flat",
             "Origin Country": "CN", "Destination Country": "US"},
            {"Duty Rate": 10, "Year": 2024, "Product Category": "Steel", "Subcategory": "Flat",
             "Origin Country": "CN", "Destination Country": "US"}
        ]"#,
    )
    .unwrap();
    let filter: TariffFilter = serde_json::from_str(
        r#"{"year": 2024, "productCategoryId": "Steel", "subcategoryId": "Flat",
            "originCountryCode": "CN", "destinationCountryCode": "US"}"#,
    )
    .unwrap();

    let report = TariffImpactReport::build(&dataset, &filter, &AnalyticsConfig::default()).unwrap();

    // first match in dataset order is the 25% row
    assert_eq!(report.bar_chart[1].tariff_rate_pct, dec!(25));
    let summary = report.summary.unwrap();
    assert_eq!(summary.base_tariff, dec!(25000));
    assert_eq!(summary.total_duty_cost, dec!(46500));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["barChart"][0]["period"], "Pre-Trump");
    assert_eq!(json["barChart"][0]["tariffRate"].as_f64(), Some(12.5));
    assert_eq!(json["pieChart"][1]["name"], "Anti-Dumping Duty");
    assert_eq!(json["pieChart"][1]["value"].as_f64(), Some(7500.0));
    assert_eq!(json["summary"]["totalDutyCost"].as_f64(), Some(46500.0));
}

/// A config file substitutes tables without touching global state.
#[test]
fn injected_config_changes_results() {
    let config = AnalyticsConfig::from_json_str(
        r#"{
            "shipment_value": 50000,
            "periods": {
                "periods": [ { "label": "Baseline", "multiplier": 1 }, { "label": "Escalation", "multiplier": 2 } ],
                "base_period": "Escalation"
            },
            "duty_ratios": { "anti_dumping": 0, "countervailing": 0, "section_301": 0.5 }
        }"#,
    )
    .unwrap();
    let dataset = TariffDataset::from_json_str(
        r#"[{"dutyRate": 10, "year": 2024, "productCategory": "Textiles", "subcategory": "Cotton",
             "originCountry": "IN", "destinationCountry": "US"}]"#,
    )
    .unwrap();

    let report = TariffImpactReport::build(&dataset, &TariffFilter::default(), &config).unwrap();
    assert_eq!(report.bar_chart.len(), 2);
    assert_eq!(report.bar_chart[1].additional_cost, dec!(10000));
    let summary = report.summary.unwrap();
    assert_eq!(summary.base_tariff, dec!(10000));
    assert_eq!(summary.total_duty_cost, dec!(15000));

    // the defaults are untouched
    let default_report =
        TariffImpactReport::build(&dataset, &TariffFilter::default(), &AnalyticsConfig::default()).unwrap();
    assert_eq!(default_report.summary.unwrap().total_duty_cost, dec!(18600));
}

#[test]
fn industry_explorer_views() {
    let dataset = HtsDataset::from_json_str(
        r#"[
            {"htsCode": "8517.12", "industry": "Electronics", "subIndustry": "Phones", "generalDuty": 0, "year": 2023},
            {"htsCode": "8517.12", "industry": "Electronics", "subIndustry": "Phones", "generalDuty": 3, "year": 2024},
            {"htsCode": "8542.31", "industry": "Electronics", "subIndustry": "Chips", "generalDuty": 1, "year": 2024},
            {"htsCode": "6109.10", "industry": "Textiles", "subIndustry": "Apparel", "generalDuty": 16.5, "year": 2024}
        ]"#,
    )
    .unwrap();

    let trend = IndustryAggregator::tariff_trend(&dataset, &HtsFilter::industry("Electronics")).unwrap();
    assert_eq!(trend.iter().map(|t| t.year).collect::<Vec<_>>(), vec![2023, 2024]);
    assert_eq!(trend[1].avg_duty, dec!(2));

    let filter = HtsFilter {
        year: Some(2024),
        ..Default::default()
    };
    let ranked = IndustryAggregator::sub_industry_duties(&dataset, &filter).unwrap();
    assert_eq!(ranked[0].sub_industry, "Apparel");
    assert_eq!(ranked.last().unwrap().sub_industry, "Chips");

    let json = serde_json::to_value(IndustryAggregator::industry_distribution(&dataset, &filter).unwrap()).unwrap();
    assert_eq!(json[0]["industry"], "Electronics");
    assert_eq!(json[0]["tradeVolume"], 2);
    assert_eq!(json[1]["avgDuty"].as_f64(), Some(16.5));
}

#[test]
fn unsorted_history_rejected() {
    let result = VolatilityEngine::compute_volatility_checked(&[
        RatePoint::new(date("2024-03-01"), 1.0),
        RatePoint::new(date("2024-02-01"), 1.0),
    ]);
    assert!(result.is_err());
}
