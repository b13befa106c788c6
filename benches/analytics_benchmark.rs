use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal_macros::dec;
use tariff_analytics::analytics::duty::DutyDecomposer;
use tariff_analytics::analytics::projection::TariffProjector;
use tariff_analytics::analytics::volatility::{PeriodGranularity, VolatilityEngine};
use tariff_analytics::core::config::AnalyticsConfig;
use tariff_analytics::simulation::rate_walk::{generate_rate_walk, RateWalkConfig};

fn bench_volatility_one_year(c: &mut Criterion) {
    let series = generate_rate_walk(&RateWalkConfig::default()).unwrap();

    c.bench_function("volatility_one_year", |b| {
        b.iter(|| VolatilityEngine::compute_volatility(black_box(&series)))
    });
}

fn bench_monthly_aggregation(c: &mut Criterion) {
    let config = RateWalkConfig {
        business_days_only: false,
        ..Default::default()
    };
    let series = generate_rate_walk(&config).unwrap();

    c.bench_function("monthly_aggregation", |b| {
        b.iter(|| VolatilityEngine::aggregate(black_box(&series), PeriodGranularity::Month))
    });
}

fn bench_impact_pipeline(c: &mut Criterion) {
    let config = AnalyticsConfig::default();

    c.bench_function("project_and_decompose", |b| {
        b.iter(|| {
            let bars = TariffProjector::project_with(black_box(dec!(17.25)), &config).unwrap();
            let base = TariffProjector::base_cost(&bars, &config.periods).unwrap();
            DutyDecomposer::decompose(base, &config.duty_ratios).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_volatility_one_year,
    bench_monthly_aggregation,
    bench_impact_pipeline
);
criterion_main!(benches);
