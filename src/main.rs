//! tariff-analytics CLI
//!
//! Run the forex and tariff analytics from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Volatility and conversion for a year of USD/EUR history
//! tariff-analytics forex --history usd_eur_2024.json --base USD --target EUR --amount 1000 --year 2024
//!
//! # Tariff impact for the first matching dataset row, as JSON
//! tariff-analytics impact --dataset tariffs.json --year 2024 --origin CN --format json
//!
//! # Industry explorer aggregates
//! tariff-analytics industry trend --dataset hts.json --industry Electronics
//!
//! # Generate a synthetic rate history
//! tariff-analytics generate --base USD --target INR --year 2024 --start-rate 83.1
//! ```

use log::info;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::process;
use std::str::FromStr;
use tariff_analytics::analytics::industry::{
    IndustryAggregator, TaxRateDeriver, TaxSummary, HTS_CARD_LIMIT, HTS_LIST_LIMIT,
};
use tariff_analytics::analytics::volatility::{PeriodGranularity, VolatilityEngine};
use tariff_analytics::core::config::AnalyticsConfig;
use tariff_analytics::core::currency::{CurrencyCode, CurrencyPair, SUPPORTED_CURRENCIES};
use tariff_analytics::core::errors::AnalyticsError;
use tariff_analytics::core::industry::{HtsDataset, HtsFilter};
use tariff_analytics::core::rate::{ForexQuery, RatePoint, RateSeries};
use tariff_analytics::core::tariff::{TariffDataset, TariffFilter};
use tariff_analytics::report::forex::ForexReport;
use tariff_analytics::report::impact::TariffImpactReport;
use tariff_analytics::simulation::rate_walk::{generate_rate_walk, RateWalkConfig};

fn print_usage() {
    eprintln!(
        r#"tariff-analytics — forex volatility and tariff impact analytics

USAGE:
    tariff-analytics <COMMAND> [OPTIONS]

COMMANDS:
    forex       Volatility, conversion and monthly breakdown for a rate history
    impact      Tariff projection and duty breakdown for a dataset row
    industry    Industry explorer aggregates: trend, distribution, sub-industries, codes
    taxes       Derive industry tax rates from observed average tariffs
    generate    Generate a synthetic rate history (for testing)
    currencies  List supported currencies
    help        Show this message

OPTIONS (forex):
    --history <FILE>       JSON array of {{"date", "rate"}} points
    --base <CODE>          Base currency (default: USD)
    --target <CODE>        Target currency (required)
    --amount <N>           Amount of base currency to convert (required)
    --year <YYYY>          Calendar year of the history (required)
    --latest <RATE>        Latest rate (default: last history point)
    --granularity <G>      month (default), quarter or year

OPTIONS (impact):
    --dataset <FILE>       JSON array of tariff rows
    --year <YYYY>  --category <S>  --subcategory <S>  --origin <S>  --destination <S>
    --min-rate <R>         Minimum duty rate (default: 0)
    --max-rate <R>         Maximum duty rate (default: 100)

OPTIONS (industry <trend|distribution|sub-industries|codes|list>):
    --dataset <FILE>       JSON array of HTS records
    --year <YYYY>  --industry <S>  --sub-industry <S>  --hts-code <S>
    --limit <N>            Row limit for `codes` (default: 50)

OPTIONS (taxes):
    --industry <NAME>      Industry name (required unless --summary)
    --tariffs <LIST>       Comma-separated average tariffs, most recent first
    --summary <FILE>       JSON object of industry -> tariffs; prints every
                           industry's rates and their averages

OPTIONS (generate):
    --base <CODE>  --target <CODE>  --year <YYYY>
    --start-rate <R>       First rate (default: 1.0)
    --max-move <R>         Largest daily relative move (default: 0.005)
    --output <FILE>        Write to file instead of stdout

COMMON OPTIONS:
    --format <FORMAT>      Output format: text (default) or json
    --config <FILE>        JSON analytics configuration overrides

Set RUST_LOG=debug for computation traces."#
    );
}

type Options = HashMap<String, String>;

/// Parse `--key value` pairs, rejecting keys not in `allowed`.
fn parse_options(args: &[String], allowed: &[&str]) -> Result<Options, AnalyticsError> {
    let mut options = Options::new();
    let mut i = 0;
    while i < args.len() {
        let key = args[i]
            .strip_prefix("--")
            .filter(|k| allowed.contains(k))
            .ok_or_else(|| AnalyticsError::invalid("option", format!("unknown option: {}", args[i])))?;
        let value = args
            .get(i + 1)
            .ok_or_else(|| AnalyticsError::invalid("option", format!("--{} requires a value", key)))?;
        options.insert(key.to_string(), value.clone());
        i += 2;
    }
    Ok(options)
}

fn required<'a>(options: &'a Options, key: &'static str) -> Result<&'a str, AnalyticsError> {
    options
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| AnalyticsError::invalid(key, format!("--{} is required", key)))
}

fn parsed<T: FromStr>(options: &Options, key: &'static str) -> Result<Option<T>, AnalyticsError>
where
    T::Err: std::fmt::Display,
{
    options
        .get(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| AnalyticsError::invalid(key, format!("'{}': {}", raw, e)))
        })
        .transpose()
}

fn load_config(options: &Options) -> Result<AnalyticsConfig, AnalyticsError> {
    match options.get("config") {
        Some(path) => AnalyticsConfig::from_json_file(path),
        None => Ok(AnalyticsConfig::default()),
    }
}

fn json_output(options: &Options) -> Result<bool, AnalyticsError> {
    match options.get("format").map(String::as_str) {
        None | Some("text") => Ok(false),
        Some("json") => Ok(true),
        Some(other) => Err(AnalyticsError::invalid(
            "format",
            format!("expected 'text' or 'json', got '{}'", other),
        )),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AnalyticsError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_forex(args: &[String]) -> Result<(), AnalyticsError> {
    let options = parse_options(
        args,
        &[
            "history", "base", "target", "amount", "year", "latest", "granularity", "format",
            "config",
        ],
    )?;
    let config = load_config(&options)?;
    let json = json_output(&options)?;

    let base = CurrencyCode::parse(options.get("base").map(String::as_str).unwrap_or("USD"))?;
    let target = CurrencyCode::parse(required(&options, "target")?)?;
    let amount: f64 = parsed(&options, "amount")?
        .ok_or_else(|| AnalyticsError::invalid("amount", "--amount is required"))?;
    let year: i32 =
        parsed(&options, "year")?.ok_or_else(|| AnalyticsError::invalid("year", "--year is required"))?;
    let latest: Option<f64> = parsed(&options, "latest")?;
    let granularity: PeriodGranularity =
        parsed(&options, "granularity")?.unwrap_or(PeriodGranularity::Month);

    let query = ForexQuery::new(CurrencyPair::new(base, target)?, amount, year)?;
    info!("forex analysis {} for {} ({})", query.pair(), year, query.id());

    let history = match options.get("history") {
        Some(path) => {
            let points: Vec<RatePoint> = serde_json::from_str(&fs::read_to_string(path)?)?;
            RateSeries::from_feed(points)?
        }
        None => RateSeries::default(),
    };

    let report = ForexReport::build(&query, latest, history)?;

    if json {
        return print_json(&report);
    }

    print!("{}", report);
    if granularity != PeriodGranularity::Month {
        println!("\nPeriod  Mean Rate   Volatility");
        for p in VolatilityEngine::aggregate(&report.history, granularity) {
            println!("  {:<5} {:>9.4}   {:>6.2}%", p.period_label, p.mean_rate, p.volatility_pct);
        }
    }
    println!();
    print!("{}", report.insights(&config.volatility));
    println!();
    print!("{}", report.trade_impact(&config.volatility));
    Ok(())
}

fn cmd_impact(args: &[String]) -> Result<(), AnalyticsError> {
    let options = parse_options(
        args,
        &[
            "dataset", "year", "category", "subcategory", "origin", "destination", "min-rate",
            "max-rate", "format", "config",
        ],
    )?;
    let config = load_config(&options)?;
    let json = json_output(&options)?;

    let dataset = TariffDataset::from_json_str(&fs::read_to_string(required(&options, "dataset")?)?)?;
    let defaults = TariffFilter::default();
    let filter = TariffFilter {
        year: parsed(&options, "year")?,
        product_category: options.get("category").cloned(),
        subcategory: options.get("subcategory").cloned(),
        origin_country: options.get("origin").cloned(),
        destination_country: options.get("destination").cloned(),
        min_tax_rate: parsed::<Decimal>(&options, "min-rate")?.unwrap_or(defaults.min_tax_rate),
        max_tax_rate: parsed::<Decimal>(&options, "max-rate")?.unwrap_or(defaults.max_tax_rate),
    };
    info!("tariff impact over {} rows", dataset.len());

    let report = TariffImpactReport::build(&dataset, &filter, &config)?;
    if json {
        print_json(&report)
    } else {
        print!("{}", report);
        Ok(())
    }
}

fn cmd_industry(args: &[String]) -> Result<(), AnalyticsError> {
    let (view, rest) = args
        .split_first()
        .ok_or_else(|| AnalyticsError::invalid("view", "expected trend, distribution, sub-industries, codes or list"))?;
    let options = parse_options(
        rest,
        &["dataset", "year", "industry", "sub-industry", "hts-code", "limit", "format"],
    )?;
    let json = json_output(&options)?;

    let dataset = HtsDataset::from_json_str(&fs::read_to_string(required(&options, "dataset")?)?)?;
    let filter = HtsFilter {
        industry: options.get("industry").cloned(),
        sub_industry: options.get("sub-industry").cloned(),
        hts_code: options.get("hts-code").cloned(),
        year: parsed(&options, "year")?,
    };
    info!("industry {} over {} records", view, dataset.len());

    match view.as_str() {
        "trend" => {
            let trend = IndustryAggregator::tariff_trend(&dataset, &filter)?;
            if json {
                return print_json(&trend);
            }
            println!("Year   Avg Duty   Rows");
            for t in &trend {
                println!("  {}  {:>8}   {}", t.year, t.avg_duty.round_dp(2), t.trade_volume);
            }
        }
        "distribution" => {
            let shares = IndustryAggregator::industry_distribution(&dataset, &filter)?;
            if json {
                return print_json(&shares);
            }
            println!("Industry             Rows   Avg Duty");
            for s in &shares {
                println!("  {:<18} {:>5}   {:>8}", s.industry, s.trade_volume, s.avg_duty.round_dp(2));
            }
        }
        "sub-industries" => {
            let duties = IndustryAggregator::sub_industry_duties(&dataset, &filter)?;
            if json {
                return print_json(&duties);
            }
            println!("Sub-Industry         Avg Duty   Rows");
            for d in &duties {
                println!("  {:<18} {:>8}   {}", d.sub_industry, d.avg_duty.round_dp(2), d.row_count);
            }
        }
        "codes" => {
            let limit = parsed(&options, "limit")?.unwrap_or(HTS_CARD_LIMIT);
            let cards = IndustryAggregator::hts_codes(&dataset, &filter, limit);
            if json {
                return print_json(&cards);
            }
            for r in &cards {
                println!(
                    "  {:<12} {:<14} {:<16} {:>6}%  {}",
                    r.hts_code, r.industry, r.sub_industry, r.general_duty, r.year
                );
            }
        }
        "list" => {
            let lists = serde_json::json!({
                "industries": IndustryAggregator::distinct_industries(&dataset),
                "subIndustries": IndustryAggregator::distinct_sub_industries(&dataset, filter.industry.as_deref()),
                "htsCodes": IndustryAggregator::distinct_hts_codes(&dataset, &filter, HTS_LIST_LIMIT),
            });
            if json {
                return print_json(&lists);
            }
            println!("{}", lists);
        }
        other => {
            return Err(AnalyticsError::invalid(
                "view",
                format!("unknown industry view '{}'", other),
            ))
        }
    }
    Ok(())
}

fn cmd_taxes(args: &[String]) -> Result<(), AnalyticsError> {
    let options = parse_options(args, &["industry", "tariffs", "summary", "format", "config"])?;
    let config = load_config(&options)?;
    let json = json_output(&options)?;

    if let Some(path) = options.get("summary") {
        return tax_summary(path, &config, json);
    }

    let industry = required(&options, "industry")?;
    let tariffs = options
        .get("tariffs")
        .map(|list| {
            list.split(',')
                .map(|s| {
                    s.trim()
                        .parse::<Decimal>()
                        .map_err(|e| AnalyticsError::invalid("tariffs", format!("'{}': {}", s, e)))
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?
        .unwrap_or_default();

    let rates = TaxRateDeriver::derive(industry, &tariffs, &config.taxes)?;
    if json {
        return print_json(&rates);
    }
    println!(
        "{}: avg tariff {}% -> direct {} / indirect {} / withholding {}",
        rates.industry,
        rates.average_tariff.round_dp(2),
        rates.direct_tax_pct.round_dp(1),
        rates.indirect_tax_pct.round_dp(1),
        rates.withholding_tax_pct.round_dp(1)
    );
    Ok(())
}

fn tax_summary(path: &str, config: &AnalyticsConfig, json: bool) -> Result<(), AnalyticsError> {
    let observations: BTreeMap<String, Vec<Decimal>> = serde_json::from_str(&fs::read_to_string(path)?)?;
    let rates = observations
        .iter()
        .map(|(industry, tariffs)| TaxRateDeriver::derive(industry, tariffs, &config.taxes))
        .collect::<Result<Vec<_>, _>>()?;
    let summary = TaxSummary::from_rates(&rates)?;
    info!("tax summary over {} industries", rates.len());

    if json {
        return print_json(&serde_json::json!({ "rates": rates, "summary": summary }));
    }
    println!("Industry             Direct  Indirect  Withholding");
    for r in &rates {
        println!(
            "  {:<18} {:>6}  {:>8}  {:>11}",
            r.industry,
            r.direct_tax_pct.round_dp(2),
            r.indirect_tax_pct.round_dp(2),
            r.withholding_tax_pct.round_dp(2)
        );
    }
    match summary {
        Some(s) => println!(
            "\nAverage direct {} / indirect {} / withholding {} -> total effective {}",
            s.direct_avg.round_dp(2),
            s.indirect_avg.round_dp(2),
            s.withholding_avg.round_dp(2),
            s.total_effective.round_dp(2)
        ),
        None => println!("\nNo industries to summarize."),
    }
    Ok(())
}

fn cmd_generate(args: &[String]) -> Result<(), AnalyticsError> {
    let options = parse_options(
        args,
        &["base", "target", "year", "start-rate", "max-move", "output"],
    )?;
    let defaults = RateWalkConfig::default();
    let config = RateWalkConfig {
        year: parsed(&options, "year")?.unwrap_or(defaults.year),
        start_rate: parsed(&options, "start-rate")?.unwrap_or(defaults.start_rate),
        max_daily_move: parsed(&options, "max-move")?.unwrap_or(defaults.max_daily_move),
        ..defaults
    };
    let base = CurrencyCode::parse(options.get("base").map(String::as_str).unwrap_or("USD"))?;
    let target = CurrencyCode::parse(options.get("target").map(String::as_str).unwrap_or("EUR"))?;
    let pair = CurrencyPair::new(base, target)?;

    let series = generate_rate_walk(&config)?;
    let json = serde_json::to_string_pretty(&series)?;

    match options.get("output") {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!(
                "Generated {} {} rates for {} → {}",
                series.len(),
                pair,
                config.year,
                path
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_currencies() -> Result<(), AnalyticsError> {
    for (code, name) in SUPPORTED_CURRENCIES {
        println!("{}  {}", code, name);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    let result = match command {
        "forex" => cmd_forex(rest),
        "impact" => cmd_impact(rest),
        "industry" => cmd_industry(rest),
        "taxes" => cmd_taxes(rest),
        "generate" => cmd_generate(rest),
        "currencies" => cmd_currencies(),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}
