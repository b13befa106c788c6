//! Industry explorer analytics over the HTS schedule.
//!
//! In-memory equivalents of the explorer's grouped queries, plus the
//! derivation of per-industry tax rates from observed average tariffs.

use crate::core::config::TaxPolicy;
use crate::core::errors::AnalyticsError;
use crate::core::industry::{HtsDataset, HtsFilter, HtsRecord};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Default row limit for HTS code cards.
pub const HTS_CARD_LIMIT: usize = 50;
/// Default limit for the HTS code dropdown.
pub const HTS_LIST_LIMIT: usize = 200;

/// Average general duty and row count for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearTrend {
    pub year: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_duty: Decimal,
    pub trade_volume: usize,
}

/// Row count and average general duty for one industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryShare {
    pub industry: String,
    pub trade_volume: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_duty: Decimal,
}

/// Average general duty for one sub-industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubIndustryDuty {
    pub sub_industry: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_duty: Decimal,
    pub row_count: usize,
}

#[derive(Default)]
struct DutyAccumulator {
    total: Decimal,
    count: usize,
}

impl DutyAccumulator {
    fn add(&mut self, record: &HtsRecord) -> Result<(), AnalyticsError> {
        self.total = self.total.checked_add(record.general_duty).ok_or_else(|| {
            AnalyticsError::invalid(
                "general_duty",
                format!("sum overflows at {} for {}", record.general_duty, record.hts_code),
            )
        })?;
        self.count += 1;
        Ok(())
    }

    fn mean(&self) -> Decimal {
        if self.count == 0 {
            return Decimal::ZERO;
        }
        self.total / Decimal::from(self.count as u64)
    }
}

fn group_by<'a, K, F>(
    records: impl Iterator<Item = &'a HtsRecord>,
    key: F,
) -> Result<BTreeMap<K, DutyAccumulator>, AnalyticsError>
where
    K: Ord,
    F: Fn(&HtsRecord) -> K,
{
    let mut groups: BTreeMap<K, DutyAccumulator> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().add(record)?;
    }
    Ok(groups)
}

/// Stateless grouped queries over an [`HtsDataset`].
pub struct IndustryAggregator;

impl IndustryAggregator {
    /// Average duty and row count per year, oldest first.
    pub fn tariff_trend(dataset: &HtsDataset, filter: &HtsFilter) -> Result<Vec<YearTrend>, AnalyticsError> {
        Ok(group_by(dataset.matching(filter), |r| r.year)?
            .into_iter()
            .map(|(year, acc)| YearTrend {
                year,
                avg_duty: acc.mean(),
                trade_volume: acc.count,
            })
            .collect())
    }

    /// Row count and average duty per industry, by industry name.
    pub fn industry_distribution(
        dataset: &HtsDataset,
        filter: &HtsFilter,
    ) -> Result<Vec<IndustryShare>, AnalyticsError> {
        Ok(group_by(dataset.matching(filter), |r| r.industry.clone())?
            .into_iter()
            .map(|(industry, acc)| IndustryShare {
                industry,
                trade_volume: acc.count,
                avg_duty: acc.mean(),
            })
            .collect())
    }

    /// Sub-industries ranked by average duty, highest first.
    pub fn sub_industry_duties(
        dataset: &HtsDataset,
        filter: &HtsFilter,
    ) -> Result<Vec<SubIndustryDuty>, AnalyticsError> {
        let mut rows: Vec<SubIndustryDuty> = group_by(dataset.matching(filter), |r| r.sub_industry.clone())?
            .into_iter()
            .map(|(sub_industry, acc)| SubIndustryDuty {
                sub_industry,
                avg_duty: acc.mean(),
                row_count: acc.count,
            })
            .collect();
        // BTreeMap order makes the name tie-break ascending; the sort is stable.
        rows.sort_by(|a, b| b.avg_duty.cmp(&a.avg_duty));
        Ok(rows)
    }

    /// Matching records in dataset order, at most `limit`.
    pub fn hts_codes<'a>(dataset: &'a HtsDataset, filter: &HtsFilter, limit: usize) -> Vec<&'a HtsRecord> {
        dataset
            .records()
            .iter()
            .filter(|r| filter.matches(r))
            .take(limit)
            .collect()
    }

    pub fn distinct_industries(dataset: &HtsDataset) -> Vec<String> {
        Self::distinct(dataset, &HtsFilter::default(), |r| &r.industry, usize::MAX)
    }

    pub fn distinct_sub_industries(dataset: &HtsDataset, industry: Option<&str>) -> Vec<String> {
        let filter = HtsFilter {
            industry: industry.map(str::to_string),
            ..Default::default()
        };
        Self::distinct(dataset, &filter, |r| &r.sub_industry, usize::MAX)
    }

    pub fn distinct_hts_codes(dataset: &HtsDataset, filter: &HtsFilter, limit: usize) -> Vec<String> {
        Self::distinct(dataset, filter, |r| &r.hts_code, limit)
    }

    fn distinct<F>(dataset: &HtsDataset, filter: &HtsFilter, field: F, limit: usize) -> Vec<String>
    where
        F: Fn(&HtsRecord) -> &String,
    {
        dataset
            .matching(filter)
            .map(|r| field(r).as_str())
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .take(limit)
            .map(str::to_string)
            .collect()
    }
}

/// Tax rates derived for one industry, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryTaxRate {
    pub industry: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_tariff: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub direct_tax_pct: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub indirect_tax_pct: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub withholding_tax_pct: Decimal,
}

/// Derives per-industry tax rates from observed average tariffs.
pub struct TaxRateDeriver;

impl TaxRateDeriver {
    /// Only the three most recent observations are used.
    pub const MAX_OBSERVATIONS: usize = 3;

    /// Split the mean of `tariffs` (most recent first) by the industry's
    /// configured ratios. With no observations the policy's fallback tariff
    /// is used.
    ///
    /// # Examples
    ///
    /// ```
    /// use tariff_analytics::analytics::industry::TaxRateDeriver;
    /// use tariff_analytics::core::config::TaxPolicy;
    /// use rust_decimal_macros::dec;
    ///
    /// let rates = TaxRateDeriver::derive("Electronics", &[dec!(2), dec!(4)], &TaxPolicy::default()).unwrap();
    /// assert_eq!(rates.direct_tax_pct, dec!(0.6));
    /// assert_eq!(rates.indirect_tax_pct, dec!(9.8));
    /// ```
    pub fn derive(
        industry: &str,
        tariffs: &[Decimal],
        policy: &TaxPolicy,
    ) -> Result<IndustryTaxRate, AnalyticsError> {
        if let Some(bad) = tariffs.iter().find(|t| **t < Decimal::ZERO) {
            return Err(AnalyticsError::invalid(
                "tariff",
                format!("must be non-negative, got {}", bad),
            ));
        }
        let overflow = || AnalyticsError::invalid("tariff", format!("{} tax rates overflow", industry));
        let observed = &tariffs[..tariffs.len().min(Self::MAX_OBSERVATIONS)];
        let average_tariff = if observed.is_empty() {
            debug!("{}: no tariff observations, using fallback {}%", industry, policy.fallback_tariff);
            policy.fallback_tariff
        } else {
            let total = observed
                .iter()
                .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(*t))
                .ok_or_else(overflow)?;
            total / Decimal::from(observed.len() as u64)
        };

        let split = policy.split_for(industry);
        let direct = average_tariff.checked_mul(split.direct).ok_or_else(overflow)?;
        let indirect = average_tariff
            .checked_mul(split.indirect)
            .and_then(|v| v.checked_add(policy.base_indirect))
            .ok_or_else(overflow)?;
        let withholding = average_tariff.checked_mul(split.withholding).ok_or_else(overflow)?;
        Ok(IndustryTaxRate {
            industry: industry.to_string(),
            average_tariff,
            direct_tax_pct: direct.max(policy.direct_floor),
            indirect_tax_pct: indirect,
            withholding_tax_pct: withholding,
        })
    }
}

/// Average tax burden across a set of industry rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub direct_avg: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub indirect_avg: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub withholding_avg: Decimal,
    /// Sum of the three averages.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_effective: Decimal,
}

impl TaxSummary {
    /// `None` when there are no rates to summarize.
    pub fn from_rates(rates: &[IndustryTaxRate]) -> Result<Option<Self>, AnalyticsError> {
        if rates.is_empty() {
            return Ok(None);
        }
        let overflow = || AnalyticsError::invalid("tax_rates", "sum overflows");
        let (direct, indirect, withholding) = rates.iter().try_fold(
            (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
            |(d, i, w), r| {
                Some((
                    d.checked_add(r.direct_tax_pct)?,
                    i.checked_add(r.indirect_tax_pct)?,
                    w.checked_add(r.withholding_tax_pct)?,
                ))
            },
        )
        .ok_or_else(overflow)?;

        let n = Decimal::from(rates.len() as u64);
        let (direct_avg, indirect_avg, withholding_avg) = (direct / n, indirect / n, withholding / n);
        let total_effective = direct_avg
            .checked_add(indirect_avg)
            .and_then(|v| v.checked_add(withholding_avg))
            .ok_or_else(overflow)?;
        Ok(Some(Self {
            direct_avg,
            indirect_avg,
            withholding_avg,
            total_effective,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(code: &str, industry: &str, sub: &str, duty: Decimal, year: i32) -> HtsRecord {
        HtsRecord {
            id: 0,
            hts_code: code.to_string(),
            industry: industry.to_string(),
            sub_industry: sub.to_string(),
            general_duty: duty,
            special_duty: None,
            column2_duty: None,
            year,
        }
    }

    fn sample() -> HtsDataset {
        vec![
            record("8517.12", "Electronics", "Phones", dec!(2), 2024),
            record("8517.13", "Electronics", "Phones", dec!(4), 2023),
            record("8471.30", "Electronics", "Computers", dec!(0), 2024),
            record("8703.23", "Automotive", "Cars", dec!(2.5), 2024),
            record("8708.10", "Automotive", "Parts", dec!(2.5), 2023),
            record("7208.10", "Steel", "Flat", dec!(6), 2024),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_trend_sorted_by_year() {
        let trend = IndustryAggregator::tariff_trend(&sample(), &HtsFilter::industry("Electronics")).unwrap();
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].year, 2023);
        assert_eq!(trend[0].avg_duty, dec!(4));
        assert_eq!(trend[1].year, 2024);
        assert_eq!(trend[1].avg_duty, dec!(1));
        assert_eq!(trend[1].trade_volume, 2);
    }

    #[test]
    fn test_distribution_by_industry() {
        let filter = HtsFilter {
            year: Some(2024),
            ..Default::default()
        };
        let shares = IndustryAggregator::industry_distribution(&sample(), &filter).unwrap();
        let names: Vec<&str> = shares.iter().map(|s| s.industry.as_str()).collect();
        assert_eq!(names, vec!["Automotive", "Electronics", "Steel"]);
        assert_eq!(shares[1].trade_volume, 2);
        assert_eq!(shares[2].avg_duty, dec!(6));
    }

    #[test]
    fn test_sub_industries_ranked_desc_with_name_tiebreak() {
        let duties = IndustryAggregator::sub_industry_duties(&sample(), &HtsFilter::default()).unwrap();
        let names: Vec<&str> = duties.iter().map(|d| d.sub_industry.as_str()).collect();
        assert_eq!(names, vec!["Flat", "Phones", "Cars", "Parts", "Computers"]);
        assert_eq!(duties[1].avg_duty, dec!(3));
        assert_eq!(duties[1].row_count, 2);
    }

    #[test]
    fn test_hts_codes_limit_keeps_dataset_order() {
        let dataset = sample();
        let cards = IndustryAggregator::hts_codes(&dataset, &HtsFilter::default(), 2);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].hts_code, "8517.12");
        assert_eq!(cards[1].hts_code, "8517.13");
    }

    #[test]
    fn test_distinct_lists() {
        let dataset = sample();
        assert_eq!(
            IndustryAggregator::distinct_industries(&dataset),
            vec!["Automotive", "Electronics", "Steel"]
        );
        assert_eq!(
            IndustryAggregator::distinct_sub_industries(&dataset, Some("Electronics")),
            vec!["Computers", "Phones"]
        );
        assert_eq!(
            IndustryAggregator::distinct_hts_codes(&dataset, &HtsFilter::default(), 3),
            vec!["7208.10", "8471.30", "8517.12"]
        );
    }

    #[test]
    fn test_empty_selection() {
        let filter = HtsFilter::industry("Aerospace");
        assert!(IndustryAggregator::tariff_trend(&sample(), &filter).unwrap().is_empty());
        assert!(IndustryAggregator::sub_industry_duties(&sample(), &filter).unwrap().is_empty());
    }

    #[test]
    fn test_duty_sum_overflow_is_an_error() {
        let huge = Decimal::from_i128_with_scale(70_000_000_000_000_000_000_000_000_000, 0);
        let dataset: HtsDataset = vec![
            record("7208.10", "Steel", "Flat", huge, 2024),
            record("7208.25", "Steel", "Flat", huge, 2024),
        ]
        .into_iter()
        .collect();
        let filter = HtsFilter::default();
        assert!(matches!(
            IndustryAggregator::tariff_trend(&dataset, &filter),
            Err(AnalyticsError::InvalidInput { field: "general_duty", .. })
        ));
        assert!(IndustryAggregator::industry_distribution(&dataset, &filter).is_err());
        assert!(IndustryAggregator::sub_industry_duties(&dataset, &filter).is_err());
        // listing rows does no arithmetic
        assert_eq!(IndustryAggregator::hts_codes(&dataset, &filter, HTS_CARD_LIMIT).len(), 2);
    }

    #[test]
    fn test_tax_fallback_tariff() {
        let rates = TaxRateDeriver::derive("Steel", &[], &TaxPolicy::default()).unwrap();
        assert_eq!(rates.average_tariff, dec!(3.5));
        assert_eq!(rates.direct_tax_pct, dec!(1.225));
        assert_eq!(rates.indirect_tax_pct, dec!(9.575));
        assert_eq!(rates.withholding_tax_pct, dec!(0.7));
    }

    #[test]
    fn test_tax_direct_floor() {
        let rates = TaxRateDeriver::derive("Agriculture", &[dec!(0.1)], &TaxPolicy::default()).unwrap();
        assert_eq!(rates.direct_tax_pct, dec!(0.1));
        assert_eq!(rates.indirect_tax_pct, dec!(8.05));
    }

    #[test]
    fn test_tax_uses_three_most_recent() {
        let rates = TaxRateDeriver::derive(
            "Unknown",
            &[dec!(3), dec!(3), dec!(3), dec!(30)],
            &TaxPolicy::default(),
        )
        .unwrap();
        assert_eq!(rates.average_tariff, dec!(3));
        // default split 0.25 / 0.55 / 0.2
        assert_eq!(rates.direct_tax_pct, dec!(0.75));
    }

    #[test]
    fn test_tax_overflow_rejected() {
        assert!(TaxRateDeriver::derive("Steel", &[Decimal::MAX, Decimal::MAX], &TaxPolicy::default()).is_err());
    }

    #[test]
    fn test_tax_summary_averages_industries() {
        let policy = TaxPolicy::default();
        let rates = vec![
            TaxRateDeriver::derive("Steel", &[], &policy).unwrap(),
            TaxRateDeriver::derive("Electronics", &[dec!(2), dec!(4)], &policy).unwrap(),
        ];
        let summary = TaxSummary::from_rates(&rates).unwrap().unwrap();
        // Steel on the 3.5 fallback: 1.225 / 9.575 / 0.7; Electronics at 3: 0.6 / 9.8 / 0.6
        assert_eq!(summary.direct_avg, dec!(0.9125));
        assert_eq!(summary.indirect_avg, dec!(9.6875));
        assert_eq!(summary.withholding_avg, dec!(0.65));
        assert_eq!(summary.total_effective, dec!(11.25));

        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["totalEffective"].as_f64(), Some(11.25));
    }

    #[test]
    fn test_tax_summary_of_nothing() {
        assert_eq!(TaxSummary::from_rates(&[]).unwrap(), None);
    }

    #[test]
    fn test_tax_rejects_negative() {
        assert!(TaxRateDeriver::derive("Steel", &[dec!(-1)], &TaxPolicy::default()).is_err());
    }
}
