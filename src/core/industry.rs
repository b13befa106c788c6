use crate::core::errors::AnalyticsError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the HTS tariff schedule, tagged with industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtsRecord {
    #[serde(default)]
    pub id: u64,
    #[serde(alias = "hts_code")]
    pub hts_code: String,
    pub industry: String,
    #[serde(alias = "sub_industry")]
    pub sub_industry: String,
    #[serde(alias = "general_duty")]
    pub general_duty: Decimal,
    #[serde(default, alias = "special_duty")]
    pub special_duty: Option<String>,
    #[serde(default, alias = "column2_duty")]
    pub column2_duty: Option<String>,
    pub year: i32,
}

/// Equality filters for industry explorer queries. Unset fields match all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HtsFilter {
    pub industry: Option<String>,
    pub sub_industry: Option<String>,
    pub hts_code: Option<String>,
    pub year: Option<i32>,
}

impl HtsFilter {
    pub fn industry(industry: impl Into<String>) -> Self {
        Self {
            industry: Some(industry.into()),
            ..Default::default()
        }
    }

    /// Empty strings and year `0` count as unset.
    pub fn matches(&self, record: &HtsRecord) -> bool {
        fn text(wanted: &Option<String>, actual: &str) -> bool {
            wanted.as_deref().filter(|w| !w.is_empty()).map_or(true, |w| w == actual)
        }
        text(&self.industry, &record.industry)
            && text(&self.sub_industry, &record.sub_industry)
            && text(&self.hts_code, &record.hts_code)
            && self.year.filter(|y| *y != 0).map_or(true, |y| y == record.year)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HtsDataset {
    records: Vec<HtsRecord>,
}

impl HtsDataset {
    pub fn new(records: Vec<HtsRecord>) -> Self {
        Self { records }
    }

    /// Records with a negative general duty are rejected.
    pub fn try_new(records: Vec<HtsRecord>) -> Result<Self, AnalyticsError> {
        if let Some(bad) = records.iter().find(|r| r.general_duty < Decimal::ZERO) {
            return Err(AnalyticsError::invalid(
                "general_duty",
                format!("must be non-negative, got {} for {}", bad.general_duty, bad.hts_code),
            ));
        }
        Ok(Self { records })
    }

    pub fn from_json_str(json: &str) -> Result<Self, AnalyticsError> {
        Self::try_new(serde_json::from_str(json)?)
    }

    pub fn records(&self) -> &[HtsRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn matching<'a>(&'a self, filter: &'a HtsFilter) -> impl Iterator<Item = &'a HtsRecord> {
        self.records.iter().filter(move |r| filter.matches(r))
    }
}

impl<'de> Deserialize<'de> for HtsDataset {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<HtsRecord>::deserialize(deserializer)?;
        HtsDataset::try_new(records).map_err(serde::de::Error::custom)
    }
}

impl FromIterator<HtsRecord> for HtsDataset {
    fn from_iter<T: IntoIterator<Item = HtsRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
