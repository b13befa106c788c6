use crate::core::errors::AnalyticsError;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One row of the tariff dataset.
///
/// Field names follow the API's camelCase, and the spreadsheet column
/// headings the dataset was exported with are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffRow {
    #[serde(
        default,
        alias = "Duty Rate",
        alias = "duty rate",
        alias = "duty_rate"
    )]
    pub duty_rate: Decimal,
    #[serde(alias = "Year")]
    pub year: i32,
    #[serde(alias = "Product Category", alias = "product_category")]
    pub product_category: String,
    #[serde(alias = "Subcategory")]
    pub subcategory: String,
    #[serde(alias = "Origin Country", alias = "origin_country")]
    pub origin_country: String,
    #[serde(alias = "Destination Country", alias = "destination_country")]
    pub destination_country: String,
}

/// Selection criteria for the tariff impact analysis.
///
/// Unset (or empty) equality filters match everything. The duty-rate range
/// is inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TariffFilter {
    pub year: Option<i32>,
    #[serde(alias = "productCategoryId")]
    pub product_category: Option<String>,
    #[serde(alias = "subcategoryId")]
    pub subcategory: Option<String>,
    #[serde(alias = "originCountryCode")]
    pub origin_country: Option<String>,
    #[serde(alias = "destinationCountryCode")]
    pub destination_country: Option<String>,
    pub min_tax_rate: Decimal,
    pub max_tax_rate: Decimal,
}

impl Default for TariffFilter {
    fn default() -> Self {
        Self {
            year: None,
            product_category: None,
            subcategory: None,
            origin_country: None,
            destination_country: None,
            min_tax_rate: Decimal::ZERO,
            max_tax_rate: dec!(100),
        }
    }
}

fn text_matches(wanted: &Option<String>, actual: &str) -> bool {
    match wanted.as_deref() {
        None | Some("") => true,
        Some(wanted) => wanted == actual,
    }
}

impl TariffFilter {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.min_tax_rate > self.max_tax_rate {
            return Err(AnalyticsError::invalid(
                "tax_rate_range",
                format!(
                    "minimum {} exceeds maximum {}",
                    self.min_tax_rate, self.max_tax_rate
                ),
            ));
        }
        Ok(())
    }

    pub fn matches(&self, row: &TariffRow) -> bool {
        if let Some(year) = self.year.filter(|y| *y != 0) {
            if row.year != year {
                return false;
            }
        }
        text_matches(&self.product_category, &row.product_category)
            && text_matches(&self.subcategory, &row.subcategory)
            && text_matches(&self.origin_country, &row.origin_country)
            && text_matches(&self.destination_country, &row.destination_country)
            && row.duty_rate >= self.min_tax_rate
            && row.duty_rate <= self.max_tax_rate
    }
}

/// The tariff dataset in its natural row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TariffDataset {
    rows: Vec<TariffRow>,
}

impl TariffDataset {
    pub fn new(rows: Vec<TariffRow>) -> Self {
        Self { rows }
    }

    /// Rows with a negative duty rate are rejected.
    pub fn try_new(rows: Vec<TariffRow>) -> Result<Self, AnalyticsError> {
        if let Some(row) = rows.iter().find(|r| r.duty_rate < Decimal::ZERO) {
            return Err(AnalyticsError::invalid(
                "duty_rate",
                format!(
                    "must be non-negative, got {} for {} {}",
                    row.duty_rate, row.product_category, row.year
                ),
            ));
        }
        Ok(Self { rows })
    }

    pub fn from_json_str(json: &str) -> Result<Self, AnalyticsError> {
        Self::try_new(serde_json::from_str(json)?)
    }

    pub fn rows(&self) -> &[TariffRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows passing the filter, in dataset order.
    pub fn matching<'a>(&'a self, filter: &'a TariffFilter) -> impl Iterator<Item = &'a TariffRow> {
        self.rows.iter().filter(move |row| filter.matches(row))
    }

    /// The first row passing the filter. Dataset order is the only tie-break.
    pub fn select_first(&self, filter: &TariffFilter) -> Result<&TariffRow, AnalyticsError> {
        filter.validate()?;
        let row = self
            .rows
            .iter()
            .find(|row| filter.matches(row))
            .ok_or(AnalyticsError::NoMatchingData { what: "tariff row" })?;
        debug!(
            "selected tariff row {} {} -> {} ({}%)",
            row.product_category, row.origin_country, row.destination_country, row.duty_rate
        );
        Ok(row)
    }
}

impl<'de> Deserialize<'de> for TariffDataset {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<TariffRow>::deserialize(deserializer)?;
        TariffDataset::try_new(rows).map_err(serde::de::Error::custom)
    }
}

impl FromIterator<TariffRow> for TariffDataset {
    fn from_iter<T: IntoIterator<Item = TariffRow>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
