//! User-supplied deal data layered onto an extracted listing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{AnalyzerError, ResultExt};
use crate::models::ListingRecord;

/// Short-term rental figures supplied alongside a listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrMetricsInput {
    pub adr: Option<f64>,
    pub occupancy_rate: Option<f64>,
}

/// Monthly expense figures supplied alongside a listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyExpensesInput {
    pub property_taxes: Option<f64>,
    pub insurance: Option<f64>,
    pub utilities: Option<f64>,
    pub management: Option<f64>,
    pub maintenance: Option<f64>,
    pub cleaning: Option<f64>,
    pub supplies: Option<f64>,
    pub other: Option<f64>,
}

/// Contents of an additional-data JSON file:
///
/// ```json
/// {"str_metrics": {"adr": 150, "occupancy_rate": 0.6},
///  "monthly_expenses": {"utilities": 220, "cleaning": 600}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalData {
    pub str_metrics: Option<StrMetricsInput>,
    pub monthly_expenses: Option<MonthlyExpensesInput>,
}

impl AdditionalData {
    pub fn from_json(json: &str) -> Result<Self, AnalyzerError> {
        serde_json::from_str(json)
            .map_err(AnalyzerError::from)
            .context("Invalid additional data")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalyzerError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read data file {}", path.display()))?;
        Self::from_json(&json)
    }
}

/// Zero counts as "not supplied".
fn given(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn overlay(target: &mut Option<f64>, value: Option<f64>) {
    if let Some(v) = given(value) {
        *target = Some(v);
    }
}

impl ListingRecord {
    /// Returns a new record with the supplied, non-zero values applied.
    pub fn with_overrides(&self, data: &AdditionalData) -> Self {
        let mut record = self.clone();

        if let Some(metrics) = &data.str_metrics {
            overlay(&mut record.adr, metrics.adr);
            overlay(&mut record.occupancy_rate, metrics.occupancy_rate);
        }

        if let Some(expenses) = &data.monthly_expenses {
            let target = &mut record.expenses;
            overlay(&mut target.property_taxes, expenses.property_taxes);
            overlay(&mut target.insurance, expenses.insurance);
            overlay(&mut target.utilities, expenses.utilities);
            overlay(&mut target.management, expenses.management);
            overlay(&mut target.maintenance, expenses.maintenance);
            overlay(&mut target.cleaning, expenses.cleaning);
            overlay(&mut target.supplies, expenses.supplies);
            overlay(&mut target.other, expenses.other);
        }

        tracing::debug!(
            "Applied additional data: adr={:?}, occupancy_rate={:?}",
            record.adr,
            record.occupancy_rate
        );
        record
    }
}

/// Property re-analysis input: `{"property": {...}}` with snake_case fields.
///
/// Omitted and `null` fields both take the [`ListingRecord`] defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyData {
    pub property: ListingRecord,
}

impl PropertyData {
    pub fn from_json(json: &str) -> Result<Self, AnalyzerError> {
        let parse = || -> Result<Self, AnalyzerError> {
            let mut value: serde_json::Value = serde_json::from_str(json)?;
            if let Some(property) = value
                .get_mut("property")
                .and_then(serde_json::Value::as_object_mut)
            {
                property.retain(|_, field| !field.is_null());
            }
            Ok(serde_json::from_value(value)?)
        };
        parse().context("Invalid property data")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<ListingRecord, AnalyzerError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read property data {}", path.display()))?;
        Ok(Self::from_json(&json)?.property)
    }
}
