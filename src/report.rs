//! Output rendering for a [`DealAnalysis`]: a camelCase JSON report and a
//! short plain-text summary.

use chrono::Utc;
use serde::Serialize;

use crate::models::{DealAnalysis, ListingRecord};

/// Listing fields echoed in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportProperty {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub property_type: String,
    pub purchase_price: f64,
    pub monthly_rent: f64,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub square_footage: u32,
    pub year_built: u32,
    pub description: String,
    pub listing_url: String,
    pub adr: Option<f64>,
    pub occupancy_rate: Option<f64>,
}

impl From<&ListingRecord> for ReportProperty {
    fn from(record: &ListingRecord) -> Self {
        Self {
            address: record.address.clone(),
            city: record.city.clone(),
            state: record.state.clone(),
            zip_code: record.zip_code.clone(),
            property_type: record.property_type.clone(),
            purchase_price: record.purchase_price,
            monthly_rent: record.monthly_rent,
            bedrooms: record.bedrooms,
            bathrooms: record.bathrooms,
            square_footage: record.square_footage,
            year_built: record.year_built,
            description: record.description.clone(),
            listing_url: record.listing_url.clone(),
            adr: record.adr,
            occupancy_rate: record.occupancy_rate,
        }
    }
}

/// JSON view of an analysis. Short-term rental fields are `null` when the
/// projection did not run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealReport {
    pub property_id: String,
    pub property: ReportProperty,
    pub calculated_downpayment: f64,
    pub calculated_closing_costs: f64,
    pub calculated_initial_fixed_costs: f64,
    pub estimated_maintenance_reserve: f64,
    pub total_cash_needed: f64,
    #[serde(rename = "passes1PercentRule")]
    pub passes_one_percent_rule: bool,
    pub cash_flow: f64,
    pub cash_flow_positive: bool,
    pub coc_return: f64,
    pub coc_meets_benchmark: bool,
    pub coc_meets_minimum: bool,
    pub cap_rate: f64,
    pub cap_meets_benchmark: bool,
    pub cap_meets_minimum: bool,
    pub projected_annual_revenue: Option<f64>,
    pub projected_gross_yield: Option<f64>,
    /// Short-term rental monthly total.
    pub total_monthly_expenses: Option<f64>,
    pub str_net_income: Option<f64>,
    pub str_meets_criteria: Option<bool>,
    pub meets_criteria: bool,
}

/// Ephemeral id for a report that is not persisted: `temp-<unix millis>`.
pub fn temporary_property_id() -> String {
    format!("temp-{}", Utc::now().timestamp_millis())
}

impl DealReport {
    pub fn from_analysis(analysis: &DealAnalysis, property_id: impl Into<String>) -> Self {
        let short_term = analysis.short_term_rental.as_ref();
        Self {
            property_id: property_id.into(),
            property: ReportProperty::from(&analysis.property),
            calculated_downpayment: analysis.calculated_downpayment,
            calculated_closing_costs: analysis.calculated_closing_costs,
            calculated_initial_fixed_costs: analysis.calculated_initial_fixed_costs,
            estimated_maintenance_reserve: analysis.estimated_maintenance_reserve,
            total_cash_needed: analysis.total_cash_needed,
            passes_one_percent_rule: analysis.passes_one_percent_rule,
            cash_flow: analysis.cash_flow,
            cash_flow_positive: analysis.cash_flow_positive,
            coc_return: analysis.coc_return,
            coc_meets_benchmark: analysis.coc_meets_benchmark,
            coc_meets_minimum: analysis.coc_meets_minimum,
            cap_rate: analysis.cap_rate,
            cap_meets_benchmark: analysis.cap_meets_benchmark,
            cap_meets_minimum: analysis.cap_meets_minimum,
            projected_annual_revenue: analysis.projected_annual_revenue(),
            projected_gross_yield: analysis.projected_gross_yield(),
            total_monthly_expenses: short_term.map(|s| s.total_monthly_expenses),
            str_net_income: analysis.str_net_income(),
            str_meets_criteria: analysis.str_meets_criteria(),
            meets_criteria: analysis.meets_criteria,
        }
    }
}

/// Plain-text summary, one line per figure.
pub fn render_summary(analysis: &DealAnalysis, file_type: Option<&str>) -> String {
    let mut lines = vec![format!("Property: {}", analysis.property.address)];
    if let Some(file_type) = file_type {
        lines.push(format!("File Type: {}", file_type));
    }
    lines.push(format!(
        "Meets Criteria: {}",
        if analysis.meets_criteria { "YES" } else { "NO" }
    ));
    lines.push(format!("Cash Flow: ${:.2}", analysis.cash_flow));
    lines.push(format!("COC Return: {:.2}%", analysis.coc_return * 100.0));
    lines.push(format!("Cap Rate: {:.2}%", analysis.cap_rate * 100.0));
    lines.join("\n")
}
