use serde::{Deserialize, Serialize};

// ============ Listing Models ============

/// Maximum number of image URLs kept on a record.
pub const MAX_IMAGE_URLS: usize = 3;
/// Maximum number of categorized source links kept on a record.
pub const MAX_SOURCE_LINKS: usize = 3;
/// Descriptions longer than this are cut and suffixed with `...`.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Placeholder used for text fields that could not be extracted.
pub const NOT_AVAILABLE: &str = "N/A";
/// Placeholder used by the PDF and tabular paths.
pub const UNKNOWN: &str = "Unknown";

/// Normalized listing extracted from an email, PDF, spreadsheet or text file.
///
/// Every field carries a usable default, so a record is always complete even
/// when nothing could be extracted from the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingRecord {
    /// Full street address as found in the source.
    pub address: String,
    pub city: String,
    /// Full state name when the abbreviation is known, otherwise the raw value.
    pub state: String,
    pub zip_code: String,
    /// Normalized property type tag (e.g. "single-family", "condo").
    pub property_type: String,
    pub purchase_price: f64,
    /// Monthly rent, 0.0 when unknown.
    pub monthly_rent: f64,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub square_footage: u32,
    pub lot_size: Option<u32>,
    /// Year built, 0 when unknown.
    pub year_built: u32,
    pub description: String,
    pub listing_url: String,
    pub image_urls: Vec<String>,
    pub source_links: Vec<SourceLink>,

    /// Short-term rental average daily rate.
    pub adr: Option<f64>,
    /// Short-term rental occupancy as a decimal (0.65 = 65%).
    pub occupancy_rate: Option<f64>,
    /// User-supplied monthly expenses for the short-term rental projection.
    pub expenses: ExpenseOverrides,
    pub financing: FinancingOverrides,
}

impl Default for ListingRecord {
    fn default() -> Self {
        Self {
            address: NOT_AVAILABLE.to_string(),
            city: NOT_AVAILABLE.to_string(),
            state: NOT_AVAILABLE.to_string(),
            zip_code: NOT_AVAILABLE.to_string(),
            property_type: "single-family".to_string(),
            purchase_price: 0.0,
            monthly_rent: 0.0,
            bedrooms: 0,
            bathrooms: 0.0,
            square_footage: 0,
            lot_size: None,
            year_built: 0,
            description: "Property listing details".to_string(),
            listing_url: NOT_AVAILABLE.to_string(),
            image_urls: Vec::new(),
            source_links: Vec::new(),
            adr: None,
            occupancy_rate: None,
            expenses: ExpenseOverrides::default(),
            financing: FinancingOverrides::default(),
        }
    }
}

impl ListingRecord {
    /// Returns a copy of this record with new financing percentages.
    pub fn with_financing(&self, financing: FinancingOverrides) -> Self {
        Self {
            financing,
            ..self.clone()
        }
    }

    /// Returns a copy of this record with short-term rental figures set.
    pub fn with_str_metrics(&self, adr: f64, occupancy_rate: f64) -> Self {
        Self {
            adr: Some(adr),
            occupancy_rate: Some(occupancy_rate),
            ..self.clone()
        }
    }

    /// Whether the short-term rental projection can run for this record.
    pub fn has_str_metrics(&self) -> bool {
        self.adr.is_some() && self.occupancy_rate.is_some()
    }
}

/// Category assigned to a link found in the listing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// A listing portal page (Zillow, Redfin, Trulia, ...).
    Listing,
    /// A brokerage, agent or realty site.
    Company,
    /// Any other property-related page.
    External,
}

/// A link found in the listing source, kept after tracking links are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLink {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub description: Option<String>,
}

/// Monthly expenses the user supplies for the short-term rental projection.
///
/// A `None` (or zero) entry falls back to the estimate derived by the evaluator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseOverrides {
    pub property_taxes: Option<f64>,
    pub insurance: Option<f64>,
    pub utilities: Option<f64>,
    pub management: Option<f64>,
    pub maintenance: Option<f64>,
    pub cleaning: Option<f64>,
    pub supplies: Option<f64>,
    pub other: Option<f64>,
}

/// Financing percentages carried on a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingOverrides {
    pub downpayment_pct: f64,
    pub closing_costs_pct: f64,
    pub initial_fixed_costs_pct: f64,
    /// Share of gross monthly rent set aside for maintenance.
    pub maintenance_reserve_pct: f64,
}

impl Default for FinancingOverrides {
    fn default() -> Self {
        Self {
            downpayment_pct: 0.20,
            closing_costs_pct: 0.05,
            initial_fixed_costs_pct: 0.01,
            maintenance_reserve_pct: 0.05,
        }
    }
}

// ============ Criteria Models ============

/// Investment screening criteria. All percentages are decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentCriteria {
    /// Allowed normalized property type tags.
    pub property_types: Vec<String>,
    /// Target location, compared verbatim against the listing state.
    pub location: String,
    pub max_purchase_price: f64,
    pub downpayment_pct_min: f64,
    pub downpayment_pct_max: f64,
    pub closing_costs_pct_min: f64,
    pub closing_costs_pct_max: f64,
    pub initial_fixed_costs_pct: f64,
    pub maintenance_reserve_pct: f64,
    pub coc_benchmark_min: f64,
    pub coc_benchmark_max: f64,
    /// The COC "bare minimum" is a band, not a floor.
    pub coc_minimum_min: f64,
    pub coc_minimum_max: f64,
    pub cap_benchmark_min: f64,
    pub cap_benchmark_max: f64,
    pub cap_minimum: f64,
    #[serde(default)]
    pub str_thresholds: StrThresholds,
}

/// Optional short-term rental thresholds. Absent thresholds are not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrThresholds {
    pub min_adr: Option<f64>,
    pub min_occupancy_rate: Option<f64>,
    pub min_gross_yield: Option<f64>,
    pub min_annual_revenue: Option<f64>,
}

// ============ Analysis Models ============

/// Result of evaluating one listing against the investment criteria.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealAnalysis {
    pub property: ListingRecord,

    pub calculated_downpayment: f64,
    pub calculated_closing_costs: f64,
    pub calculated_initial_fixed_costs: f64,
    pub estimated_maintenance_reserve: f64,
    pub total_cash_needed: f64,
    pub passes_one_percent_rule: bool,

    pub loan_amount: f64,
    /// Principal and interest only.
    pub monthly_mortgage_payment: f64,
    pub estimated_property_tax: f64,
    pub estimated_insurance: f64,
    pub estimated_vacancy: f64,
    pub estimated_property_management: f64,
    /// Long-term rental monthly outlay, mortgage included.
    pub total_monthly_expenses: f64,

    pub cash_flow: f64,
    pub cash_flow_positive: bool,
    pub coc_return: f64,
    pub coc_meets_benchmark: bool,
    pub coc_meets_minimum: bool,

    pub net_operating_income: f64,
    pub cap_rate: f64,
    pub cap_meets_benchmark: bool,
    pub cap_meets_minimum: bool,

    /// Present only when the listing carries both ADR and occupancy.
    pub short_term_rental: Option<StrAnalysis>,

    pub meets_criteria: bool,
}

impl DealAnalysis {
    pub fn projected_annual_revenue(&self) -> Option<f64> {
        self.short_term_rental
            .as_ref()
            .map(|s| s.projected_annual_revenue)
    }

    pub fn projected_gross_yield(&self) -> Option<f64> {
        self.short_term_rental
            .as_ref()
            .and_then(|s| s.projected_gross_yield)
    }

    pub fn str_net_income(&self) -> Option<f64> {
        self.short_term_rental.as_ref().map(|s| s.net_income)
    }

    pub fn str_meets_criteria(&self) -> Option<bool> {
        self.short_term_rental.as_ref().map(|s| s.meets_criteria)
    }
}

/// Short-term rental projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrAnalysis {
    pub occupied_days: f64,
    pub projected_annual_revenue: f64,
    /// `None` when the purchase price is zero.
    pub projected_gross_yield: Option<f64>,
    pub expenses: StrExpenseBreakdown,
    pub total_monthly_expenses: f64,
    pub net_income: f64,
    pub meets_criteria: bool,
}

/// Monthly expense lines used by the short-term rental projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrExpenseBreakdown {
    pub mortgage: f64,
    pub property_taxes: f64,
    pub insurance: f64,
    pub utilities: f64,
    pub management: f64,
    pub maintenance: f64,
    pub cleaning: f64,
    pub supplies: f64,
    pub other: f64,
}

impl StrExpenseBreakdown {
    pub fn total(&self) -> f64 {
        self.mortgage
            + self.property_taxes
            + self.insurance
            + self.utilities
            + self.management
            + self.maintenance
            + self.cleaning
            + self.supplies
            + self.other
    }
}
