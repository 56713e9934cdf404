//! The investment-criteria document.
//!
//! Criteria live in a human-edited markdown file with bold labels, e.g.
//!
//! ```text
//! **Max Purchase Price:** $250,000
//! **Cash-on-Cash (COC) Return:** Benchmark of 8% to 12%, bare minimum of 5% to 7%
//! ```
//!
//! Percentages are written as whole numbers and stored as decimals.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, NoExpand, Regex};

use crate::errors::{AnalyzerError, ResultExt};
use crate::models::{InvestmentCriteria, StrThresholds};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid built-in criteria pattern")
}

static PROPERTY_TYPES: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\*\*Property Types:\*\*\s*(.*)"));
static LOCATION: LazyLock<Regex> = LazyLock::new(|| compile(r"\*\*Location:\*\*\s*(.*)"));
static MAX_PRICE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\*\*Max Purchase Price:\*\*\s*\$(\d{1,3}(?:,\d{3})*)"));
static DOWNPAYMENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\*\*Downpayment:\*\*\s*Anticipate\s*(\d{1,2})-(\d{1,2})%"));
static CLOSING_COSTS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\*\*Closing Costs:\*\*\s*Estimate\s*(\d{1,2})% to (\d{1,2})%"));
static INITIAL_FIXED_COSTS: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\*\*Initial Fixed Costs:\*\*\s*Estimate an additional\s*(\d{1,2})%")
});
static MAINTENANCE_RESERVE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\*\*Maintenance Reserve:\*\*\s*Allow\s*(\d{1,2})%"));
static COC_RETURN: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"\*\*Cash-on-Cash \(COC\) Return:\*\*\s*Benchmark of\s*(\d{1,2})% to (\d{1,2})%, bare minimum of (\d{1,2})% to (\d{1,2})%",
    )
});
static CAP_RATE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"\*\*Capitalization \(Cap\) Rate:\*\*\s*Benchmark of\s*(\d{1,2})% to (\d{1,2})%, bare minimum of (\d{1,2})%",
    )
});
static STR_MIN_ADR: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\*\*Minimum ADR \(Average Daily Rate\):\*\*\s*\$(\d+)"));
static STR_MIN_OCCUPANCY: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\*\*Minimum Occupancy Rate:\*\*\s*(\d{1,2})%\s*\(([0-9.]+)\)")
});
static STR_MIN_YIELD: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\*\*Minimum Gross Yield:\*\*\s*(\d{1,2})%\s*\(([0-9.]+)\)"));
static STR_MIN_REVENUE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\*\*Minimum Annual Revenue:\*\*\s*\$(\d{1,3}(?:,\d{3})*)")
});

// Rewrite targets for `update_criteria`; looser than the read patterns.
static MAX_PRICE_LINE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\*\*Max Purchase Price:\*\*\s*\$[\d,]+"));
static COC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"\*\*Cash-on-Cash \(COC\) Return:\*\*\s*Benchmark of\s*\d{1,2}% to \d{1,2}%, bare minimum of \d{1,2}% to \d{1,2}%",
    )
});
static CAP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"\*\*Capitalization \(Cap\) Rate:\*\*\s*Benchmark of\s*\d{1,2}% to \d{1,2}%, bare minimum of \d{1,2}%",
    )
});

/// Finds a required labelled entry, warning when the label is present but
/// its value is not in the expected shape.
fn required<'t>(
    re: &Regex,
    text: &'t str,
    label: &str,
    key: &str,
) -> Result<Captures<'t>, AnalyzerError> {
    re.captures(text).ok_or_else(|| {
        if text.contains(label) {
            tracing::warn!("Unrecognized value for {} in criteria document", label);
        }
        AnalyzerError::MissingCriteria(key.to_string())
    })
}

fn number(caps: &Captures<'_>, group: usize, key: &str) -> Result<f64, AnalyzerError> {
    let raw = caps.get(group).map(|m| m.as_str()).unwrap_or_default();
    raw.replace(',', "")
        .parse::<f64>()
        .map_err(|_| AnalyzerError::CriteriaParse(format!("{}: '{}' is not a number", key, raw)))
}

fn percent(caps: &Captures<'_>, group: usize, key: &str) -> Result<f64, AnalyzerError> {
    Ok(number(caps, group, key)? / 100.0)
}

fn optional(re: &Regex, text: &str, group: usize, key: &str) -> Result<Option<f64>, AnalyzerError> {
    re.captures(text)
        .map(|caps| number(&caps, group, key))
        .transpose()
}

/// Turns "Single family and multi family properties" into
/// `["single-family", "multi-family"]`.
fn parse_property_types(raw: &str) -> Vec<String> {
    raw.split("and")
        .map(|part| {
            part.trim()
                .replace(' ', "-")
                .replace("properties", "")
                .trim_matches('-')
                .to_lowercase()
        })
        .collect()
}

/// Parses the criteria document.
///
/// Every core criterion is required; short-term rental thresholds are optional.
pub fn parse_criteria(text: &str) -> Result<InvestmentCriteria, AnalyzerError> {
    let types = required(&PROPERTY_TYPES, text, "**Property Types:**", "property_types")?;
    let location = required(&LOCATION, text, "**Location:**", "location")?;
    let max_price = required(&MAX_PRICE, text, "**Max Purchase Price:**", "max_purchase_price")?;
    let downpayment = required(&DOWNPAYMENT, text, "**Downpayment:**", "downpayment_pct")?;
    let closing = required(&CLOSING_COSTS, text, "**Closing Costs:**", "closing_costs_pct")?;
    let fixed = required(
        &INITIAL_FIXED_COSTS,
        text,
        "**Initial Fixed Costs:**",
        "initial_fixed_costs_pct",
    )?;
    let reserve = required(
        &MAINTENANCE_RESERVE,
        text,
        "**Maintenance Reserve:**",
        "maintenance_reserve_pct",
    )?;
    let coc = required(&COC_RETURN, text, "**Cash-on-Cash (COC) Return:**", "coc_return")?;
    let cap = required(&CAP_RATE, text, "**Capitalization (Cap) Rate:**", "cap_rate")?;

    let criteria = InvestmentCriteria {
        property_types: parse_property_types(&types[1]),
        location: location[1].trim().to_string(),
        max_purchase_price: number(&max_price, 1, "max_purchase_price")?,
        downpayment_pct_min: percent(&downpayment, 1, "downpayment_pct_min")?,
        downpayment_pct_max: percent(&downpayment, 2, "downpayment_pct_max")?,
        closing_costs_pct_min: percent(&closing, 1, "closing_costs_pct_min")?,
        closing_costs_pct_max: percent(&closing, 2, "closing_costs_pct_max")?,
        initial_fixed_costs_pct: percent(&fixed, 1, "initial_fixed_costs_pct")?,
        maintenance_reserve_pct: percent(&reserve, 1, "maintenance_reserve_pct")?,
        coc_benchmark_min: percent(&coc, 1, "coc_benchmark_min")?,
        coc_benchmark_max: percent(&coc, 2, "coc_benchmark_max")?,
        coc_minimum_min: percent(&coc, 3, "coc_minimum_min")?,
        coc_minimum_max: percent(&coc, 4, "coc_minimum_max")?,
        cap_benchmark_min: percent(&cap, 1, "cap_benchmark_min")?,
        cap_benchmark_max: percent(&cap, 2, "cap_benchmark_max")?,
        cap_minimum: percent(&cap, 3, "cap_minimum")?,
        str_thresholds: StrThresholds {
            min_adr: optional(&STR_MIN_ADR, text, 1, "str_min_adr")?,
            min_occupancy_rate: optional(&STR_MIN_OCCUPANCY, text, 2, "str_min_occupancy_rate")?,
            min_gross_yield: optional(&STR_MIN_YIELD, text, 2, "str_min_gross_yield")?,
            min_annual_revenue: optional(&STR_MIN_REVENUE, text, 1, "str_min_annual_revenue")?,
        },
    };

    Ok(criteria)
}

/// Reads and parses a criteria document from disk.
pub fn load_criteria(path: impl AsRef<Path>) -> Result<InvestmentCriteria, AnalyzerError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read criteria file {}", path.display()))?;
    let criteria = parse_criteria(&text)
        .with_context(|| format!("Invalid criteria file {}", path.display()))?;

    tracing::info!(
        "Loaded investment criteria from {} ({} property types, location {})",
        path.display(),
        criteria.property_types.len(),
        criteria.location
    );
    Ok(criteria)
}

/// New values for the editable criteria lines. Rates are decimals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriteriaUpdate {
    pub price_max: Option<f64>,
    pub coc_return_min: Option<f64>,
    pub coc_return_max: Option<f64>,
    pub cap_rate_min: Option<f64>,
    pub cap_rate_max: Option<f64>,
}

/// Formats a whole-dollar amount with thousands separators: `250000.4` -> `250,000`.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        out.insert(0, '-');
    }
    out
}

fn whole_percent(rate: f64) -> String {
    format!("{:.0}", rate * 100.0)
}

/// Rewrites the max price, COC and cap-rate lines of a criteria document.
///
/// A rate line is only rewritten when both its min and max are given. The
/// benchmark range is written as `max% to max%` and the minimum from `min`.
pub fn update_criteria(text: &str, update: &CriteriaUpdate) -> String {
    let mut content = text.to_string();

    if let Some(price_max) = update.price_max {
        let line = format!("**Max Purchase Price:** ${}", format_thousands(price_max));
        content = MAX_PRICE_LINE
            .replace_all(&content, NoExpand(&line))
            .into_owned();
    }

    if let (Some(min), Some(max)) = (update.coc_return_min, update.coc_return_max) {
        let line = format!(
            "**Cash-on-Cash (COC) Return:** Benchmark of {max}% to {max}%, bare minimum of {min}% to {max}%",
            max = whole_percent(max),
            min = whole_percent(min),
        );
        content = COC_LINE.replace_all(&content, NoExpand(&line)).into_owned();
    }

    if let (Some(min), Some(max)) = (update.cap_rate_min, update.cap_rate_max) {
        let line = format!(
            "**Capitalization (Cap) Rate:** Benchmark of {max}% to {max}%, bare minimum of {min}%",
            max = whole_percent(max),
            min = whole_percent(min),
        );
        content = CAP_LINE.replace_all(&content, NoExpand(&line)).into_owned();
    }

    content
}

/// Applies [`update_criteria`] to a file in place.
pub fn update_criteria_file(
    path: impl AsRef<Path>,
    update: &CriteriaUpdate,
) -> Result<(), AnalyzerError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read criteria file {}", path.display()))?;
    std::fs::write(path, update_criteria(&text, update))
        .with_context(|| format!("Failed to write criteria file {}", path.display()))?;

    tracing::info!("Updated investment criteria in {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_type_list() {
        assert_eq!(
            parse_property_types("Single family and multi family properties"),
            vec!["single-family", "multi-family"]
        );
        assert_eq!(parse_property_types("Condo"), vec!["condo"]);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(250000.0), "250,000");
        assert_eq!(format_thousands(999.6), "1,000");
        assert_eq!(format_thousands(1234567.0), "1,234,567");
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(-4500.0), "-4,500");
    }

    #[test]
    fn test_missing_core_key() {
        let err = parse_criteria("**Location:** Ohio").unwrap_err();
        assert!(matches!(err, AnalyzerError::MissingCriteria(ref k) if k == "property_types"));
    }
}
