//! Deal evaluation: financing, cash flow, return ratios and the screening verdict.
//!
//! Everything here is a pure computation over a [`ListingRecord`] and an
//! [`InvestmentCriteria`]. Divisions that could hit zero are guarded and
//! yield `0.0` instead.

use crate::models::{
    DealAnalysis, InvestmentCriteria, ListingRecord, StrAnalysis, StrExpenseBreakdown,
    StrThresholds,
};

/// Nominal annual mortgage rate.
pub const ANNUAL_INTEREST_RATE: f64 = 0.07;
/// 30-year fixed term, in monthly payments.
pub const LOAN_TERM_MONTHS: u32 = 360;

const ANNUAL_PROPERTY_TAX_RATE: f64 = 0.012;
const MONTHLY_INSURANCE: f64 = 100.0;
const VACANCY_RATE: f64 = 0.05;
const MANAGEMENT_RATE: f64 = 0.10;
const ONE_PERCENT_RULE: f64 = 0.01;

const DAYS_PER_YEAR: f64 = 365.0;
const STR_UTILITIES: f64 = 150.0;
const STR_MANAGEMENT_RATE: f64 = 0.15;
const STR_MAINTENANCE_RATE: f64 = 0.05;
const STR_CLEANING_PER_OCCUPIED_DAY: f64 = 75.0;
const STR_SUPPLIES: f64 = 50.0;

/// Fixed-rate annuity payment (principal and interest).
///
/// A zero periodic rate degrades to straight-line repayment. Terms long enough
/// to overflow the growth factor converge to interest-only.
pub fn monthly_mortgage_payment(loan_amount: f64, annual_rate: f64, periods: u32) -> f64 {
    if periods == 0 {
        return 0.0;
    }
    let monthly_rate = annual_rate / 12.0;
    if monthly_rate > 0.0 {
        let growth = (1.0 + monthly_rate).powf(f64::from(periods));
        if growth.is_infinite() {
            return loan_amount * monthly_rate;
        }
        loan_amount * (monthly_rate * growth) / (growth - 1.0)
    } else {
        loan_amount / f64::from(periods)
    }
}

fn within(value: f64, min: f64, max: f64) -> bool {
    value >= min && value <= max
}

/// Evaluates one listing against the screening criteria.
pub fn evaluate(record: &ListingRecord, criteria: &InvestmentCriteria) -> DealAnalysis {
    let price = record.purchase_price;
    let rent = record.monthly_rent;

    let downpayment_pct = (criteria.downpayment_pct_min + criteria.downpayment_pct_max) / 2.0;
    let closing_costs_pct = (criteria.closing_costs_pct_min + criteria.closing_costs_pct_max) / 2.0;

    let calculated_downpayment = price * downpayment_pct;
    let calculated_closing_costs = price * closing_costs_pct;
    let calculated_initial_fixed_costs = price * criteria.initial_fixed_costs_pct;
    let estimated_maintenance_reserve = rent * criteria.maintenance_reserve_pct;

    let total_cash_needed =
        calculated_downpayment + calculated_closing_costs + calculated_initial_fixed_costs;

    let passes_one_percent_rule = rent >= price * ONE_PERCENT_RULE;

    let loan_amount = price - calculated_downpayment;
    let mortgage = monthly_mortgage_payment(loan_amount, ANNUAL_INTEREST_RATE, LOAN_TERM_MONTHS);

    let estimated_property_tax = price * ANNUAL_PROPERTY_TAX_RATE / 12.0;
    let estimated_insurance = MONTHLY_INSURANCE;
    let estimated_vacancy = rent * VACANCY_RATE;
    let estimated_property_management = rent * MANAGEMENT_RATE;

    let operating_expenses = estimated_maintenance_reserve
        + estimated_property_tax
        + estimated_insurance
        + estimated_vacancy
        + estimated_property_management;
    let total_monthly_expenses = mortgage + operating_expenses;

    let cash_flow = rent - total_monthly_expenses;
    let cash_flow_positive = cash_flow > 0.0;

    let coc_return = if total_cash_needed > 0.0 {
        cash_flow * 12.0 / total_cash_needed
    } else {
        0.0
    };
    let coc_meets_benchmark = within(
        coc_return,
        criteria.coc_benchmark_min,
        criteria.coc_benchmark_max,
    );
    // Two-sided: the criteria document states the bare minimum as a band.
    let coc_meets_minimum = within(coc_return, criteria.coc_minimum_min, criteria.coc_minimum_max);

    let net_operating_income = rent * 12.0 - operating_expenses * 12.0;
    let cap_rate = if price > 0.0 {
        net_operating_income / price
    } else {
        0.0
    };
    let cap_meets_benchmark = within(cap_rate, criteria.cap_benchmark_min, criteria.cap_benchmark_max);
    let cap_meets_minimum = cap_rate >= criteria.cap_minimum;

    let short_term_rental = match (record.adr, record.occupancy_rate) {
        (Some(adr), Some(occupancy_rate)) => Some(project_short_term_rental(
            record,
            adr,
            occupancy_rate,
            mortgage,
            estimated_property_tax,
            &criteria.str_thresholds,
        )),
        _ => None,
    };

    let type_allowed = criteria.property_types.contains(&record.property_type);
    let location_matches = record.state == criteria.location;
    let within_budget = price <= criteria.max_purchase_price;

    let mut meets_criteria = type_allowed
        && location_matches
        && within_budget
        && passes_one_percent_rule
        && cash_flow_positive
        && coc_meets_minimum
        && cap_meets_minimum;
    if let Some(str_analysis) = &short_term_rental {
        meets_criteria = meets_criteria && str_analysis.meets_criteria;
    }

    tracing::debug!(
        "Verdict inputs: type_allowed={}, location_matches={}, within_budget={}, one_percent={}, cash_flow_positive={}, coc_min={}, cap_min={}",
        type_allowed,
        location_matches,
        within_budget,
        passes_one_percent_rule,
        cash_flow_positive,
        coc_meets_minimum,
        cap_meets_minimum
    );
    tracing::info!(
        "Evaluated {}: cash_flow={:.2}, coc={:.4}, cap={:.4}, meets_criteria={}",
        record.address,
        cash_flow,
        coc_return,
        cap_rate,
        meets_criteria
    );

    DealAnalysis {
        property: record.clone(),
        calculated_downpayment,
        calculated_closing_costs,
        calculated_initial_fixed_costs,
        estimated_maintenance_reserve,
        total_cash_needed,
        passes_one_percent_rule,
        loan_amount,
        monthly_mortgage_payment: mortgage,
        estimated_property_tax,
        estimated_insurance,
        estimated_vacancy,
        estimated_property_management,
        total_monthly_expenses,
        cash_flow,
        cash_flow_positive,
        coc_return,
        coc_meets_benchmark,
        coc_meets_minimum,
        net_operating_income,
        cap_rate,
        cap_meets_benchmark,
        cap_meets_minimum,
        short_term_rental,
        meets_criteria,
    }
}

/// A user-supplied expense counts only when it is present and non-zero.
fn supplied(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn project_short_term_rental(
    record: &ListingRecord,
    adr: f64,
    occupancy_rate: f64,
    mortgage: f64,
    estimated_property_tax: f64,
    thresholds: &StrThresholds,
) -> StrAnalysis {
    let occupied_days = DAYS_PER_YEAR * occupancy_rate;
    let projected_annual_revenue = adr * occupied_days;
    let projected_gross_yield =
        (record.purchase_price > 0.0).then(|| projected_annual_revenue / record.purchase_price);

    let overrides = &record.expenses;
    let expenses = StrExpenseBreakdown {
        mortgage,
        property_taxes: supplied(overrides.property_taxes).unwrap_or(estimated_property_tax),
        insurance: supplied(overrides.insurance).unwrap_or(MONTHLY_INSURANCE),
        utilities: supplied(overrides.utilities).unwrap_or(STR_UTILITIES),
        management: supplied(overrides.management)
            .unwrap_or(projected_annual_revenue * STR_MANAGEMENT_RATE / 12.0),
        maintenance: supplied(overrides.maintenance)
            .unwrap_or(projected_annual_revenue * STR_MAINTENANCE_RATE / 12.0),
        cleaning: supplied(overrides.cleaning)
            .unwrap_or(STR_CLEANING_PER_OCCUPIED_DAY * occupancy_rate * 30.0),
        supplies: supplied(overrides.supplies).unwrap_or(STR_SUPPLIES),
        other: supplied(overrides.other).unwrap_or(0.0),
    };
    let total_monthly_expenses = expenses.total();
    let net_income = projected_annual_revenue / 12.0 - total_monthly_expenses;

    let mut meets_criteria = true;
    if let Some(min_adr) = thresholds.min_adr {
        if adr < min_adr {
            meets_criteria = false;
        }
    }
    if let Some(min_occupancy) = thresholds.min_occupancy_rate {
        if occupancy_rate < min_occupancy {
            meets_criteria = false;
        }
    }
    if let Some(min_yield) = thresholds.min_gross_yield {
        // No yield can be computed for a zero price, which cannot satisfy a floor.
        if projected_gross_yield.map_or(true, |y| y < min_yield) {
            meets_criteria = false;
        }
    }
    if let Some(min_revenue) = thresholds.min_annual_revenue {
        if projected_annual_revenue < min_revenue {
            meets_criteria = false;
        }
    }

    tracing::debug!(
        "STR projection: revenue={:.2}, expenses={:.2}, net={:.2}, meets_criteria={}",
        projected_annual_revenue,
        total_monthly_expenses,
        net_income,
        meets_criteria
    );

    StrAnalysis {
        occupied_days,
        projected_annual_revenue,
        projected_gross_yield,
        expenses,
        total_monthly_expenses,
        net_income,
        meets_criteria,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_mortgage_payment_standard() {
        let payment = monthly_mortgage_payment(160_000.0, 0.07, 360);
        assert!(close(payment, 1064.4839922866918), "got {}", payment);
    }

    #[test]
    fn test_mortgage_payment_zero_rate_is_straight_line() {
        let payment = monthly_mortgage_payment(120_000.0, 0.0, 360);
        assert!(close(payment, 333.3333333333333));
    }

    #[test]
    fn test_mortgage_payment_extreme_terms_stay_positive() {
        let payment = monthly_mortgage_payment(120_000.0, 0.07, u32::MAX);
        assert!(payment.is_finite() && payment > 0.0, "got {}", payment);
        assert!(close(payment, 700.0), "got {}", payment);

        let above_i32 = monthly_mortgage_payment(120_000.0, 0.07, i32::MAX as u32 + 1);
        assert!(close(above_i32, 700.0), "got {}", above_i32);
    }

    #[test]
    fn test_mortgage_payment_zero_periods() {
        assert_eq!(monthly_mortgage_payment(120_000.0, 0.07, 0), 0.0);
    }

    #[test]
    fn test_supplied_treats_zero_as_absent() {
        assert_eq!(supplied(Some(0.0)), None);
        assert_eq!(supplied(None), None);
        assert_eq!(supplied(Some(12.5)), Some(12.5));
    }

    #[test]
    fn test_within_is_inclusive() {
        assert!(within(0.08, 0.08, 0.12));
        assert!(within(0.12, 0.08, 0.12));
        assert!(!within(0.1201, 0.08, 0.12));
    }
}
