//! Calculation result models for the take-home pay engine.
//!
//! This module contains the flat [`CalculationResult`] emitted for every
//! calculation, the richer [`DetailedCalculation`] with per-band lines and an
//! audit trace, and the [`SalaryComparison`] built from two calculations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Region, StudentLoanPlan};

/// The take-home breakdown for one salary.
///
/// Every monetary and percentage field is rounded to two decimal places.
/// The fields always satisfy
/// `net_annual + income_tax + national_insurance + student_loan_repayment + pension_contribution == gross`.
///
/// Serialized as a flat camelCase object, e.g. `{"gross": "30000.00", "incomeTax": "3486.00", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// Annual gross salary.
    pub gross: Decimal,
    /// Annual pension contribution.
    pub pension_contribution: Decimal,
    /// Annual income tax.
    pub income_tax: Decimal,
    /// Annual employee National Insurance.
    pub national_insurance: Decimal,
    /// Annual student loan repayment.
    pub student_loan_repayment: Decimal,
    /// Annual take-home pay.
    pub net_annual: Decimal,
    /// Take-home pay per month.
    pub net_monthly: Decimal,
    /// Take-home pay per week.
    pub net_weekly: Decimal,
    /// Income tax as a percentage of gross.
    pub effective_tax_rate_percent: Decimal,
    /// National Insurance as a percentage of gross.
    pub effective_ni_rate_percent: Decimal,
    /// The region the calculation used.
    pub region: Region,
    /// The student loan plan the calculation used, if any.
    pub student_loan_plan: Option<StudentLoanPlan>,
    /// The pension contribution rate, in percent.
    pub pension_rate: Decimal,
}

/// The contribution of a single band to a banded total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandContribution {
    /// Where the band starts.
    pub lower: Decimal,
    /// Where the band ends, or `None` when unbounded.
    pub upper: Option<Decimal>,
    /// The band's marginal rate.
    pub rate: Decimal,
    /// The part of the amount that fell inside this band.
    pub taxed_amount: Decimal,
    /// `taxed_amount * rate`.
    pub owed: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A calculation together with everything needed to explain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedCalculation {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation ran.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the result.
    pub engine_version: String,
    /// Code of the tax year whose rules were applied (e.g. `"2025-26"`).
    pub tax_year: String,
    /// The personal allowance after tapering.
    pub personal_allowance: Decimal,
    /// Salary after pension, on which tax, NI and student loan are based.
    pub taxable_base: Decimal,
    /// The flat breakdown.
    pub result: CalculationResult,
    /// Income tax owed per band of the (tapered) schedule.
    pub income_tax_bands: Vec<BandContribution>,
    /// National Insurance owed per band.
    pub national_insurance_bands: Vec<BandContribution>,
    /// Ordered record of each rule applied.
    pub audit_trace: Vec<AuditStep>,
}

/// Two independent calculations side by side.
///
/// Differences are `second - first`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryComparison {
    /// The first calculation.
    pub first: CalculationResult,
    /// The second calculation.
    pub second: CalculationResult,
    /// Difference in gross salary.
    pub gross_difference: Decimal,
    /// Difference in annual take-home pay.
    pub net_annual_difference: Decimal,
    /// Difference in monthly take-home pay.
    pub net_monthly_difference: Decimal,
    /// Difference in income tax.
    pub income_tax_difference: Decimal,
    /// Difference in National Insurance.
    pub national_insurance_difference: Decimal,
}
