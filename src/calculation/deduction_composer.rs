//! Take-home pay composition.
//!
//! Deductions are layered in a fixed order, each on the right base:
//!
//! 1. pension is taken from gross salary;
//! 2. the taxable base is gross less pension, floored at zero;
//! 3. the regional income tax schedule is tapered using **gross** salary;
//! 4. income tax and National Insurance are banded on the taxable base;
//! 5. student loan repayment is due on the taxable base above the plan
//!    threshold;
//! 6. net pay is gross less every deduction, then split per month and week.
//!
//! All intermediate values are unrounded. Rounding happens once, when a
//! [`CalculationResult`] is emitted.

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::config::RuleSet;
use crate::error::EngineResult;
use crate::models::{
    AuditStep, BandSchedule, CalculationInput, CalculationResult, DetailedCalculation,
};

use super::allowance_taper::{taper_schedule, tapered_allowance};
use super::band_applier::{apply_bands, band_contributions};
use super::rounding::round_money;
use super::student_loan::student_loan_repayment;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const WEEKS_PER_YEAR: Decimal = Decimal::from_parts(52, 0, 0, false, 0);

/// The unrounded deductions for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeductionBreakdown {
    /// Annual gross salary.
    pub gross_salary: Decimal,
    /// Pension contribution taken from gross.
    pub pension_contribution: Decimal,
    /// Gross less pension, never negative.
    pub taxable_base: Decimal,
    /// Personal allowance after tapering.
    pub personal_allowance: Decimal,
    /// The regional schedule with the tapered allowance applied.
    pub income_tax_schedule: BandSchedule,
    /// Income tax on the taxable base.
    pub income_tax: Decimal,
    /// National Insurance on the taxable base.
    pub national_insurance: Decimal,
    /// Student loan repayment on the taxable base.
    pub student_loan_repayment: Decimal,
    /// Gross less every deduction.
    pub net_annual: Decimal,
}

/// Computes every deduction for `input` without rounding.
pub fn compose_deductions(input: &CalculationInput, rules: &RuleSet) -> DeductionBreakdown {
    let gross_salary = input.gross_salary;
    let pension_contribution = gross_salary * input.pension_rate_percent / HUNDRED;
    let taxable_base = (gross_salary - pension_contribution).max(Decimal::ZERO);

    let personal_allowance = tapered_allowance(gross_salary, &rules.allowance());
    let income_tax_schedule =
        taper_schedule(rules.income_tax_schedule(input.region), personal_allowance);

    let income_tax = apply_bands(taxable_base, &income_tax_schedule);
    let national_insurance = apply_bands(taxable_base, rules.national_insurance_schedule());
    let student_loan_repayment = input
        .student_loan_plan
        .map(|plan| student_loan_repayment(taxable_base, rules.student_loan_rule(plan)))
        .unwrap_or(Decimal::ZERO);

    let net_annual = gross_salary
        - income_tax
        - national_insurance
        - student_loan_repayment
        - pension_contribution;

    DeductionBreakdown {
        gross_salary,
        pension_contribution,
        taxable_base,
        personal_allowance,
        income_tax_schedule,
        income_tax,
        national_insurance,
        student_loan_repayment,
        net_annual,
    }
}

impl DeductionBreakdown {
    /// Rounds the breakdown into an emitted result.
    ///
    /// Each deduction is rounded from its unrounded value. Net pay is not:
    /// it is rounded gross less the rounded deductions, so the emitted
    /// figures always sum exactly to gross. The cost is that `net_annual`
    /// can differ by 0.01 from the unrounded net rounded on its own, for
    /// example gross 12575.00 with a 3.7% pension emits 12109.72 where the
    /// unrounded net is 12109.725.
    pub fn to_result(&self, input: &CalculationInput) -> CalculationResult {
        let gross = round_money(self.gross_salary);
        let pension_contribution = round_money(self.pension_contribution);
        let income_tax = round_money(self.income_tax);
        let national_insurance = round_money(self.national_insurance);
        let student_loan_repayment = round_money(self.student_loan_repayment);
        let net_annual =
            gross - income_tax - national_insurance - student_loan_repayment - pension_contribution;

        CalculationResult {
            gross,
            pension_contribution,
            income_tax,
            national_insurance,
            student_loan_repayment,
            net_annual,
            net_monthly: round_money(net_annual / MONTHS_PER_YEAR),
            net_weekly: round_money(net_annual / WEEKS_PER_YEAR),
            effective_tax_rate_percent: round_money(self.share_of_gross(self.income_tax)),
            effective_ni_rate_percent: round_money(self.share_of_gross(self.national_insurance)),
            region: input.region,
            student_loan_plan: input.student_loan_plan,
            pension_rate: round_money(input.pension_rate_percent),
        }
    }

    /// `amount` as a percentage of gross, or zero when gross is zero.
    fn share_of_gross(&self, amount: Decimal) -> Decimal {
        if self.gross_salary.is_zero() {
            Decimal::ZERO
        } else {
            amount / self.gross_salary * HUNDRED
        }
    }
}

/// Calculates the take-home breakdown for a validated input.
///
/// # Examples
///
/// ```
/// use take_home::calculation::calculate;
/// use take_home::config::ConfigLoader;
/// use take_home::models::CalculationInput;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::bundled().unwrap();
/// let input = CalculationInput {
///     gross_salary: Decimal::from(30000),
///     ..CalculationInput::default()
/// };
///
/// let result = calculate(&input, config.rules());
/// assert_eq!(result.income_tax.to_string(), "3486.00");
/// assert_eq!(result.national_insurance.to_string(), "1394.40");
/// assert_eq!(result.net_annual.to_string(), "25119.60");
/// ```
pub fn calculate(input: &CalculationInput, rules: &RuleSet) -> CalculationResult {
    let result = compose_deductions(input, rules).to_result(input);
    debug!(
        gross = %result.gross,
        region = %result.region,
        income_tax = %result.income_tax,
        national_insurance = %result.national_insurance,
        net_annual = %result.net_annual,
        "Calculated take-home pay"
    );
    result
}

/// Validates loosely-typed boundary values and calculates.
///
/// Unknown region and plan identifiers fall back to their documented
/// defaults; negative or out-of-range amounts are rejected.
pub fn calculate_raw(
    gross_salary: Decimal,
    region: Option<&str>,
    student_loan_plan: Option<&str>,
    pension_rate_percent: Decimal,
    rules: &RuleSet,
) -> EngineResult<CalculationResult> {
    let input =
        CalculationInput::from_raw(gross_salary, region, student_loan_plan, pension_rate_percent)?;
    Ok(calculate(&input, rules))
}

/// Calculates the take-home breakdown with per-band lines and an audit trace.
pub fn calculate_detailed(input: &CalculationInput, rules: &RuleSet) -> DetailedCalculation {
    let breakdown = compose_deductions(input, rules);
    let result = breakdown.to_result(input);
    let income_tax_bands = band_contributions(breakdown.taxable_base, &breakdown.income_tax_schedule);
    let national_insurance_bands =
        band_contributions(breakdown.taxable_base, rules.national_insurance_schedule());
    let audit_trace = audit_trace(input, rules, &breakdown, &result);

    DetailedCalculation {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        tax_year: rules.tax_year().code.clone(),
        personal_allowance: round_money(breakdown.personal_allowance),
        taxable_base: round_money(breakdown.taxable_base),
        result,
        income_tax_bands,
        national_insurance_bands,
        audit_trace,
    }
}

fn audit_trace(
    input: &CalculationInput,
    rules: &RuleSet,
    breakdown: &DeductionBreakdown,
    result: &CalculationResult,
) -> Vec<AuditStep> {
    let policy = rules.allowance();
    let gross = breakdown.gross_salary.normalize();
    let taxable_base = breakdown.taxable_base.normalize();

    let tapered = breakdown.personal_allowance < policy.personal_allowance;
    let taper_reasoning = if tapered {
        format!(
            "Gross £{} exceeds £{}: allowance reduced by £1 per £2 to £{}",
            gross,
            policy.taper_threshold.normalize(),
            breakdown.personal_allowance.normalize()
        )
    } else {
        format!(
            "Gross £{} does not exceed £{}: full allowance of £{}",
            gross,
            policy.taper_threshold.normalize(),
            policy.personal_allowance.normalize()
        )
    };

    let plan = input.student_loan_plan;
    let threshold = plan.and_then(|p| rules.student_loan_rule(p).threshold);
    let student_loan_reasoning = match (plan, threshold) {
        (None, _) => "No student loan plan selected".to_string(),
        (Some(p), None) => format!("{} has no repayment threshold this tax year", p),
        (Some(p), Some(t)) if breakdown.taxable_base > t => format!(
            "£{} exceeds the {} threshold of £{}",
            taxable_base,
            p,
            t.normalize()
        ),
        (Some(p), Some(t)) => format!(
            "£{} does not exceed the {} threshold of £{}",
            taxable_base,
            p,
            t.normalize()
        ),
    };

    vec![
        AuditStep {
            step_number: 1,
            rule_id: "pension_contribution".to_string(),
            rule_name: "Pension Contribution".to_string(),
            input: json!({
                "gross_salary": gross.to_string(),
                "pension_rate_percent": input.pension_rate_percent.normalize().to_string()
            }),
            output: json!({
                "pension_contribution": breakdown.pension_contribution.normalize().to_string(),
                "taxable_base": taxable_base.to_string()
            }),
            reasoning: format!(
                "£{} x {}% = £{}",
                gross,
                input.pension_rate_percent.normalize(),
                breakdown.pension_contribution.normalize()
            ),
        },
        AuditStep {
            step_number: 2,
            rule_id: "personal_allowance_taper".to_string(),
            rule_name: "Personal Allowance Taper".to_string(),
            input: json!({
                "gross_salary": gross.to_string(),
                "personal_allowance": policy.personal_allowance.normalize().to_string(),
                "taper_threshold": policy.taper_threshold.normalize().to_string()
            }),
            output: json!({
                "personal_allowance": breakdown.personal_allowance.normalize().to_string(),
                "tapered": tapered
            }),
            reasoning: taper_reasoning,
        },
        AuditStep {
            step_number: 3,
            rule_id: "income_tax".to_string(),
            rule_name: "Income Tax".to_string(),
            input: json!({
                "taxable_base": taxable_base.to_string(),
                "region": input.region.to_string(),
                "schedule": breakdown.income_tax_schedule.name()
            }),
            output: json!({ "income_tax": result.income_tax.to_string() }),
            reasoning: format!(
                "{} bands applied to £{}",
                input.region,
                taxable_base
            ),
        },
        AuditStep {
            step_number: 4,
            rule_id: "national_insurance".to_string(),
            rule_name: "National Insurance".to_string(),
            input: json!({ "taxable_base": taxable_base.to_string() }),
            output: json!({ "national_insurance": result.national_insurance.to_string() }),
            reasoning: format!(
                "National Insurance bands applied to £{} with an untapered primary threshold",
                taxable_base
            ),
        },
        AuditStep {
            step_number: 5,
            rule_id: "student_loan".to_string(),
            rule_name: "Student Loan Repayment".to_string(),
            input: json!({
                "taxable_base": taxable_base.to_string(),
                "plan": plan.map(|p| p.to_string()),
                "threshold": threshold.map(|t| t.normalize().to_string())
            }),
            output: json!({
                "student_loan_repayment": result.student_loan_repayment.to_string()
            }),
            reasoning: student_loan_reasoning,
        },
        AuditStep {
            step_number: 6,
            rule_id: "net_pay".to_string(),
            rule_name: "Net Pay".to_string(),
            input: json!({
                "gross": result.gross.to_string(),
                "income_tax": result.income_tax.to_string(),
                "national_insurance": result.national_insurance.to_string(),
                "student_loan_repayment": result.student_loan_repayment.to_string(),
                "pension_contribution": result.pension_contribution.to_string()
            }),
            output: json!({
                "net_annual": result.net_annual.to_string(),
                "net_monthly": result.net_monthly.to_string(),
                "net_weekly": result.net_weekly.to_string()
            }),
            reasoning: format!(
                "£{} - £{} - £{} - £{} - £{} = £{}",
                result.gross,
                result.income_tax,
                result.national_insurance,
                result.student_loan_repayment,
                result.pension_contribution,
                result.net_annual
            ),
        },
    ]
}
