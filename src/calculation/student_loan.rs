//! Student loan repayment calculation.

use rust_decimal::Decimal;

use crate::models::StudentLoanRule;

/// Returns the annual repayment due on `taxable_base` under `rule`.
///
/// Repayment is a flat share of income above the plan threshold. A plan
/// with no threshold never repays.
///
/// # Examples
///
/// ```
/// use take_home::calculation::student_loan_repayment;
/// use take_home::models::StudentLoanRule;
/// use rust_decimal::Decimal;
///
/// let plan2 = StudentLoanRule { threshold: Some(Decimal::from(28470)), rate: Decimal::new(9, 2) };
/// assert_eq!(student_loan_repayment(Decimal::from(30000), &plan2), Decimal::new(13770, 2));
/// ```
pub fn student_loan_repayment(taxable_base: Decimal, rule: &StudentLoanRule) -> Decimal {
    match rule.threshold {
        Some(threshold) if taxable_base > threshold => (taxable_base - threshold) * rule.rate,
        _ => Decimal::ZERO,
    }
}
