//! Side-by-side comparison of two salaries.

use crate::config::RuleSet;
use crate::models::{CalculationInput, SalaryComparison};

use super::deduction_composer::calculate;

/// Runs two independent calculations and reports how the second differs
/// from the first.
///
/// # Examples
///
/// ```
/// use take_home::calculation::compare;
/// use take_home::config::ConfigLoader;
/// use take_home::models::CalculationInput;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::bundled().unwrap();
/// let first = CalculationInput { gross_salary: Decimal::from(30000), ..Default::default() };
/// let second = CalculationInput { gross_salary: Decimal::from(40000), ..Default::default() };
///
/// let comparison = compare(&first, &second, config.rules());
/// assert_eq!(comparison.gross_difference.to_string(), "10000.00");
/// assert_eq!(comparison.net_annual_difference.to_string(), "7200.00");
/// ```
pub fn compare(
    first: &CalculationInput,
    second: &CalculationInput,
    rules: &RuleSet,
) -> SalaryComparison {
    let first = calculate(first, rules);
    let second = calculate(second, rules);

    SalaryComparison {
        gross_difference: second.gross - first.gross,
        net_annual_difference: second.net_annual - first.net_annual,
        net_monthly_difference: second.net_monthly - first.net_monthly,
        income_tax_difference: second.income_tax - first.income_tax,
        national_insurance_difference: second.national_insurance - first.national_insurance,
        first,
        second,
    }
}
