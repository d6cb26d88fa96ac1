//! The validated input to a single pay calculation.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

use super::{Region, StudentLoanPlan};

/// Largest gross salary accepted: one trillion pounds.
///
/// Every intermediate product stays well inside `Decimal`'s range below it.
pub const MAX_GROSS_SALARY: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Largest pension contribution rate accepted, as a percentage of gross.
pub const MAX_PENSION_RATE_PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// The four scalars a calculation needs.
///
/// Construct with [`CalculationInput::new`] or [`CalculationInput::from_raw`]
/// so that out-of-range amounts are rejected before any computation runs.
/// It is not `Deserialize`; request payloads are parsed into the API request
/// types and converted through [`CalculationInput::new`].
///
/// # Example
///
/// ```
/// use take_home::models::{CalculationInput, Region, StudentLoanPlan};
/// use rust_decimal::Decimal;
///
/// let input = CalculationInput::from_raw(
///     Decimal::from(30000),
///     Some("scotland"),
///     Some("plan2"),
///     Decimal::from(5),
/// )
/// .unwrap();
/// assert_eq!(input.region, Region::Scotland);
/// assert_eq!(input.student_loan_plan, Some(StudentLoanPlan::Plan2));
///
/// assert!(CalculationInput::from_raw(Decimal::from(-1), None, None, Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalculationInput {
    /// Annual gross salary.
    pub gross_salary: Decimal,
    /// Region whose income tax schedule applies.
    pub region: Region,
    /// Student loan plan, if any.
    pub student_loan_plan: Option<StudentLoanPlan>,
    /// Pension contribution as a percentage of gross salary.
    pub pension_rate_percent: Decimal,
}

impl Default for CalculationInput {
    fn default() -> Self {
        Self {
            gross_salary: Decimal::ZERO,
            region: Region::RestOfUk,
            student_loan_plan: None,
            pension_rate_percent: Decimal::ZERO,
        }
    }
}

impl CalculationInput {
    /// Creates a validated input.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if the salary is negative or above
    /// [`MAX_GROSS_SALARY`], or if the pension rate is negative or above
    /// [`MAX_PENSION_RATE_PERCENT`].
    pub fn new(
        gross_salary: Decimal,
        region: Region,
        student_loan_plan: Option<StudentLoanPlan>,
        pension_rate_percent: Decimal,
    ) -> EngineResult<Self> {
        if gross_salary < Decimal::ZERO {
            return Err(EngineError::InvalidInput {
                field: "gross_salary".to_string(),
                message: format!("must not be negative, got {}", gross_salary),
            });
        }
        if gross_salary > MAX_GROSS_SALARY {
            return Err(EngineError::InvalidInput {
                field: "gross_salary".to_string(),
                message: format!("must not exceed {}, got {}", MAX_GROSS_SALARY, gross_salary),
            });
        }
        if pension_rate_percent < Decimal::ZERO {
            return Err(EngineError::InvalidInput {
                field: "pension_rate_percent".to_string(),
                message: format!("must not be negative, got {}", pension_rate_percent),
            });
        }
        if pension_rate_percent > MAX_PENSION_RATE_PERCENT {
            return Err(EngineError::InvalidInput {
                field: "pension_rate_percent".to_string(),
                message: format!(
                    "must not exceed {}, got {}",
                    MAX_PENSION_RATE_PERCENT, pension_rate_percent
                ),
            });
        }

        Ok(Self {
            gross_salary,
            region,
            student_loan_plan,
            pension_rate_percent,
        })
    }

    /// Creates a validated input from loosely-typed boundary values.
    ///
    /// The region and plan identifiers are resolved with their documented
    /// defaults: see [`Region::resolve`] and [`StudentLoanPlan::resolve`].
    pub fn from_raw(
        gross_salary: Decimal,
        region: Option<&str>,
        student_loan_plan: Option<&str>,
        pension_rate_percent: Decimal,
    ) -> EngineResult<Self> {
        Self::new(
            gross_salary,
            Region::resolve(region),
            StudentLoanPlan::resolve(student_loan_plan),
            pension_rate_percent,
        )
    }
}
