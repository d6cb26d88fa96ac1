//! Request types for the take-home pay API.
//!
//! This module defines the JSON bodies for `POST /calculate` and
//! `POST /compare`, and the query string for `GET /calculate`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::CalculationInput;

use super::response::ApiError;

/// Request body for `POST /calculate`.
///
/// Every field is optional. Absent values default to a zero salary in the
/// UK with no student loan and no pension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    /// Annual gross salary.
    #[serde(default, alias = "gross_salary")]
    pub gross_salary: Decimal,
    /// Region identifier, e.g. "UK" or "Scotland".
    #[serde(default)]
    pub region: Option<String>,
    /// Student loan plan identifier, e.g. "plan2".
    #[serde(default, alias = "student_loan_plan")]
    pub student_loan_plan: Option<String>,
    /// Pension contribution as a percentage of gross salary.
    #[serde(default, alias = "pension_rate_percent", alias = "pensionRate")]
    pub pension_rate_percent: Decimal,
}

impl CalculationRequest {
    /// Validates the request into a calculation input.
    pub fn into_input(self) -> EngineResult<CalculationInput> {
        CalculationInput::from_raw(
            self.gross_salary,
            self.region.as_deref(),
            self.student_loan_plan.as_deref(),
            self.pension_rate_percent,
        )
    }
}

/// Request body for `POST /compare`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRequest {
    /// The baseline salary.
    pub first: CalculationRequest,
    /// The salary compared against the baseline.
    pub second: CalculationRequest,
}

/// Query string for `GET /calculate`.
///
/// Numbers arrive as raw text so malformed values can be reported with the
/// offending field rather than as a generic rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationQuery {
    /// Annual gross salary.
    #[serde(default, alias = "gross_salary")]
    pub gross_salary: Option<String>,
    /// Region identifier.
    #[serde(default)]
    pub region: Option<String>,
    /// Student loan plan identifier.
    #[serde(default, alias = "student_loan_plan")]
    pub student_loan_plan: Option<String>,
    /// Pension contribution percentage.
    #[serde(default, alias = "pension_rate_percent", alias = "pensionRate")]
    pub pension_rate_percent: Option<String>,
}

impl CalculationQuery {
    /// Parses the numeric fields, producing a request.
    ///
    /// Absent or blank numbers default to zero; anything else that is not a
    /// decimal number is rejected.
    pub fn into_request(self) -> Result<CalculationRequest, ApiError> {
        Ok(CalculationRequest {
            gross_salary: parse_number("grossSalary", self.gross_salary.as_deref())?,
            region: self.region,
            student_loan_plan: self.student_loan_plan,
            pension_rate_percent: parse_number(
                "pensionRatePercent",
                self.pension_rate_percent.as_deref(),
            )?,
        })
    }
}

fn parse_number(field: &str, raw: Option<&str>) -> Result<Decimal, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Decimal::ZERO),
        Some(text) => Decimal::from_str(text).map_err(|_| ApiError::invalid_number(field, text)),
    }
}
