//! Student loan plans and their repayment rules.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::EngineError;

/// A student loan repayment plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentLoanPlan {
    /// Plan 1.
    Plan1,
    /// Plan 2.
    Plan2,
    /// Plan 4 (Scotland).
    Plan4,
    /// Plan 5.
    Plan5,
    /// Postgraduate Loan.
    PostgraduateLoan,
}

impl StudentLoanPlan {
    /// All plans, in display order.
    pub const ALL: [StudentLoanPlan; 5] = [
        Self::Plan1,
        Self::Plan2,
        Self::Plan4,
        Self::Plan5,
        Self::PostgraduateLoan,
    ];

    /// Resolves an optional plan identifier.
    ///
    /// Absent, empty and `"none"` mean no plan. An unrecognised identifier
    /// also means no plan, and is logged at `warn` level so the fallback is
    /// visible rather than silent.
    ///
    /// # Example
    ///
    /// ```
    /// use take_home::models::StudentLoanPlan;
    ///
    /// assert_eq!(StudentLoanPlan::resolve(Some("plan 2")), Some(StudentLoanPlan::Plan2));
    /// assert_eq!(StudentLoanPlan::resolve(Some("none")), None);
    /// assert_eq!(StudentLoanPlan::resolve(Some("plan9")), None);
    /// ```
    pub fn resolve(raw: Option<&str>) -> Option<Self> {
        let text = raw.map(str::trim).filter(|s| !s.is_empty())?;
        if text.eq_ignore_ascii_case("none") {
            return None;
        }
        match text.parse() {
            Ok(plan) => Some(plan),
            Err(_) => {
                warn!(student_loan_plan = %text, "Unknown student loan plan, applying no repayment");
                None
            }
        }
    }
}

impl fmt::Display for StudentLoanPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Plan1 => "plan1",
            Self::Plan2 => "plan2",
            Self::Plan4 => "plan4",
            Self::Plan5 => "plan5",
            Self::PostgraduateLoan => "postgraduate_loan",
        };
        f.write_str(label)
    }
}

impl FromStr for StudentLoanPlan {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();
        match key.as_str() {
            "plan1" | "1" => Ok(Self::Plan1),
            "plan2" | "2" => Ok(Self::Plan2),
            "plan4" | "4" => Ok(Self::Plan4),
            "plan5" | "5" => Ok(Self::Plan5),
            "postgraduate" | "postgraduateloan" | "pgl" | "pg" => Ok(Self::PostgraduateLoan),
            _ => Err(EngineError::InvalidInput {
                field: "student_loan_plan".to_string(),
                message: format!("unknown student loan plan '{}'", s),
            }),
        }
    }
}

/// Repayment rule for one plan: a share of income above a threshold.
///
/// A `threshold` of `None` means repayments never start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentLoanRule {
    /// Income above which repayments are due.
    #[serde(default)]
    pub threshold: Option<Decimal>,
    /// Share of income above the threshold that is repaid.
    pub rate: Decimal,
}
