//! Configuration types for the tax-year rule set.
//!
//! This module contains the strongly-typed document structures that are
//! deserialized from YAML, and the validated [`RuleSet`] built from them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{Band, BandSchedule, Region, StudentLoanPlan, StudentLoanRule};

/// Metadata about the tax year the rules belong to.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxYearMetadata {
    /// Short code, e.g. "2025-26".
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// First day of the tax year.
    pub starts_on: NaiveDate,
    /// Last day of the tax year.
    pub ends_on: NaiveDate,
    /// URL to the published rates.
    pub source_url: String,
}

/// Income tax schedules for each region.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionalSchedules {
    /// England, Wales and Northern Ireland.
    pub rest_of_uk: Vec<Band>,
    /// Scotland.
    pub scotland: Vec<Band>,
}

/// Income tax configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomeTaxConfig {
    /// Tax-free personal allowance before tapering.
    pub personal_allowance: Decimal,
    /// Gross salary above which the allowance is tapered.
    pub taper_threshold: Decimal,
    /// Band schedules per region.
    pub schedules: RegionalSchedules,
}

/// National Insurance configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct NationalInsuranceConfig {
    /// Contribution bands.
    pub bands: Vec<Band>,
}

/// Student loan configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentLoanConfig {
    /// Plan 1 rule.
    pub plan1: StudentLoanRule,
    /// Plan 2 rule.
    pub plan2: StudentLoanRule,
    /// Plan 4 rule.
    pub plan4: StudentLoanRule,
    /// Plan 5 rule.
    pub plan5: StudentLoanRule,
    /// Postgraduate Loan rule.
    pub postgraduate_loan: StudentLoanRule,
}

impl StudentLoanConfig {
    /// Returns the rule for a plan.
    pub fn rule(&self, plan: StudentLoanPlan) -> &StudentLoanRule {
        match plan {
            StudentLoanPlan::Plan1 => &self.plan1,
            StudentLoanPlan::Plan2 => &self.plan2,
            StudentLoanPlan::Plan4 => &self.plan4,
            StudentLoanPlan::Plan5 => &self.plan5,
            StudentLoanPlan::PostgraduateLoan => &self.postgraduate_loan,
        }
    }
}

/// Personal allowance and the point where it starts to shrink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowancePolicy {
    /// Allowance before tapering.
    pub personal_allowance: Decimal,
    /// Gross salary above which £1 of allowance is lost per £2 earned.
    pub taper_threshold: Decimal,
}

/// The complete, validated rule set for one tax year.
///
/// Immutable once built; share it behind an `Arc` for concurrent use.
#[derive(Debug, Clone)]
pub struct RuleSet {
    metadata: TaxYearMetadata,
    allowance: AllowancePolicy,
    rest_of_uk: BandSchedule,
    scotland: BandSchedule,
    national_insurance: BandSchedule,
    student_loans: StudentLoanConfig,
}

impl RuleSet {
    /// Validates and assembles a rule set from its parsed documents.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSchedule`] if any schedule or threshold
    /// breaks a structural rule.
    pub fn new(
        metadata: TaxYearMetadata,
        income_tax: IncomeTaxConfig,
        national_insurance: NationalInsuranceConfig,
        student_loans: StudentLoanConfig,
    ) -> EngineResult<Self> {
        if metadata.ends_on < metadata.starts_on {
            return Err(EngineError::InvalidSchedule {
                schedule: "tax_year".to_string(),
                message: format!(
                    "ends on {} before it starts on {}",
                    metadata.ends_on, metadata.starts_on
                ),
            });
        }

        let allowance = AllowancePolicy {
            personal_allowance: income_tax.personal_allowance,
            taper_threshold: income_tax.taper_threshold,
        };
        if allowance.personal_allowance < Decimal::ZERO || allowance.taper_threshold < Decimal::ZERO
        {
            return Err(EngineError::InvalidSchedule {
                schedule: "income_tax".to_string(),
                message: "personal allowance and taper threshold must not be negative".to_string(),
            });
        }

        let rest_of_uk = income_tax_schedule(
            "income_tax.rest_of_uk",
            income_tax.schedules.rest_of_uk,
            allowance.personal_allowance,
        )?;
        let scotland = income_tax_schedule(
            "income_tax.scotland",
            income_tax.schedules.scotland,
            allowance.personal_allowance,
        )?;
        let national_insurance = BandSchedule::new("national_insurance", national_insurance.bands)?;

        for plan in StudentLoanPlan::ALL {
            let rule = student_loans.rule(plan);
            let threshold_ok = rule.threshold.is_none_or(|t| t >= Decimal::ZERO);
            if !threshold_ok || rule.rate < Decimal::ZERO || rule.rate > Decimal::ONE {
                return Err(EngineError::InvalidSchedule {
                    schedule: format!("student_loans.{}", plan),
                    message: "threshold must not be negative and rate must be within [0, 1]"
                        .to_string(),
                });
            }
        }

        Ok(Self {
            metadata,
            allowance,
            rest_of_uk,
            scotland,
            national_insurance,
            student_loans,
        })
    }

    /// Returns the tax-year metadata.
    pub fn tax_year(&self) -> &TaxYearMetadata {
        &self.metadata
    }

    /// Returns the personal allowance policy.
    pub fn allowance(&self) -> AllowancePolicy {
        self.allowance
    }

    /// Returns the untapered income tax schedule for a region.
    pub fn income_tax_schedule(&self, region: Region) -> &BandSchedule {
        match region {
            Region::RestOfUk => &self.rest_of_uk,
            Region::Scotland => &self.scotland,
        }
    }

    /// Returns the National Insurance schedule.
    pub fn national_insurance_schedule(&self) -> &BandSchedule {
        &self.national_insurance
    }

    /// Returns the repayment rule for a student loan plan.
    pub fn student_loan_rule(&self, plan: StudentLoanPlan) -> &StudentLoanRule {
        self.student_loans.rule(plan)
    }
}

/// Builds an income tax schedule, which must open with a zero-rate band
/// followed by at least one more band so the allowance can be tapered.
///
/// The zero-rate band must end exactly at the personal allowance: tapering
/// rewrites that boundary, so any other ceiling would be silently lost.
fn income_tax_schedule(
    name: &str,
    bands: Vec<Band>,
    personal_allowance: Decimal,
) -> EngineResult<BandSchedule> {
    let schedule = BandSchedule::new(name, bands)?;
    let bands = schedule.bands();
    if bands.len() < 2 || !bands[0].rate.is_zero() {
        return Err(EngineError::InvalidSchedule {
            schedule: name.to_string(),
            message: "income tax needs a zero-rate allowance band followed by a taxed band"
                .to_string(),
        });
    }
    if bands[0].upper != Some(personal_allowance) {
        return Err(EngineError::InvalidSchedule {
            schedule: name.to_string(),
            message: format!(
                "zero-rate band must end at the personal allowance {}",
                personal_allowance
            ),
        });
    }
    Ok(schedule)
}
