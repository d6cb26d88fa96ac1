//! Core data models for the take-home pay engine.
//!
//! This module contains all the domain models used throughout the engine.

mod band;
mod calculation_input;
mod calculation_result;
mod region;
mod student_loan;

pub use band::{Band, BandSchedule};
pub use calculation_input::{CalculationInput, MAX_GROSS_SALARY, MAX_PENSION_RATE_PERCENT};
pub use calculation_result::{
    AuditStep, BandContribution, CalculationResult, DetailedCalculation, SalaryComparison,
};
pub use region::Region;
pub use student_loan::{StudentLoanPlan, StudentLoanRule};
