//! Calculation logic for the take-home pay engine.
//!
//! This module contains the marginal-rate band applier, personal allowance
//! tapering, student loan repayment, output rounding, the deduction
//! composer that sequences them into a take-home breakdown, and salary
//! comparison.

mod allowance_taper;
mod band_applier;
mod comparison;
mod deduction_composer;
mod rounding;
mod student_loan;

pub use allowance_taper::{
    DEFAULT_PERSONAL_ALLOWANCE, DEFAULT_TAPER_THRESHOLD, TAPER_DIVISOR, taper_schedule,
    tapered_allowance,
};
pub use band_applier::{apply_bands, band_contributions};
pub use comparison::compare;
pub use deduction_composer::{
    DeductionBreakdown, calculate, calculate_detailed, calculate_raw, compose_deductions,
};
pub use rounding::{OUTPUT_DECIMAL_PLACES, round_money};
pub use student_loan::student_loan_repayment;
