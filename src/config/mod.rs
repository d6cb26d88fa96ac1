//! Rule set loading and management for the take-home pay engine.
//!
//! This module loads the tax-year rules (allowance, regional income tax
//! bands, National Insurance bands and student loan thresholds) from YAML
//! and validates them once, at startup.
//!
//! # Example
//!
//! ```no_run
//! use take_home::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/uk_2025_26").unwrap();
//! println!("Loaded rules for: {}", config.tax_year().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AllowancePolicy, IncomeTaxConfig, NationalInsuranceConfig, RegionalSchedules, RuleSet,
    StudentLoanConfig, TaxYearMetadata,
};
