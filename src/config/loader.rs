//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a tax-year
//! rule set from YAML files, either from a directory on disk or from the
//! copy compiled into the binary.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::types::{
    IncomeTaxConfig, NationalInsuranceConfig, RuleSet, StudentLoanConfig, TaxYearMetadata,
};

const TAX_YEAR_FILE: &str = "tax_year.yaml";
const INCOME_TAX_FILE: &str = "income_tax.yaml";
const NATIONAL_INSURANCE_FILE: &str = "national_insurance.yaml";
const STUDENT_LOANS_FILE: &str = "student_loans.yaml";

const BUNDLED_DIR: &str = "config/uk_2025_26";
const BUNDLED_TAX_YEAR: &str = include_str!("../../config/uk_2025_26/tax_year.yaml");
const BUNDLED_INCOME_TAX: &str = include_str!("../../config/uk_2025_26/income_tax.yaml");
const BUNDLED_NATIONAL_INSURANCE: &str =
    include_str!("../../config/uk_2025_26/national_insurance.yaml");
const BUNDLED_STUDENT_LOANS: &str = include_str!("../../config/uk_2025_26/student_loans.yaml");

/// Loads and provides access to the tax-year rule set.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/uk_2025_26/
/// ├── tax_year.yaml           # Tax year metadata
/// ├── income_tax.yaml         # Allowance, taper and regional bands
/// ├── national_insurance.yaml # NI bands
/// └── student_loans.yaml      # Threshold and rate per plan
/// ```
///
/// # Example
///
/// ```
/// use take_home::config::ConfigLoader;
/// use take_home::models::Region;
///
/// let loader = ConfigLoader::bundled().unwrap();
/// assert_eq!(loader.tax_year().code, "2025-26");
/// assert_eq!(loader.rules().income_tax_schedule(Region::Scotland).bands().len(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    rules: RuleSet,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any schedule fails validation
    ///
    /// # Example
    ///
    /// ```no_run
    /// use take_home::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/uk_2025_26")?;
    /// # Ok::<(), take_home::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let tax_year = Self::load_yaml::<TaxYearMetadata>(&path.join(TAX_YEAR_FILE))?;
        let income_tax = Self::load_yaml::<IncomeTaxConfig>(&path.join(INCOME_TAX_FILE))?;
        let national_insurance =
            Self::load_yaml::<NationalInsuranceConfig>(&path.join(NATIONAL_INSURANCE_FILE))?;
        let student_loans =
            Self::load_yaml::<StudentLoanConfig>(&path.join(STUDENT_LOANS_FILE))?;

        let rules = RuleSet::new(tax_year, income_tax, national_insurance, student_loans)?;
        info!(
            path = %path.display(),
            tax_year = %rules.tax_year().code,
            "Loaded rule set"
        );
        Ok(Self { rules })
    }

    /// Loads the rule set compiled into the binary.
    pub fn bundled() -> EngineResult<Self> {
        let tax_year = Self::parse_yaml::<TaxYearMetadata>(
            &format!("{}/{}", BUNDLED_DIR, TAX_YEAR_FILE),
            BUNDLED_TAX_YEAR,
        )?;
        let income_tax = Self::parse_yaml::<IncomeTaxConfig>(
            &format!("{}/{}", BUNDLED_DIR, INCOME_TAX_FILE),
            BUNDLED_INCOME_TAX,
        )?;
        let national_insurance = Self::parse_yaml::<NationalInsuranceConfig>(
            &format!("{}/{}", BUNDLED_DIR, NATIONAL_INSURANCE_FILE),
            BUNDLED_NATIONAL_INSURANCE,
        )?;
        let student_loans = Self::parse_yaml::<StudentLoanConfig>(
            &format!("{}/{}", BUNDLED_DIR, STUDENT_LOANS_FILE),
            BUNDLED_STUDENT_LOANS,
        )?;

        let rules = RuleSet::new(tax_year, income_tax, national_insurance, student_loans)?;
        Ok(Self { rules })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&path_str, &content)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(path: &str, content: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the validated rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns the tax-year metadata.
    pub fn tax_year(&self) -> &TaxYearMetadata {
        self.rules.tax_year()
    }
}
