//! Error types for the take-home pay engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that can stop a rule set from loading or a
//! calculation from starting.

use thiserror::Error;

/// The main error type for the take-home pay engine.
///
/// A calculation either returns a complete result or fails with one of
/// these before any computation runs; there are no partial results.
///
/// # Example
///
/// ```
/// use take_home::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A band schedule or threshold table broke a structural rule.
    #[error("Invalid schedule '{schedule}': {message}")]
    InvalidSchedule {
        /// The name of the offending schedule.
        schedule: String,
        /// A description of the violated rule.
        message: String,
    },

    /// A calculation input was outside its domain.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input field that was rejected.
        field: String,
        /// A description of why it was rejected.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_schedule_displays_name_and_message() {
        let error = EngineError::InvalidSchedule {
            schedule: "income_tax.scotland".to_string(),
            message: "band 2 does not start where band 1 ends".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid schedule 'income_tax.scotland': band 2 does not start where band 1 ends"
        );
    }

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = EngineError::InvalidInput {
            field: "gross_salary".to_string(),
            message: "must not be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid input 'gross_salary': must not be negative"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_input() -> EngineResult<()> {
            Err(EngineError::InvalidInput {
                field: "pension_rate_percent".to_string(),
                message: "must not be negative".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_input()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
