//! Tax region selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::EngineError;

/// The region whose income tax schedule applies.
///
/// National Insurance and student loans are the same everywhere; only
/// income tax differs by region.
///
/// # Example
///
/// ```
/// use take_home::models::Region;
///
/// let region: Region = "scotland".parse().unwrap();
/// assert_eq!(region, Region::Scotland);
/// assert_eq!(Region::resolve(Some("atlantis")), Region::RestOfUk);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// England, Wales and Northern Ireland.
    #[default]
    #[serde(rename = "UK")]
    RestOfUk,
    /// Scotland, which sets its own income tax bands.
    #[serde(rename = "Scotland")]
    Scotland,
}

impl Region {
    /// Resolves an optional region identifier, falling back to
    /// [`Region::RestOfUk`] when it is absent or unrecognised.
    ///
    /// An unrecognised identifier is logged at `warn` level.
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::default(),
            Some(text) => text.parse().unwrap_or_else(|_| {
                warn!(region = %text, "Unknown region, defaulting to UK");
                Self::default()
            }),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RestOfUk => write!(f, "UK"),
            Self::Scotland => write!(f, "Scotland"),
        }
    }
}

impl FromStr for Region {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "uk" | "rest_of_uk" | "ruk" | "england" | "wales" | "northern_ireland" => {
                Ok(Self::RestOfUk)
            }
            "scotland" => Ok(Self::Scotland),
            _ => Err(EngineError::InvalidInput {
                field: "region".to_string(),
                message: format!("unknown region '{}'", s),
            }),
        }
    }
}
