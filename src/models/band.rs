//! Marginal-rate bands and the schedules built from them.
//!
//! A [`BandSchedule`] is validated once when it is constructed, so the
//! calculation code can rely on its bands being contiguous, ascending and
//! ending in an unbounded band.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A contiguous income range taxed at one marginal rate.
///
/// An `upper` of `None` means the band has no ceiling.
///
/// # Example
///
/// ```
/// use take_home::models::Band;
/// use rust_decimal::Decimal;
///
/// let basic = Band::new(Decimal::from(12570), Some(Decimal::from(50270)), Decimal::new(20, 2));
/// assert_eq!(basic.taxable_slice(Decimal::from(30000)), Decimal::from(17430));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    /// The amount at which this band starts.
    pub lower: Decimal,
    /// The amount at which this band ends, or `None` when unbounded.
    #[serde(default)]
    pub upper: Option<Decimal>,
    /// The marginal rate as a fraction in `[0, 1]`.
    pub rate: Decimal,
}

impl Band {
    /// Creates a new band.
    pub fn new(lower: Decimal, upper: Option<Decimal>, rate: Decimal) -> Self {
        Self { lower, upper, rate }
    }

    /// Returns the part of `amount` that falls inside this band.
    ///
    /// Zero when `amount` does not exceed the lower bound.
    pub fn taxable_slice(&self, amount: Decimal) -> Decimal {
        if amount <= self.lower {
            return Decimal::ZERO;
        }
        let top = match self.upper {
            Some(upper) => amount.min(upper),
            None => amount,
        };
        (top - self.lower).max(Decimal::ZERO)
    }

    /// Returns true if this band has no ceiling.
    pub fn is_unbounded(&self) -> bool {
        self.upper.is_none()
    }
}

/// A named, validated, ordered sequence of bands.
///
/// Schedules are immutable once built. Variants such as a tapered income
/// tax schedule are derived as new values, never by editing a shared one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandSchedule {
    name: String,
    bands: Vec<Band>,
}

impl BandSchedule {
    /// Builds a schedule, checking that the bands form a proper ladder.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSchedule`] if the schedule is empty, does
    /// not start at zero, has a gap or overlap, has a bounded last band or an
    /// unbounded band before the last, or has a rate outside `[0, 1]`.
    pub fn new(name: impl Into<String>, bands: Vec<Band>) -> EngineResult<Self> {
        let name = name.into();
        let invalid = |message: String| EngineError::InvalidSchedule {
            schedule: name.clone(),
            message,
        };

        let first = bands
            .first()
            .ok_or_else(|| invalid("schedule has no bands".to_string()))?;
        if first.lower != Decimal::ZERO {
            return Err(invalid(format!(
                "first band starts at {} instead of 0",
                first.lower
            )));
        }

        let last_index = bands.len() - 1;
        for (index, band) in bands.iter().enumerate() {
            let position = index + 1;
            if band.rate < Decimal::ZERO || band.rate > Decimal::ONE {
                return Err(invalid(format!(
                    "band {} has rate {} outside [0, 1]",
                    position, band.rate
                )));
            }
            match band.upper {
                Some(upper) if upper < band.lower => {
                    return Err(invalid(format!(
                        "band {} ends at {} before it starts at {}",
                        position, upper, band.lower
                    )));
                }
                Some(_) if index == last_index => {
                    return Err(invalid("last band must be unbounded".to_string()));
                }
                None if index != last_index => {
                    return Err(invalid(format!(
                        "band {} is unbounded but is not the last band",
                        position
                    )));
                }
                _ => {}
            }
            if index > 0 && bands[index - 1].upper != Some(band.lower) {
                return Err(invalid(format!(
                    "band {} does not start where band {} ends",
                    position, index
                )));
            }
        }

        Ok(Self { name, bands })
    }

    /// Returns the schedule's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bands in ascending order.
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Returns a copy with the boundary between the first and second band
    /// moved to `boundary`.
    ///
    /// The boundary is clamped to the second band's range so the copy stays
    /// contiguous. Schedules with fewer than two bands are returned as-is.
    pub(crate) fn with_first_boundary(&self, boundary: Decimal) -> Self {
        let mut bands = self.bands.clone();
        if bands.len() >= 2 {
            let mut boundary = boundary.max(Decimal::ZERO);
            if let Some(ceiling) = bands[1].upper {
                boundary = boundary.min(ceiling);
            }
            bands[0].upper = Some(boundary);
            bands[1].lower = boundary;
        }
        Self {
            name: self.name.clone(),
            bands,
        }
    }
}
