//! Marginal-rate band application.
//!
//! This module sums what is owed on an amount across an ordered band
//! schedule: bands fully below the amount contribute their full width, the
//! band containing the amount contributes a partial slice, and bands above
//! it contribute nothing.

use rust_decimal::Decimal;

use crate::models::{BandContribution, BandSchedule};

/// Returns the total owed on `amount` under `schedule`.
///
/// No rounding is applied; callers round only at the output boundary.
///
/// # Examples
///
/// ```
/// use take_home::calculation::apply_bands;
/// use take_home::models::{Band, BandSchedule};
/// use rust_decimal::Decimal;
///
/// let schedule = BandSchedule::new(
///     "national_insurance",
///     vec![
///         Band::new(Decimal::ZERO, Some(Decimal::from(12570)), Decimal::ZERO),
///         Band::new(Decimal::from(12570), Some(Decimal::from(50270)), Decimal::new(8, 2)),
///         Band::new(Decimal::from(50270), None, Decimal::new(2, 2)),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(apply_bands(Decimal::from(30000), &schedule), Decimal::new(139440, 2));
/// ```
pub fn apply_bands(amount: Decimal, schedule: &BandSchedule) -> Decimal {
    schedule
        .bands()
        .iter()
        .filter(|band| amount > band.lower)
        .map(|band| band.taxable_slice(amount) * band.rate)
        .sum()
}

/// Returns one line per band showing how much of `amount` fell in it and
/// what was owed.
///
/// Bands above the amount are included with zero figures so the lines
/// always mirror the schedule. The `owed` values sum to
/// [`apply_bands`] for the same inputs.
pub fn band_contributions(amount: Decimal, schedule: &BandSchedule) -> Vec<BandContribution> {
    schedule
        .bands()
        .iter()
        .map(|band| {
            let taxed_amount = band.taxable_slice(amount);
            BandContribution {
                lower: band.lower,
                upper: band.upper,
                rate: band.rate,
                taxed_amount,
                owed: taxed_amount * band.rate,
            }
        })
        .collect()
}
