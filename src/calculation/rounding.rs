//! Output rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places on every emitted money or percentage figure.
pub const OUTPUT_DECIMAL_PLACES: u32 = 2;

/// Rounds to two decimal places, halves away from zero, and fixes the scale
/// at two so values always print as `"123.40"`.
///
/// # Examples
///
/// ```
/// use take_home::calculation::round_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_money(Decimal::new(4835, 3)).to_string(), "4.84");
/// assert_eq!(round_money(Decimal::from(3486)).to_string(), "3486.00");
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(
        OUTPUT_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    );
    rounded.rescale(OUTPUT_DECIMAL_PLACES);
    rounded
}
