//! Personal allowance tapering for high earners.
//!
//! Above the taper threshold the personal allowance shrinks by £1 for every
//! £2 of gross salary, down to zero. The tapered allowance then becomes the
//! boundary between the zero-rate and first taxed band of the income tax
//! schedule. National Insurance is never tapered.

use rust_decimal::Decimal;

use crate::config::AllowancePolicy;
use crate::models::BandSchedule;

/// The personal allowance for the modelled tax year.
pub const DEFAULT_PERSONAL_ALLOWANCE: Decimal = Decimal::from_parts(12570, 0, 0, false, 0);

/// Gross salary above which the personal allowance starts to taper.
pub const DEFAULT_TAPER_THRESHOLD: Decimal = Decimal::from_parts(100000, 0, 0, false, 0);

/// Pounds of income above the threshold per pound of allowance lost.
pub const TAPER_DIVISOR: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

impl Default for AllowancePolicy {
    fn default() -> Self {
        Self {
            personal_allowance: DEFAULT_PERSONAL_ALLOWANCE,
            taper_threshold: DEFAULT_TAPER_THRESHOLD,
        }
    }
}

/// Returns the personal allowance after tapering for `gross_salary`.
///
/// The taper is triggered by gross salary, not by the post-pension taxable
/// base.
///
/// # Examples
///
/// ```
/// use take_home::calculation::tapered_allowance;
/// use take_home::config::AllowancePolicy;
/// use rust_decimal::Decimal;
///
/// let policy = AllowancePolicy::default();
/// assert_eq!(tapered_allowance(Decimal::from(99999), &policy), Decimal::from(12570));
/// assert_eq!(tapered_allowance(Decimal::from(120000), &policy), Decimal::from(2570));
/// assert_eq!(tapered_allowance(Decimal::from(125140), &policy), Decimal::ZERO);
/// ```
pub fn tapered_allowance(gross_salary: Decimal, policy: &AllowancePolicy) -> Decimal {
    if gross_salary <= policy.taper_threshold {
        return policy.personal_allowance;
    }
    let reduction = (gross_salary - policy.taper_threshold) / TAPER_DIVISOR;
    (policy.personal_allowance - reduction).max(Decimal::ZERO)
}

/// Returns a copy of `schedule` with the zero-rate band ending at
/// `allowance` and the next band starting there.
///
/// The shared schedule is left untouched.
pub fn taper_schedule(schedule: &BandSchedule, allowance: Decimal) -> BandSchedule {
    schedule.with_first_boundary(allowance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::apply_bands;
    use crate::models::Band;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn uk_income_tax() -> BandSchedule {
        BandSchedule::new(
            "income_tax.rest_of_uk",
            vec![
                Band::new(dec("0"), Some(dec("12570")), dec("0")),
                Band::new(dec("12570"), Some(dec("50270")), dec("0.20")),
                Band::new(dec("50270"), Some(dec("125140")), dec("0.40")),
                Band::new(dec("125140"), None, dec("0.45")),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_no_taper_at_threshold() {
        let policy = AllowancePolicy::default();
        assert_eq!(tapered_allowance(dec("100000"), &policy), dec("12570"));
    }

    #[test]
    fn test_taper_just_above_threshold() {
        let policy = AllowancePolicy::default();
        assert_eq!(tapered_allowance(dec("100001"), &policy), dec("12569.5"));
    }

    #[test]
    fn test_taper_at_120000() {
        let policy = AllowancePolicy::default();
        assert_eq!(tapered_allowance(dec("120000"), &policy), dec("2570"));
    }

    #[test]
    fn test_allowance_fully_withdrawn_at_125140() {
        let policy = AllowancePolicy::default();
        assert_eq!(tapered_allowance(dec("125140"), &policy), Decimal::ZERO);
    }

    #[test]
    fn test_allowance_never_negative() {
        let policy = AllowancePolicy::default();
        assert_eq!(tapered_allowance(dec("1000000"), &policy), Decimal::ZERO);
    }

    #[test]
    fn test_custom_policy() {
        let policy = AllowancePolicy {
            personal_allowance: dec("10000"),
            taper_threshold: dec("50000"),
        };
        assert_eq!(tapered_allowance(dec("54000"), &policy), dec("8000"));
    }

    #[test]
    fn test_taper_schedule_moves_first_boundary() {
        let schedule = uk_income_tax();
        let tapered = taper_schedule(&schedule, dec("2570"));

        assert_eq!(tapered.bands()[0].upper, Some(dec("2570")));
        assert_eq!(tapered.bands()[1].lower, dec("2570"));
        assert_eq!(tapered.bands()[1].upper, Some(dec("50270")));
        // 0.20 * 47700 + 0.40 * 69730
        assert_eq!(apply_bands(dec("120000"), &tapered), dec("37432.00"));
    }

    #[test]
    fn test_taper_schedule_with_zero_allowance_collapses_first_band() {
        let tapered = taper_schedule(&uk_income_tax(), Decimal::ZERO);
        assert_eq!(tapered.bands()[0].lower, Decimal::ZERO);
        assert_eq!(tapered.bands()[0].upper, Some(Decimal::ZERO));
        assert_eq!(tapered.bands()[1].lower, Decimal::ZERO);
    }

    #[test]
    fn test_taper_schedule_does_not_mutate_shared_schedule() {
        let schedule = uk_income_tax();
        let before = schedule.clone();
        let _ = taper_schedule(&schedule, dec("100"));
        assert_eq!(schedule, before);
    }

    proptest! {
        #[test]
        fn prop_full_allowance_below_threshold(pennies in 0u64..10_000_000) {
            let gross = Decimal::new(pennies as i64, 2);
            prop_assert_eq!(
                tapered_allowance(gross, &AllowancePolicy::default()),
                DEFAULT_PERSONAL_ALLOWANCE
            );
        }

        #[test]
        fn prop_allowance_within_bounds(pounds in 0u64..1_000_000) {
            let allowance = tapered_allowance(Decimal::from(pounds), &AllowancePolicy::default());
            prop_assert!(allowance >= Decimal::ZERO);
            prop_assert!(allowance <= DEFAULT_PERSONAL_ALLOWANCE);
        }
    }
}
