//! Minor-unit currency conversion at the platform boundary.
//!
//! The Marketing API represents budgets in minor currency units (cents)
//! on the wire. Conversion happens exactly once, here: major units to
//! cents on write, cents to major units on read. Nothing past the
//! connector ever sees minor units.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Convert a major-unit amount to wire cents, rounding half-up.
pub fn to_minor_units(amount: Decimal) -> i64 {
    (amount * Decimal::from(100)).round().to_i64().unwrap_or(0)
}

/// Convert a wire cents string to a major-unit amount.
///
/// Returns `None` for absent or malformed values so callers can keep the
/// budget column NULL instead of inventing a zero.
pub fn from_minor_units(cents: &str) -> Option<Decimal> {
    let cents: Decimal = cents.trim().parse().ok()?;
    Some(cents / Decimal::from(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_major_to_cents() {
        assert_eq!(to_minor_units(dec("50")), 5000);
        assert_eq!(to_minor_units(dec("19.99")), 1999);
        assert_eq!(to_minor_units(dec("0")), 0);
    }

    #[test]
    fn test_rounding_on_sub_cent_amounts() {
        assert_eq!(to_minor_units(dec("10.005")), 1001);
        assert_eq!(to_minor_units(dec("10.004")), 1000);
    }

    #[test]
    fn test_cents_to_major() {
        assert_eq!(from_minor_units("5000"), Some(dec("50")));
        assert_eq!(from_minor_units("1999"), Some(dec("19.99")));
        assert_eq!(from_minor_units(" 100 "), Some(dec("1")));
    }

    #[test]
    fn test_malformed_cents_stay_none() {
        assert_eq!(from_minor_units(""), None);
        assert_eq!(from_minor_units("abc"), None);
    }

    #[test]
    fn test_round_trip_is_lossless_for_cent_amounts() {
        let amount = dec("123.45");
        let wire = to_minor_units(amount).to_string();
        assert_eq!(from_minor_units(&wire), Some(amount));
    }
}
