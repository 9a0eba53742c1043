//! Money rounding for price arithmetic.
//!
//! All catalog prices are `NUMERIC(8,2)` in the database; every computed
//! amount (extras totals, line totals, order totals) is rounded to two
//! decimal places before it is stored or shown.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a computed amount to two decimal places.
///
/// Uses banker's-neutral "midpoint away from zero" rounding, matching how
/// the storefront has always displayed prices.
#[must_use]
pub fn round_price(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_round_price_two_decimals() {
        assert_eq!(round_price(d("10.555")), d("10.56"));
        assert_eq!(round_price(d("10.554")), d("10.55"));
        assert_eq!(round_price(d("10")), d("10"));
    }

    #[test]
    fn test_round_price_is_stable() {
        let once = round_price(d("199.999"));
        assert_eq!(once, d("200.00"));
        assert_eq!(round_price(once), once);
    }
}
