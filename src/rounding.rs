//! Decimal rounding for reported values

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round `value` half-away-from-zero to `dp` decimal places
///
/// Non-finite values are returned unchanged.
pub fn round_dp(value: f64, dp: u32) -> f64 {
    match Decimal::from_f64(value) {
        Some(d) => d
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(value),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(116.666_666, 2), 116.67);
        assert_eq!(round_dp(2375.5, 0), 2376.0);
        assert_eq!(round_dp(-0.25, 1), -0.3);
        assert_eq!(round_dp(140.0, 1), 140.0);
    }

    #[test]
    fn test_round_non_finite() {
        assert!(round_dp(f64::NAN, 1).is_nan());
        assert_eq!(round_dp(f64::INFINITY, 1), f64::INFINITY);
    }
}
