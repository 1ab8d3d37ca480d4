use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Round-up granularity.
pub const ROUNDING_MULTIPLE: Decimal = dec!(100);

/// Absolute tolerance when checking caller-supplied ceiling/remanent values.
pub const CONSISTENCY_TOLERANCE: Decimal = dec!(0.001);

/// Ceiling and residual derived from a raw amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundUp {
    pub ceiling: Money,
    pub remanent: Money,
}

/// Round an amount up to the next multiple of 100.
///
/// Non-positive amounts yield a zero ceiling and zero remanent; exact
/// multiples are their own ceiling.
pub fn round_up(amount: Money) -> RoundUp {
    if amount <= Decimal::ZERO {
        return RoundUp {
            ceiling: Decimal::ZERO,
            remanent: Decimal::ZERO,
        };
    }

    let ceiling = if (amount % ROUNDING_MULTIPLE).is_zero() {
        amount
    } else {
        ((amount / ROUNDING_MULTIPLE).floor() + Decimal::ONE) * ROUNDING_MULTIPLE
    };

    RoundUp {
        ceiling,
        remanent: ceiling - amount,
    }
}

/// Whether the given ceiling/remanent agree with [`round_up`] within tolerance.
pub fn is_consistent(amount: Money, ceiling: Money, remanent: Money) -> bool {
    let expected = round_up(amount);
    (ceiling - expected.ceiling).abs() < CONSISTENCY_TOLERANCE
        && (remanent - expected.remanent).abs() < CONSISTENCY_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exact_multiple_is_its_own_ceiling() {
        for amount in [dec!(100), dec!(500), dec!(12_300), dec!(100.00)] {
            let r = round_up(amount);
            assert_eq!(r.ceiling, amount);
            assert_eq!(r.remanent, Decimal::ZERO);
        }
    }

    #[test]
    fn test_non_multiple_rounds_to_next_hundred() {
        let r = round_up(dec!(250));
        assert_eq!(r.ceiling, dec!(300));
        assert_eq!(r.remanent, dec!(50));

        let r = round_up(dec!(1519));
        assert_eq!(r.ceiling, dec!(1600));
        assert_eq!(r.remanent, dec!(81));

        let r = round_up(dec!(0.01));
        assert_eq!(r.ceiling, dec!(100));
        assert_eq!(r.remanent, dec!(99.99));
    }

    #[test]
    fn test_remanent_strictly_between_zero_and_hundred() {
        for amount in [dec!(1), dec!(99.99), dec!(101), dec!(375.5), dec!(499_999)] {
            let r = round_up(amount);
            assert_eq!(r.ceiling - amount, r.remanent);
            assert!(r.remanent > Decimal::ZERO && r.remanent < dec!(100));
        }
    }

    #[test]
    fn test_non_positive_amounts_yield_zero() {
        for amount in [Decimal::ZERO, dec!(-1), dec!(-250)] {
            let r = round_up(amount);
            assert_eq!(r.ceiling, Decimal::ZERO);
            assert_eq!(r.remanent, Decimal::ZERO);
        }
    }

    #[test]
    fn test_consistency_tolerance() {
        assert!(is_consistent(dec!(250), dec!(300), dec!(50)));
        assert!(is_consistent(dec!(250), dec!(300.0009), dec!(49.9995)));
        assert!(!is_consistent(dec!(250), dec!(300.001), dec!(50)));
        assert!(!is_consistent(dec!(250), dec!(300), dec!(40)));
    }
}
