use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

/// Largest representable value carrying the sign of `negative`.
fn saturated(negative: bool) -> Decimal {
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// Whether a value sits on the edge of the Decimal range.
pub fn is_saturated(value: Decimal) -> bool {
    value == Decimal::MAX || value == Decimal::MIN
}

/// Compound growth factor (1 + r)^n for an integer horizon.
///
/// Saturates at the Decimal range instead of failing; a base with magnitude
/// below one may underflow to zero.
pub fn compound(rate: Rate, periods: u64) -> Decimal {
    let base = Decimal::ONE + rate;
    base.checked_powu(periods)
        .unwrap_or_else(|| saturated(base.is_sign_negative() && periods % 2 == 1))
}

/// Future value of a lump sum under annual compounding: P * (1 + r)^n
pub fn future_value(principal: Money, rate: Rate, years: u32) -> Money {
    principal.saturating_mul(compound(rate, u64::from(years)))
}

/// Deflate a nominal amount by (1 + inflation)^years.
///
/// A factor that underflowed to zero, or a quotient beyond the Decimal
/// range, saturates with the sign of the quotient.
pub fn inflation_adjust(amount: Money, inflation: Rate, years: u32) -> Money {
    if amount.is_zero() {
        return Decimal::ZERO;
    }
    let factor = compound(inflation, u64::from(years));
    amount
        .checked_div(factor)
        .unwrap_or_else(|| saturated(amount.is_sign_negative() != factor.is_sign_negative()))
}

/// Round half up on the scaled value: floor(x * 10^dp + 0.5) / 10^dp.
///
/// Negative midpoints move toward positive infinity (-1.005 -> -1.00),
/// unlike `round_dp`, which rounds half away from zero. Values too large to
/// scale have no digits beyond `dp` and are returned as is.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    let scale = Decimal::from(10u64.pow(dp));
    value
        .checked_mul(scale)
        .and_then(|scaled| scaled.checked_add(dec!(0.5)))
        .map(|shifted| (shifted.floor() / scale).round_dp(dp))
        .unwrap_or(value)
}

/// Two-decimal rounding applied at every output boundary.
pub fn round_money(value: Money) -> Money {
    round_half_up(value, 2)
}
