//! Reservation pricing math.
//!
//! Pure functions, no database access. Totals are always recomputed here on
//! the server; a total submitted by a client is discarded.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Flat fee added to every reservation, in dollars.
pub const SERVICE_FEE: Decimal = dec!(2.00);

/// Round to `places` decimal places using banker's rounding
/// (ROUND_HALF_EVEN), which reduces cumulative rounding bias.
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Total price for holding a spot: hourly rate × whole hours + service fee.
pub fn quote(hourly_rate: Decimal, duration_hours: i32) -> Decimal {
    round_money(
        hourly_rate * Decimal::from(duration_hours) + SERVICE_FEE,
        2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_is_rate_times_hours_plus_fee() {
        assert_eq!(quote(dec!(5.00), 4), dec!(22.00));
        assert_eq!(quote(dec!(1.50), 2), dec!(5.00));
    }

    #[test]
    fn quote_with_zero_rate_still_charges_the_fee() {
        assert_eq!(quote(Decimal::ZERO, 8), dec!(2.00));
    }

    #[test]
    fn quote_rounds_to_cents() {
        // 1.333 * 3 = 3.999 -> 5.999 -> 6.00
        assert_eq!(quote(dec!(1.333), 3), dec!(6.00));
    }

    #[test]
    fn round_money_uses_bankers_rounding() {
        assert_eq!(round_money(dec!(2.005), 2), dec!(2.00));
        assert_eq!(round_money(dec!(2.015), 2), dec!(2.02));
    }
}
