//! Decimal helpers shared by the calculators

use rust_decimal::{Decimal, RoundingStrategy};

/// Largest amount a calculator accepts: 1.000.000.000.000 €.
///
/// Products of two clamped amounts stay far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Clamp an input amount into `0..=MAX_AMOUNT`; the UI owns real validation
pub fn clamp_amount(amount: Decimal) -> Decimal {
    amount.clamp(Decimal::ZERO, MAX_AMOUNT)
}

/// `percent` of `amount`, with `percent` given as e.g. `20` for 20 %
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount * percent / Decimal::ONE_HUNDRED
}

pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round_euros(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
