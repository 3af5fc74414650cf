//! Pure money and quantity arithmetic over cart lines.
//!
//! All amounts are `BigDecimal` so repeated mutations never accumulate
//! floating-point error. Rounding to two decimal places happens only at the
//! presentation boundary via [`round_display`], never in stored state.

use bigdecimal::{BigDecimal, RoundingMode, Zero};

use super::cart::CartLine;

/// Subtotal for one line: unit price × quantity.
pub fn line_subtotal(price: &BigDecimal, quantity: u32) -> BigDecimal {
    price * BigDecimal::from(quantity)
}

/// Sum of subtotals across all lines.
pub fn aggregate_total(lines: &[CartLine]) -> BigDecimal {
    lines
        .iter()
        .fold(BigDecimal::zero(), |acc, line| acc + &line.subtotal)
}

/// Sum of quantities across all lines.
pub fn aggregate_count(lines: &[CartLine]) -> u32 {
    lines.iter().map(|line| line.quantity).sum()
}

/// Round an amount to two decimal places for display.
pub fn round_display(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}
