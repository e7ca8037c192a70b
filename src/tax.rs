//! The single tax policy of the register.
//!
//! A flat 7% tax is added on top of the cart subtotal. The tax-inclusive
//! amount due is what payment validation checks against, what change is
//! computed from, and what the receipt's TOTAL line shows.

use fixed::types::U51F13;

/// The flat tax rate, in percent
pub const TAX_RATE_PERCENT: u32 = 7;

/// The tax added on top of the specified subtotal
pub fn tax_amount(subtotal: U51F13) -> U51F13 {
    subtotal * U51F13::from_num(TAX_RATE_PERCENT) / U51F13::from_num(100)
}

/// The tax-inclusive amount the customer has to pay
pub fn amount_due(subtotal: U51F13) -> U51F13 {
    subtotal + tax_amount(subtotal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_on_a_round_subtotal_is_exact() {
        assert_eq!(tax_amount(U51F13::from_num(100)), U51F13::from_num(7));
        assert_eq!(amount_due(U51F13::from_num(100)), U51F13::from_num(107));
    }

    #[test]
    fn amount_due_rounds_to_the_expected_cents() {
        let due = amount_due(U51F13::from_num(165));
        assert_eq!(format!("{due:.2}"), "176.55");
    }

    #[test]
    fn zero_subtotal_is_due_nothing() {
        assert_eq!(amount_due(U51F13::from_num(0)), U51F13::from_num(0));
    }
}
