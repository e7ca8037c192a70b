//! Fixed-width receipt rendering.
//!
//! Rendering is a pure formatting step over a cart snapshot and the payment
//! figures of one checkout. Nothing here is persisted; the register retains
//! the rendered text of the most recent sale for reprints.

use chrono::NaiveDateTime;
use fixed::types::U51F13;

use crate::cart::Cart;
use crate::tax;

const WIDTH: usize = 50;
const NAME_WIDTH: usize = 20;

const STORE_NAME: &str = "Coffee POS Store";
const STORE_ADDRESS: &str = "Nonthaburi, Thailand";
const STORE_PHONE: &str = "Tel: 02-000-0000";

/// Renders the receipt for one completed checkout
///
/// The item table lists the cart lines in product id order; names longer
/// than 20 characters are truncated with an ellipsis. The totals block shows
/// the subtotal, the flat tax and the tax-inclusive TOTAL the payment was
/// validated against.
pub fn render(cart: &Cart, received: U51F13, change: U51F13, at: NaiveDateTime) -> String {
    let mut receipt = String::new();
    let rule = "=".repeat(WIDTH);
    let thin_rule = "-".repeat(WIDTH);

    receipt.push_str(&rule);
    receipt.push('\n');
    receipt.push_str(&center(STORE_NAME));
    receipt.push_str(&center(STORE_ADDRESS));
    receipt.push_str(&center(STORE_PHONE));
    receipt.push_str(&rule);
    receipt.push('\n');
    receipt.push_str(&center("SALES RECEIPT"));
    receipt.push_str(&rule);
    receipt.push('\n');

    receipt.push_str(&format!("Date: {}\n", at.format("%d/%m/%Y %H:%M:%S")));
    receipt.push_str(&format!("Receipt#: POS{}\n", receipt_number(at)));
    receipt.push_str(&thin_rule);
    receipt.push('\n');

    receipt.push_str(&format!(
        "{:<20} {:>5} {:>8} {:>12}\n",
        "Item", "Qty", "Price", "Total"
    ));
    receipt.push_str(&thin_rule);
    receipt.push('\n');

    for line in cart.lines() {
        receipt.push_str(&format!(
            "{:<20} {:>5} {:>8.2} {:>12.2}\n",
            truncate_name(line.product().name()),
            line.quantity(),
            line.product().price(),
            line.line_total(),
        ));
    }

    receipt.push_str(&thin_rule);
    receipt.push('\n');

    let subtotal = cart.subtotal();
    receipt.push_str(&format!("Total Items: {}\n", cart.total_quantity()));
    receipt.push_str(&format!("Subtotal: ฿{subtotal:.2}\n"));
    receipt.push_str(&format!(
        "Tax ({}%): ฿{:.2}\n",
        tax::TAX_RATE_PERCENT,
        tax::tax_amount(subtotal)
    ));
    receipt.push_str(&format!("TOTAL: ฿{:.2}\n", tax::amount_due(subtotal)));
    receipt.push_str(&thin_rule);
    receipt.push('\n');

    receipt.push_str(&format!("Cash Received: ฿{received:.2}\n"));
    receipt.push_str(&format!("Change: ฿{change:.2}\n"));
    receipt.push_str(&rule);
    receipt.push('\n');

    receipt.push_str(&center("Thank You for Your Purchase!"));
    receipt.push_str(&center("Have a Great Day!"));
    receipt.push_str(&rule);
    receipt.push('\n');
    receipt.push_str(&center("** This is a computer generated receipt **"));

    receipt
}

/// A synthetic receipt number derived from the checkout time
fn receipt_number(at: NaiveDateTime) -> i64 {
    at.and_utc().timestamp_millis() % 100_000
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() > NAME_WIDTH {
        let kept: String = name.chars().take(NAME_WIDTH - 3).collect();
        format!("{kept}...")
    } else {
        name.to_owned()
    }
}

fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= WIDTH {
        return format!("{text}\n");
    }

    let padding = (WIDTH - len) / 2;
    format!("{}{text}\n", " ".repeat(padding))
}
