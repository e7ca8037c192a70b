use std::collections::HashMap;

use chrono::{Local, NaiveDate, NaiveDateTime};
use fixed::types::U51F13;

use crate::cart::Cart;

/// An immutable record of one completed checkout
///
/// A sale is created from a copy of the cart's lines, never a live reference,
/// so clearing or mutating the cart afterwards cannot change it. The line
/// detail is collapsed into a name-to-quantity mapping; ids and unit prices
/// are not retained, only the aggregate amounts.
#[derive(Clone, Debug)]
pub struct Sale {
    timestamp: NaiveDateTime,
    items: HashMap<String, u32>,
    total: U51F13,
    received: U51F13,
    change: U51F13,
}

impl Sale {
    /// Freezes the cart's current lines into a sale record
    ///
    /// `total` is the tax-inclusive amount due, so `received - change == total`
    /// always holds.
    pub(crate) fn new(cart: &Cart, total: U51F13, received: U51F13, change: U51F13) -> Self {
        let items = cart
            .lines()
            .map(|line| (line.product().name().to_owned(), line.quantity()))
            .collect();

        Self {
            timestamp: Local::now().naive_local(),
            items,
            total,
            received,
            change,
        }
    }

    /// The local time the sale was completed at
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// The calendar date the sale was completed on
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// The sold quantity per product name
    pub fn items(&self) -> &HashMap<String, u32> {
        &self.items
    }

    /// The tax-inclusive amount charged
    pub fn total(&self) -> U51F13 {
        self.total
    }

    /// The cash received from the customer
    pub fn received(&self) -> U51F13 {
        self.received
    }

    /// The change returned to the customer
    pub fn change(&self) -> U51F13 {
        self.change
    }
}
