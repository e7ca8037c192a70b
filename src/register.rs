use std::path::PathBuf;

use fixed::types::U51F13;
use tracing::error;

use crate::cart::{Cart, CartError};
use crate::catalog::{Catalog, Product, ProductId};
use crate::ledger::{LedgerError, SalesLedger};
use crate::receipt;
use crate::sale::Sale;
use crate::summary::DailySummary;
use crate::tax;

/// Possible errors to occur while operating the register
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("no product with id {0} in the catalog")]
    UnknownProduct(ProductId),
}

/// Possible errors to occur during checkout
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("the cart is empty")]
    EmptyCart,
    #[error("insufficient payment: ฿{received:.2} received, ฿{required:.2} required")]
    InsufficientPayment {
        required: U51F13,
        received: U51F13,
    },
}

/// The single point-of-sale register
///
/// The register ties the loaded catalog, the customer cart and the day's
/// sale ledger together and drives the checkout lifecycle: validate the
/// payment against the tax-inclusive amount due, freeze the cart into a
/// sale, mirror it to the day's files and clear the cart in one step.
#[derive(Debug)]
pub struct Register {
    catalog: Catalog,
    cart: Cart,
    ledger: SalesLedger,
    last_receipt: Option<String>,
}

impl Register {
    pub fn new(catalog: Catalog, ledger: SalesLedger) -> Self {
        Self {
            catalog,
            cart: Cart::new(),
            ledger,
            last_receipt: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn ledger(&self) -> &SalesLedger {
        &self.ledger
    }

    /// Adds one unit of the specified catalog product to the cart
    pub fn add_to_cart(&mut self, id: ProductId) -> Result<&Product, RegisterError> {
        let product = self
            .catalog
            .get(id)
            .ok_or(RegisterError::UnknownProduct(id))?;
        self.cart.add(product);

        Ok(product)
    }

    /// Removes one unit of the named product from the cart
    ///
    /// The operator surface displays names, so removal is keyed by display
    /// name here; the cart itself resolves the name to its id.
    pub fn remove_from_cart(&mut self, name: &str) -> Result<(), CartError> {
        self.cart.remove_one_by_name(name)
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// The cart subtotal before tax
    pub fn subtotal(&self) -> U51F13 {
        self.cart.subtotal()
    }

    /// The tax-inclusive amount the current cart is due
    pub fn amount_due(&self) -> U51F13 {
        tax::amount_due(self.cart.subtotal())
    }

    /// Completes the sale of the current cart against the received cash
    ///
    /// An empty cart and a received amount below the tax-inclusive amount
    /// due are rejected without mutating anything. On success the sale is
    /// recorded, the day's summary report is refreshed, the receipt is
    /// retained for reprints and the cart is cleared atomically.
    pub fn checkout(&mut self, received: U51F13) -> Result<Sale, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let required = self.amount_due();
        let change = received
            .checked_sub(required)
            .ok_or(CheckoutError::InsufficientPayment { required, received })?;

        let sale = Sale::new(&self.cart, required, received, change);
        self.last_receipt = Some(receipt::render(
            &self.cart,
            received,
            change,
            sale.timestamp(),
        ));

        self.ledger.record(sale.clone());
        // best-effort refresh, like the log append itself
        if let Err(err) = self.ledger.write_summary(self.ledger.date()) {
            error!("failed to refresh the daily summary: {err}");
        }

        self.cart.clear();

        Ok(sale)
    }

    /// The receipt text of the most recent sale, if any
    pub fn last_receipt(&self) -> Option<&str> {
        self.last_receipt.as_deref()
    }

    /// A copy of today's recorded sales
    pub fn todays_sales(&self) -> Vec<Sale> {
        self.ledger.todays_sales()
    }

    /// Recomputes today's aggregate summary without touching any file
    pub fn quick_summary(&self) -> DailySummary {
        self.ledger.summarize(self.ledger.date())
    }

    /// Writes today's summary report and returns its path
    pub fn write_daily_summary(&self) -> Result<PathBuf, LedgerError> {
        self.ledger.write_summary(self.ledger.date())
    }
}
