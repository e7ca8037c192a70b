use std::collections::BTreeMap;

use fixed::types::U51F13;

use crate::catalog::{Product, ProductId};

/// Possible errors to occur during cart operations
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("the product is not in the cart")]
    NotInCart,
}

/// One product-and-quantity pairing within a cart
#[derive(Clone, Debug)]
pub struct CartLine {
    product: Product,
    quantity: u32,
}

impl CartLine {
    fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    /// The quantity of the line, always at least 1
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// The unit price times the quantity
    pub fn line_total(&self) -> U51F13 {
        self.product.price() * U51F13::from_num(self.quantity)
    }
}

/// The in-progress cart of the current customer
///
/// There is at most one line per product id; adding a product that is already
/// in the cart increments the quantity of its line instead. A line whose
/// quantity would drop to 0 is removed entirely, so every present line has a
/// quantity of at least 1. Lines iterate in product id order.
#[derive(Debug, Default)]
pub struct Cart {
    lines: BTreeMap<ProductId, CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of the product to the cart
    pub fn add(&mut self, product: &Product) {
        self.lines
            .entry(product.id())
            .and_modify(|line| line.quantity += 1)
            .or_insert_with(|| CartLine::new(product.clone()));
    }

    /// Removes one unit of the product with the specified id
    ///
    /// The line is removed entirely once its quantity reaches 0.
    pub fn remove_one(&mut self, id: ProductId) -> Result<(), CartError> {
        let line = self.lines.get_mut(&id).ok_or(CartError::NotInCart)?;

        if line.quantity > 1 {
            line.quantity -= 1;
        } else {
            self.lines.remove(&id);
        }

        Ok(())
    }

    /// Removes one unit of the product with the specified display name
    ///
    /// Name lookup only exists for the operator surface, which displays names
    /// rather than ids. The catalog rejects duplicate names at load time, so
    /// the match is unambiguous.
    pub fn remove_one_by_name(&mut self, name: &str) -> Result<(), CartError> {
        let id = self
            .lines
            .values()
            .find(|line| line.product().name() == name)
            .map(|line| line.product().id())
            .ok_or(CartError::NotInCart)?;

        self.remove_one(id)
    }

    /// Removes all lines unconditionally
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The sum of all line totals, 0 for an empty cart
    pub fn subtotal(&self) -> U51F13 {
        self.lines
            .values()
            .fold(U51F13::from_num(0), |total, line| total + line.line_total())
    }

    /// The sum of all line quantities
    pub fn total_quantity(&self) -> u32 {
        self.lines.values().map(CartLine::quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The number of distinct lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The lines of the cart, in product id order
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }
}
