//! Cart state and its reducer.
//!
//! The cart is a plain value: every mutation goes through
//! [`Cart::apply`], a pure `(state, action) -> state` reducer that
//! recomputes the derived `total` and `item_count` aggregates as a
//! post-condition. [`CartStore`] is a thin owner for composition roots
//! that prefer method calls over constructing actions by hand.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::money;
use super::product::Product;

/// One product-quantity pairing within the cart.
///
/// `product` is a snapshot taken when the line was created (or last merged
/// into by an `Add`), so upstream price changes do not retroactively alter
/// the line. Invariant: `subtotal == product.price × quantity` and
/// `quantity >= 1` for as long as the line exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    pub product: Product,
    pub quantity: u32,
    pub subtotal: BigDecimal,
}

/// Cart state: an ordered line list plus derived aggregates.
///
/// At most one line exists per `product_id`. After every [`Cart::apply`],
/// `total == Σ line.subtotal` and `item_count == Σ line.quantity`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    pub items: Vec<CartLine>,
    pub total: BigDecimal,
    pub item_count: u32,
}

/// An intent dispatched into the cart reducer.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Add `quantity` units of `product`. Merges into an existing line for
    /// the same product, replacing its snapshot with the incoming product
    /// and repricing from it. A zero quantity is a no-op.
    Add { product: Product, quantity: u32 },
    /// Remove the line for `product_id`; no-op if absent.
    Remove { product_id: i64 },
    /// Set the line's quantity, repricing from the stored snapshot.
    /// Zero removes the line; no-op if the line is absent.
    SetQuantity { product_id: i64, quantity: u32 },
    /// Empty the cart.
    Clear,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply one action and return the next state with aggregates
    /// recomputed by full reduction over the lines.
    pub fn apply(mut self, action: CartAction) -> Self {
        match action {
            CartAction::Add { product, quantity } => {
                if quantity > 0 {
                    self.add(product, quantity);
                }
            }
            CartAction::Remove { product_id } => {
                self.items.retain(|line| line.product_id != product_id);
            }
            CartAction::SetQuantity {
                product_id,
                quantity,
            } => {
                if quantity == 0 {
                    self.items.retain(|line| line.product_id != product_id);
                } else if let Some(line) = self
                    .items
                    .iter_mut()
                    .find(|line| line.product_id == product_id)
                {
                    line.quantity = quantity;
                    line.subtotal = money::line_subtotal(&line.product.price, quantity);
                }
            }
            CartAction::Clear => self.items.clear(),
        }

        self.total = money::aggregate_total(&self.items);
        self.item_count = money::aggregate_count(&self.items);
        self
    }

    fn add(&mut self, product: Product, quantity: u32) {
        match self
            .items
            .iter_mut()
            .find(|line| line.product_id == product.id)
        {
            Some(line) => {
                line.quantity += quantity;
                // The most recent Add wins: refresh the snapshot so the
                // whole line is priced from the incoming product.
                line.product = product;
                line.subtotal = money::line_subtotal(&line.product.price, line.quantity);
            }
            None => {
                let subtotal = money::line_subtotal(&product.price, quantity);
                self.items.push(CartLine {
                    product_id: product.id,
                    product,
                    quantity,
                    subtotal,
                });
            }
        }
    }
}

/// Owns the current [`Cart`] value for a composition root.
///
/// Explicitly constructed and passed around; there is no process-wide
/// cart singleton.
#[derive(Debug, Default)]
pub struct CartStore {
    cart: Cart,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, action: CartAction) {
        self.cart = std::mem::take(&mut self.cart).apply(action);
    }

    pub fn add_item(&mut self, product: Product, quantity: u32) {
        self.dispatch(CartAction::Add { product, quantity });
    }

    pub fn remove_item(&mut self, product_id: i64) {
        self.dispatch(CartAction::Remove { product_id });
    }

    pub fn set_quantity(&mut self, product_id: i64, quantity: u32) {
        self.dispatch(CartAction::SetQuantity {
            product_id,
            quantity,
        });
    }

    pub fn clear(&mut self) {
        self.dispatch(CartAction::Clear);
    }

    pub fn state(&self) -> &Cart {
        &self.cart
    }
}
