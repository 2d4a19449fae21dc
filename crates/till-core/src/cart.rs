//! # Cart Store
//!
//! Holds the active, uncommitted transaction.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action        CartStore call            Cart Change           │
//! │  ───────────────        ──────────────            ───────────           │
//! │                                                                         │
//! │  Tap "+" on product ──► increase_quantity() ────► line replaced (q+1)  │
//! │                                                   or appended (q=1)    │
//! │                                                                         │
//! │  Tap "−" on product ──► decrease_quantity() ────► line replaced (q−1)  │
//! │                                                   or removed (q was 1) │
//! │                                                   or nothing (absent)  │
//! │                                                                         │
//! │  Tap "Clear" ─────────► reset() ────────────────► lines cleared        │
//! │                                                   snapshot erased      │
//! │                                                                         │
//! │  View cart ───────────► grouped_by_brand()                              │
//! │                         brand_subtotal() / grand_total()   (read only) │
//! │                                                                         │
//! │  Every actual change saves the full `cartLines` snapshot.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by product name
//! - Every line has `1 <= quantity <= MAX_ITEM_QUANTITY`
//! - Line order is the order of each product's first increase
//! - A quantity change replaces the whole line value, never mutates it

use tracing::{debug, warn};

use crate::money::Money;
use crate::persistence::{
    clear_snapshot, load_snapshot, save_snapshot, SharedAdapter, CART_LINES_KEY,
};
use crate::types::{BrandGroup, CartLine, ProductCatalogEntry};
use crate::validation::{is_valid_line, validate_price_cents, MAX_ITEM_QUANTITY};

/// The active transaction plus the adapter its snapshot lives in.
pub struct CartStore {
    lines: Vec<CartLine>,
    adapter: SharedAdapter,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Opens the cart stored in `adapter`, or an empty cart if there is none
    /// or the snapshot is unreadable.
    pub fn open(adapter: SharedAdapter) -> Self {
        let stored: Vec<CartLine> = load_snapshot(adapter.as_ref(), CART_LINES_KEY);
        let lines = sanitize(stored);
        debug!(lines = lines.len(), "Cart opened");
        CartStore { lines, adapter }
    }

    /// Creates a cart holding `lines` without touching the adapter.
    ///
    /// Out-of-range lines are dropped, as are repeated names (first wins).
    pub fn with_lines(adapter: SharedAdapter, lines: Vec<CartLine>) -> Self {
        CartStore {
            lines: sanitize(lines),
            adapter,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `product`.
    ///
    /// An existing line for the same name is replaced in place by a copy with
    /// quantity + 1; otherwise a new line with quantity 1 is appended. The
    /// unit price of an existing line is kept. A line already at
    /// [`MAX_ITEM_QUANTITY`] is left as is and nothing is written; so is a
    /// product whose price fails [`validate_price_cents`] (returns 0).
    ///
    /// Returns the new quantity.
    pub fn increase_quantity(&mut self, product: &ProductCatalogEntry) -> u32 {
        let quantity = match self.position_of(product) {
            Some(index) => {
                let current = &self.lines[index];
                if current.quantity >= MAX_ITEM_QUANTITY {
                    warn!(
                        product = %product.name,
                        max = MAX_ITEM_QUANTITY,
                        "Increase ignored, quantity limit reached"
                    );
                    return current.quantity;
                }
                let next = current.with_quantity(current.quantity + 1);
                let quantity = next.quantity;
                self.lines[index] = next;
                quantity
            }
            None => {
                if let Err(e) = validate_price_cents(product.price.cents()) {
                    warn!(product = %product.name, error = %e, "Increase ignored, invalid price");
                    return 0;
                }
                self.lines.push(CartLine::from_product(product));
                1
            }
        };

        debug!(product = %product.name, quantity, "Cart quantity increased");
        self.persist();
        quantity
    }

    /// Removes one unit of `product`.
    ///
    /// - absent: nothing happens, nothing is written
    /// - quantity > 1: the line is replaced by a copy with quantity − 1
    /// - quantity == 1: the line is removed
    ///
    /// Returns the remaining quantity (0 when removed or absent).
    pub fn decrease_quantity(&mut self, product: &ProductCatalogEntry) -> u32 {
        let Some(index) = self.position_of(product) else {
            debug!(product = %product.name, "Decrease ignored, product not in cart");
            return 0;
        };

        let current = &self.lines[index];
        let remaining = if current.quantity > 1 {
            let next = current.with_quantity(current.quantity - 1);
            let quantity = next.quantity;
            self.lines[index] = next;
            quantity
        } else {
            self.lines.remove(index);
            0
        };

        debug!(product = %product.name, quantity = remaining, "Cart quantity decreased");
        self.persist();
        remaining
    }

    /// Clears all lines and erases the stored snapshot.
    pub fn reset(&mut self) {
        self.lines.clear();
        clear_snapshot(self.adapter.as_ref(), CART_LINES_KEY);
        debug!("Cart reset");
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Quantity of `product` in the cart, or 0.
    pub fn quantity_of(&self, product: &ProductCatalogEntry) -> u32 {
        self.line_for(product).map_or(0, |line| line.quantity)
    }

    /// `price × quantity` for `product`'s line, or zero.
    pub fn line_total(&self, product: &ProductCatalogEntry) -> Money {
        self.line_for(product)
            .map_or(Money::zero(), CartLine::line_total)
    }

    /// Lines partitioned by brand, brands in first-seen order.
    pub fn grouped_by_brand(&self) -> Vec<BrandGroup> {
        let mut groups: Vec<BrandGroup> = Vec::new();
        for line in &self.lines {
            match groups.iter_mut().find(|g| g.brand == line.brand) {
                Some(group) => group.lines.push(line.clone()),
                None => groups.push(BrandGroup {
                    brand: line.brand.clone(),
                    lines: vec![line.clone()],
                }),
            }
        }
        groups
    }

    /// Σ price × quantity over lines of `brand`; zero if the brand is absent.
    pub fn brand_subtotal(&self, brand: &str) -> Money {
        self.lines
            .iter()
            .filter(|line| line.brand == brand)
            .map(CartLine::line_total)
            .sum()
    }

    /// Σ price × quantity over all lines.
    pub fn grand_total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Current lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn position_of(&self, product: &ProductCatalogEntry) -> Option<usize> {
        self.lines.iter().position(|line| line.is_for(product))
    }

    fn line_for(&self, product: &ProductCatalogEntry) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.is_for(product))
    }

    fn persist(&self) {
        save_snapshot(self.adapter.as_ref(), CART_LINES_KEY, &self.lines);
    }
}

/// Drops lines that would break the cart invariants.
fn sanitize(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut kept: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines {
        if !is_valid_line(&line) || kept.iter().any(|k| k.name == line.name) {
            debug!(product = %line.name, "Dropping invalid cart line");
            continue;
        }
        kept.push(line);
    }
    kept
}

// =============================================================================
// Unit Tests
// =============================================================================
