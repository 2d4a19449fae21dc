//! # Domain Types
//!
//! Core domain types used throughout Till.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │ ProductCatalogEntry │   │    CartLine     │   │    SaleEntry    │   │
//! │  │  ─────────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  name (identity)    │──►│  brand          │──►│  brand          │   │
//! │  │  brand              │   │  name           │   │  name           │   │
//! │  │  price              │   │  price_cents    │   │  price_cents    │   │
//! │  │  image, description │   │  quantity ≥ 1   │   │  quantity       │   │
//! │  └─────────────────────┘   └─────────────────┘   │  total_cents    │   │
//! │     (read-only catalog)       (active cart)      │  timestamp      │   │
//! │                                                  └────────┬────────┘   │
//! │                                                           │            │
//! │                                          ┌────────────────▼────────┐   │
//! │                                          │   AggregatedSaleRow     │   │
//! │                                          │   (derived, per brand   │   │
//! │                                          │    and product name)    │   │
//! │                                          └─────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `CartLine` freezes brand, name and unit price when the product is first
//! added. A `SaleEntry` freezes the line again at commit time, together with
//! its computed total and a formatted timestamp.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Catalog Entry
// =============================================================================

/// A product offered by the shop, as read from the external catalog.
///
/// Identity is `name` alone; `brand` is descriptive. The catalog stores
/// `price` as a decimal number of euros, converted to [`Money`] on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductCatalogEntry {
    /// Product name, unique within the catalog.
    pub name: String,

    /// Brand shown on the menu and used for grouping.
    pub brand: String,

    /// Unit price.
    #[serde(with = "crate::money::major_units")]
    #[ts(type = "number")]
    pub price: Money,

    /// Image URL for the product card.
    #[serde(default)]
    pub image: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

impl ProductCatalogEntry {
    /// Creates an entry with empty image and description.
    pub fn new(brand: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        ProductCatalogEntry {
            name: name.into(),
            brand: brand.into(),
            price,
            image: String::new(),
            description: String::new(),
        }
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One product in the active, uncommitted transaction.
///
/// ## Invariants
/// - `quantity >= 1` while the line is held by a `CartStore`
/// - `price_cents` is the unit price at the moment of the first increase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Brand at time of adding (frozen)
    pub brand: String,

    /// Product name at time of adding (frozen)
    pub name: String,

    /// Unit price in cents at time of adding (frozen)
    pub price_cents: i64,

    /// Quantity in cart
    pub quantity: u32,
}

impl CartLine {
    /// Creates a line for `product` with quantity 1.
    pub fn from_product(product: &ProductCatalogEntry) -> Self {
        CartLine {
            brand: product.brand.clone(),
            name: product.name.clone(),
            price_cents: product.price.cents(),
            quantity: 1,
        }
    }

    /// Creates a line from raw parts.
    pub fn new(
        brand: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        quantity: u32,
    ) -> Self {
        CartLine {
            brand: brand.into(),
            name: name.into(),
            price_cents: price.cents(),
            quantity,
        }
    }

    /// Returns a copy of this line carrying `quantity`.
    ///
    /// Quantity changes never mutate a line in place; the cart swaps in the
    /// returned value.
    pub fn with_quantity(&self, quantity: u32) -> Self {
        CartLine {
            quantity,
            ..self.clone()
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price().multiply_quantity(self.quantity)
    }

    /// Whether this line refers to `product` (matched by name).
    #[inline]
    pub fn is_for(&self, product: &ProductCatalogEntry) -> bool {
        self.name == product.name
    }
}

/// Lines of a single brand, as produced by `CartStore::grouped_by_brand`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BrandGroup {
    pub brand: String,
    pub lines: Vec<CartLine>,
}

impl BrandGroup {
    /// Σ price × quantity over the group.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}

// =============================================================================
// Sale Entry
// =============================================================================

/// Immutable record of a committed cart line.
///
/// Created only by `SalesLedger::record_sale`. The ledger hands out shared
/// references, so an entry cannot change after it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleEntry {
    pub brand: String,
    pub name: String,
    /// Unit price in cents at time of sale.
    pub price_cents: i64,
    pub quantity: u32,
    /// `price_cents * quantity`, fixed at commit time.
    pub total_cents: i64,
    /// Shop-local time of the commit, `DD/MM/YYYY HH:MM:SS`.
    pub timestamp: String,
}

impl SaleEntry {
    /// Freezes `line` into a sale entry stamped with `timestamp`.
    pub fn from_line(line: &CartLine, timestamp: impl Into<String>) -> Self {
        SaleEntry {
            brand: line.brand.clone(),
            name: line.name.clone(),
            price_cents: line.price_cents,
            quantity: line.quantity,
            total_cents: line.line_total().cents(),
            timestamp: timestamp.into(),
        }
    }

    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Aggregated Sale Row
// =============================================================================

/// Per-(brand, name) summary across the whole ledger. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedSaleRow {
    pub brand: String,
    pub name: String,
    /// Unit price of the first ledger entry for this key.
    pub price_cents: i64,
    pub quantity: u64,
    pub total_cents: i64,
}

impl AggregatedSaleRow {
    /// Starts a row from the first entry seen for its key.
    pub fn from_entry(entry: &SaleEntry) -> Self {
        AggregatedSaleRow {
            brand: entry.brand.clone(),
            name: entry.name.clone(),
            price_cents: entry.price_cents,
            quantity: u64::from(entry.quantity),
            total_cents: entry.total_cents,
        }
    }

    /// Folds a later entry with the same key into this row.
    pub fn absorb(&mut self, entry: &SaleEntry) {
        self.quantity = self.quantity.saturating_add(u64::from(entry.quantity));
        self.total_cents = self.total_cents.saturating_add(entry.total_cents);
    }

    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
