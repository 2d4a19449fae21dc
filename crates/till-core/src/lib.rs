//! # till-core: Pure Business Logic for Till
//!
//! Cart state machine, append-only sales ledger and the CSV export contract
//! of a single-till retail stand.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Operator UI (external)                       │   │
//! │  │    Product menu ──► Cart ──► Commit ──► Daily export            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/register (Register)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │ catalog  │ │   cart   │ │  ledger  │ │  export  │          │   │
//! │  │   │ filter   │ │CartStore │ │  Sales   │ │   CSV    │          │   │
//! │  │   │ brands   │ │ totals   │ │  Ledger  │ │ schemas  │          │   │
//! │  │   └──────────┘ └────┬─────┘ └────┬─────┘ └──────────┘          │   │
//! │  │                     └─────┬──────┘                              │   │
//! │  │                  ┌────────▼─────────┐                           │   │
//! │  │                  │   persistence    │  trait only               │   │
//! │  │                  └────────┬─────────┘                           │   │
//! │  └───────────────────────────┼─────────────────────────────────────┘   │
//! │                              │                                          │
//! │  ┌───────────────────────────▼─────────────────────────────────────┐   │
//! │  │                 till-store (FileStore)                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog entries, cart lines, sale entries, aggregates
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - The active transaction
//! - [`ledger`] - Committed sales history and aggregation
//! - [`export`] - CSV formatting
//! - [`catalog`] - Product search, sort and brand selection
//! - [`persistence`] - Snapshot storage trait and in-memory adapter
//! - [`validation`] - Price and quantity bounds
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::{CartStore, MemoryAdapter, Money, ProductCatalogEntry, SalesLedger};
//! use till_core::ledger::DEFAULT_TIMEZONE;
//!
//! let store = MemoryAdapter::shared();
//! let mut cart = CartStore::open(store.clone());
//! let mut ledger = SalesLedger::open(store, DEFAULT_TIMEZONE);
//!
//! let bar = ProductCatalogEntry::new("Barebells", "Salty Peanut", Money::from_cents(140));
//! cart.increase_quantity(&bar);
//! cart.increase_quantity(&bar);
//! assert_eq!(cart.grand_total().cents(), 280);
//!
//! let receipt = ledger.record_sale(cart.lines()).unwrap();
//! cart.reset();
//! assert!(receipt.export.content.ends_with("GRAND TOTAL;2.80 €"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod export;
pub mod ledger;
pub mod money;
pub mod persistence;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::CartStore;
pub use catalog::{Catalog, CatalogBrand, SortDirection};
pub use error::{CoreError, CoreResult, PersistenceError, PersistenceResult};
pub use export::{CsvExport, CsvExporter};
pub use ledger::{SaleReceipt, SalesLedger};
pub use money::Money;
pub use persistence::{MemoryAdapter, PersistenceAdapter, SharedAdapter};
pub use types::*;
