//! # till-store: Snapshot Persistence for Till
//!
//! File-backed [`till_core::PersistenceAdapter`]. The register keeps the
//! cart and the sales ledger here so both survive a restart.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          till-store                                     │
//! │                                                                         │
//! │   CartStore ──┐                                                         │
//! │               ├──► SharedAdapter ──► FileStore ──► <data_dir>/<key>.json│
//! │ SalesLedger ──┘                                                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`file_store`] - `FileStore` and its `StoreConfig`
//! - [`error`] - Store error types

pub mod error;
pub mod file_store;

pub use error::{StoreError, StoreResult};
pub use file_store::{FileStore, StoreConfig};
