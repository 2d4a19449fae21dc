//! # Register
//!
//! The operator-facing surface: one cart, one ledger, one export sink.
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            commit()                                     │
//! │                                                                         │
//! │  cart empty? ──yes──► None (nothing recorded, nothing exported)         │
//! │      │                                                                  │
//! │      no                                                                 │
//! │      ▼                                                                  │
//! │  SalesLedger::record_sale ──► SaleEntry per line, snapshot saved        │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  ExportSink::deliver(sale_….csv) ──fails──► warn!, sale stays recorded  │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  CartStore::reset ──► Some(SaleReceipt)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use till_core::{
    CartStore, Catalog, CsvExport, CsvExporter, ProductCatalogEntry, SaleReceipt, SalesLedger,
};
use till_store::{FileStore, StoreConfig};

use crate::config::RegisterConfig;
use crate::error::{RegisterError, RegisterResult};
use crate::sink::{DirectorySink, ExportSink};

pub struct Register {
    cart: CartStore,
    ledger: SalesLedger,
    sink: Box<dyn ExportSink>,
    catalog: Option<Catalog>,
}

impl std::fmt::Debug for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Register")
            .field("cart", &self.cart)
            .field("ledger_entries", &self.ledger.len())
            .field("catalog_products", &self.catalog.as_ref().map(Catalog::len))
            .finish()
    }
}

impl Register {
    /// Opens the register described by `config`.
    ///
    /// Restores the persisted cart and ledger from `data_dir` and loads the
    /// catalog when `catalog_path` is set.
    pub fn open(config: &RegisterConfig) -> RegisterResult<Self> {
        config.validate()?;
        let timezone = config.tz()?;

        let store = Arc::new(FileStore::open(StoreConfig::new(&config.data_dir))?);
        let cart = CartStore::open(store.clone());
        let ledger = SalesLedger::open(store, timezone)
            .with_exporter(CsvExporter::new(config.currency_symbol.as_str()));
        let sink = DirectorySink::new(&config.export_dir);

        let mut register = Register::with_parts(cart, ledger, sink);
        if let Some(path) = &config.catalog_path {
            register.load_catalog(path)?;
        }

        info!(
            data_dir = ?config.data_dir,
            export_dir = ?config.export_dir,
            timezone = %timezone,
            cart_lines = register.cart.line_count(),
            ledger_entries = register.ledger.len(),
            "Register opened"
        );
        Ok(register)
    }

    /// Assembles a register from already built parts.
    pub fn with_parts(cart: CartStore, ledger: SalesLedger, sink: impl ExportSink + 'static) -> Self {
        Register {
            cart,
            ledger,
            sink: Box::new(sink),
            catalog: None,
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Reads a JSON catalog from disk and makes it current.
    pub fn load_catalog(&mut self, path: &Path) -> RegisterResult<&Catalog> {
        let bytes = std::fs::read(path).map_err(|e| RegisterError::io(path, e))?;
        let catalog = Catalog::from_json(&bytes)?;
        info!(?path, products = catalog.len(), "Catalog loaded");
        Ok(self.catalog.insert(catalog))
    }

    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = Some(catalog);
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Catalog product by name.
    pub fn product(&self, name: &str) -> Option<&ProductCatalogEntry> {
        self.catalog.as_ref().and_then(|c| c.find(name))
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub fn increase(&mut self, product: &ProductCatalogEntry) -> u32 {
        self.cart.increase_quantity(product)
    }

    pub fn decrease(&mut self, product: &ProductCatalogEntry) -> u32 {
        self.cart.decrease_quantity(product)
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn ledger(&self) -> &SalesLedger {
        &self.ledger
    }

    // =========================================================================
    // Day operations
    // =========================================================================

    /// Records the cart as a sale, exports it and empties the cart.
    pub fn commit(&mut self) -> Option<SaleReceipt> {
        self.commit_at(Utc::now())
    }

    /// [`Register::commit`] with an explicit commit instant.
    pub fn commit_at(&mut self, at: DateTime<Utc>) -> Option<SaleReceipt> {
        if self.cart.is_empty() {
            debug!("Commit on empty cart ignored");
            return None;
        }

        let receipt = self.ledger.record_sale_at(self.cart.lines(), at)?;
        self.deliver(&receipt.export);
        self.cart.reset();

        info!(
            lines = receipt.entries.len(),
            total = %receipt.grand_total(),
            "Sale committed"
        );
        Some(receipt)
    }

    /// Exports the per-product summary of the whole ledger.
    pub fn export_daily(&self) -> Option<CsvExport> {
        self.export_daily_at(Utc::now())
    }

    /// [`Register::export_daily`] with an explicit export instant.
    pub fn export_daily_at(&self, at: DateTime<Utc>) -> Option<CsvExport> {
        let export = self.ledger.export_aggregate_at(at)?;
        self.deliver(&export);
        Some(export)
    }

    /// Empties the cart without recording anything.
    pub fn reset_cart(&mut self) {
        self.cart.reset();
    }

    /// Clears the sales ledger.
    pub fn reset_day(&mut self) {
        self.ledger.reset();
    }

    fn deliver(&self, export: &CsvExport) {
        if let Err(e) = self.sink.deliver(export) {
            warn!(filename = %export.filename, error = %e, "Export delivery failed");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use till_core::ledger::DEFAULT_TIMEZONE;
    use till_core::persistence::{CART_LINES_KEY, SALES_LEDGER_KEY};
    use till_core::{MemoryAdapter, Money};

    #[derive(Clone, Default)]
    struct RecordingSink {
        delivered: Arc<Mutex<Vec<CsvExport>>>,
    }

    impl RecordingSink {
        fn filenames(&self) -> Vec<String> {
            self.delivered
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.filename.clone())
                .collect()
        }
    }

    impl ExportSink for RecordingSink {
        fn deliver(&self, export: &CsvExport) -> RegisterResult<PathBuf> {
            self.delivered.lock().unwrap().push(export.clone());
            Ok(PathBuf::from(&export.filename))
        }
    }

    struct BrokenSink;

    impl ExportSink for BrokenSink {
        fn deliver(&self, export: &CsvExport) -> RegisterResult<PathBuf> {
            Err(RegisterError::io(
                &export.filename,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }
    }

    fn salty_peanut() -> ProductCatalogEntry {
        ProductCatalogEntry::new("Barebells", "Salty Peanut", Money::from_cents(140))
    }

    fn caribbean() -> ProductCatalogEntry {
        ProductCatalogEntry::new("NOCCO", "Caribbean", Money::from_cents(225))
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 4, 12, 30, 5).unwrap()
    }

    fn in_memory(sink: impl ExportSink + 'static) -> (Register, Arc<MemoryAdapter>) {
        let store = MemoryAdapter::shared();
        let cart = CartStore::open(store.clone());
        let ledger = SalesLedger::open(store.clone(), DEFAULT_TIMEZONE);
        (Register::with_parts(cart, ledger, sink), store)
    }

    #[test]
    fn test_commit_records_exports_and_clears_cart() {
        let sink = RecordingSink::default();
        let (mut register, store) = in_memory(sink.clone());

        register.increase(&salty_peanut());
        register.increase(&salty_peanut());
        register.increase(&caribbean());

        let receipt = register.commit_at(noon()).unwrap();

        assert_eq!(receipt.entries.len(), 2);
        assert_eq!(receipt.grand_total().cents(), 505);
        assert!(register.cart().is_empty());
        assert!(!store.contains(CART_LINES_KEY));
        assert_eq!(register.ledger().len(), 2);
        assert_eq!(sink.filenames(), vec!["sale_2026-07-04_14-30.csv".to_string()]);
    }

    #[test]
    fn test_commit_on_empty_cart_is_noop() {
        let sink = RecordingSink::default();
        let (mut register, store) = in_memory(sink.clone());

        assert!(register.commit_at(noon()).is_none());
        assert!(register.ledger().is_empty());
        assert!(!store.contains(SALES_LEDGER_KEY));
        assert!(sink.filenames().is_empty());
    }

    #[test]
    fn test_sink_failure_keeps_sale() {
        let (mut register, _store) = in_memory(BrokenSink);

        register.increase(&salty_peanut());
        let receipt = register.commit_at(noon());

        assert!(receipt.is_some());
        assert_eq!(register.ledger().len(), 1);
        assert!(register.cart().is_empty());
    }

    #[test]
    fn test_export_daily_aggregates_commits() {
        let sink = RecordingSink::default();
        let (mut register, _store) = in_memory(sink.clone());

        register.increase(&salty_peanut());
        register.commit_at(noon());
        register.increase(&salty_peanut());
        register.increase(&salty_peanut());
        register.commit_at(noon());

        let export = register.export_daily_at(noon()).unwrap();
        assert_eq!(export.filename, "daily_sales_2026-07-04.csv");
        assert!(export
            .content
            .contains("\r\nBarebells;Salty Peanut;1.40 €;3;4.20 €\r\n"));
        assert!(export.content.ends_with(";;;GRAND TOTAL;4.20 €"));
        assert_eq!(sink.filenames().len(), 3);
    }

    #[test]
    fn test_export_daily_on_empty_ledger_delivers_nothing() {
        let sink = RecordingSink::default();
        let (register, _store) = in_memory(sink.clone());

        assert!(register.export_daily_at(noon()).is_none());
        assert!(sink.filenames().is_empty());
    }

    #[test]
    fn test_resets() {
        let (mut register, store) = in_memory(RecordingSink::default());

        register.increase(&salty_peanut());
        register.commit_at(noon());
        register.increase(&caribbean());

        register.reset_cart();
        assert!(register.cart().is_empty());
        assert_eq!(register.ledger().len(), 1);

        register.reset_day();
        assert!(register.ledger().is_empty());
        assert!(!store.contains(SALES_LEDGER_KEY));
    }

    #[test]
    fn test_decrease_through_register() {
        let (mut register, _store) = in_memory(RecordingSink::default());

        assert_eq!(register.decrease(&caribbean()), 0);
        assert_eq!(register.increase(&caribbean()), 1);
        assert_eq!(register.decrease(&caribbean()), 0);
        assert!(register.cart().is_empty());
    }

    #[test]
    fn test_open_on_disk_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("catalog.json");
        std::fs::write(
            &catalog_path,
            r#"[{"name":"Salty Peanut","brand":"Barebells","price":1.4},
                {"name":"Caribbean","brand":"NOCCO","price":2.25}]"#,
        )
        .unwrap();

        let config = RegisterConfig {
            data_dir: dir.path().join("data"),
            export_dir: dir.path().join("exports"),
            catalog_path: Some(catalog_path),
            ..RegisterConfig::default()
        };

        {
            let mut register = Register::open(&config).unwrap();
            assert_eq!(register.catalog().map(Catalog::len), Some(2));

            let bar = register.product("Salty Peanut").cloned().unwrap();
            register.increase(&bar);
            register.commit_at(noon()).unwrap();

            let drink = register.product("Caribbean").cloned().unwrap();
            register.increase(&drink);
        }

        let register = Register::open(&config).unwrap();
        assert_eq!(register.ledger().len(), 1);
        assert_eq!(register.cart().line_count(), 1);
        assert_eq!(register.cart().grand_total().cents(), 225);

        let sale_csv = dir.path().join("exports").join("sale_2026-07-04_14-30.csv");
        let content = std::fs::read_to_string(sale_csv).unwrap();
        assert!(content.starts_with("Timestamp;Brand;Product Name;Price;Quantity;Total\r\n"));
        assert!(content.contains("04/07/2026 14:30:05;Barebells;Salty Peanut;1.40 €;1;1.40 €"));
    }

    #[test]
    fn test_open_uses_configured_currency_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let config = RegisterConfig {
            data_dir: dir.path().join("data"),
            export_dir: dir.path().join("exports"),
            currency_symbol: "EUR".to_string(),
            ..RegisterConfig::default()
        };

        let mut register = Register::open(&config).unwrap();
        register.increase(&salty_peanut());
        let receipt = register.commit_at(noon()).unwrap();
        assert!(receipt.export.content.ends_with(";;;;GRAND TOTAL;1.40 EUR"));
    }

    #[test]
    fn test_open_rejects_bad_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("catalog.json");
        std::fs::write(&catalog_path, "not json").unwrap();

        let config = RegisterConfig {
            data_dir: dir.path().join("data"),
            export_dir: dir.path().join("exports"),
            catalog_path: Some(catalog_path),
            ..RegisterConfig::default()
        };

        let err = Register::open(&config).unwrap_err();
        assert!(matches!(err, RegisterError::Catalog(_)));
    }

    #[test]
    fn test_open_rejects_unknown_timezone() {
        let dir = tempfile::tempdir().unwrap();
        let config = RegisterConfig {
            data_dir: dir.path().join("data"),
            timezone: "Nowhere/Special".to_string(),
            ..RegisterConfig::default()
        };

        assert!(matches!(
            Register::open(&config),
            Err(RegisterError::Config(_))
        ));
    }
}
