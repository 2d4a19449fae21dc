//! # Sales Ledger
//!
//! Append-only history of committed sales.
//!
//! ## Ledger Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Ledger Lifecycle                                  │
//! │                                                                         │
//! │  1. OPEN                                                               │
//! │     └── open() → loads `salesLedger` snapshot (empty if missing/bad)   │
//! │                                                                         │
//! │  2. RECORD (once per commit)                                           │
//! │     └── record_sale(cart lines)                                        │
//! │         ├── one timestamp, shared by every entry of the call           │
//! │         ├── append SaleEntry per line                                  │
//! │         ├── save full snapshot                                         │
//! │         └── return per-sale CSV for exactly those lines                │
//! │                                                                         │
//! │  3. EXPORT (any time)                                                  │
//! │     └── export_aggregate() → per (brand, name) CSV, ledger unchanged   │
//! │                                                                         │
//! │  4. RESET (end of day)                                                 │
//! │     └── reset() → entries and snapshot cleared together               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::export::{CsvExport, CsvExporter};
use crate::money::Money;
use crate::persistence::{
    clear_snapshot, load_snapshot, save_snapshot, SharedAdapter, SALES_LEDGER_KEY,
};
use crate::types::{AggregatedSaleRow, CartLine, SaleEntry};
use crate::validation::{is_valid_entry, is_valid_line};

/// Format of `SaleEntry::timestamp`: day/month/year, 24-hour clock.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Timezone the shop records sales in unless configured otherwise.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Madrid;

/// Result of recording one sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    /// The entries appended by this call, in cart order.
    pub entries: Vec<SaleEntry>,
    /// Per-sale CSV covering exactly `entries`.
    pub export: CsvExport,
}

impl SaleReceipt {
    pub fn grand_total(&self) -> Money {
        self.entries.iter().map(SaleEntry::total).sum()
    }
}

/// The committed sales history.
pub struct SalesLedger {
    entries: Vec<SaleEntry>,
    adapter: SharedAdapter,
    timezone: Tz,
    exporter: CsvExporter,
}

impl std::fmt::Debug for SalesLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesLedger")
            .field("entries", &self.entries.len())
            .field("timezone", &self.timezone)
            .field("exporter", &self.exporter)
            .finish_non_exhaustive()
    }
}

impl SalesLedger {
    /// Opens the ledger stored in `adapter`. A missing or corrupt snapshot
    /// opens as an empty ledger; stored entries that are out of range or
    /// whose total does not match are dropped.
    pub fn open(adapter: SharedAdapter, timezone: Tz) -> Self {
        let stored: Vec<SaleEntry> = load_snapshot(adapter.as_ref(), SALES_LEDGER_KEY);
        let stored_len = stored.len();
        let entries: Vec<SaleEntry> = stored.into_iter().filter(is_valid_entry).collect();
        if entries.len() != stored_len {
            warn!(
                dropped = stored_len - entries.len(),
                "Dropping out-of-range sale entries from stored ledger"
            );
        }
        debug!(entries = entries.len(), %timezone, "Sales ledger opened");
        SalesLedger {
            entries,
            adapter,
            timezone,
            exporter: CsvExporter::default(),
        }
    }

    /// Replaces the CSV exporter (e.g. to change the currency symbol).
    pub fn with_exporter(mut self, exporter: CsvExporter) -> Self {
        self.exporter = exporter;
        self
    }

    // =========================================================================
    // Recording
    // =========================================================================

    /// Records `lines` as one sale, stamped with the current time.
    ///
    /// See [`record_sale_at`](Self::record_sale_at).
    pub fn record_sale(&mut self, lines: &[CartLine]) -> Option<SaleReceipt> {
        self.record_sale_at(lines, Utc::now())
    }

    /// Records `lines` as one sale that happened at `at`.
    ///
    /// Every entry gets the same shop-local timestamp. The full ledger is
    /// saved afterwards. An empty `lines` is a no-op: nothing is appended,
    /// nothing is written, and `None` is returned. Lines outside the price
    /// or quantity bounds of [`crate::validation`] are skipped.
    pub fn record_sale_at(&mut self, lines: &[CartLine], at: DateTime<Utc>) -> Option<SaleReceipt> {
        let valid: Vec<&CartLine> = lines.iter().filter(|line| is_valid_line(line)).collect();
        if valid.len() != lines.len() {
            warn!(
                skipped = lines.len() - valid.len(),
                "Skipping out-of-range cart lines"
            );
        }
        if valid.is_empty() {
            warn!("Refusing to record an empty sale");
            return None;
        }

        let local = self.local_time(at);
        let timestamp = local.format(TIMESTAMP_FORMAT).to_string();

        let recorded: Vec<SaleEntry> = valid
            .into_iter()
            .map(|line| SaleEntry::from_line(line, timestamp.as_str()))
            .collect();

        self.entries.extend(recorded.iter().cloned());
        self.persist();

        let export = self.exporter.sale(&recorded, local);
        info!(
            items = recorded.len(),
            filename = %export.filename,
            total = %self.exporter.format_money(recorded.iter().map(SaleEntry::total).sum()),
            "Sale recorded"
        );

        Some(SaleReceipt {
            entries: recorded,
            export,
        })
    }

    // =========================================================================
    // Aggregation & export
    // =========================================================================

    /// Sums quantity and total per `(brand, name)` over the whole ledger.
    ///
    /// Rows appear in the order their key was first seen, oldest entry first.
    /// The price of a row is the price of that first entry.
    pub fn aggregate(&self) -> Vec<AggregatedSaleRow> {
        let mut rows: Vec<AggregatedSaleRow> = Vec::new();
        let mut index: HashMap<(&str, &str), usize> = HashMap::new();

        for entry in &self.entries {
            let key = (entry.brand.as_str(), entry.name.as_str());
            match index.get(&key) {
                Some(&i) => rows[i].absorb(entry),
                None => {
                    index.insert(key, rows.len());
                    rows.push(AggregatedSaleRow::from_entry(entry));
                }
            }
        }

        rows
    }

    /// Aggregate CSV for the whole ledger, named after today's date.
    pub fn export_aggregate(&self) -> Option<CsvExport> {
        self.export_aggregate_at(Utc::now())
    }

    /// Aggregate CSV for the whole ledger, named after the shop-local date
    /// of `at`. An empty ledger logs a warning and returns `None`.
    pub fn export_aggregate_at(&self, at: DateTime<Utc>) -> Option<CsvExport> {
        if self.entries.is_empty() {
            warn!("No sales to export");
            return None;
        }

        let rows = self.aggregate();
        let export = self.exporter.aggregate(&rows, self.local_time(at));
        info!(rows = rows.len(), filename = %export.filename, "Aggregated sales exported");
        Some(export)
    }

    /// Clears every entry and erases the stored snapshot.
    pub fn reset(&mut self) {
        let cleared = self.entries.len();
        self.entries.clear();
        clear_snapshot(self.adapter.as_ref(), SALES_LEDGER_KEY);
        info!(cleared, "Sales ledger reset");
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All entries, oldest first.
    pub fn entries(&self) -> &[SaleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Σ total over every entry.
    pub fn grand_total(&self) -> Money {
        self.entries.iter().map(SaleEntry::total).sum()
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn exporter(&self) -> &CsvExporter {
        &self.exporter
    }

    fn local_time(&self, at: DateTime<Utc>) -> NaiveDateTime {
        at.with_timezone(&self.timezone).naive_local()
    }

    fn persist(&self) {
        save_snapshot(self.adapter.as_ref(), SALES_LEDGER_KEY, &self.entries);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
