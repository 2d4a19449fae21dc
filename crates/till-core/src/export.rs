//! # CSV Export
//!
//! Pure formatting of sales into semicolon-separated text for spreadsheets.
//!
//! ## Output Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Per-sale export (sale_2026-10-14_18-05.csv)                            │
//! │                                                                         │
//! │  Timestamp;Brand;Product Name;Price;Quantity;Total            ◄ header  │
//! │  14/10/2026 18:05:09;Barebells;Salty Peanut;1.40 €;2;2.80 €   ◄ rows    │
//! │  14/10/2026 18:05:09;NOCCO;Caribbean;2.25 €;1;2.25 €                    │
//! │  ;;;;                                                         ◄ spacer  │
//! │  ;;;;GRAND TOTAL;5.05 €                                       ◄ trailer │
//! │                                                                         │
//! │  Aggregate export (daily_sales_2026-10-14.csv)                         │
//! │                                                                         │
//! │  Brand;Product Name;Price;Quantity;Total                               │
//! │  Barebells;Salty Peanut;1.40 €;7;9.80 €                                │
//! │  ;;;;                                                                  │
//! │  ;;;GRAND TOTAL;9.80 €                                                 │
//! │                                                                         │
//! │  Rows are joined with CRLF; there is no CRLF after the last row.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Semicolons are used because the target spreadsheet locale writes decimal
//! commas. Monetary cells are always `<amount with 2 decimals> <symbol>`.
//! Spreadsheet consumers depend on this layout byte for byte.

use chrono::NaiveDateTime;
use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{AggregatedSaleRow, SaleEntry};

/// Column headers of a per-sale export.
pub const SALE_HEADERS: [&str; 6] = [
    "Timestamp",
    "Brand",
    "Product Name",
    "Price",
    "Quantity",
    "Total",
];

/// Column headers of the aggregate export.
pub const AGGREGATE_HEADERS: [&str; 5] = ["Brand", "Product Name", "Price", "Quantity", "Total"];

/// Label in the trailer row.
pub const GRAND_TOTAL_LABEL: &str = "GRAND TOTAL";

/// Default currency symbol.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "€";

const FIELD_DELIMITER: char = ';';
const ROW_DELIMITER: &str = "\r\n";

/// The spacer row has five empty cells in both schemas.
const SPACER_CELLS: usize = 5;

/// A finished export: suggested filename plus CSV text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// Formats ledger data into the fixed CSV schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExporter {
    currency_symbol: String,
}

impl Default for CsvExporter {
    fn default() -> Self {
        CsvExporter::new(DEFAULT_CURRENCY_SYMBOL)
    }
}

impl CsvExporter {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        CsvExporter {
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// `12.34 €`
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Builds the per-sale export for the entries of one commit.
    ///
    /// `local_time` is the shop-local commit time; it only drives the
    /// filename, the row timestamps come from the entries themselves.
    pub fn sale(&self, entries: &[SaleEntry], local_time: NaiveDateTime) -> CsvExport {
        let grand_total: Money = entries.iter().map(SaleEntry::total).sum();

        let rows = entries.iter().map(|entry| {
            vec![
                entry.timestamp.clone(),
                entry.brand.clone(),
                entry.name.clone(),
                self.format_money(entry.price()),
                entry.quantity.to_string(),
                self.format_money(entry.total()),
            ]
        });

        CsvExport {
            filename: sale_filename(local_time),
            content: self.render(&SALE_HEADERS, rows, grand_total),
        }
    }

    /// Builds the aggregate export from already aggregated rows.
    pub fn aggregate(&self, rows: &[AggregatedSaleRow], local_time: NaiveDateTime) -> CsvExport {
        let grand_total: Money = rows.iter().map(AggregatedSaleRow::total).sum();

        let cells = rows.iter().map(|row| {
            vec![
                row.brand.clone(),
                row.name.clone(),
                self.format_money(row.price()),
                row.quantity.to_string(),
                self.format_money(row.total()),
            ]
        });

        CsvExport {
            filename: daily_sales_filename(local_time),
            content: self.render(&AGGREGATE_HEADERS, cells, grand_total),
        }
    }

    fn render<I>(&self, headers: &[&str], rows: I, grand_total: Money) -> String
    where
        I: Iterator<Item = Vec<String>>,
    {
        let mut lines: Vec<String> = Vec::new();
        lines.push(join_row(headers.iter().copied()));
        lines.extend(rows.map(|row| join_row(row.iter().map(String::as_str))));

        lines.push(join_row(std::iter::repeat("").take(SPACER_CELLS)));

        let total = self.format_money(grand_total);
        let padding = headers.len().saturating_sub(2);
        let trailer = std::iter::repeat("")
            .take(padding)
            .chain([GRAND_TOTAL_LABEL, total.as_str()]);
        lines.push(join_row(trailer));

        lines.join(ROW_DELIMITER)
    }
}

/// `sale_<YYYY>-<MM>-<DD>_<HH>-<mm>.csv`
pub fn sale_filename(local_time: NaiveDateTime) -> String {
    format!("sale_{}.csv", local_time.format("%Y-%m-%d_%H-%M"))
}

/// `daily_sales_<YYYY>-<MM>-<DD>.csv`
pub fn daily_sales_filename(local_time: NaiveDateTime) -> String {
    format!("daily_sales_{}.csv", local_time.format("%Y-%m-%d"))
}

fn join_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let mut row = String::new();
    for (i, cell) in cells.enumerate() {
        if i > 0 {
            row.push(FIELD_DELIMITER);
        }
        push_cell(&mut row, cell);
    }
    row
}

/// Quotes a cell only when it would otherwise break the row structure.
fn push_cell(row: &mut String, cell: &str) {
    let needs_quotes = cell.contains(|c| matches!(c, ';' | '"' | '\r' | '\n'));
    if !needs_quotes {
        row.push_str(cell);
        return;
    }
    row.push('"');
    row.push_str(&cell.replace('"', "\"\""));
    row.push('"');
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CartLine;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn entry(brand: &str, name: &str, cents: i64, qty: u32) -> SaleEntry {
        let line = CartLine::new(brand, name, Money::from_cents(cents), qty);
        SaleEntry::from_line(&line, "07/03/2026 09:05:03")
    }

    #[test]
    fn test_sale_export_layout() {
        let exporter = CsvExporter::default();
        let entries = vec![
            entry("Barebells", "Salty Peanut", 140, 2),
            entry("NOCCO", "Caribbean", 225, 1),
        ];

        let export = exporter.sale(&entries, at(9, 5, 3));

        let expected = [
            "Timestamp;Brand;Product Name;Price;Quantity;Total",
            "07/03/2026 09:05:03;Barebells;Salty Peanut;1.40 €;2;2.80 €",
            "07/03/2026 09:05:03;NOCCO;Caribbean;2.25 €;1;2.25 €",
            ";;;;",
            ";;;;GRAND TOTAL;5.05 €",
        ]
        .join("\r\n");
        assert_eq!(export.content, expected);
        assert_eq!(export.filename, "sale_2026-03-07_09-05.csv");
    }

    #[test]
    fn test_aggregate_export_layout() {
        let exporter = CsvExporter::default();
        let rows = vec![AggregatedSaleRow {
            brand: "Brand".to_string(),
            name: "Name".to_string(),
            price_cents: 500,
            quantity: 4,
            total_cents: 2000,
        }];

        let export = exporter.aggregate(&rows, at(23, 59, 0));

        let expected = [
            "Brand;Product Name;Price;Quantity;Total",
            "Brand;Name;5.00 €;4;20.00 €",
            ";;;;",
            ";;;GRAND TOTAL;20.00 €",
        ]
        .join("\r\n");
        assert_eq!(export.content, expected);
        assert_eq!(export.filename, "daily_sales_2026-03-07.csv");
    }

    #[test]
    fn test_no_trailing_row_delimiter() {
        let export = CsvExporter::default().sale(&[entry("A", "X", 100, 1)], at(0, 0, 0));
        assert!(!export.content.ends_with("\r\n"));
        assert_eq!(export.content.matches("\r\n").count(), 3);
    }

    #[test]
    fn test_custom_currency_symbol() {
        let exporter = CsvExporter::new("EUR");
        assert_eq!(exporter.format_money(Money::from_cents(1234)), "12.34 EUR");
    }

    #[test]
    fn test_cells_with_delimiters_are_quoted() {
        let export = CsvExporter::default().sale(&[entry("A;B", "Say \"hi\"", 100, 1)], at(0, 0, 0));
        let row = export.content.split("\r\n").nth(1).unwrap();
        assert_eq!(row, "07/03/2026 09:05:03;\"A;B\";\"Say \"\"hi\"\"\";1.00 €;1;1.00 €");
    }

    #[test]
    fn test_stylized_brand_is_not_quoted() {
        let export = CsvExporter::default().sale(&[entry("I.O|GENIX", "Whey", 3999, 1)], at(0, 0, 0));
        assert!(export.content.contains(";I.O|GENIX;Whey;39.99 €;1;39.99 €"));
    }

    #[test]
    fn test_filenames_are_zero_padded() {
        let time = NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(sale_filename(time), "sale_2026-01-02_03-04.csv");
        assert_eq!(daily_sales_filename(time), "daily_sales_2026-01-02.csv");
    }
}
