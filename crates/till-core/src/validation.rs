//! # Validation
//!
//! Bounds on prices and quantities, checked where data enters the core.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where values are checked                             │
//! │                                                                         │
//! │  catalog JSON ──► Catalog::from_json ──► validate_price_cents          │
//! │                   (bad entry rejects the whole catalog)                 │
//! │                                                                         │
//! │  cartLines    ──► CartStore::open    ──► is_valid_line                 │
//! │  salesLedger  ──► SalesLedger::open  ──► is_valid_entry                │
//! │                   (bad lines/entries are dropped with a warning)       │
//! │                                                                         │
//! │  increase_quantity stops at MAX_ITEM_QUANTITY                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With both bounds in place a line total is at most
//! `MAX_PRICE_CENTS * MAX_ITEM_QUANTITY`, far inside `i64`.

use crate::error::{CoreError, CoreResult};
use crate::types::{CartLine, SaleEntry};

/// Maximum units of one product in a cart.
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Maximum unit price: 999 999.99.
pub const MAX_PRICE_CENTS: i64 = 99_999_999;

/// Validates a unit price in cents.
///
/// ## Rules
/// - Must be non-negative (zero is allowed for free items)
/// - Must not exceed [`MAX_PRICE_CENTS`]
///
/// ```rust
/// use till_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(140).is_ok());
/// assert!(validate_price_cents(-1).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> CoreResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(CoreError::OutOfRange {
            field: "price",
            value: cents,
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }
    Ok(())
}

/// Validates a cart quantity: `1..=MAX_ITEM_QUANTITY`.
pub fn validate_quantity(quantity: u32) -> CoreResult<()> {
    if quantity == 0 || quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::OutOfRange {
            field: "quantity",
            value: i64::from(quantity),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }
    Ok(())
}

/// Whether a stored cart line is within bounds.
pub fn is_valid_line(line: &CartLine) -> bool {
    validate_price_cents(line.price_cents).is_ok() && validate_quantity(line.quantity).is_ok()
}

/// Whether a stored sale entry is within bounds and its total matches.
pub fn is_valid_entry(entry: &SaleEntry) -> bool {
    validate_price_cents(entry.price_cents).is_ok()
        && validate_quantity(entry.quantity).is_ok()
        && entry.price().multiply_quantity(entry.quantity) == entry.total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        assert!(validate_price_cents(MAX_PRICE_CENTS + 1).is_err());
        assert!(validate_price_cents(i64::MAX).is_err());

        let err = validate_price_cents(-5).unwrap_err();
        assert!(matches!(err, CoreError::OutOfRange { field: "price", value: -5, .. }));
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
        assert!(validate_quantity(u32::MAX).is_err());
    }

    #[test]
    fn test_line_bounds() {
        assert!(is_valid_line(&CartLine::new("A", "X", Money::from_cents(140), 2)));
        assert!(!is_valid_line(&CartLine::new("A", "X", Money::from_cents(i64::MAX), 2)));
        assert!(!is_valid_line(&CartLine::new("A", "X", Money::from_cents(140), u32::MAX)));
    }

    #[test]
    fn test_entry_total_must_match() {
        let line = CartLine::new("A", "X", Money::from_cents(500), 2);
        let entry = SaleEntry::from_line(&line, "04/07/2026 14:30:05");
        assert!(is_valid_entry(&entry));

        let tampered = SaleEntry {
            total_cents: i64::MAX,
            ..entry
        };
        assert!(!is_valid_entry(&tampered));
    }
}
