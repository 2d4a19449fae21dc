//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError         - Catalog parsing, snapshot encoding            │
//! │  └── PersistenceError  - What a PersistenceAdapter reports             │
//! │                                                                         │
//! │  till-store errors (separate crate)                                    │
//! │  └── StoreError        - File system failures → PersistenceError       │
//! │                                                                         │
//! │  register errors (app)                                                 │
//! │  └── RegisterError     - Config and startup failures                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What is NOT an error
//! Cart and ledger operations never return these types. An unmet
//! precondition (decreasing an absent product, recording an empty sale,
//! exporting an empty ledger) is a no-op that is logged, and a
//! `PersistenceError` during save or clear is logged and swallowed: the
//! in-memory state stays authoritative.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors from the parts of the core that do parse external input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The product catalog could not be parsed.
    #[error("Invalid product catalog: {0}")]
    Catalog(String),

    /// A price or quantity is outside the range the till accepts.
    #[error("{field} {value} is out of range ({min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A snapshot could not be encoded or decoded.
    #[error("Snapshot '{key}' could not be (de)serialized: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Persistence Error
// =============================================================================

/// Failure reported by a [`PersistenceAdapter`](crate::persistence::PersistenceAdapter).
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Underlying I/O failure.
    #[error("I/O error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Any other backend failure (invalid key, poisoned state, ...).
    #[error("Persistence backend error: {0}")]
    Backend(String),
}

impl PersistenceError {
    /// Wraps an I/O error for `key`.
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        PersistenceError::Io {
            key: key.into(),
            source,
        }
    }
}

/// Result type for adapter operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::Catalog("expected an array".to_string());
        assert_eq!(err.to_string(), "Invalid product catalog: expected an array");

        let err = PersistenceError::Backend("store poisoned".to_string());
        assert_eq!(err.to_string(), "Persistence backend error: store poisoned");
    }

    #[test]
    fn test_out_of_range_message() {
        let err = CoreError::OutOfRange {
            field: "quantity",
            value: 1000,
            min: 1,
            max: 999,
        };
        assert_eq!(err.to_string(), "quantity 1000 is out of range (1..=999)");
    }

    #[test]
    fn test_io_error_names_key() {
        let err = PersistenceError::io(
            "cartLines",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "I/O error on 'cartLines': denied");
    }

    #[test]
    fn test_serialization_error_names_key() {
        let source = serde_json::from_str::<Vec<u32>>("{").unwrap_err();
        let err = CoreError::Serialization {
            key: "salesLedger".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Snapshot 'salesLedger'"));
    }
}
