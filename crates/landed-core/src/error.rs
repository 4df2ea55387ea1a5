//! # Error Types
//!
//! Domain-specific error types for landed-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CostingError                                                          │
//! │  ├── InvalidRatio     - packaging ratio <= 0 on a non-base unit         │
//! │  ├── InvalidRate      - tax percent / freight rate out of range         │
//! │  ├── DuplicateItem    - same item twice on one invoice                  │
//! │  ├── InvalidAmount    - negative price, quantity or charge              │
//! │  ├── Overflow         - a figure outgrew the 96-bit decimal range       │
//! │  ├── InvalidConfig    - engine parameters failed validation             │
//! │  ├── ItemNotFound / ChargeNotFound - draft editing on a missing entry   │
//! │  └── InvalidRecord    - persisted purchase JSON did not decode          │
//! │                                                                         │
//! │  Flow: validation ─► component ─► compute_purchase ─► form layer       │
//! │        (the kind raised first is the kind the caller sees)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is transient. A pure computation has nothing to retry, so the
//! form layer is expected to show these next to the offending field.

use rust_decimal::Decimal;
use thiserror::Error;

/// Costing engine errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CostingError {
    /// Packaging ratio is zero or negative on an item counted in a
    /// packaging unit.
    ///
    /// ## When This Occurs
    /// ```text
    /// Item "TILE-60" counted in BOX, ratio field left at 0
    ///      │
    ///      ▼
    /// normalize() ──► InvalidRatio { item_id: "TILE-60", ratio: 0 }
    ///      │
    ///      ▼
    /// UI shows: "Packaging ratio for TILE-60 must be greater than zero"
    /// ```
    #[error("Packaging ratio for {item_id} must be greater than zero, got {ratio}")]
    InvalidRatio { item_id: String, ratio: Decimal },

    /// A rate is outside its allowed range (negative tax percent, tax
    /// percent above 100, negative freight rate).
    #[error("{field} is out of range, got {rate}")]
    InvalidRate { field: String, rate: Decimal },

    /// The same item appears on more than one line of an invoice.
    #[error("Item {0} appears more than once on this invoice")]
    DuplicateItem(String),

    /// A monetary amount or quantity is negative.
    #[error("{field} must not be negative, got {value}")]
    InvalidAmount { field: String, value: Decimal },

    /// A figure left the representable decimal range (about 7.9e28).
    ///
    /// Only reachable with absurd inputs, e.g. a huge quantity on a
    /// huge price, or a price divided by a vanishing packaging ratio.
    #[error("{field} is too large to compute")]
    Overflow { field: String },

    /// Engine configuration failed to parse or validate.
    #[error("Invalid costing config: {0}")]
    InvalidConfig(String),

    /// Draft edit referenced an item that is not on the invoice.
    #[error("Item {0} is not on this invoice")]
    ItemNotFound(String),

    /// Draft edit referenced an overhead charge index that does not exist.
    #[error("No overhead charge at position {0}")]
    ChargeNotFound(usize),

    /// A persisted purchase record could not be decoded.
    #[error("Invalid purchase record: {0}")]
    InvalidRecord(String),
}

impl CostingError {
    /// Pins a line-level failure to the item it came from.
    ///
    /// Component functions take bare numbers and cannot know which line
    /// they are looking at; the aggregator calls this on the way out.
    pub fn on_item(self, item_id: &str) -> Self {
        match self {
            CostingError::InvalidRatio { ratio, .. } => CostingError::InvalidRatio {
                item_id: item_id.to_string(),
                ratio,
            },
            CostingError::InvalidRate { field, rate } => CostingError::InvalidRate {
                field: format!("{item_id} {field}"),
                rate,
            },
            CostingError::InvalidAmount { field, value } => CostingError::InvalidAmount {
                field: format!("{item_id} {field}"),
                value,
            },
            CostingError::Overflow { field } => CostingError::Overflow {
                field: format!("{item_id} {field}"),
            },
            other => other,
        }
    }

    /// Overflow while computing `field`.
    pub fn overflow(field: &str) -> Self {
        CostingError::Overflow {
            field: field.to_string(),
        }
    }
}

/// Convenience type alias for Results with CostingError.
pub type CostingResult<T> = Result<T, CostingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CostingError::InvalidRatio {
            item_id: "TILE-60".to_string(),
            ratio: Decimal::ZERO,
        };
        assert_eq!(
            err.to_string(),
            "Packaging ratio for TILE-60 must be greater than zero, got 0"
        );

        let err = CostingError::DuplicateItem("X1".to_string());
        assert_eq!(err.to_string(), "Item X1 appears more than once on this invoice");
    }

    #[test]
    fn test_on_item_labels_line_errors() {
        let err = CostingError::InvalidRatio {
            item_id: String::new(),
            ratio: Decimal::NEGATIVE_ONE,
        }
        .on_item("TILE-60");
        assert_eq!(
            err,
            CostingError::InvalidRatio {
                item_id: "TILE-60".to_string(),
                ratio: Decimal::NEGATIVE_ONE,
            }
        );

        let err = CostingError::InvalidRate {
            field: "tax percent".to_string(),
            rate: Decimal::NEGATIVE_ONE,
        }
        .on_item("X1");
        assert_eq!(err.to_string(), "X1 tax percent is out of range, got -1");

        let untouched = CostingError::DuplicateItem("X1".to_string()).on_item("X2");
        assert_eq!(untouched, CostingError::DuplicateItem("X1".to_string()));
    }

    #[test]
    fn test_amount_message_keeps_value() {
        let err = CostingError::InvalidAmount {
            field: "unloading".to_string(),
            value: Decimal::new(-250, 2),
        };
        assert_eq!(err.to_string(), "unloading must not be negative, got -2.50");
    }

    #[test]
    fn test_overflow_names_the_line() {
        let err = CostingError::overflow("bill value").on_item("TILE-60");
        assert_eq!(err.to_string(), "TILE-60 bill value is too large to compute");
    }
}
