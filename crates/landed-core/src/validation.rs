//! # Validation Module
//!
//! Numeric well-formedness checks shared by the costing components.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Purchase form (outside this crate)                           │
//! │  ├── Required fields, seller lookup, business rules                    │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── No negative money, quantity or charge                             │
//! │  ├── Packaging ratio > 0 on non-base units                             │
//! │  └── Tax percent within 0..=100, freight rate >= 0                     │
//! │                                                                         │
//! │  Nothing is clamped or defaulted: a bad value is an error.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{CostingError, CostingResult};
use crate::money::Money;
use crate::types::{LineItem, OverheadCharge, PackagingUnit, TaxRate};

/// Rejects a negative monetary amount.
///
/// ## Example
/// ```rust
/// use landed_core::money::Money;
/// use landed_core::validation::validate_amount;
/// use rust_decimal::Decimal;
///
/// assert!(validate_amount("bill price", Money::new(Decimal::from(10))).is_ok());
/// assert!(validate_amount("bill price", Money::ZERO).is_ok());
/// assert!(validate_amount("bill price", Money::new(Decimal::from(-1))).is_err());
/// ```
pub fn validate_amount(field: &str, amount: Money) -> CostingResult<()> {
    if amount.is_negative() {
        debug!(field, value = %amount.amount(), "Rejecting negative amount");
        return Err(CostingError::InvalidAmount {
            field: field.to_string(),
            value: amount.amount(),
        });
    }

    Ok(())
}

/// Rejects a negative quantity.
pub fn validate_quantity(field: &str, quantity: Decimal) -> CostingResult<()> {
    if quantity.is_sign_negative() && !quantity.is_zero() {
        debug!(field, value = %quantity, "Rejecting negative quantity");
        return Err(CostingError::InvalidAmount {
            field: field.to_string(),
            value: quantity,
        });
    }

    Ok(())
}

/// Rejects a zero or negative packaging ratio on a non-base unit.
///
/// The ratio is ignored entirely for `Base`; forms often leave it at 0.
pub fn validate_packaging(unit: PackagingUnit, ratio: Decimal) -> CostingResult<()> {
    if !unit.is_base() && ratio <= Decimal::ZERO {
        debug!(unit = %unit, ratio = %ratio, "Rejecting packaging ratio");
        return Err(CostingError::InvalidRatio {
            item_id: String::new(),
            ratio,
        });
    }

    Ok(())
}

/// Validates an item tax percentage.
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed 100
pub fn validate_tax_percent(rate: TaxRate) -> CostingResult<()> {
    let percent = rate.percent();
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        debug!(rate = %percent, "Rejecting tax percent");
        return Err(CostingError::InvalidRate {
            field: "tax percent".to_string(),
            rate: percent,
        });
    }

    Ok(())
}

/// Validates the freight tax rate (a fraction, 0.18 = 18%).
pub fn validate_freight_rate(rate: Decimal) -> CostingResult<()> {
    if rate < Decimal::ZERO {
        return Err(CostingError::InvalidRate {
            field: "freight tax rate".to_string(),
            rate,
        });
    }

    Ok(())
}

/// Validates every numeric field on a line item.
///
/// Errors carry the line's item id.
pub fn validate_line_item(item: &LineItem) -> CostingResult<()> {
    validate_quantity("quantity", item.quantity)
        .and_then(|_| validate_amount("bill price", item.bill_price))
        .and_then(|_| validate_amount("cash price", item.cash_price))
        .and_then(|_| validate_packaging(item.packaging_unit, item.packaging_ratio))
        .and_then(|_| validate_tax_percent(item.tax_percent))
        .map_err(|e| e.on_item(&item.item_id))
}

/// Validates the amount on an overhead charge.
pub fn validate_charge(charge: &OverheadCharge) -> CostingResult<()> {
    validate_amount(charge.label(), charge.amount())
}

// =============================================================================
// Unit Tests
// =============================================================================
