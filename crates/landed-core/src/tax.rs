//! # Item Tax
//!
//! Forward tax on the billed part of a line, split into two equal co-taxes
//! (CGST / SGST).
//!
//! ```text
//!   quantity_base × bill_price_base × tax% / 100
//!                       │
//!                       ▼  round to money scale
//!                  tax_amount
//!                  ┌────┴────┐
//!                  ▼         ▼
//!               co_tax_a  co_tax_b      (exact halves, not re-rounded)
//! ```
//!
//! The cash part of a line is never taxed. Freight goes the other way
//! (tax-inclusive to net) and lives in [`crate::freight`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CostingError, CostingResult};
use crate::money::Money;
use crate::types::TaxRate;
use crate::validation::validate_tax_percent;

/// A tax amount and its two equal halves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub tax_amount: Money,
    pub co_tax_a: Money,
    pub co_tax_b: Money,
}

impl TaxBreakdown {
    /// Splits an already-computed tax amount into halves.
    ///
    /// An odd minor unit stays fractional (0.05 → 0.025 + 0.025) so the
    /// halves always add back to `tax_amount`.
    pub fn split(tax_amount: Money) -> Self {
        let half = tax_amount.halve();
        TaxBreakdown {
            tax_amount,
            co_tax_a: half,
            co_tax_b: half,
        }
    }
}

/// Computes tax on `quantity_base` units at `price_base`.
///
/// `tax_amount` is rounded half away from zero to `decimal_places`.
///
/// ## Errors
/// - `InvalidRate` when the percentage is negative or above 100
/// - `Overflow` when the taxable value leaves the decimal range
///
/// ## Example
/// ```rust
/// use landed_core::money::Money;
/// use landed_core::tax::tax_on;
/// use landed_core::types::TaxRate;
/// use rust_decimal::Decimal;
///
/// let tax = tax_on(
///     Decimal::from(120),
///     Money::new(Decimal::from(10)),
///     TaxRate::from_percent(Decimal::from(18)),
///     2,
/// )
/// .unwrap();
/// assert_eq!(tax.tax_amount, Money::new(Decimal::from(216)));
/// assert_eq!(tax.co_tax_a, Money::new(Decimal::from(108)));
/// ```
pub fn tax_on(
    quantity_base: Decimal,
    price_base: Money,
    rate: TaxRate,
    decimal_places: u32,
) -> CostingResult<TaxBreakdown> {
    validate_tax_percent(rate)?;

    let tax_amount = price_base
        .checked_mul(quantity_base)
        .and_then(|taxable| taxable.checked_percent(rate))
        .ok_or_else(|| CostingError::overflow("tax amount"))?
        .round_dp(decimal_places);

    Ok(TaxBreakdown::split(tax_amount))
}
