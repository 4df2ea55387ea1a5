//! # Freight Gross-Up
//!
//! Transport invoices arrive tax-inclusive. This module backs the tax out
//! of them instead of adding tax on top.
//!
//! ```text
//!   Σ gross (1180.00)
//!        │  ÷ (1 + rate)         rate = 0.18
//!        ▼
//!   net (1000.00)  ── rounded to money scale
//!        │
//!   tax = gross − net (180.00)
//!        │
//!   cgst = sgst = tax / 2 (90.00 each)
//! ```
//!
//! The rate is a fraction (0.18), not a percentage, and is always passed in
//! by the caller.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CostingError, CostingResult};
use crate::money::Money;
use crate::tax::TaxBreakdown;
use crate::validation::{validate_amount, validate_freight_rate};

/// Freight figures after backing the tax out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FreightGrossUp {
    pub gross: Money,
    pub net: Money,
    pub tax: Money,
    pub cgst: Money,
    pub sgst: Money,
}

/// Backs tax out of one or more tax-inclusive freight amounts.
///
/// `net` is rounded to `decimal_places`; `tax` is whatever remains of the
/// gross, so `net + tax == gross` always holds. An empty list yields all
/// zeros.
///
/// ## Errors
/// - `InvalidRate` when `fixed_rate` is negative
/// - `InvalidAmount` when any freight amount is negative
/// - `Overflow` when the summed freight leaves the decimal range
///
/// ## Example
/// ```rust
/// use landed_core::freight::gross_up;
/// use landed_core::money::Money;
/// use rust_decimal::Decimal;
///
/// let freight = gross_up([Money::new(Decimal::from(1180))], Decimal::new(18, 2), 2).unwrap();
/// assert_eq!(freight.net, Money::new(Decimal::from(1000)));
/// assert_eq!(freight.tax, Money::new(Decimal::from(180)));
/// ```
pub fn gross_up<I>(amounts: I, fixed_rate: Decimal, decimal_places: u32) -> CostingResult<FreightGrossUp>
where
    I: IntoIterator<Item = Money>,
{
    validate_freight_rate(fixed_rate)?;

    let mut gross = Money::ZERO;
    for amount in amounts {
        validate_amount("freight", amount)?;
        gross = gross
            .checked_add(amount)
            .ok_or_else(|| CostingError::overflow("freight"))?;
    }

    if gross.is_zero() {
        return Ok(FreightGrossUp::default());
    }

    let net = Decimal::ONE
        .checked_add(fixed_rate)
        .and_then(|divisor| gross.checked_div(divisor))
        .ok_or_else(|| CostingError::overflow("freight net"))?
        .round_dp(decimal_places);
    let tax = gross
        .checked_sub(net)
        .ok_or_else(|| CostingError::overflow("freight tax"))?;
    let split = TaxBreakdown::split(tax);

    Ok(FreightGrossUp {
        gross,
        net,
        tax: split.tax_amount,
        cgst: split.co_tax_a,
        sgst: split.co_tax_b,
    })
}
