//! # Item Aggregation
//!
//! Folds every line through unit conversion and item tax, and sums the
//! invoice-level subtotals.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LineItem[] ──┬─► validate ─► normalize_item ─► tax_on ─► NormalizedItem│
//! │               │                                              │          │
//! │               │   duplicate item id? ──► DuplicateItem       │          │
//! │               │                                              ▼          │
//! │               └────────────────────────────────────► ItemAggregate      │
//! │                                                  amount_without_gst     │
//! │                                                  gst_amount, cgst, sgst │
//! │                                                  total_quantity_base    │
//! │                                                  total_cash_base        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Output order follows input order. The sums are plain additions, so
//! reordering the lines never changes a total.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::conversion::normalize_item;
use crate::error::{CostingError, CostingResult};
use crate::money::Money;
use crate::tax::tax_on;
use crate::types::{LineItem, TaxRate};
use crate::validation::validate_line_item;

/// A line restated per base unit, with its tax.
///
/// Produced only by [`aggregate`]; never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedItem {
    pub item_id: String,
    #[ts(type = "string")]
    pub quantity_base: Decimal,
    pub bill_price_base: Money,
    pub cash_price_base: Money,
    pub tax_percent: TaxRate,
    pub tax_amount: Money,
    pub co_tax_a: Money,
    pub co_tax_b: Money,
}

impl NormalizedItem {
    /// Billed value before tax.
    pub fn bill_value(&self) -> CostingResult<Money> {
        self.bill_price_base
            .checked_mul(self.quantity_base)
            .ok_or_else(|| CostingError::overflow("bill value"))
    }

    /// Cash value (untaxed).
    pub fn cash_value(&self) -> CostingResult<Money> {
        self.cash_price_base
            .checked_mul(self.quantity_base)
            .ok_or_else(|| CostingError::overflow("cash value"))
    }
}

/// Normalized lines plus invoice subtotals.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemAggregate {
    pub items: Vec<NormalizedItem>,
    /// Σ billed value before tax.
    pub amount_without_gst: Money,
    /// Σ item tax.
    pub gst_amount: Money,
    /// Σ first co-tax half.
    pub cgst: Money,
    /// Σ second co-tax half.
    pub sgst: Money,
    pub total_quantity_base: Decimal,
    /// Σ cash value.
    pub total_cash_base: Money,
}

impl ItemAggregate {
    fn empty() -> Self {
        ItemAggregate {
            items: Vec::new(),
            amount_without_gst: Money::ZERO,
            gst_amount: Money::ZERO,
            cgst: Money::ZERO,
            sgst: Money::ZERO,
            total_quantity_base: Decimal::ZERO,
            total_cash_base: Money::ZERO,
        }
    }

    fn push(&mut self, item: NormalizedItem) -> CostingResult<()> {
        let overflow = |field: &str| CostingError::overflow(field).on_item(&item.item_id);
        let bill_value = item.bill_value().map_err(|e| e.on_item(&item.item_id))?;
        let cash_value = item.cash_value().map_err(|e| e.on_item(&item.item_id))?;

        self.amount_without_gst = self
            .amount_without_gst
            .checked_add(bill_value)
            .ok_or_else(|| overflow("amount without GST"))?;
        self.gst_amount = self
            .gst_amount
            .checked_add(item.tax_amount)
            .ok_or_else(|| overflow("GST amount"))?;
        self.cgst = self
            .cgst
            .checked_add(item.co_tax_a)
            .ok_or_else(|| overflow("CGST"))?;
        self.sgst = self
            .sgst
            .checked_add(item.co_tax_b)
            .ok_or_else(|| overflow("SGST"))?;
        self.total_quantity_base = self
            .total_quantity_base
            .checked_add(item.quantity_base)
            .ok_or_else(|| overflow("total quantity"))?;
        self.total_cash_base = self
            .total_cash_base
            .checked_add(cash_value)
            .ok_or_else(|| overflow("cash total"))?;

        self.items.push(item);
        Ok(())
    }
}

/// Normalizes and taxes one line.
pub fn normalize_line(item: &LineItem, decimal_places: u32) -> CostingResult<NormalizedItem> {
    validate_line_item(item)?;

    let base = normalize_item(item)?;
    let tax = tax_on(
        base.quantity_base,
        base.bill_price_base,
        item.tax_percent,
        decimal_places,
    )
    .map_err(|e| e.on_item(&item.item_id))?;

    Ok(NormalizedItem {
        item_id: item.item_id.clone(),
        quantity_base: base.quantity_base,
        bill_price_base: base.bill_price_base,
        cash_price_base: base.cash_price_base,
        tax_percent: item.tax_percent,
        tax_amount: tax.tax_amount,
        co_tax_a: tax.co_tax_a,
        co_tax_b: tax.co_tax_b,
    })
}

/// Aggregates an invoice's lines.
///
/// ## Errors
/// - `DuplicateItem` when two lines share an item id
/// - Whatever a line raises (`InvalidAmount`, `InvalidRatio`,
///   `InvalidRate`, `Overflow`), tagged with its item id
/// - `Overflow` when a running subtotal leaves the decimal range
///
/// The first failing line aborts the fold.
pub fn aggregate(items: &[LineItem], decimal_places: u32) -> CostingResult<ItemAggregate> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(items.len());
    let mut result = ItemAggregate::empty();
    result.items.reserve(items.len());

    for item in items {
        if !seen.insert(item.item_id.as_str()) {
            debug!(item_id = %item.item_id, "Duplicate item on invoice");
            return Err(CostingError::DuplicateItem(item.item_id.clone()));
        }
        result.push(normalize_line(item, decimal_places)?)?;
    }

    debug!(
        lines = result.items.len(),
        quantity_base = %result.total_quantity_base,
        gst = %result.gst_amount,
        "Aggregated purchase lines"
    );

    Ok(result)
}
