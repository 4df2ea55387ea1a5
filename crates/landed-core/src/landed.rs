//! # Landed Cost
//!
//! Combines the item aggregate, the freight gross-up and the overhead pool
//! into per-item landed costs and the invoice totals, and runs the whole
//! pipeline for a purchase.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  LineItem[] ─────► aggregate() ─────────────┐                           │
//! │                        │ total_quantity_base│                           │
//! │                        ▼                    │                           │
//! │  OverheadCharge[] ─► OverheadBreakdown      │                           │
//! │        │ freight        │ unloading, damage,│others                     │
//! │        ▼                ▼                   ▼                           │
//! │     gross_up() ──► allocate() ──────► compose() ──► PurchaseCosting     │
//! │                                          ▲                              │
//! │                        insurance ────────┘  (bill part, not the pool)   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first failing step aborts the run and its error is returned as-is.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::aggregate::{aggregate, ItemAggregate, NormalizedItem};
use crate::config::CostingConfig;
use crate::error::{CostingError, CostingResult};
use crate::freight::{gross_up, FreightGrossUp};
use crate::money::Money;
use crate::overhead::{allocate, OverheadAllocation, OverheadBreakdown};
use crate::types::{LineItem, OverheadCharge};

// =============================================================================
// Output Records
// =============================================================================

/// Invoice-level totals submitted with the purchase.
///
/// ## How the totals nest
/// ```text
/// bill_part_total  = amount_without_gst + gst_amount + insurance
/// cash_part_total  = Σ cash value
/// total_purchase   = bill_part_total + cash_part_total
/// other_expenses   = transport_gross + unloading + damage + Σ other
/// grand_total      = total_purchase + other_expenses
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub bill_part_total: Money,
    pub cash_part_total: Money,
    #[serde(rename = "amountWithoutGST")]
    pub amount_without_gst: Money,
    pub gst_amount: Money,
    pub cgst: Money,
    pub sgst: Money,
    pub transport_gross: Money,
    pub transport_net: Money,
    pub transport_tax: Money,
    pub transport_cgst: Money,
    pub transport_sgst: Money,
    pub insurance: Money,
    pub total_other_expenses: Money,
    pub per_base_unit_overhead: Money,
    pub total_purchase_amount: Money,
    pub grand_total: Money,
}

impl InvoiceTotals {
    /// A copy with every figure rounded to `dp` places, for display.
    ///
    /// The sums are not recomputed, so the rounded figures may be a minor
    /// unit apart from each other.
    pub fn rounded(&self, dp: u32) -> Self {
        InvoiceTotals {
            bill_part_total: self.bill_part_total.round_dp(dp),
            cash_part_total: self.cash_part_total.round_dp(dp),
            amount_without_gst: self.amount_without_gst.round_dp(dp),
            gst_amount: self.gst_amount.round_dp(dp),
            cgst: self.cgst.round_dp(dp),
            sgst: self.sgst.round_dp(dp),
            transport_gross: self.transport_gross.round_dp(dp),
            transport_net: self.transport_net.round_dp(dp),
            transport_tax: self.transport_tax.round_dp(dp),
            transport_cgst: self.transport_cgst.round_dp(dp),
            transport_sgst: self.transport_sgst.round_dp(dp),
            insurance: self.insurance.round_dp(dp),
            total_other_expenses: self.total_other_expenses.round_dp(dp),
            per_base_unit_overhead: self.per_base_unit_overhead.round_dp(dp),
            total_purchase_amount: self.total_purchase_amount.round_dp(dp),
            grand_total: self.grand_total.round_dp(dp),
        }
    }
}

/// One line's computed figures including its share of the overhead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemCosting {
    #[serde(flatten)]
    pub normalized: NormalizedItem,
    /// `per_base_unit_overhead × quantity_base`.
    pub allocated_overhead: Money,
    /// Tax-inclusive bill price + cash price + overhead, per base unit.
    pub landed_unit_cost: Money,
}

impl ItemCosting {
    /// A copy with money figures rounded to `dp` places, for display.
    /// Per-base-unit prices are left alone.
    pub fn rounded(&self, dp: u32) -> Self {
        let mut out = self.clone();
        out.normalized.tax_amount = self.normalized.tax_amount.round_dp(dp);
        out.normalized.co_tax_a = self.normalized.co_tax_a.round_dp(dp);
        out.normalized.co_tax_b = self.normalized.co_tax_b.round_dp(dp);
        out.allocated_overhead = self.allocated_overhead.round_dp(dp);
        out.landed_unit_cost = self.landed_unit_cost.round_dp(dp);
        out
    }
}

/// Everything the engine computes for one purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseCosting {
    pub items: Vec<ItemCosting>,
    pub totals: InvoiceTotals,
}

// =============================================================================
// Composition
// =============================================================================

/// Folds the component outputs into the final costing.
///
/// ## Errors
/// `Overflow` when a landed cost or an invoice total leaves the decimal
/// range.
pub fn compose(
    aggregate: ItemAggregate,
    freight: &FreightGrossUp,
    allocation: &OverheadAllocation,
    insurance: Money,
) -> CostingResult<PurchaseCosting> {
    let per_unit = allocation.per_unit;

    let items = aggregate
        .items
        .into_iter()
        .map(|normalized| -> CostingResult<ItemCosting> {
            let allocated_overhead = allocation
                .share_for(normalized.quantity_base)
                .map_err(|e| e.on_item(&normalized.item_id))?;
            let landed_unit_cost = normalized
                .bill_price_base
                .checked_mul(normalized.tax_percent.multiplier())
                .and_then(|billed| billed.checked_add(normalized.cash_price_base))
                .and_then(|cost| cost.checked_add(per_unit))
                .ok_or_else(|| {
                    CostingError::overflow("landed unit cost").on_item(&normalized.item_id)
                })?;
            Ok(ItemCosting {
                normalized,
                allocated_overhead,
                landed_unit_cost,
            })
        })
        .collect::<CostingResult<Vec<_>>>()?;

    let bill_part_total = aggregate
        .amount_without_gst
        .checked_add(aggregate.gst_amount)
        .and_then(|total| total.checked_add(insurance))
        .ok_or_else(|| CostingError::overflow("bill part total"))?;
    let cash_part_total = aggregate.total_cash_base;
    let total_purchase_amount = bill_part_total
        .checked_add(cash_part_total)
        .ok_or_else(|| CostingError::overflow("total purchase amount"))?;
    let grand_total = total_purchase_amount
        .checked_add(allocation.total_other_expenses)
        .ok_or_else(|| CostingError::overflow("grand total"))?;

    let totals = InvoiceTotals {
        bill_part_total,
        cash_part_total,
        amount_without_gst: aggregate.amount_without_gst,
        gst_amount: aggregate.gst_amount,
        cgst: aggregate.cgst,
        sgst: aggregate.sgst,
        transport_gross: freight.gross,
        transport_net: freight.net,
        transport_tax: freight.tax,
        transport_cgst: freight.cgst,
        transport_sgst: freight.sgst,
        insurance,
        total_other_expenses: allocation.total_other_expenses,
        per_base_unit_overhead: per_unit,
        total_purchase_amount,
        grand_total,
    };

    Ok(PurchaseCosting { items, totals })
}

/// Runs the full costing pipeline for one purchase.
///
/// ## Example
/// ```rust
/// use landed_core::{compute_purchase, CostingConfig, LineItem, Money, OverheadCharge, TaxRate};
/// use rust_decimal::Decimal;
///
/// let items = vec![LineItem::base(
///     "NAIL-2",
///     Decimal::from(100),
///     Money::new(Decimal::from(5)),
///     TaxRate::from_percent(Decimal::from(18)),
/// )];
/// let charges = vec![OverheadCharge::Unloading { amount: Money::new(Decimal::from(50)) }];
///
/// let costing = compute_purchase(&items, &charges, &CostingConfig::default()).unwrap();
/// assert_eq!(costing.totals.bill_part_total, Money::new(Decimal::from(590)));
/// assert_eq!(costing.totals.grand_total, Money::new(Decimal::from(640)));
/// ```
pub fn compute_purchase(
    items: &[LineItem],
    charges: &[OverheadCharge],
    config: &CostingConfig,
) -> CostingResult<PurchaseCosting> {
    config.validate()?;
    let dp = config.money_decimal_places;

    let aggregate = aggregate(items, dp)?;
    let breakdown = OverheadBreakdown::from_charges(charges)?;
    let freight = gross_up(breakdown.freight_amounts(), config.freight_tax_rate, dp)?;
    let allocation = allocate(
        freight.gross,
        breakdown.unloading,
        breakdown.damage,
        breakdown.other_amounts(),
        aggregate.total_quantity_base,
    )?;

    let costing = compose(aggregate, &freight, &allocation, breakdown.insurance)?;

    debug!(
        lines = costing.items.len(),
        charges = charges.len(),
        other_expenses = %costing.totals.total_other_expenses,
        grand_total = %costing.totals.grand_total,
        "Computed purchase costing"
    );

    Ok(costing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PackagingUnit, TaxRate};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn money(d: Decimal) -> Money {
        Money::new(d)
    }

    fn line(id: &str, qty: Decimal, price: Decimal, tax: Decimal) -> LineItem {
        LineItem::base(id, qty, money(price), TaxRate::from_percent(tax))
    }

    #[test]
    fn test_overhead_split_by_quantity() {
        let items = vec![line("A", dec!(100), dec!(10), dec!(0)), line("B", dec!(50), dec!(20), dec!(0))];
        let charges = vec![
            OverheadCharge::Unloading { amount: money(dec!(200)) },
            OverheadCharge::Damage { amount: money(dec!(100)) },
        ];
        let costing = compute_purchase(&items, &charges, &CostingConfig::default()).unwrap();

        assert_eq!(costing.totals.total_other_expenses, money(dec!(300)));
        assert_eq!(costing.totals.per_base_unit_overhead, money(dec!(2.00)));
        assert_eq!(costing.items[0].allocated_overhead, money(dec!(200.00)));
        assert_eq!(costing.items[1].allocated_overhead, money(dec!(100.00)));
    }

    #[test]
    fn test_insurance_goes_to_bill_part_only() {
        let items = vec![line("A", dec!(10), dec!(100), dec!(0))];
        let charges = vec![OverheadCharge::Insurance { amount: money(dec!(50)) }];
        let costing = compute_purchase(&items, &charges, &CostingConfig::default()).unwrap();

        assert_eq!(costing.totals.bill_part_total, money(dec!(1050)));
        assert!(costing.totals.total_other_expenses.is_zero());
        assert!(costing.totals.per_base_unit_overhead.is_zero());
        assert_eq!(costing.totals.grand_total, money(dec!(1050)));
    }

    #[test]
    fn test_landed_unit_cost() {
        let items = vec![LineItem::base(
            "TILE-60",
            dec!(10),
            money(dec!(120)),
            TaxRate::from_percent(dec!(18)),
        )
        .packed(PackagingUnit::Box, dec!(12))
        .with_cash_price(money(dec!(24)))];
        let charges = vec![OverheadCharge::Freight {
            company: "VRL".to_string(),
            gross_amount: money(dec!(1180)),
        }];
        let costing = compute_purchase(&items, &charges, &CostingConfig::default()).unwrap();
        let item = &costing.items[0];

        // 10 × 1.18 + 2 + 1180 / 120
        let expected = dec!(11.80) + dec!(2) + dec!(1180) / dec!(120);
        assert_eq!(item.landed_unit_cost, money(expected));
        assert_eq!(costing.totals.transport_net, money(dec!(1000)));
        assert_eq!(costing.totals.transport_gross, money(dec!(1180)));
    }

    #[test]
    fn test_totals_nest() {
        let items = vec![
            line("A", dec!(4), dec!(250), dec!(12)).with_cash_price(money(dec!(50))),
            line("B", dec!(1), dec!(999.99), dec!(28)),
        ];
        let charges = vec![
            OverheadCharge::Freight {
                company: "Local".to_string(),
                gross_amount: money(dec!(590)),
            },
            OverheadCharge::Insurance { amount: money(dec!(40)) },
            OverheadCharge::Other {
                amount: money(dec!(15)),
                remark: "weighbridge".to_string(),
            },
        ];
        let costing = compute_purchase(&items, &charges, &CostingConfig::default()).unwrap();
        let t = &costing.totals;

        assert_eq!(t.bill_part_total, t.amount_without_gst + t.gst_amount + t.insurance);
        assert_eq!(t.total_purchase_amount, t.bill_part_total + t.cash_part_total);
        assert_eq!(t.grand_total, t.total_purchase_amount + t.total_other_expenses);
        assert_eq!(t.total_other_expenses, money(dec!(605)));
        assert_eq!(t.cgst + t.sgst, t.gst_amount);
        assert_eq!(t.transport_net + t.transport_tax, t.transport_gross);
        assert_eq!(t.cash_part_total, money(dec!(200)));
    }

    #[test]
    fn test_empty_purchase() {
        let costing = compute_purchase(&[], &[], &CostingConfig::default()).unwrap();
        assert!(costing.items.is_empty());
        assert!(costing.totals.grand_total.is_zero());
        assert!(costing.totals.per_base_unit_overhead.is_zero());
    }

    #[test]
    fn test_first_error_is_surfaced_unchanged() {
        let items = vec![line("A", dec!(1), dec!(10), dec!(-1))];
        let charges = vec![OverheadCharge::Damage { amount: money(dec!(-5)) }];
        assert!(matches!(
            compute_purchase(&items, &charges, &CostingConfig::default()),
            Err(CostingError::InvalidRate { .. })
        ));

        let items = vec![line("A", dec!(1), dec!(10), dec!(5))];
        assert!(matches!(
            compute_purchase(&items, &charges, &CostingConfig::default()),
            Err(CostingError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let items = vec![line("A", dec!(1), Decimal::MAX, dec!(0))];
        let charges = vec![OverheadCharge::Insurance { amount: money(dec!(1)) }];
        assert_eq!(
            compute_purchase(&items, &charges, &CostingConfig::default()),
            Err(CostingError::overflow("bill part total"))
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CostingConfig::default().with_freight_tax_rate(dec!(-1));
        assert!(matches!(
            compute_purchase(&[], &[], &config),
            Err(CostingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rounded_totals() {
        let items = vec![line("A", dec!(3), dec!(10), dec!(0))];
        let charges = vec![OverheadCharge::Unloading { amount: money(dec!(100)) }];
        let costing = compute_purchase(&items, &charges, &CostingConfig::default()).unwrap();

        let rounded = costing.totals.rounded(2);
        assert_eq!(rounded.per_base_unit_overhead, money(dec!(33.33)));
        assert_eq!(costing.items[0].rounded(2).allocated_overhead, money(dec!(100.00)));
    }

    #[test]
    fn test_totals_json_shape() {
        let items = vec![line("A", dec!(1), dec!(100), dec!(18))];
        let costing = compute_purchase(&items, &[], &CostingConfig::default()).unwrap();
        let json = serde_json::to_value(&costing).unwrap();

        assert!(json["totals"]["amountWithoutGST"].is_string());
        assert!(json["totals"]["gstAmount"].is_string());
        assert!(json["totals"]["perBaseUnitOverhead"].is_string());
        assert_eq!(json["items"][0]["itemId"], "A");
        assert!(json["items"][0]["landedUnitCost"].is_string());
    }
}
