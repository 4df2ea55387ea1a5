//! # Overhead Allocation
//!
//! Pools the invoice's shared charges and spreads them evenly over every
//! base unit bought.
//!
//! ## What goes into the pool
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OverheadCharge        Pool?   Where it ends up                         │
//! │  ──────────────        ─────   ──────────────────────────────────────   │
//! │  Freight (gross)        yes    total_other_expenses                     │
//! │  Unloading              yes    total_other_expenses                     │
//! │  Damage                 yes    total_other_expenses                     │
//! │  Other                  yes    total_other_expenses                     │
//! │  Insurance              NO     bill_part_total (see landed.rs)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Insurance staying out of the pool is the existing purchase-entry rule
//! and is reproduced as-is.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CostingError, CostingResult};
use crate::money::Money;
use crate::types::OverheadCharge;
use crate::validation::{validate_amount, validate_charge, validate_quantity};

/// A freight charge pulled out of the charge list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreightCharge {
    pub company: String,
    pub gross_amount: Money,
}

/// A free-form expense pulled out of the charge list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherExpense {
    pub amount: Money,
    pub remark: String,
}

/// The charge list sorted by kind.
///
/// Several entries of the same plain kind (two unloading slips) are summed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverheadBreakdown {
    pub freight: Vec<FreightCharge>,
    pub unloading: Money,
    pub insurance: Money,
    pub damage: Money,
    pub others: Vec<OtherExpense>,
}

impl OverheadBreakdown {
    /// Sorts and validates a charge list.
    ///
    /// ## Errors
    /// `InvalidAmount` for the first negative charge.
    pub fn from_charges(charges: &[OverheadCharge]) -> CostingResult<Self> {
        let mut breakdown = OverheadBreakdown::default();

        for charge in charges {
            validate_charge(charge)?;
            match charge {
                OverheadCharge::Freight {
                    company,
                    gross_amount,
                } => breakdown.freight.push(FreightCharge {
                    company: company.clone(),
                    gross_amount: *gross_amount,
                }),
                OverheadCharge::Unloading { amount } => {
                    breakdown.unloading = accumulate(breakdown.unloading, *amount, "unloading")?
                }
                OverheadCharge::Insurance { amount } => {
                    breakdown.insurance = accumulate(breakdown.insurance, *amount, "insurance")?
                }
                OverheadCharge::Damage { amount } => {
                    breakdown.damage = accumulate(breakdown.damage, *amount, "damage")?
                }
                OverheadCharge::Other { amount, remark } => breakdown.others.push(OtherExpense {
                    amount: *amount,
                    remark: remark.clone(),
                }),
            }
        }

        Ok(breakdown)
    }

    /// Gross freight amounts, in entry order.
    pub fn freight_amounts(&self) -> impl Iterator<Item = Money> + '_ {
        self.freight.iter().map(|f| f.gross_amount)
    }

    /// Other-expense amounts, in entry order.
    pub fn other_amounts(&self) -> impl Iterator<Item = Money> + '_ {
        self.others.iter().map(|o| o.amount)
    }
}

fn accumulate(total: Money, amount: Money, field: &str) -> CostingResult<Money> {
    total
        .checked_add(amount)
        .ok_or_else(|| CostingError::overflow(field))
}

/// The pooled overhead and its per-base-unit share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OverheadAllocation {
    pub total_other_expenses: Money,
    /// Unrounded; rounding here would leak pennies across lines.
    pub per_unit: Money,
}

impl OverheadAllocation {
    /// The share of the pool carried by `quantity_base` units.
    pub fn share_for(&self, quantity_base: Decimal) -> CostingResult<Money> {
        self.per_unit
            .checked_mul(quantity_base)
            .ok_or_else(|| CostingError::overflow("allocated overhead"))
    }
}

/// Pools the shared charges and divides by the invoice's base quantity.
///
/// `transport_gross` is the tax-inclusive freight total. Insurance is not a
/// parameter on purpose. With no base units (`total_quantity_base == 0`)
/// the per-unit share is zero, not an error.
///
/// ## Errors
/// - `InvalidAmount` when any amount or the quantity is negative
/// - `Overflow` when the pool or its per-unit share leaves the decimal range
///
/// ## Example
/// ```rust
/// use landed_core::money::Money;
/// use landed_core::overhead::allocate;
/// use rust_decimal::Decimal;
///
/// let pool = allocate(
///     Money::new(Decimal::from(200)),
///     Money::new(Decimal::from(60)),
///     Money::new(Decimal::from(40)),
///     [],
///     Decimal::from(150),
/// )
/// .unwrap();
/// assert_eq!(pool.total_other_expenses, Money::new(Decimal::from(300)));
/// assert_eq!(pool.per_unit, Money::new(Decimal::from(2)));
/// ```
pub fn allocate<I>(
    transport_gross: Money,
    unloading: Money,
    damage: Money,
    others: I,
    total_quantity_base: Decimal,
) -> CostingResult<OverheadAllocation>
where
    I: IntoIterator<Item = Money>,
{
    validate_amount("freight", transport_gross)?;
    validate_amount("unloading", unloading)?;
    validate_amount("damage", damage)?;
    validate_quantity("total quantity", total_quantity_base)?;

    let mut total = accumulate(transport_gross, unloading, "other expenses")?;
    total = accumulate(total, damage, "other expenses")?;
    for amount in others {
        validate_amount("other expense", amount)?;
        total = accumulate(total, amount, "other expenses")?;
    }

    let per_unit = if total_quantity_base > Decimal::ZERO {
        total
            .checked_div(total_quantity_base)
            .ok_or_else(|| CostingError::overflow("per-unit overhead"))?
    } else {
        Money::ZERO
    };

    Ok(OverheadAllocation {
        total_other_expenses: total,
        per_unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CostingError;
    use rust_decimal_macros::dec;

    fn money(d: Decimal) -> Money {
        Money::new(d)
    }

    #[test]
    fn test_allocate_per_unit() {
        let pool = allocate(money(dec!(300)), Money::ZERO, Money::ZERO, [], dec!(150)).unwrap();
        assert_eq!(pool.per_unit, money(dec!(2.00)));
        assert_eq!(pool.share_for(dec!(100)).unwrap(), money(dec!(200.00)));
        assert_eq!(pool.share_for(dec!(50)).unwrap(), money(dec!(100.00)));
    }

    #[test]
    fn test_others_join_the_pool() {
        let pool = allocate(
            money(dec!(1180)),
            money(dec!(150)),
            money(dec!(20)),
            [money(dec!(30)), money(dec!(20))],
            dec!(100),
        )
        .unwrap();
        assert_eq!(pool.total_other_expenses, money(dec!(1400)));
        assert_eq!(pool.per_unit, money(dec!(14)));
    }

    #[test]
    fn test_empty_invoice_has_zero_share() {
        let pool = allocate(Money::ZERO, Money::ZERO, Money::ZERO, [], dec!(0)).unwrap();
        assert!(pool.per_unit.is_zero());
        assert!(pool.total_other_expenses.is_zero());

        // charges with nothing to carry them
        let pool = allocate(money(dec!(500)), Money::ZERO, Money::ZERO, [], dec!(0)).unwrap();
        assert_eq!(pool.total_other_expenses, money(dec!(500)));
        assert!(pool.per_unit.is_zero());
    }

    #[test]
    fn test_uneven_split_keeps_precision() {
        let pool = allocate(money(dec!(100)), Money::ZERO, Money::ZERO, [], dec!(3)).unwrap();
        let total = pool.share_for(dec!(1)).unwrap() + pool.share_for(dec!(2)).unwrap();
        assert!(total.nearly_equal(money(dec!(100)), dec!(0.000001)));
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(matches!(
            allocate(Money::ZERO, money(dec!(-1)), Money::ZERO, [], dec!(1)),
            Err(CostingError::InvalidAmount { .. })
        ));
        assert!(matches!(
            allocate(Money::ZERO, Money::ZERO, Money::ZERO, [money(dec!(-5))], dec!(1)),
            Err(CostingError::InvalidAmount { .. })
        ));
        assert!(matches!(
            allocate(Money::ZERO, Money::ZERO, Money::ZERO, [], dec!(-1)),
            Err(CostingError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_tiny_quantity_overflows_cleanly() {
        let result = allocate(
            money(dec!(1000000000000000000000)),
            Money::ZERO,
            Money::ZERO,
            [],
            dec!(0.0000000001),
        );
        assert_eq!(result, Err(CostingError::overflow("per-unit overhead")));
    }

    #[test]
    fn test_breakdown_sorts_charges() {
        let charges = vec![
            OverheadCharge::Freight {
                company: "VRL".to_string(),
                gross_amount: money(dec!(1180)),
            },
            OverheadCharge::Unloading { amount: money(dec!(100)) },
            OverheadCharge::Unloading { amount: money(dec!(50)) },
            OverheadCharge::Insurance { amount: money(dec!(75)) },
            OverheadCharge::Damage { amount: money(dec!(20)) },
            OverheadCharge::Other {
                amount: money(dec!(30)),
                remark: "toll".to_string(),
            },
        ];
        let breakdown = OverheadBreakdown::from_charges(&charges).unwrap();
        assert_eq!(breakdown.freight.len(), 1);
        assert_eq!(breakdown.freight[0].company, "VRL");
        assert_eq!(breakdown.unloading, money(dec!(150)));
        assert_eq!(breakdown.insurance, money(dec!(75)));
        assert_eq!(breakdown.damage, money(dec!(20)));
        assert_eq!(breakdown.other_amounts().sum::<Money>(), money(dec!(30)));
        assert_eq!(breakdown.freight_amounts().sum::<Money>(), money(dec!(1180)));
    }

    #[test]
    fn test_breakdown_rejects_negative_charge() {
        let charges = vec![OverheadCharge::Insurance { amount: money(dec!(-1)) }];
        assert!(matches!(
            OverheadBreakdown::from_charges(&charges),
            Err(CostingError::InvalidAmount { .. })
        ));
    }
}
