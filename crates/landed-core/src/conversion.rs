//! # Unit Conversion
//!
//! Turns a quantity/price pair quoted per packaging unit into the same pair
//! per stocking (base) unit.
//!
//! ```text
//!   10 BOX  @ 120.00 / BOX        ratio = 12 pieces per BOX
//!      │           │
//!      │ × 12      │ ÷ 12
//!      ▼           ▼
//!  120 pcs  @  10.00 / pc         10 × 120.00 == 120 × 10.00
//! ```
//!
//! Quantity and price move in opposite directions by the same ratio, so the
//! line value never depends on which unit the purchaser counted in. Both
//! sides come out of one call to keep that link in one place.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CostingError, CostingResult};
use crate::money::Money;
use crate::types::{LineItem, PackagingUnit};
use crate::validation::validate_packaging;

/// A line restated in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseUnitFigures {
    pub quantity_base: Decimal,
    pub bill_price_base: Money,
    pub cash_price_base: Money,
}

impl BaseUnitFigures {
    /// Billed value of the line (quantity × billed price).
    pub fn bill_value(&self) -> CostingResult<Money> {
        self.bill_price_base
            .checked_mul(self.quantity_base)
            .ok_or_else(|| CostingError::overflow("bill value"))
    }

    /// Cash value of the line (quantity × cash price).
    pub fn cash_value(&self) -> CostingResult<Money> {
        self.cash_price_base
            .checked_mul(self.quantity_base)
            .ok_or_else(|| CostingError::overflow("cash value"))
    }
}

/// Restates quantity and both prices in base units.
///
/// `Base` passes all three through unchanged. Any other unit multiplies the
/// quantity and divides both prices by `packaging_ratio`. No rounding is
/// applied; per-piece prices keep full decimal precision.
///
/// ## Errors
/// - `InvalidRatio` when `packaging_ratio <= 0` on a non-base unit. The
///   error's `item_id` is empty; callers holding a line attach it.
/// - `Overflow` when a ratio pushes a figure out of decimal range
///
/// ## Example
/// ```rust
/// use landed_core::conversion::normalize;
/// use landed_core::money::Money;
/// use landed_core::types::PackagingUnit;
/// use rust_decimal::Decimal;
///
/// let figures = normalize(
///     Decimal::from(10),
///     PackagingUnit::Box,
///     Decimal::from(12),
///     Money::new(Decimal::from(120)),
///     Money::ZERO,
/// )
/// .unwrap();
/// assert_eq!(figures.quantity_base, Decimal::from(120));
/// assert_eq!(figures.bill_price_base, Money::new(Decimal::from(10)));
/// ```
pub fn normalize(
    quantity: Decimal,
    packaging_unit: PackagingUnit,
    packaging_ratio: Decimal,
    bill_price: Money,
    cash_price: Money,
) -> CostingResult<BaseUnitFigures> {
    if packaging_unit.is_base() {
        return Ok(BaseUnitFigures {
            quantity_base: quantity,
            bill_price_base: bill_price,
            cash_price_base: cash_price,
        });
    }

    validate_packaging(packaging_unit, packaging_ratio)?;

    Ok(BaseUnitFigures {
        quantity_base: quantity
            .checked_mul(packaging_ratio)
            .ok_or_else(|| CostingError::overflow("base quantity"))?,
        bill_price_base: bill_price
            .checked_div(packaging_ratio)
            .ok_or_else(|| CostingError::overflow("base bill price"))?,
        cash_price_base: cash_price
            .checked_div(packaging_ratio)
            .ok_or_else(|| CostingError::overflow("base cash price"))?,
    })
}

/// [`normalize`] applied to a whole line, with the item id on any error.
pub fn normalize_item(item: &LineItem) -> CostingResult<BaseUnitFigures> {
    normalize(
        item.quantity,
        item.packaging_unit,
        item.packaging_ratio,
        item.bill_price,
        item.cash_price,
    )
    .map_err(|e| e.on_item(&item.item_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CostingError;
    use crate::types::TaxRate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_base_unit_passes_through() {
        let figures = normalize(
            dec!(7),
            PackagingUnit::Base,
            dec!(0),
            Money::new(dec!(35.50)),
            Money::new(dec!(2)),
        )
        .unwrap();
        assert_eq!(figures.quantity_base, dec!(7));
        assert_eq!(figures.bill_price_base, Money::new(dec!(35.50)));
        assert_eq!(figures.cash_price_base, Money::new(dec!(2)));
    }

    #[test]
    fn test_box_converts_in_opposite_directions() {
        let figures = normalize(
            dec!(10),
            PackagingUnit::Box,
            dec!(12),
            Money::new(dec!(120)),
            Money::new(dec!(24)),
        )
        .unwrap();
        assert_eq!(figures.quantity_base, dec!(120));
        assert_eq!(figures.bill_price_base, Money::new(dec!(10)));
        assert_eq!(figures.cash_price_base, Money::new(dec!(2)));
        assert_eq!(figures.bill_value().unwrap(), Money::new(dec!(1200)));
        assert_eq!(figures.cash_value().unwrap(), Money::new(dec!(240)));
    }

    #[test]
    fn test_fractional_area_ratio() {
        // 1.44 sq.m per box of tiles
        let figures = normalize(
            dec!(25),
            PackagingUnit::Area,
            dec!(1.44),
            Money::new(dec!(720)),
            Money::ZERO,
        )
        .unwrap();
        assert_eq!(figures.quantity_base, dec!(36));
        assert_eq!(figures.bill_price_base, Money::new(dec!(500)));
    }

    #[test]
    fn test_zero_ratio_rejected() {
        let result = normalize(
            dec!(1),
            PackagingUnit::Box,
            dec!(0),
            Money::new(dec!(10)),
            Money::ZERO,
        );
        assert!(matches!(result, Err(CostingError::InvalidRatio { .. })));
    }

    #[test]
    fn test_vanishing_ratio_overflows_cleanly() {
        let item = LineItem::base(
            "GLASS-1",
            dec!(1),
            Money::new(dec!(1000000000000000000000)),
            TaxRate::zero(),
        )
        .packed(PackagingUnit::Box, dec!(0.0000000001));
        assert_eq!(
            normalize_item(&item),
            Err(CostingError::Overflow {
                field: "GLASS-1 base bill price".to_string(),
            })
        );
    }

    #[test]
    fn test_normalize_item_names_the_line() {
        let item = LineItem::base("PIPE-4", dec!(3), Money::new(dec!(900)), TaxRate::zero())
            .packed(PackagingUnit::Bundle, dec!(-6));
        assert_eq!(
            normalize_item(&item),
            Err(CostingError::InvalidRatio {
                item_id: "PIPE-4".to_string(),
                ratio: dec!(-6),
            })
        );
    }
}
