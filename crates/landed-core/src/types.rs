//! # Domain Types
//!
//! Input records handed to the engine by the purchase form.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   SellerInfo    │   │    LineItem     │   │ OverheadCharge  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  item_id        │   │  Freight        │       │
//! │  │  invoice_number │   │  quantity       │   │  Unloading      │       │
//! │  │  invoice_date   │   │  packaging_unit │   │  Insurance      │       │
//! │  └─────────────────┘   │  bill / cash    │   │  Damage         │       │
//! │                        │  tax_percent    │   │  Other          │       │
//! │  ┌─────────────────┐   └─────────────────┘   └─────────────────┘       │
//! │  │    TaxRate      │   ┌─────────────────┐                             │
//! │  │  percent (18)   │   │  PackagingUnit  │                             │
//! │  └─────────────────┘   │  BASE, BOX, ... │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Derived records live next to the component that produces them
//! (`aggregate::NormalizedItem`, `landed::InvoiceTotals`).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Item-level tax rate held as a percentage (18 = 18%).
///
/// ## Why a percentage and not basis points?
/// Purchase invoices quote GST slabs as percentages, including fractional
/// ones (0.25, 1.5), and the form hands them over unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(#[ts(type = "string")] Decimal);

impl TaxRate {
    /// Creates a tax rate from a percentage.
    #[inline]
    pub const fn from_percent(percent: Decimal) -> Self {
        TaxRate(percent)
    }

    /// Returns the rate as a percentage.
    #[inline]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    /// Returns `1 + percent / 100`, the factor that turns a net price into
    /// a tax-inclusive one.
    #[inline]
    pub fn multiplier(&self) -> Decimal {
        Decimal::ONE + self.0 / Decimal::ONE_HUNDRED
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

// =============================================================================
// Packaging Unit
// =============================================================================

/// The unit the purchaser actually counted in.
///
/// `Base` means the item is bought in its stocking unit and needs no
/// conversion. Every other unit carries a packaging ratio on the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackagingUnit {
    /// Same as the stocking unit (pieces, kg, ...).
    #[default]
    Base,
    /// A box holding `packaging_ratio` base units.
    Box,
    /// An area unit (e.g. square metre of tiles) covering `packaging_ratio`
    /// base units.
    Area,
    /// A sealed pack.
    Pack,
    /// A bundle (pipes, rods).
    Bundle,
}

impl PackagingUnit {
    /// True when no conversion applies.
    #[inline]
    pub fn is_base(&self) -> bool {
        matches!(self, PackagingUnit::Base)
    }
}

impl std::fmt::Display for PackagingUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackagingUnit::Base => write!(f, "BASE"),
            PackagingUnit::Box => write!(f, "BOX"),
            PackagingUnit::Area => write!(f, "AREA"),
            PackagingUnit::Pack => write!(f, "PACK"),
            PackagingUnit::Bundle => write!(f, "BUNDLE"),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One purchase line as entered on the form.
///
/// Quantity and both prices are expressed per `packaging_unit`. The
/// identity fields are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Item identity. At most one line per item on an invoice.
    pub item_id: String,

    /// Display name at time of entry.
    #[serde(default)]
    pub name: String,

    /// Quantity in packaging units.
    #[ts(type = "string")]
    pub quantity: Decimal,

    /// Unit the quantity and prices are quoted in.
    #[serde(default)]
    pub packaging_unit: PackagingUnit,

    /// Base units per packaging unit. Ignored for `Base`.
    #[ts(type = "string")]
    #[serde(default = "default_packaging_ratio")]
    pub packaging_ratio: Decimal,

    /// Billed price per packaging unit (taxed).
    pub bill_price: Money,

    /// Cash price per packaging unit (never taxed).
    #[serde(default)]
    pub cash_price: Money,

    /// Tax rate applied to the billed part.
    #[serde(default)]
    pub tax_percent: TaxRate,
}

fn default_packaging_ratio() -> Decimal {
    Decimal::ONE
}

impl LineItem {
    /// A line counted in the stocking unit with no cash part.
    pub fn base(
        item_id: impl Into<String>,
        quantity: Decimal,
        bill_price: Money,
        tax_percent: TaxRate,
    ) -> Self {
        LineItem {
            item_id: item_id.into(),
            name: String::new(),
            quantity,
            packaging_unit: PackagingUnit::Base,
            packaging_ratio: Decimal::ONE,
            bill_price,
            cash_price: Money::ZERO,
            tax_percent,
        }
    }

    /// Sets the packaging unit and ratio.
    pub fn packed(mut self, unit: PackagingUnit, ratio: Decimal) -> Self {
        self.packaging_unit = unit;
        self.packaging_ratio = ratio;
        self
    }

    /// Sets the untaxed cash price per packaging unit.
    pub fn with_cash_price(mut self, cash_price: Money) -> Self {
        self.cash_price = cash_price;
        self
    }

    /// Sets the display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

// =============================================================================
// Overhead Charges
// =============================================================================

/// A shared charge on the invoice, one arm per kind.
///
/// Only `Freight` is quoted tax-inclusive; the engine grosses it up. The
/// other arms are plain amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OverheadCharge {
    /// Transport charge, tax-inclusive.
    #[serde(rename_all = "camelCase")]
    Freight { company: String, gross_amount: Money },
    /// Unloading / hamali.
    Unloading { amount: Money },
    /// Transit insurance. Lands in the bill part, not the overhead pool.
    Insurance { amount: Money },
    /// Damage written against the consignment.
    Damage { amount: Money },
    /// Any other expense, with a free-text remark.
    Other { amount: Money, remark: String },
}

impl OverheadCharge {
    /// The amount as entered (gross for freight).
    pub fn amount(&self) -> Money {
        match self {
            OverheadCharge::Freight { gross_amount, .. } => *gross_amount,
            OverheadCharge::Unloading { amount }
            | OverheadCharge::Insurance { amount }
            | OverheadCharge::Damage { amount }
            | OverheadCharge::Other { amount, .. } => *amount,
        }
    }

    /// Short label used in error fields and logs.
    pub fn label(&self) -> &'static str {
        match self {
            OverheadCharge::Freight { .. } => "freight",
            OverheadCharge::Unloading { .. } => "unloading",
            OverheadCharge::Insurance { .. } => "insurance",
            OverheadCharge::Damage { .. } => "damage",
            OverheadCharge::Other { .. } => "other expense",
        }
    }
}

// =============================================================================
// Seller Info
// =============================================================================

/// Purchase header. Pass-through data, never computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SellerInfo {
    /// Seller id in the supplier master, if the seller was looked up.
    #[serde(default)]
    pub seller_id: Option<String>,

    /// Seller name as printed on the invoice.
    pub name: String,

    /// GSTIN or equivalent registration number.
    #[serde(default)]
    pub tax_registration_id: Option<String>,

    /// Supplier's invoice number.
    #[serde(default)]
    pub invoice_number: String,

    /// Supplier's invoice date.
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub invoice_date: Option<NaiveDate>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tax_rate_multiplier() {
        let rate = TaxRate::from_percent(dec!(18));
        assert_eq!(rate.percent(), dec!(18));
        assert_eq!(rate.multiplier(), dec!(1.18));
        assert!(TaxRate::default().is_zero());
    }

    #[test]
    fn test_packaging_unit_wire_names() {
        let json = serde_json::to_string(&PackagingUnit::Box).unwrap();
        assert_eq!(json, "\"BOX\"");
        let unit: PackagingUnit = serde_json::from_str("\"BASE\"").unwrap();
        assert!(unit.is_base());
        assert_eq!(PackagingUnit::Area.to_string(), "AREA");
    }

    #[test]
    fn test_line_item_defaults_from_json() {
        let item: LineItem = serde_json::from_str(
            r#"{"itemId":"NAIL-2","quantity":"5","billPrice":"40.00"}"#,
        )
        .unwrap();
        assert_eq!(item.packaging_unit, PackagingUnit::Base);
        assert_eq!(item.packaging_ratio, dec!(1));
        assert!(item.cash_price.is_zero());
        assert!(item.tax_percent.is_zero());
    }

    #[test]
    fn test_overhead_charge_tagging() {
        let freight: OverheadCharge = serde_json::from_str(
            r#"{"kind":"freight","company":"VRL","grossAmount":"1180"}"#,
        )
        .unwrap();
        assert_eq!(freight.amount(), Money::new(dec!(1180)));
        assert_eq!(freight.label(), "freight");

        let other = OverheadCharge::Other {
            amount: Money::new(dec!(25)),
            remark: "toll".to_string(),
        };
        let json = serde_json::to_value(&other).unwrap();
        assert_eq!(json["kind"], "other");
        assert_eq!(json["remark"], "toll");
    }

    #[test]
    fn test_seller_invoice_date() {
        let seller: SellerInfo = serde_json::from_str(
            r#"{"name":"Shree Traders","invoiceNumber":"ST/118","invoiceDate":"2024-03-31"}"#,
        )
        .unwrap();
        assert_eq!(seller.invoice_date, NaiveDate::from_ymd_opt(2024, 3, 31));
        assert!(seller.tax_registration_id.is_none());
    }
}
