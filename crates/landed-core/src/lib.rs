//! # landed-core: Purchase Landed-Cost Engine
//!
//! Turns a supplier invoice (line items plus shared charges) into per-item
//! landed costs and invoice totals. Everything here is pure computation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Purchase Entry Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Purchase Entry UI / API handler                 │   │
//! │  │    seller form ──► line grid ──► charges ──► submit            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ PurchaseDraft / compute_purchase       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ landed-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │conversion │  │    tax    │  │  freight  │  │ overhead  │  │   │
//! │  │   │ box → pcs │  │ GST split │  │ gross-up  │  │ per unit  │  │   │
//! │  │   └─────┬─────┘  └─────┬─────┘  └─────┬─────┘  └─────┬─────┘  │   │
//! │  │         └───► aggregate ──────────────┴──► landed ◄───┘        │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ PurchaseSubmission (JSON)              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              Persistence (outside this crate)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Input records (LineItem, OverheadCharge, SellerInfo, TaxRate)
//! - [`money`] - Decimal money type and rounding
//! - [`error`] - Domain error type
//! - [`validation`] - Input checks shared by every stage
//! - [`conversion`] - Packaging unit to base unit conversion
//! - [`tax`] - Per-line tax and its co-tax halves
//! - [`aggregate`] - Per-line fold and invoice subtotals
//! - [`freight`] - Backing tax out of tax-inclusive freight
//! - [`overhead`] - Pooling shared charges and the per-unit share
//! - [`landed`] - Landed unit cost and the full pipeline
//! - [`config`] - Engine parameters
//! - [`draft`] - Editable purchase and its submission payload
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; no clock, no globals
//! 2. **No I/O**: files, database and network stay with the caller
//! 3. **Decimal Money**: all amounts are `rust_decimal::Decimal`, never floats
//! 4. **Explicit Errors**: every failure is a [`CostingError`] variant
//!
//! ## Example Usage
//!
//! ```rust
//! use landed_core::{compute_purchase, CostingConfig, LineItem, Money, OverheadCharge, PackagingUnit, TaxRate};
//! use rust_decimal::Decimal;
//!
//! // 10 boxes of 12 tiles at 120 a box, 18% GST
//! let tiles = LineItem::base(
//!     "TILE-60",
//!     Decimal::from(10),
//!     Money::new(Decimal::from(120)),
//!     TaxRate::from_percent(Decimal::from(18)),
//! )
//! .packed(PackagingUnit::Box, Decimal::from(12));
//!
//! let freight = OverheadCharge::Freight {
//!     company: "VRL Logistics".to_string(),
//!     gross_amount: Money::new(Decimal::from(1180)),
//! };
//!
//! let costing = compute_purchase(&[tiles], &[freight], &CostingConfig::default()).unwrap();
//!
//! assert_eq!(costing.totals.gst_amount, Money::new(Decimal::from(216)));
//! assert_eq!(costing.totals.transport_net, Money::new(Decimal::from(1000)));
//! assert_eq!(costing.totals.grand_total, Money::new(Decimal::from(2596)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod config;
pub mod conversion;
pub mod draft;
pub mod error;
pub mod freight;
pub mod landed;
pub mod money;
pub mod overhead;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::CostingConfig;
pub use draft::{PurchaseDraft, PurchaseRecord, PurchaseSubmission, SubmittedItem};
pub use error::{CostingError, CostingResult};
pub use landed::{compute_purchase, InvoiceTotals, ItemCosting, PurchaseCosting};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

use rust_decimal::Decimal;

/// Freight GST rate used when the caller does not supply one (0.18).
///
/// Expressed as a fraction, unlike item tax which is a percentage.
pub const DEFAULT_FREIGHT_TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);
