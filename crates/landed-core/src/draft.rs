//! # Purchase Draft
//!
//! An editable purchase: the seller header, the line grid and the charge
//! list, recomputed on demand and turned into the payload persisted by the
//! caller.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Purchase Draft Operations                            │
//! │                                                                         │
//! │  User Action              Draft Method            State Change          │
//! │  ───────────              ────────────            ────────────          │
//! │                                                                         │
//! │  Pick Item ──────────────► add_item() ──────────► items.push(line)     │
//! │                                                                         │
//! │  Edit Line ──────────────► replace_item() ──────► items[i] = line      │
//! │                                                                         │
//! │  Delete Line ────────────► remove_item() ───────► items.remove(i)      │
//! │                                                                         │
//! │  Add Charge ─────────────► add_charge() ────────► charges.push(c)      │
//! │                                                                         │
//! │  Reset Form ─────────────► clear() ─────────────► items + charges = [] │
//! │                                                                         │
//! │  View Totals ────────────► compute() ───────────► (read only)          │
//! │                                                                         │
//! │  Save ───────────────────► submission() ────────► (read only)          │
//! │                                                                         │
//! │  NOTE: Every line and charge is validated when it enters the draft,     │
//! │        so compute() fails only on a bad config or a decimal overflow.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::config::CostingConfig;
use crate::error::{CostingError, CostingResult};
use crate::landed::{compute_purchase, InvoiceTotals, ItemCosting, PurchaseCosting};
use crate::types::{LineItem, OverheadCharge, SellerInfo};
use crate::validation::{validate_charge, validate_line_item};

// =============================================================================
// Stored Purchase
// =============================================================================

/// A purchase as it was entered: inputs only, no computed figures.
///
/// This is what gets loaded back when an existing purchase is edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub seller: SellerInfo,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub charges: Vec<OverheadCharge>,
}

impl PurchaseRecord {
    /// Parses a record from JSON.
    pub fn from_json(text: &str) -> CostingResult<Self> {
        serde_json::from_str(text).map_err(|e| CostingError::InvalidRecord(e.to_string()))
    }
}

impl From<PurchaseSubmission> for PurchaseRecord {
    fn from(submission: PurchaseSubmission) -> Self {
        PurchaseRecord {
            seller: submission.seller,
            items: submission.items.into_iter().map(|i| i.line).collect(),
            charges: submission.charges,
        }
    }
}

// =============================================================================
// Submission Payload
// =============================================================================

/// One entered line next to what the engine computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedItem {
    pub line: LineItem,
    pub computed: ItemCosting,
}

/// The full purchase handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseSubmission {
    pub seller: SellerInfo,
    pub items: Vec<SubmittedItem>,
    pub charges: Vec<OverheadCharge>,
    pub totals: InvoiceTotals,
}

impl PurchaseSubmission {
    /// Renders the payload as JSON.
    pub fn to_json(&self) -> CostingResult<String> {
        serde_json::to_string(self).map_err(|e| CostingError::InvalidRecord(e.to_string()))
    }
}

// =============================================================================
// Draft
// =============================================================================

/// A purchase being entered or edited.
///
/// ## Invariants
/// - Items are unique by `item_id`
/// - Every stored line and charge has passed validation
/// - Item order is entry order, and computed output follows it
///
/// Serialized as a [`PurchaseRecord`]; deserializing goes through
/// [`PurchaseDraft::from_record`], so a stored draft is checked like a
/// freshly entered one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PurchaseRecord", into = "PurchaseRecord")]
pub struct PurchaseDraft {
    pub seller: SellerInfo,
    items: Vec<LineItem>,
    charges: Vec<OverheadCharge>,
}

impl PurchaseDraft {
    /// Creates an empty draft for a seller.
    pub fn new(seller: SellerInfo) -> Self {
        PurchaseDraft {
            seller,
            items: Vec::new(),
            charges: Vec::new(),
        }
    }

    /// Opens a stored purchase for editing.
    ///
    /// The record is checked the same way as entries added one by one.
    pub fn from_record(record: PurchaseRecord) -> CostingResult<Self> {
        let mut draft = PurchaseDraft::new(record.seller);
        for item in record.items {
            draft.add_item(item)?;
        }
        for charge in record.charges {
            draft.add_charge(charge)?;
        }
        debug!(
            lines = draft.items.len(),
            charges = draft.charges.len(),
            "Loaded purchase draft"
        );
        Ok(draft)
    }

    /// The draft's inputs, without computed figures.
    pub fn to_record(&self) -> PurchaseRecord {
        PurchaseRecord {
            seller: self.seller.clone(),
            items: self.items.clone(),
            charges: self.charges.clone(),
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn charges(&self) -> &[OverheadCharge] {
        &self.charges
    }

    pub fn item(&self, item_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.item_id == item_id)
    }

    /// Adds a line.
    ///
    /// ## Errors
    /// - `DuplicateItem` if the item is already on the draft
    /// - Any validation error of the line
    pub fn add_item(&mut self, item: LineItem) -> CostingResult<()> {
        if self.item(&item.item_id).is_some() {
            return Err(CostingError::DuplicateItem(item.item_id));
        }
        validate_line_item(&item)?;

        debug!(item_id = %item.item_id, "Added line to draft");
        self.items.push(item);
        Ok(())
    }

    /// Replaces the line with the same item id, keeping its position.
    pub fn replace_item(&mut self, item: LineItem) -> CostingResult<()> {
        validate_line_item(&item)?;

        match self.items.iter_mut().find(|i| i.item_id == item.item_id) {
            Some(existing) => {
                *existing = item;
                Ok(())
            }
            None => Err(CostingError::ItemNotFound(item.item_id)),
        }
    }

    /// Removes a line by item id and returns it.
    pub fn remove_item(&mut self, item_id: &str) -> CostingResult<LineItem> {
        let index = self
            .items
            .iter()
            .position(|i| i.item_id == item_id)
            .ok_or_else(|| CostingError::ItemNotFound(item_id.to_string()))?;

        debug!(item_id = %item_id, "Removed line from draft");
        Ok(self.items.remove(index))
    }

    /// Appends a charge.
    pub fn add_charge(&mut self, charge: OverheadCharge) -> CostingResult<()> {
        validate_charge(&charge)?;
        self.charges.push(charge);
        Ok(())
    }

    /// Removes the charge at `index` and returns it.
    pub fn remove_charge(&mut self, index: usize) -> CostingResult<OverheadCharge> {
        if index >= self.charges.len() {
            return Err(CostingError::ChargeNotFound(index));
        }
        Ok(self.charges.remove(index))
    }

    /// Drops all lines and charges. The seller header is kept.
    pub fn clear(&mut self) {
        self.items.clear();
        self.charges.clear();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Computes the current figures.
    pub fn compute(&self, config: &CostingConfig) -> CostingResult<PurchaseCosting> {
        compute_purchase(&self.items, &self.charges, config)
    }

    /// Builds the payload to persist.
    ///
    /// Each computed line is paired with the line it came from, in order.
    pub fn submission(&self, config: &CostingConfig) -> CostingResult<PurchaseSubmission> {
        let costing = self.compute(config)?;

        let items = self
            .items
            .iter()
            .cloned()
            .zip(costing.items)
            .map(|(line, computed)| SubmittedItem { line, computed })
            .collect();

        debug!(
            invoice_number = %self.seller.invoice_number,
            grand_total = %costing.totals.grand_total,
            "Prepared purchase submission"
        );

        Ok(PurchaseSubmission {
            seller: self.seller.clone(),
            items,
            charges: self.charges.clone(),
            totals: costing.totals,
        })
    }
}

impl TryFrom<PurchaseRecord> for PurchaseDraft {
    type Error = CostingError;

    fn try_from(record: PurchaseRecord) -> CostingResult<Self> {
        PurchaseDraft::from_record(record)
    }
}

impl From<PurchaseDraft> for PurchaseRecord {
    fn from(draft: PurchaseDraft) -> Self {
        PurchaseRecord {
            seller: draft.seller,
            items: draft.items,
            charges: draft.charges,
        }
    }
}
