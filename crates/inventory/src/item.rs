use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tiendita_core::{DomainError, DomainResult, ProductId};

use crate::ledger::VariantStockLedger;

/// Whether the stored aggregate stock is known to match the last committed
/// product record.
///
/// `NeedsInventorySync` is the compensation marker set when a product write
/// succeeded but the follow-up inventory write failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventorySyncStatus {
    InSync,
    NeedsInventorySync,
}

/// Aggregate inventory record, one per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    product_id: ProductId,
    /// Aggregate units: the sum of per-combination stock, or the single flat
    /// value for a product without variants.
    stock: i64,
    reserved: i64,
    low_stock_threshold: i64,
    last_updated: DateTime<Utc>,
    sync: InventorySyncStatus,
}

impl InventoryItem {
    pub fn new(product_id: ProductId, stock: i64, now: DateTime<Utc>) -> Self {
        Self {
            product_id,
            stock: stock.max(0),
            reserved: 0,
            low_stock_threshold: 0,
            last_updated: now,
            sync: InventorySyncStatus::InSync,
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn reserved(&self) -> i64 {
        self.reserved
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.low_stock_threshold
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn sync(&self) -> InventorySyncStatus {
        self.sync
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }

    pub fn set_low_stock_threshold(&mut self, threshold: i64) {
        self.low_stock_threshold = threshold;
    }

    pub fn set_reserved(&mut self, reserved: i64) {
        self.reserved = reserved;
    }

    /// Replace the aggregate stock (negative totals floor at zero) and stamp
    /// the update time. Clears a pending sync marker.
    pub fn set_total(&mut self, stock: i64, now: DateTime<Utc>) {
        self.stock = stock.max(0);
        self.last_updated = now;
        self.sync = InventorySyncStatus::InSync;
    }

    pub fn mark_needs_sync(&mut self) {
        self.sync = InventorySyncStatus::NeedsInventorySync;
    }

    /// Build the record committed at the end of an editing session: the
    /// ledger's total, with `reserved` and the low-stock threshold carried
    /// over from the prior snapshot when one exists.
    pub fn from_session(
        product_id: ProductId,
        ledger: &VariantStockLedger,
        prior: Option<&InventoryItem>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut item = Self::new(product_id, ledger.total_stock(), now);
        if let Some(prior) = prior {
            item.reserved = prior.reserved;
            item.low_stock_threshold = prior.low_stock_threshold;
        }
        item
    }

    /// Check the aggregate-stock invariant against a ledger: the stored
    /// aggregate must equal the sum of per-combination stock.
    pub fn check_against(&self, ledger: &VariantStockLedger) -> DomainResult<()> {
        if ledger.product_id() != self.product_id {
            return Err(DomainError::invariant("ledger belongs to another product"));
        }
        let total = ledger.total_stock();
        if self.stock != total {
            return Err(DomainError::invariant(format!(
                "aggregate stock {} does not match per-combination total {total}",
                self.stock
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combination::Combination;

    #[test]
    fn new_floors_negative_stock_at_zero() {
        let item = InventoryItem::new(ProductId::new(), -5, Utc::now());
        assert_eq!(item.stock(), 0);
    }

    #[test]
    fn from_session_takes_ledger_total_and_prior_fields() {
        let product_id = ProductId::new();
        let mut ledger = VariantStockLedger::new(product_id);
        ledger.set_stock(&Combination::empty(), 12).unwrap();

        let mut prior = InventoryItem::new(product_id, 3, Utc::now());
        prior.set_reserved(2);
        prior.set_low_stock_threshold(5);

        let item = InventoryItem::from_session(product_id, &ledger, Some(&prior), Utc::now());
        assert_eq!(item.stock(), 12);
        assert_eq!(item.reserved(), 2);
        assert_eq!(item.low_stock_threshold(), 5);
        assert_eq!(item.sync(), InventorySyncStatus::InSync);
    }

    #[test]
    fn from_session_without_prior_defaults_reserved_and_threshold() {
        let product_id = ProductId::new();
        let ledger = VariantStockLedger::new(product_id);
        let item = InventoryItem::from_session(product_id, &ledger, None, Utc::now());
        assert_eq!(item.stock(), 0);
        assert_eq!(item.reserved(), 0);
        assert_eq!(item.low_stock_threshold(), 0);
    }

    #[test]
    fn check_against_accepts_matching_total() {
        let product_id = ProductId::new();
        let mut ledger = VariantStockLedger::new(product_id);
        ledger.set_stock(&Combination::empty(), 8).unwrap();
        let item = InventoryItem::new(product_id, 8, Utc::now());
        item.check_against(&ledger).unwrap();
    }

    #[test]
    fn check_against_rejects_drift() {
        let product_id = ProductId::new();
        let mut ledger = VariantStockLedger::new(product_id);
        ledger.set_stock(&Combination::empty(), 8).unwrap();
        let item = InventoryItem::new(product_id, 7, Utc::now());
        let err = item.check_against(&ledger).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn set_total_clears_pending_sync_marker() {
        let mut item = InventoryItem::new(ProductId::new(), 1, Utc::now());
        item.mark_needs_sync();
        assert_eq!(item.sync(), InventorySyncStatus::NeedsInventorySync);
        item.set_total(4, Utc::now());
        assert_eq!(item.sync(), InventorySyncStatus::InSync);
        assert_eq!(item.stock(), 4);
    }

    #[test]
    fn low_stock_compares_against_threshold() {
        let mut item = InventoryItem::new(ProductId::new(), 3, Utc::now());
        item.set_low_stock_threshold(3);
        assert!(item.is_low_stock());
        item.set_total(4, Utc::now());
        assert!(!item.is_low_stock());
    }
}
