use serde::{Deserialize, Serialize};

use tiendita_core::{DomainError, DomainResult, Entity, ProductId, StockEntryId, VariantTypeId};

use crate::combination::Combination;

/// Stock bookkeeping for one specific variant combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantStockEntry {
    id: StockEntryId,
    product_id: ProductId,
    combination: Combination,
    /// Units available for this combination.
    stock: i64,
    /// Units held for in-progress orders. Tracked here, mutated only by the
    /// external inventory collaborator.
    reserved: i64,
}

impl VariantStockEntry {
    pub fn id_typed(&self) -> StockEntryId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn combination(&self) -> &Combination {
        &self.combination
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn reserved(&self) -> i64 {
        self.reserved
    }
}

impl Entity for VariantStockEntry {
    type Id = StockEntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Per-combination stock for one product during an editing session.
///
/// Holds at most one entry per distinct combination (structural key); the
/// lookup in `set_stock` replaces in place rather than appending duplicates.
/// Exclusively owned by the session that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantStockLedger {
    product_id: ProductId,
    entries: Vec<VariantStockEntry>,
}

impl VariantStockLedger {
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            entries: Vec::new(),
        }
    }

    /// Rehydrate a ledger from previously stored entries.
    ///
    /// Later duplicates of a structural combination are rejected rather than
    /// silently shadowed.
    pub fn from_entries(
        product_id: ProductId,
        entries: Vec<VariantStockEntry>,
    ) -> DomainResult<Self> {
        let mut ledger = Self::new(product_id);
        for entry in entries {
            if entry.product_id != product_id {
                return Err(DomainError::invariant("stock entry belongs to another product"));
            }
            if ledger.find(&entry.combination).is_some() {
                return Err(DomainError::conflict(format!(
                    "duplicate stock entry for combination '{}'",
                    entry.combination.canonical_key()
                )));
            }
            ledger.entries.push(entry);
        }
        Ok(ledger)
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn entries(&self) -> &[VariantStockEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stock for a combination; `0` when no entry exists. Never fails.
    pub fn stock_for(&self, combo: &Combination) -> i64 {
        self.find(combo).map(|e| e.stock).unwrap_or(0)
    }

    /// Set the stock for a combination.
    ///
    /// Replaces in place when a structurally-equal entry exists (preserving
    /// its id and reserved count), otherwise appends a fresh entry. Negative
    /// stock is rejected.
    pub fn set_stock(&mut self, combo: &Combination, stock: i64) -> DomainResult<()> {
        if stock < 0 {
            return Err(DomainError::validation("stock cannot be negative"));
        }
        match self.find_mut(combo) {
            Some(entry) => entry.stock = stock,
            None => self.entries.push(VariantStockEntry {
                id: StockEntryId::new(),
                product_id: self.product_id,
                combination: combo.clone(),
                stock,
                reserved: 0,
            }),
        }
        Ok(())
    }

    /// Drop every entry whose combination references the given axis.
    ///
    /// Cascade keyed by the stable axis id, so it survives axis renames.
    /// Returns the number of entries removed.
    pub fn remove_axis(&mut self, axis: VariantTypeId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !e.combination.contains_axis(axis));
        before - self.entries.len()
    }

    /// Drop every entry whose combination picked the given value on the
    /// given axis. Returns the number of entries removed.
    pub fn remove_axis_value(&mut self, axis: VariantTypeId, value: &str) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|e| e.combination.get(axis) != Some(value));
        before - self.entries.len()
    }

    /// Sum of stock across all entries; the aggregate committed to the
    /// product's inventory record.
    pub fn total_stock(&self) -> i64 {
        self.entries.iter().map(|e| e.stock).sum()
    }

    fn find(&self, combo: &Combination) -> Option<&VariantStockEntry> {
        self.entries.iter().find(|e| &e.combination == combo)
    }

    fn find_mut(&mut self, combo: &Combination) -> Option<&mut VariantStockEntry> {
        self.entries.iter_mut().find(|e| &e.combination == combo)
    }
}
