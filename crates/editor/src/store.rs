//! The narrow persistence contract the editing session commits through.

use async_trait::async_trait;
use thiserror::Error;

use tiendita_catalog::Product;
use tiendita_core::{DomainError, ProductId};
use tiendita_inventory::InventoryItem;

pub type StoreResult<T> = Result<T, StoreError>;

/// Infrastructure failure from the persistence collaborator.
///
/// Deliberately separate from [`DomainError`]: these are transport/storage
/// faults, not business rule violations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store rejected the write: {0}")]
    Rejected(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// External product/inventory store.
///
/// Implemented elsewhere (hosted table store in production, in-memory for
/// tests). Variant axis metadata and the per-combination breakdown are not
/// part of this contract: only the flat product record and the aggregate
/// stock total cross the boundary.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn fetch_products(&self) -> StoreResult<Vec<Product>>;

    async fn fetch_inventory(&self) -> StoreResult<Vec<InventoryItem>>;

    /// Upsert; returns the canonical stored form.
    async fn save_product(&self, product: Product) -> StoreResult<Product>;

    /// Set the aggregate stock field only; the store knows nothing about the
    /// per-variant breakdown.
    async fn save_inventory_total(
        &self,
        product_id: ProductId,
        stock: i64,
    ) -> StoreResult<InventoryItem>;

    /// Compensation marker: flag a product whose record was written but
    /// whose inventory total was not.
    async fn mark_needs_inventory_sync(&self, product_id: ProductId) -> StoreResult<()>;
}

/// Failure of the two-phase commit, by phase.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The session was not in a state that allows committing.
    #[error(transparent)]
    Session(#[from] DomainError),

    /// The product write failed; nothing was persisted.
    #[error("product write failed: {source}")]
    ProductWrite {
        #[source]
        source: StoreError,
    },

    /// The product write succeeded but the inventory write failed.
    /// `compensated` reports whether the needs-inventory-sync marker was
    /// placed successfully.
    #[error("inventory write failed after product write (compensated: {compensated}): {source}")]
    InventoryWrite {
        #[source]
        source: StoreError,
        compensated: bool,
    },
}
