//! Inventory domain module.
//!
//! Variant combination generation, the per-combination stock ledger, and the
//! per-product aggregate inventory record. Deterministic domain logic only
//! (no IO, no HTTP, no storage).

pub mod combination;
pub mod item;
pub mod ledger;

pub use combination::{Combination, format_combination, generate_combinations};
pub use item::{InventoryItem, InventorySyncStatus};
pub use ledger::{VariantStockEntry, VariantStockLedger};
