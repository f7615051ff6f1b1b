//! Variant editing workflow.
//!
//! The admin-side editing session: variant axes and per-combination stock
//! for one product, committed as a consistent (Product, InventoryItem) pair
//! through the external persistence collaborator.

pub mod session;
pub mod store;

pub use session::{CommitReceipt, EditorSession, EditorState};
pub use store::{CommitError, ProductStore, StoreError, StoreResult};
