//! `tiendita-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod traits;

pub use error::{DomainError, DomainResult};
pub use id::{ProductId, StockEntryId, VariantTypeId};
pub use traits::{Entity, ValueObject};
