//! Catalog domain module.
//!
//! This crate contains the product record, the variant-axis value object and
//! its validation rules, and the explicit binding table that projects the
//! reserved axis names onto the legacy flat `sizes`/`colors` fields.
//! Deterministic domain logic only (no IO, no HTTP, no storage).

pub mod axis;
pub mod product;

pub use axis::{LEGACY_AXIS_BINDINGS, LegacyAxisBinding, LegacyField, VariantType};
pub use product::Product;
