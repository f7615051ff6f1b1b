//! In-memory [`ProductStore`](tiendita_editor::ProductStore) implementation.
//!
//! Intended for tests/dev; production persistence lives behind the same
//! trait elsewhere. Instances are explicitly constructed and injected —
//! there is no module-level singleton.

pub mod memory;

pub use memory::InMemoryStore;
