//! Small domain marker traits.

/// Entity marker: identity + continuity across state changes.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Marker trait for value objects: equality by value, not identity.
///
/// Value objects are immutable and compared entirely by their attribute
/// values. A variant combination is a value object; a stock entry (which
/// carries a stable id) is an entity.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
