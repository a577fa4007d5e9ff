//! Structural-equality and identity contracts for domain types.

use crate::error::PersonalityError;

/// Marker and validation hook for immutable domain values.
///
/// A value object is compared by the structure of its fields, never by
/// allocation identity. The required `Clone + Eq + Hash` bounds are expected
/// to come from derives over every field, so two instances with equal fields
/// are interchangeable anywhere, including as map keys, and equality stays
/// consistent with hashing. Comparing against a value of another type with
/// identical fields is ruled out by the type system.
///
/// Copy-with-overrides is provided per concrete type as `with_*` methods
/// that return a new instance and leave the receiver untouched; overrides
/// that can break an invariant return `Result`.
pub trait ValueObject: Clone + Eq + std::hash::Hash {
    /// Re-check the type's invariants.
    ///
    /// Constructors enforce the same rules, so a freshly built value always
    /// passes. This hook exists for re-validating data rehydrated from
    /// storage. Side-effect-free.
    fn validate(&self) -> Result<(), PersonalityError>;
}

/// Entity marker: identity plus continuity across state changes.
///
/// Entities are equal when their ids are equal, regardless of attribute
/// state. This is the counterpart to [`ValueObject`] structural equality.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + std::hash::Hash + std::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
