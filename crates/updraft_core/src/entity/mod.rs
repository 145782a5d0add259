//! Pooled world entities
//!
//! Entities live in a single generational arena ([`EntityStore`]). An entity
//! is either active in the world or parked on its variant's free-list; the
//! arena slot is kept while pooled so the identity token stays stable across
//! reuse, and the per-entity generation counter tells reuses apart.

pub mod category;
pub mod record;
pub mod store;

pub use category::{AgeGroup, Category, Variant, VariantSpec};
pub use record::{Entity, EntityFlags, EntityHandle, EntityId};
pub use store::EntityStore;
