//! # Spawning
//!
//! The per-category behaviour table and the reset policy that turns a
//! freshly acquired entity into a placed, moving, age-tracked one.

pub mod behavior;
pub mod reset;

pub use behavior::{BehaviorTable, CategoryBehavior, ContactResponse, Pickup};
pub use reset::ResetPolicy;
