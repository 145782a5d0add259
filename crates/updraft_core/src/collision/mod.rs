//! # Contact Resolution
//!
//! Player/entity overlaps from the physics step are turned into a velocity
//! response or an economy credit, and the touched entity is retired.

pub mod resolver;

pub use resolver::{CollisionResolver, Consumed};
