//! # Updraft Core
//!
//! Runtime entity-lifecycle manager for a vertically scrolling flight game:
//! which obstacles and collectibles exist at any moment, how their memory
//! is recycled, and what happens when the player touches them.
//!
//! ## Features
//!
//! - **Entity Pooling**: per-variant LIFO free-lists with a soft cap
//! - **Altitude Zones**: throttled classification with pre-staging ahead of boundaries
//! - **Aging**: entities expire after a configurable number of in-game days
//! - **Contact Response**: per-category impulses and economy pickups
//! - **Pool Health**: periodic audit and replenishment
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use updraft_core::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LifecycleConfig::default();
//!     let bounds = WorldBounds::new(0.0, 800.0, -20_000.0, 0.0);
//!     let mut manager = LifecycleManager::new(
//!         config,
//!         Box::new(ArcadePhysics::new(bounds)),
//!         Box::new(MotionTimeline::new()),
//!     )?;
//!
//!     let mut state = SessionState::new(0.0, 400.0, 16.0);
//!     manager.update(&mut state, 1.0 / 60.0);
//!     for event in manager.drain_events() {
//!         println!("{event:?}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Configuration and errors
pub mod config;
pub mod core;

pub mod foundation;
pub mod entity;
pub mod assets;
pub mod animation;
pub mod physics;
pub mod state;
pub mod age;
pub mod pool;
pub mod spawn;
pub mod zone;
pub mod collision;
pub mod events;
pub mod scope;

mod manager;

pub use manager::{FrameReport, LifecycleManager, LifecycleStats};

#[cfg(test)]
mod tests;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        animation::{AnimationService, Motion, MotionTimeline},
        config::Config,
        core::{LifecycleConfig, LifecycleError},
        entity::{Category, Entity, EntityHandle, EntityId, Variant},
        events::{LifecycleEvent, LifecycleEventHandler, LifecycleEventKind},
        foundation::math::{Vec2, WorldBounds},
        physics::{ArcadePhysics, Overlap, PhysicsService, PlayerBody},
        state::{GameState, SessionState},
        zone::ZoneName,
        FrameReport, LifecycleManager, LifecycleStats,
    };
}
