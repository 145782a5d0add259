//! # Entity Pooling
//!
//! Per-variant free-lists of inactive entities and the monitor that keeps
//! them from running dry.
//!
//! ```text
//! EntityPool
//!     ├── EntityStore (every allocation, active or pooled)
//!     └── FreeList per Variant (LIFO, soft cap = initial × ratio)
//!                 ↑
//!        PoolHealthMonitor (audit + replenish on a coarse period)
//! ```

pub mod entity_pool;
pub mod health;

pub use entity_pool::{AuditReport, EntityPool, PoolStats, ReleaseOutcome};
pub use health::{PoolHealthMonitor, PoolHealthReport};
