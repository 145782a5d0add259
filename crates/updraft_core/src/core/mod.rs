//! # Core Module
//!
//! Shared configuration and construction-time errors used by every
//! lifecycle subsystem.
//!
//! ## Organization
//!
//! - **Config**: lifecycle configuration tree (pool, zones, spawn, collision, aging, assets)
//! - **Errors**: failures that can only happen while building the manager

pub mod config;

pub use config::{
    AgingConfig,
    AssetConfig,
    CategoryCounts,
    CollisionConfig,
    LifecycleConfig,
    PoolConfig,
    SpawnConfig,
    ZoneTableConfig,
};
pub use crate::config::{Config, ConfigError};

use crate::entity::Category;
use thiserror::Error;

/// Errors raised while constructing lifecycle subsystems
///
/// Nothing at runtime returns these; per-frame irregularities are recovered
/// locally and logged.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Configuration failed to load or validate
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Zone table is not ordered, contiguous or complete
    #[error("Invalid zone table: {0}")]
    InvalidZoneTable(String),

    /// Strict asset mode and a category has no usable variant
    #[error("No asset for canonical variant of category {category}")]
    MissingCanonicalAsset {
        /// Category left without any spawnable variant
        category: Category,
    },
}
