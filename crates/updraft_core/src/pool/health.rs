//! Pool health monitoring
//!
//! Runs on a coarse tick period. Each check audits the free-lists, flags
//! variants that dropped below the low-water mark and, only when more than
//! a handful are flagged at once, tops the flagged lists back up. A single
//! busy variant is left to grow on demand through `acquire`.

use crate::core::PoolConfig;
use crate::entity::Variant;
use crate::pool::EntityPool;

/// Outcome of one health check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolHealthReport {
    /// Invalid free-list entries dropped by the audit
    pub discarded: usize,
    /// Variants whose free-list was below the low-water mark
    pub flagged: Vec<Variant>,
    /// Entities allocated per replenished variant
    pub replenished: Vec<(Variant, usize)>,
}

impl PoolHealthReport {
    /// Total entities allocated by this check
    pub fn replenished_total(&self) -> usize {
        self.replenished.iter().map(|(_, count)| count).sum()
    }
}

/// Periodic auditor for an [`EntityPool`]
#[derive(Debug, Clone)]
pub struct PoolHealthMonitor {
    low_water_mark: usize,
    flagged_trigger: usize,
    batch: usize,
    interval: u64,
    ticks: u64,
}

impl PoolHealthMonitor {
    /// Create a monitor from pool configuration
    pub fn new(config: &PoolConfig) -> Self {
        Self {
            low_water_mark: config.low_water_mark,
            flagged_trigger: config.flagged_variant_trigger,
            batch: config.replenish_batch,
            interval: config.health_check_interval_ticks.max(1),
            ticks: 0,
        }
    }

    /// Count one tick; returns `true` when a check is due
    pub fn tick(&mut self) -> bool {
        self.ticks += 1;
        if self.ticks >= self.interval {
            self.ticks = 0;
            true
        } else {
            false
        }
    }

    /// Audit `pool` and replenish the monitored variants if enough are low
    pub fn check(
        &self,
        pool: &mut EntityPool,
        monitored: impl IntoIterator<Item = Variant>,
    ) -> PoolHealthReport {
        let audit = pool.audit_and_repair();
        let flagged: Vec<Variant> = monitored
            .into_iter()
            .filter(|variant| pool.pooled(*variant) < self.low_water_mark)
            .collect();

        let mut report = PoolHealthReport {
            discarded: audit.discarded,
            flagged,
            replenished: Vec::new(),
        };

        if report.flagged.len() > self.flagged_trigger {
            for variant in &report.flagged {
                let created = pool.replenish(*variant, self.batch);
                if created > 0 {
                    report.replenished.push((*variant, created));
                }
            }
            log::info!(
                "Pool health: {} variants low, replenished {} entities",
                report.flagged.len(),
                report.replenished_total()
            );
        } else if !report.flagged.is_empty() {
            log::debug!("Pool health: {} variants low, below replenish trigger", report.flagged.len());
        }

        report
    }
}
