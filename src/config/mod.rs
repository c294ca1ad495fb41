//! Configuration management for pwordcount
//!
//! Settings are layered with figment (see [`PwordcountConfig::load`]) and
//! extracted into the typed [`Settings`] below.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::count::MetricKind;
use crate::dispatch::SplitStrategy;

pub mod core;

pub use core::PwordcountConfig;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// What to count and with how many workers
    pub count: CountSettings,

    /// Worker pool tuning
    pub pool: PoolSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountSettings {
    pub mode: MetricKind,

    /// Worker threads (0 = one per CPU core)
    pub workers: usize,

    /// How a single file is split across workers
    pub split: SplitStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    /// Channel buffer size multiplier (buffer = workers * multiplier)
    pub channel_buffer_multiplier: usize,
}

impl Default for CountSettings {
    fn default() -> Self {
        Self {
            mode: MetricKind::Total,
            workers: 1,
            split: SplitStrategy::Bytes,
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            channel_buffer_multiplier: 2,
        }
    }
}

impl Settings {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.pool.channel_buffer_multiplier == 0 {
            bail!("pool.channel_buffer_multiplier cannot be 0");
        }
        Ok(())
    }

    /// Configured worker count with `0` resolved to the number of CPU cores
    pub fn resolved_workers(&self) -> usize {
        match self.count.workers {
            0 => num_cpus::get().max(1),
            workers => workers,
        }
    }
}
