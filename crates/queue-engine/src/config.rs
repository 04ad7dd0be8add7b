//! Engine configuration loading and defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::session::DEFAULT_HISTORY_LIMIT;
use crate::store::DEFAULT_SHARD_COUNT;

/// Raw engine configuration as loaded from TOML.
#[derive(Debug, Default, Deserialize)]
pub struct EngineConfig {
    /// Maximum retained history entries per session.
    pub history_limit: Option<usize>,
    /// Number of session-store shards.
    pub shard_count: Option<usize>,
}

impl EngineConfig {
    /// Load configuration from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::parse(&raw)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("parse engine config")
    }

    /// Apply defaults and validate.
    pub fn resolve(&self) -> Result<EngineConfigResolved> {
        let history_limit = self.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        if history_limit == 0 {
            return Err(anyhow::anyhow!("history_limit must be at least 1"));
        }
        let shard_count = self.shard_count.unwrap_or(DEFAULT_SHARD_COUNT);
        if shard_count == 0 {
            return Err(anyhow::anyhow!("shard_count must be at least 1"));
        }
        Ok(EngineConfigResolved {
            history_limit,
            shard_count,
        })
    }
}

/// Resolved configuration with defaults applied.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfigResolved {
    /// Maximum retained history entries per session.
    pub history_limit: usize,
    /// Number of session-store shards.
    pub shard_count: usize,
}

impl Default for EngineConfigResolved {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            shard_count: DEFAULT_SHARD_COUNT,
        }
    }
}
