//! Router configuration.
//!
//! Values come from [`RouterConfig::default`], optionally overridden by a
//! JSON file or by `SOR_*` environment variables.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use sor_routing::graph::PathFinderConfig;
use sor_routing::selector::SelectorConfig;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Router-wide defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Maximum pools per path.
    pub max_hops: usize,
    /// Maximum paths enumerated per request.
    pub max_paths: usize,
    /// Maximum routes a trade may be split across.
    pub max_splits: usize,
    /// Split grid step in percent of the input.
    pub split_step_percent: u32,
    /// Best single routes considered for splitting.
    pub split_candidates: usize,
    /// Upper bound on each pool source fetch, in milliseconds.
    pub fetch_timeout_ms: u64,
    /// Flat cost charged per hop, in output currency units.
    #[serde(with = "sor_domain::serde_u256")]
    pub hop_cost: U256,
}

impl Default for RouterConfig {
    fn default() -> Self {
        let finder = PathFinderConfig::default();
        let selector = SelectorConfig::default();
        Self {
            max_hops: finder.max_hops,
            max_paths: finder.max_paths,
            max_splits: selector.max_splits,
            split_step_percent: selector.split_step_percent,
            split_candidates: selector.split_candidates,
            fetch_timeout_ms: 2_000,
            hop_cost: U256::zero(),
        }
    }
}

impl RouterConfig {
    /// Defaults overridden by `SOR_*` environment variables.
    ///
    /// # Errors
    /// Returns an error if a variable is set but does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Loads a JSON file; missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    ///
    /// # Errors
    /// Returns an error if a present value does not parse.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        override_with(&lookup, "SOR_MAX_HOPS", &mut self.max_hops)?;
        override_with(&lookup, "SOR_MAX_PATHS", &mut self.max_paths)?;
        override_with(&lookup, "SOR_MAX_SPLITS", &mut self.max_splits)?;
        override_with(&lookup, "SOR_SPLIT_STEP_PERCENT", &mut self.split_step_percent)?;
        override_with(&lookup, "SOR_SPLIT_CANDIDATES", &mut self.split_candidates)?;
        override_with(&lookup, "SOR_FETCH_TIMEOUT_MS", &mut self.fetch_timeout_ms)?;
        if let Some(value) = lookup("SOR_HOP_COST") {
            self.hop_cost = sor_domain::serde_u256::parse(&value).ok_or_else(|| {
                ConfigError::InvalidValue {
                    key: "SOR_HOP_COST",
                    value,
                }
            })?;
        }
        Ok(self)
    }

    pub fn path_finder(&self) -> PathFinderConfig {
        PathFinderConfig {
            max_hops: self.max_hops,
            max_paths: self.max_paths,
        }
    }

    pub fn selector(&self) -> SelectorConfig {
        SelectorConfig {
            max_splits: self.max_splits,
            split_step_percent: self.split_step_percent,
            split_candidates: self.split_candidates,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

fn override_with<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    target: &mut T,
) -> Result<(), ConfigError> {
    if let Some(value) = lookup(key) {
        *target = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value })?;
    }
    Ok(())
}
