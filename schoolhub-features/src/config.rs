//! Feature store configuration.
//!
//! Loaded from environment variables with defaults that give the built-in
//! catalogue, volatile in-memory state, and the no-op behaviour for
//! mutations on unconfigured overrides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FeatureError, FeatureResult};
use crate::mutator::MissingOverridePolicy;
use crate::snapshot::FeatureSnapshot;
use crate::store::MemoryFeatureStore;

/// Environment variable naming a JSON seed file.
pub const ENV_FEATURES_FILE: &str = "SCHOOLHUB_FEATURES_FILE";
/// Environment variable selecting the missing-override policy.
pub const ENV_MISSING_OVERRIDE: &str = "SCHOOLHUB_MISSING_OVERRIDE";
/// Environment variable setting the change feed capacity.
pub const ENV_CHANGE_CAPACITY: &str = "SCHOOLHUB_CHANGE_CAPACITY";

/// Configuration for building a feature store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureConfig {
    /// Seed document; `None` uses the built-in catalogue.
    pub features_file: Option<PathBuf>,

    /// What mutations do when no override exists yet.
    pub missing_override: MissingOverridePolicy,

    /// Buffered change events per subscriber.
    pub change_capacity: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            features_file: None,
            missing_override: MissingOverridePolicy::Ignore,
            change_capacity: MemoryFeatureStore::DEFAULT_CHANGE_CAPACITY,
        }
    }
}

impl FeatureConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SCHOOLHUB_FEATURES_FILE`: JSON seed file (default: built-in catalogue)
    /// - `SCHOOLHUB_MISSING_OVERRIDE`: `ignore` or `create` (default: `ignore`)
    /// - `SCHOOLHUB_CHANGE_CAPACITY`: change feed capacity (default: 64)
    pub fn from_env() -> FeatureResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> FeatureResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let features_file = lookup(ENV_FEATURES_FILE)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let missing_override = match lookup(ENV_MISSING_OVERRIDE) {
            Some(raw) => MissingOverridePolicy::parse(&raw).ok_or_else(|| {
                FeatureError::InvalidConfig {
                    key: ENV_MISSING_OVERRIDE.to_string(),
                    message: format!("expected 'ignore' or 'create', got '{raw}'"),
                }
            })?,
            None => default.missing_override,
        };

        let change_capacity = match lookup(ENV_CHANGE_CAPACITY) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(FeatureError::InvalidConfig {
                        key: ENV_CHANGE_CAPACITY.to_string(),
                        message: format!("expected a positive integer, got '{raw}'"),
                    })
                }
            },
            None => default.change_capacity,
        };

        Ok(Self {
            features_file,
            missing_override,
            change_capacity,
        })
    }

    /// Load the seed snapshot this configuration points at.
    pub fn load_snapshot(&self) -> FeatureResult<FeatureSnapshot> {
        match &self.features_file {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading feature configuration");
                FeatureSnapshot::from_file(path)
            }
            None => Ok(FeatureSnapshot::builtin()),
        }
    }

    /// Build an in-memory store from this configuration.
    pub fn build_store(&self) -> FeatureResult<MemoryFeatureStore> {
        Ok(MemoryFeatureStore::with_options(
            self.load_snapshot()?,
            self.missing_override,
            self.change_capacity,
        ))
    }
}
