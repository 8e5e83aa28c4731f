//! Feature snapshots
//!
//! A snapshot is one consistent registry + matrix pair. Stores hand out
//! snapshots behind an `Arc`, so readers resolve against immutable data
//! while writers build the next version.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FeatureResult;
use crate::features::FeatureDescriptor;
use crate::matrix::RoleFeatureMatrix;
use crate::registry::FeatureRegistry;
use crate::resolver::FeatureResolver;

/// Registry and matrix taken together.
///
/// Serializes as `{"features": [...], "role_config": {...}}`, the same shape
/// as [`FeatureStatus`], so a status dump can seed a new store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureSnapshot {
    /// Feature descriptors.
    #[serde(rename = "features")]
    pub registry: FeatureRegistry,
    /// Per-role overrides.
    #[serde(rename = "role_config", default)]
    pub matrix: RoleFeatureMatrix,
}

impl FeatureSnapshot {
    /// Pair a registry with a matrix.
    pub fn new(registry: FeatureRegistry, matrix: RoleFeatureMatrix) -> Self {
        Self { registry, matrix }
    }

    /// The built-in catalogue and matrix.
    pub fn builtin() -> Self {
        Self::new(FeatureRegistry::builtin(), RoleFeatureMatrix::builtin())
    }

    /// Resolver over this snapshot.
    pub fn resolver(&self) -> FeatureResolver<'_> {
        FeatureResolver::new(&self.registry, &self.matrix)
    }

    /// Parse a seed document.
    ///
    /// # Example
    ///
    /// ```
    /// use schoolhub_features::{FeatureId, FeatureSnapshot};
    /// use schoolhub_identity::Role;
    ///
    /// let snapshot = FeatureSnapshot::from_json(r#"{
    ///     "features": [
    ///         {"id": "attendance", "name": "Attendance", "icon": "check-circle",
    ///          "globally_enabled": true, "allowed_roles": ["admin", "teacher", "student"]}
    ///     ],
    ///     "role_config": {"student": {"attendance": {"enabled": true}}}
    /// }"#).unwrap();
    ///
    /// assert!(snapshot.resolver().is_feature_enabled(FeatureId::Attendance, Role::Student));
    /// assert!(!snapshot.resolver().is_feature_enabled(FeatureId::Attendance, Role::Teacher));
    /// ```
    pub fn from_json(json: &str) -> FeatureResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a seed document from disk.
    pub fn from_file(path: impl AsRef<Path>) -> FeatureResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize as a seed document.
    pub fn to_json(&self) -> FeatureResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Debug dump of the whole configuration.
    pub fn status(&self) -> FeatureStatus {
        FeatureStatus {
            features: self.registry.iter().cloned().collect(),
            role_config: self.matrix.clone(),
            generated_at: Utc::now(),
        }
    }
}

/// Introspection dump of every descriptor and override, for admin debug screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureStatus {
    /// All descriptors in registry order.
    pub features: Vec<FeatureDescriptor>,
    /// All overrides.
    pub role_config: RoleFeatureMatrix,
    /// When the dump was taken.
    pub generated_at: DateTime<Utc>,
}
