//! Role-feature matrix
//!
//! Per-role overrides saying whether a feature applicable to a role is
//! actually switched on for it. A missing entry means "off".

use std::collections::BTreeMap;

use schoolhub_identity::Role;
use serde::{Deserialize, Serialize};

use crate::features::FeatureId;
use crate::registry::FeatureRegistry;

/// Whether one role has one feature switched on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RoleFeatureOverride {
    /// Feature is on for the role.
    pub enabled: bool,
}

impl RoleFeatureOverride {
    /// Override with the given state.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

/// Table of `(role, feature) -> override`.
///
/// Serializes as `{"student": {"attendance": {"enabled": true}}}`.
///
/// # Example
///
/// ```
/// use schoolhub_features::{FeatureId, RoleFeatureMatrix};
/// use schoolhub_identity::Role;
///
/// let mut matrix = RoleFeatureMatrix::new();
/// assert!(!matrix.is_enabled(Role::Student, FeatureId::Attendance));
///
/// matrix.insert(Role::Student, FeatureId::Attendance, true);
/// assert!(matrix.is_enabled(Role::Student, FeatureId::Attendance));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct RoleFeatureMatrix {
    roles: BTreeMap<Role, BTreeMap<FeatureId, RoleFeatureOverride>>,
}

impl RoleFeatureMatrix {
    /// Create an empty matrix (everything off).
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in matrix matching [`FeatureRegistry::builtin`].
    ///
    /// Every allowed pair gets an entry. Beta features start off for every
    /// role, and students do not get reports.
    pub fn builtin() -> Self {
        let mut matrix = Self::new();
        for feature in FeatureRegistry::builtin().iter() {
            for role in &feature.allowed_roles {
                let enabled = !feature.beta
                    && !(*role == Role::Student && feature.id == FeatureId::Reports);
                matrix.insert(*role, feature.id, enabled);
            }
        }
        matrix
    }

    /// Look up the override for a pair.
    pub fn get(&self, role: Role, feature: FeatureId) -> Option<RoleFeatureOverride> {
        self.roles.get(&role)?.get(&feature).copied()
    }

    pub(crate) fn get_mut(
        &mut self,
        role: Role,
        feature: FeatureId,
    ) -> Option<&mut RoleFeatureOverride> {
        self.roles.get_mut(&role)?.get_mut(&feature)
    }

    /// Check the override for a pair; absent entries are off.
    pub fn is_enabled(&self, role: Role, feature: FeatureId) -> bool {
        self.get(role, feature).map(|o| o.enabled).unwrap_or(false)
    }

    /// Insert or replace an override, returning the previous value.
    pub fn insert(
        &mut self,
        role: Role,
        feature: FeatureId,
        enabled: bool,
    ) -> Option<RoleFeatureOverride> {
        self.roles
            .entry(role)
            .or_default()
            .insert(feature, RoleFeatureOverride::new(enabled))
    }

    /// Remove an override, returning it if it existed.
    pub fn remove(&mut self, role: Role, feature: FeatureId) -> Option<RoleFeatureOverride> {
        let features = self.roles.get_mut(&role)?;
        let removed = features.remove(&feature);
        if features.is_empty() {
            self.roles.remove(&role);
        }
        removed
    }

    /// Overrides configured for one role.
    pub fn for_role(&self, role: Role) -> impl Iterator<Item = (FeatureId, RoleFeatureOverride)> + '_ {
        self.roles
            .get(&role)
            .into_iter()
            .flat_map(|features| features.iter().map(|(id, o)| (*id, *o)))
    }

    /// Get the total count of overrides.
    pub fn len(&self) -> usize {
        self.roles.values().map(BTreeMap::len).sum()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_override_is_off() {
        let matrix = RoleFeatureMatrix::new();
        assert!(matrix.get(Role::Admin, FeatureId::Dashboard).is_none());
        assert!(!matrix.is_enabled(Role::Admin, FeatureId::Dashboard));
    }

    #[test]
    fn test_insert_returns_previous() {
        let mut matrix = RoleFeatureMatrix::new();
        assert_eq!(matrix.insert(Role::Teacher, FeatureId::Grades, true), None);
        assert_eq!(
            matrix.insert(Role::Teacher, FeatureId::Grades, false),
            Some(RoleFeatureOverride::new(true))
        );
        assert!(!matrix.is_enabled(Role::Teacher, FeatureId::Grades));
        assert_eq!(matrix.len(), 1);
    }

    #[test]
    fn test_remove_drops_empty_roles() {
        let mut matrix = RoleFeatureMatrix::new();
        matrix.insert(Role::Student, FeatureId::Grades, true);
        assert!(matrix.remove(Role::Student, FeatureId::Grades).is_some());
        assert!(matrix.is_empty());
        assert!(matrix.remove(Role::Student, FeatureId::Grades).is_none());
    }

    #[test]
    fn test_builtin_matrix() {
        let matrix = RoleFeatureMatrix::builtin();
        assert!(matrix.is_enabled(Role::Student, FeatureId::Attendance));
        assert!(matrix.is_enabled(Role::Admin, FeatureId::UserManagement));
        assert!(matrix.get(Role::Teacher, FeatureId::UserManagement).is_none());
        assert_eq!(
            matrix.get(Role::Student, FeatureId::Reports),
            Some(RoleFeatureOverride::new(false))
        );
        assert_eq!(
            matrix.get(Role::Teacher, FeatureId::AiTutor),
            Some(RoleFeatureOverride::new(false))
        );
    }

    #[test]
    fn test_for_role_lists_only_that_role() {
        let mut matrix = RoleFeatureMatrix::new();
        matrix.insert(Role::Admin, FeatureId::Reports, true);
        matrix.insert(Role::Student, FeatureId::Grades, true);
        let admin: Vec<_> = matrix.for_role(Role::Admin).collect();
        assert_eq!(admin, vec![(FeatureId::Reports, RoleFeatureOverride::new(true))]);
        assert_eq!(matrix.for_role(Role::Teacher).count(), 0);
    }

    #[test]
    fn test_serde_shape() {
        let mut matrix = RoleFeatureMatrix::new();
        matrix.insert(Role::Student, FeatureId::Attendance, true);
        let json = serde_json::to_value(&matrix).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"student": {"attendance": {"enabled": true}}})
        );
        let back: RoleFeatureMatrix = serde_json::from_value(json).unwrap();
        assert_eq!(back, matrix);
    }
}
