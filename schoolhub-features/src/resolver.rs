//! # Feature resolver
//!
//! Pure lookups over a registry and a matrix. A feature is enabled for a role
//! only when all three hold:
//!
//! ```text
//! descriptor.globally_enabled
//!   && role in descriptor.allowed_roles
//!   && matrix[role][feature].enabled
//! ```
//!
//! Anything missing along the way resolves to "disabled". Nothing here fails.

use schoolhub_identity::Role;
use serde::{Deserialize, Serialize};

use crate::features::{FeatureDescriptor, FeatureId};
use crate::matrix::RoleFeatureMatrix;
use crate::navigation::{bottom_nav_allow_list, is_navigable};
use crate::registry::FeatureRegistry;

/// Why a feature did or did not resolve to enabled.
///
/// The first failing check wins, in the order the variants are listed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Enabled.
    Allowed,
    /// Not in the registry.
    UnknownFeature,
    /// Kill switch is off.
    GloballyDisabled,
    /// Role is not in the allowed set.
    NotApplicableToRole,
    /// No override for this role.
    NoOverride,
    /// Override exists and is off.
    RoleDisabled,
}

impl Resolution {
    /// The boolean contract used by call sites.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Resolution::Allowed)
    }
}

/// Borrowed view over a registry and matrix.
///
/// # Example
///
/// ```
/// use schoolhub_features::{FeatureId, FeatureRegistry, FeatureResolver, Resolution, RoleFeatureMatrix};
/// use schoolhub_identity::Role;
///
/// let registry = FeatureRegistry::builtin();
/// let matrix = RoleFeatureMatrix::builtin();
/// let resolver = FeatureResolver::new(&registry, &matrix);
///
/// assert!(resolver.is_feature_enabled(FeatureId::Attendance, Role::Student));
/// assert_eq!(
///     resolver.resolve(FeatureId::UserManagement, Role::Teacher),
///     Resolution::NotApplicableToRole
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FeatureResolver<'a> {
    registry: &'a FeatureRegistry,
    matrix: &'a RoleFeatureMatrix,
}

impl<'a> FeatureResolver<'a> {
    /// Create a resolver over the given tables.
    pub fn new(registry: &'a FeatureRegistry, matrix: &'a RoleFeatureMatrix) -> Self {
        Self { registry, matrix }
    }

    /// Explain the resolution of a feature for a role.
    pub fn resolve(&self, feature: FeatureId, role: Role) -> Resolution {
        let Some(descriptor) = self.registry.get(feature) else {
            return Resolution::UnknownFeature;
        };
        if !descriptor.globally_enabled {
            return Resolution::GloballyDisabled;
        }
        if !descriptor.is_applicable_to(role) {
            return Resolution::NotApplicableToRole;
        }
        match self.matrix.get(role, feature) {
            None => Resolution::NoOverride,
            Some(o) if !o.enabled => Resolution::RoleDisabled,
            Some(_) => Resolution::Allowed,
        }
    }

    /// Check whether a feature is enabled for a role.
    pub fn is_feature_enabled(&self, feature: FeatureId, role: Role) -> bool {
        self.resolve(feature, role).is_allowed()
    }

    /// String-keyed variant for call sites that hold raw keys.
    ///
    /// Unparseable feature or role keys resolve to `false`.
    pub fn is_feature_key_enabled(&self, feature: &str, role: &str) -> bool {
        match (FeatureId::parse(feature), Role::parse(role)) {
            (Some(feature), Some(role)) => self.is_feature_enabled(feature, role),
            _ => {
                tracing::debug!(feature, role, "Unknown feature or role key, treating as disabled");
                false
            }
        }
    }

    /// Descriptors enabled for `role`, in registry order.
    pub fn enabled_features(&self, role: Role) -> Vec<FeatureDescriptor> {
        self.registry
            .iter()
            .filter(|f| self.is_feature_enabled(f.id, role))
            .cloned()
            .collect()
    }

    /// Enabled features that belong in the main navigation.
    pub fn navigation_features(&self, role: Role) -> Vec<FeatureDescriptor> {
        self.enabled_features(role)
            .into_iter()
            .filter(|f| is_navigable(f.id))
            .collect()
    }

    /// Enabled features on the role's bottom-bar shortlist, in registry order.
    pub fn bottom_nav_features(&self, role: Role) -> Vec<FeatureDescriptor> {
        let allow_list = bottom_nav_allow_list(role);
        self.enabled_features(role)
            .into_iter()
            .filter(|f| allow_list.contains(&f.id))
            .collect()
    }
}
