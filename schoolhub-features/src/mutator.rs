//! Feature mutator
//!
//! Enable, disable and toggle operations on the role-feature matrix, plus the
//! outcome type every mutation reports. Authorization is not checked here;
//! the feature context does that before calling in.

use schoolhub_identity::Role;
use serde::{Deserialize, Serialize};

use crate::features::FeatureId;
use crate::matrix::RoleFeatureMatrix;

/// What a mutation does to an override.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "op", content = "enabled")]
pub enum OverrideOp {
    /// Switch on.
    Enable,
    /// Switch off.
    Disable,
    /// Flip the current state.
    Toggle,
    /// Set to an explicit state.
    Set(bool),
}

impl OverrideOp {
    /// State after applying the op to `current`.
    pub fn apply_to(&self, current: bool) -> bool {
        match self {
            OverrideOp::Enable => true,
            OverrideOp::Disable => false,
            OverrideOp::Toggle => !current,
            OverrideOp::Set(enabled) => *enabled,
        }
    }

    /// Get the string representation of the op.
    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideOp::Enable => "enable",
            OverrideOp::Disable => "disable",
            OverrideOp::Toggle => "toggle",
            OverrideOp::Set(_) => "set",
        }
    }
}

/// A single requested change to the matrix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverrideMutation {
    /// Role whose override changes.
    pub role: Role,
    /// Feature whose override changes.
    pub feature: FeatureId,
    /// What to do.
    pub op: OverrideOp,
}

impl OverrideMutation {
    /// Create a mutation.
    pub fn new(feature: FeatureId, role: Role, op: OverrideOp) -> Self {
        Self { role, feature, op }
    }
}

/// What to do when the targeted `(role, feature)` pair has no override yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingOverridePolicy {
    /// Leave the matrix alone and report [`MutationOutcome::NotFound`].
    #[default]
    Ignore,
    /// Insert the override, treating the missing entry as "off".
    Create,
}

impl MissingOverridePolicy {
    /// Parse a policy name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ignore" => Some(Self::Ignore),
            "create" => Some(Self::Create),
            _ => None,
        }
    }
}

/// Why a mutation was refused.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// Nobody is signed in.
    NotSignedIn,
    /// A non-admin targeted a role other than their own.
    RoleMismatch,
    /// The operation is reserved for admins.
    AdminOnly,
    /// Beta features cannot be toggled through the standard path.
    BetaFeature,
}

impl DenialReason {
    /// Get the string representation of the reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::NotSignedIn => "not_signed_in",
            DenialReason::RoleMismatch => "role_mismatch",
            DenialReason::AdminOnly => "admin_only",
            DenialReason::BetaFeature => "beta_feature",
        }
    }
}

/// Result of a mutation attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum MutationOutcome {
    /// The override now holds `enabled`; `changed` is false for repeats.
    Applied {
        /// State after the mutation.
        enabled: bool,
        /// Whether the state differs from before.
        changed: bool,
    },
    /// No override exists for the pair and the policy is `Ignore`.
    NotFound,
    /// The caller may not perform this mutation.
    Denied {
        /// Why.
        reason: DenialReason,
    },
}

impl MutationOutcome {
    /// Shorthand for a denial.
    pub fn denied(reason: DenialReason) -> Self {
        MutationOutcome::Denied { reason }
    }

    /// Check if the mutation went through (changed or not).
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }

    /// Check if the mutation changed state.
    pub fn is_changed(&self) -> bool {
        matches!(self, MutationOutcome::Applied { changed: true, .. })
    }

    /// Check if the mutation was refused.
    pub fn is_denied(&self) -> bool {
        matches!(self, MutationOutcome::Denied { .. })
    }
}

/// Apply a mutation to a matrix in place.
///
/// # Example
///
/// ```
/// use schoolhub_features::{
///     apply_mutation, FeatureId, MissingOverridePolicy, MutationOutcome, OverrideMutation,
///     OverrideOp, RoleFeatureMatrix,
/// };
/// use schoolhub_identity::Role;
///
/// let mut matrix = RoleFeatureMatrix::new();
/// let enable = OverrideMutation::new(FeatureId::Grades, Role::Student, OverrideOp::Enable);
///
/// // Nothing to update yet
/// assert_eq!(
///     apply_mutation(&mut matrix, &enable, MissingOverridePolicy::Ignore),
///     MutationOutcome::NotFound
/// );
///
/// // Create on first write
/// assert_eq!(
///     apply_mutation(&mut matrix, &enable, MissingOverridePolicy::Create),
///     MutationOutcome::Applied { enabled: true, changed: true }
/// );
/// ```
pub fn apply_mutation(
    matrix: &mut RoleFeatureMatrix,
    mutation: &OverrideMutation,
    policy: MissingOverridePolicy,
) -> MutationOutcome {
    if let Some(entry) = matrix.get_mut(mutation.role, mutation.feature) {
        let previous = entry.enabled;
        entry.enabled = mutation.op.apply_to(previous);
        return MutationOutcome::Applied {
            enabled: entry.enabled,
            changed: entry.enabled != previous,
        };
    }

    match policy {
        MissingOverridePolicy::Ignore => MutationOutcome::NotFound,
        MissingOverridePolicy::Create => {
            let enabled = mutation.op.apply_to(false);
            matrix.insert(mutation.role, mutation.feature, enabled);
            MutationOutcome::Applied {
                enabled,
                changed: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> RoleFeatureMatrix {
        let mut matrix = RoleFeatureMatrix::new();
        matrix.insert(Role::Student, FeatureId::Attendance, true);
        matrix
    }

    fn mutation(op: OverrideOp) -> OverrideMutation {
        OverrideMutation::new(FeatureId::Attendance, Role::Student, op)
    }

    #[test]
    fn test_enable_is_idempotent() {
        let mut once = seeded();
        apply_mutation(&mut once, &mutation(OverrideOp::Enable), MissingOverridePolicy::Ignore);

        let mut twice = seeded();
        apply_mutation(&mut twice, &mutation(OverrideOp::Enable), MissingOverridePolicy::Ignore);
        let second =
            apply_mutation(&mut twice, &mutation(OverrideOp::Enable), MissingOverridePolicy::Ignore);

        assert_eq!(once, twice);
        assert_eq!(second, MutationOutcome::Applied { enabled: true, changed: false });
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut matrix = seeded();
        let first =
            apply_mutation(&mut matrix, &mutation(OverrideOp::Toggle), MissingOverridePolicy::Ignore);
        assert_eq!(first, MutationOutcome::Applied { enabled: false, changed: true });
        apply_mutation(&mut matrix, &mutation(OverrideOp::Toggle), MissingOverridePolicy::Ignore);
        assert_eq!(matrix, seeded());
    }

    #[test]
    fn test_disable_then_set() {
        let mut matrix = seeded();
        apply_mutation(&mut matrix, &mutation(OverrideOp::Disable), MissingOverridePolicy::Ignore);
        assert!(!matrix.is_enabled(Role::Student, FeatureId::Attendance));
        apply_mutation(&mut matrix, &mutation(OverrideOp::Set(true)), MissingOverridePolicy::Ignore);
        assert!(matrix.is_enabled(Role::Student, FeatureId::Attendance));
    }

    #[test]
    fn test_missing_override_ignored_by_default() {
        let mut matrix = seeded();
        let toggle = OverrideMutation::new(FeatureId::Grades, Role::Student, OverrideOp::Toggle);
        let outcome = apply_mutation(&mut matrix, &toggle, MissingOverridePolicy::default());
        assert_eq!(outcome, MutationOutcome::NotFound);
        assert_eq!(matrix, seeded());
    }

    #[test]
    fn test_missing_override_created_on_toggle() {
        let mut matrix = RoleFeatureMatrix::new();
        let toggle = OverrideMutation::new(FeatureId::Grades, Role::Student, OverrideOp::Toggle);
        let outcome = apply_mutation(&mut matrix, &toggle, MissingOverridePolicy::Create);
        assert_eq!(outcome, MutationOutcome::Applied { enabled: true, changed: true });
        assert!(matrix.is_enabled(Role::Student, FeatureId::Grades));
    }

    #[test]
    fn test_created_disable_records_entry() {
        let mut matrix = RoleFeatureMatrix::new();
        let disable = OverrideMutation::new(FeatureId::Grades, Role::Admin, OverrideOp::Disable);
        let outcome = apply_mutation(&mut matrix, &disable, MissingOverridePolicy::Create);
        assert!(outcome.is_changed());
        assert!(matrix.get(Role::Admin, FeatureId::Grades).is_some());
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(MissingOverridePolicy::parse("Create"), Some(MissingOverridePolicy::Create));
        assert_eq!(MissingOverridePolicy::parse("ignore"), Some(MissingOverridePolicy::Ignore));
        assert_eq!(MissingOverridePolicy::parse("upsert"), None);
    }

    #[test]
    fn test_outcome_serde() {
        let json = serde_json::to_value(MutationOutcome::denied(DenialReason::RoleMismatch)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"outcome": "denied", "reason": "role_mismatch"})
        );
    }
}
