//! Feature store
//!
//! This module provides the store abstraction that owns the live registry and
//! matrix, and the in-memory implementation used by default.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::error::FeatureResult;
use crate::events::{ChangeScope, ChangeSubscription, FeatureChange};
use crate::features::FeatureId;
use crate::mutator::{apply_mutation, MissingOverridePolicy, MutationOutcome, OverrideMutation};
use crate::snapshot::FeatureSnapshot;

/// Storage backend for feature configuration.
///
/// Reads return an immutable snapshot and never wait on a writer for longer
/// than it takes to clone an `Arc`. Writes are serialized per store.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// Current configuration.
    async fn snapshot(&self) -> Arc<FeatureSnapshot>;

    /// Apply a per-role override mutation.
    ///
    /// `actor` is recorded on the published change event.
    async fn apply(
        &self,
        mutation: OverrideMutation,
        actor: Option<Uuid>,
    ) -> FeatureResult<MutationOutcome>;

    /// Flip a feature's global kill switch.
    ///
    /// Returns [`MutationOutcome::NotFound`] for features outside the registry.
    async fn set_globally_enabled(
        &self,
        feature: FeatureId,
        enabled: bool,
        actor: Option<Uuid>,
    ) -> FeatureResult<MutationOutcome>;

    /// Subscribe to state changes.
    fn subscribe(&self) -> ChangeSubscription;
}

/// In-memory feature store.
///
/// State lives for the lifetime of the process and is lost on restart. Each
/// instance is independent, so tests and tenants do not share state.
///
/// # Example
///
/// ```
/// use schoolhub_features::{
///     FeatureId, FeatureStore, MemoryFeatureStore, OverrideMutation, OverrideOp,
/// };
/// use schoolhub_identity::Role;
///
/// # block_on(async {
/// let store = MemoryFeatureStore::builtin();
/// let disable = OverrideMutation::new(FeatureId::Attendance, Role::Student, OverrideOp::Disable);
/// store.apply(disable, None).await.unwrap();
///
/// let snapshot = store.snapshot().await;
/// assert!(!snapshot.resolver().is_feature_enabled(FeatureId::Attendance, Role::Student));
/// # });
/// # fn block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct MemoryFeatureStore {
    /// Current snapshot; replaced copy-on-write by writers
    state: RwLock<Arc<FeatureSnapshot>>,
    /// Behaviour for mutations targeting a missing override
    policy: MissingOverridePolicy,
    /// Change feed
    changes: broadcast::Sender<FeatureChange>,
}

impl std::fmt::Debug for MemoryFeatureStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryFeatureStore")
            .field("policy", &self.policy)
            .field("subscribers", &self.changes.receiver_count())
            .finish()
    }
}

impl MemoryFeatureStore {
    /// Default change feed capacity.
    pub const DEFAULT_CHANGE_CAPACITY: usize = 64;

    /// Create a store seeded with `snapshot`.
    pub fn new(snapshot: FeatureSnapshot) -> Self {
        Self::with_options(
            snapshot,
            MissingOverridePolicy::default(),
            Self::DEFAULT_CHANGE_CAPACITY,
        )
    }

    /// Create a store seeded with the built-in catalogue.
    pub fn builtin() -> Self {
        Self::new(FeatureSnapshot::builtin())
    }

    /// Create with a custom missing-override policy and change feed capacity.
    pub fn with_options(
        snapshot: FeatureSnapshot,
        policy: MissingOverridePolicy,
        change_capacity: usize,
    ) -> Self {
        let (changes, _) = broadcast::channel(change_capacity.max(1));
        Self {
            state: RwLock::new(Arc::new(snapshot)),
            policy,
            changes,
        }
    }

    /// Policy for mutations on missing overrides.
    pub fn policy(&self) -> MissingOverridePolicy {
        self.policy
    }

    fn publish(&self, change: FeatureChange) {
        tracing::debug!(
            feature = %change.feature,
            enabled = change.enabled,
            "Publishing feature change"
        );
        // No receivers is fine
        let _ = self.changes.send(change);
    }
}

impl Default for MemoryFeatureStore {
    fn default() -> Self {
        Self::builtin()
    }
}

#[async_trait]
impl FeatureStore for MemoryFeatureStore {
    async fn snapshot(&self) -> Arc<FeatureSnapshot> {
        self.state.read().await.clone()
    }

    async fn apply(
        &self,
        mutation: OverrideMutation,
        actor: Option<Uuid>,
    ) -> FeatureResult<MutationOutcome> {
        let outcome = {
            let mut state = self.state.write().await;
            let snapshot = Arc::make_mut(&mut *state);
            apply_mutation(&mut snapshot.matrix, &mutation, self.policy)
        };

        if let MutationOutcome::Applied {
            enabled,
            changed: true,
        } = outcome
        {
            self.publish(FeatureChange::new(
                mutation.feature,
                ChangeScope::Role(mutation.role),
                enabled,
                actor,
            ));
        }

        Ok(outcome)
    }

    async fn set_globally_enabled(
        &self,
        feature: FeatureId,
        enabled: bool,
        actor: Option<Uuid>,
    ) -> FeatureResult<MutationOutcome> {
        let outcome = {
            let mut state = self.state.write().await;
            if !state.registry.contains(feature) {
                return Ok(MutationOutcome::NotFound);
            }
            let snapshot = Arc::make_mut(&mut *state);
            match snapshot.registry.get_mut(feature) {
                Some(descriptor) => {
                    let changed = descriptor.globally_enabled != enabled;
                    descriptor.globally_enabled = enabled;
                    MutationOutcome::Applied { enabled, changed }
                }
                None => MutationOutcome::NotFound,
            }
        };

        if outcome.is_changed() {
            self.publish(FeatureChange::new(feature, ChangeScope::Global, enabled, actor));
        }

        Ok(outcome)
    }

    fn subscribe(&self) -> ChangeSubscription {
        ChangeSubscription::new(self.changes.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutator::OverrideOp;
    use schoolhub_identity::Role;

    #[tokio::test]
    async fn test_readers_keep_old_snapshot() {
        let store = MemoryFeatureStore::builtin();
        let before = store.snapshot().await;

        store
            .apply(
                OverrideMutation::new(FeatureId::Grades, Role::Student, OverrideOp::Disable),
                None,
            )
            .await
            .unwrap();

        let after = store.snapshot().await;
        assert!(before.resolver().is_feature_enabled(FeatureId::Grades, Role::Student));
        assert!(!after.resolver().is_feature_enabled(FeatureId::Grades, Role::Student));
    }

    #[tokio::test]
    async fn test_instances_are_independent() {
        let a = MemoryFeatureStore::builtin();
        let b = MemoryFeatureStore::builtin();
        a.apply(
            OverrideMutation::new(FeatureId::Messages, Role::Teacher, OverrideOp::Disable),
            None,
        )
        .await
        .unwrap();

        assert!(!a.snapshot().await.resolver().is_feature_enabled(FeatureId::Messages, Role::Teacher));
        assert!(b.snapshot().await.resolver().is_feature_enabled(FeatureId::Messages, Role::Teacher));
    }

    #[tokio::test]
    async fn test_changes_published_only_when_state_changes() {
        let store = MemoryFeatureStore::builtin();
        let mut sub = store.subscribe();
        let actor = Uuid::now_v7();
        let disable = OverrideMutation::new(FeatureId::Documents, Role::Student, OverrideOp::Disable);

        store.apply(disable, Some(actor)).await.unwrap();
        let repeat = store.apply(disable, Some(actor)).await.unwrap();
        assert_eq!(repeat, MutationOutcome::Applied { enabled: false, changed: false });

        let change = sub.try_recv().unwrap();
        assert_eq!(change.feature, FeatureId::Documents);
        assert_eq!(change.role(), Some(Role::Student));
        assert_eq!(change.changed_by, Some(actor));
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_missing_override_policy() {
        let ignore = MemoryFeatureStore::builtin();
        let enable = OverrideMutation::new(FeatureId::UserManagement, Role::Teacher, OverrideOp::Enable);
        assert_eq!(ignore.apply(enable, None).await.unwrap(), MutationOutcome::NotFound);
        assert!(ignore.snapshot().await.matrix.get(Role::Teacher, FeatureId::UserManagement).is_none());

        let create = MemoryFeatureStore::with_options(
            FeatureSnapshot::builtin(),
            MissingOverridePolicy::Create,
            8,
        );
        assert!(create.apply(enable, None).await.unwrap().is_changed());
        let snapshot = create.snapshot().await;
        assert!(snapshot.matrix.is_enabled(Role::Teacher, FeatureId::UserManagement));
        // Role is still outside the allowed set
        assert!(!snapshot.resolver().is_feature_enabled(FeatureId::UserManagement, Role::Teacher));
    }

    #[tokio::test]
    async fn test_global_kill_switch() {
        let store = MemoryFeatureStore::builtin();
        let mut sub = store.subscribe();

        let outcome = store.set_globally_enabled(FeatureId::Messages, false, None).await.unwrap();
        assert!(outcome.is_changed());
        let snapshot = store.snapshot().await;
        for role in Role::all() {
            assert!(!snapshot.resolver().is_feature_enabled(FeatureId::Messages, role));
        }
        // Overrides are untouched
        assert!(snapshot.matrix.is_enabled(Role::Student, FeatureId::Messages));
        assert_eq!(sub.try_recv().unwrap().scope, ChangeScope::Global);
    }

    #[tokio::test]
    async fn test_kill_switch_unknown_feature() {
        let snapshot = FeatureSnapshot::from_json(
            r#"{"features": [{"id": "grades", "name": "Grades", "icon": "award",
                "globally_enabled": true, "allowed_roles": ["student"]}]}"#,
        )
        .unwrap();
        let store = MemoryFeatureStore::new(snapshot);
        let outcome = store.set_globally_enabled(FeatureId::Reports, false, None).await.unwrap();
        assert_eq!(outcome, MutationOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_concurrent_toggles_serialize() {
        let store = Arc::new(MemoryFeatureStore::builtin());
        let toggle = OverrideMutation::new(FeatureId::Calendar, Role::Admin, OverrideOp::Toggle);

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.apply(toggle, None).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Even number of toggles restores the original state
        assert!(store.snapshot().await.matrix.is_enabled(Role::Admin, FeatureId::Calendar));
    }
}
