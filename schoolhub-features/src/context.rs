//! Feature context
//!
//! Binds a feature store to the signed-in user. Every read resolves for the
//! user's own role; every mutation is checked against who is asking before it
//! reaches the store.
//!
//! # Authorization
//!
//! | caller | own role | other role | `update_role_feature` / kill switch |
//! |---|---|---|---|
//! | nobody signed in | denied | denied | denied |
//! | student / teacher | allowed | denied | denied |
//! | admin | allowed | allowed | allowed |
//!
//! Beta features cannot be enabled, disabled or toggled through the standard
//! entry points by anyone. Admins can still set them with
//! [`FeatureContext::update_role_feature`].

use std::sync::Arc;

use schoolhub_identity::{Role, SessionProvider, SessionUser};
use tracing::{debug, info, instrument, warn};

use crate::error::FeatureResult;
use crate::events::ChangeSubscription;
use crate::features::{FeatureDescriptor, FeatureId};
use crate::mutator::{DenialReason, MutationOutcome, OverrideMutation, OverrideOp};
use crate::snapshot::FeatureStatus;
use crate::store::FeatureStore;

/// Feature access scoped to the signed-in user.
///
/// Cheap to clone; clones share the same session and store.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use schoolhub_features::{FeatureContext, FeatureId, MemoryFeatureStore};
/// use schoolhub_identity::{Role, SessionUser, StaticSession};
///
/// # block_on(async {
/// let session = Arc::new(StaticSession::signed_in(SessionUser::new("Ms. Okafor", Role::Teacher)));
/// let features = FeatureContext::new(session, Arc::new(MemoryFeatureStore::builtin()));
///
/// assert!(features.is_feature_enabled(FeatureId::Attendance).await);
/// assert!(!features.is_feature_enabled(FeatureId::UserManagement).await);
///
/// // Teachers cannot change what students see
/// let outcome = features.disable_feature(FeatureId::Grades, Some(Role::Student)).await.unwrap();
/// assert!(outcome.is_denied());
/// # });
/// # fn block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct FeatureContext {
    session: Arc<dyn SessionProvider>,
    store: Arc<dyn FeatureStore>,
}

impl std::fmt::Debug for FeatureContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureContext")
            .field("role", &self.current_role())
            .finish()
    }
}

impl FeatureContext {
    /// Create a context over a session provider and a store.
    pub fn new(session: Arc<dyn SessionProvider>, store: Arc<dyn FeatureStore>) -> Self {
        Self { session, store }
    }

    /// Role of the signed-in user, if any.
    pub fn current_role(&self) -> Option<Role> {
        self.session.current_user().map(|u| u.role)
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn FeatureStore> {
        &self.store
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Check whether a feature is enabled for the signed-in user.
    ///
    /// `false` when nobody is signed in.
    pub async fn is_feature_enabled(&self, feature: FeatureId) -> bool {
        let Some(role) = self.current_role() else {
            return false;
        };
        self.store
            .snapshot()
            .await
            .resolver()
            .is_feature_enabled(feature, role)
    }

    /// String-keyed variant of [`is_feature_enabled`](Self::is_feature_enabled).
    pub async fn is_feature_key_enabled(&self, feature: &str) -> bool {
        match FeatureId::parse(feature) {
            Some(feature) => self.is_feature_enabled(feature).await,
            None => {
                debug!(feature, "Unknown feature key, treating as disabled");
                false
            }
        }
    }

    /// Features enabled for the signed-in user, in registry order.
    pub async fn enabled_features(&self) -> Vec<FeatureDescriptor> {
        let Some(role) = self.current_role() else {
            return Vec::new();
        };
        self.store.snapshot().await.resolver().enabled_features(role)
    }

    /// Enabled features for the main navigation.
    pub async fn navigation_features(&self) -> Vec<FeatureDescriptor> {
        let Some(role) = self.current_role() else {
            return Vec::new();
        };
        self.store
            .snapshot()
            .await
            .resolver()
            .navigation_features(role)
    }

    /// Enabled features for the signed-in role's bottom bar.
    pub async fn bottom_nav_features(&self) -> Vec<FeatureDescriptor> {
        let Some(role) = self.current_role() else {
            return Vec::new();
        };
        self.store
            .snapshot()
            .await
            .resolver()
            .bottom_nav_features(role)
    }

    /// Debug dump of every descriptor and override.
    pub async fn feature_status(&self) -> FeatureStatus {
        self.store.snapshot().await.status()
    }

    /// Subscribe to configuration changes.
    pub fn subscribe(&self) -> ChangeSubscription {
        self.store.subscribe()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Switch a feature on for `role` (default: the caller's own role).
    pub async fn enable_feature(
        &self,
        feature: FeatureId,
        role: Option<Role>,
    ) -> FeatureResult<MutationOutcome> {
        self.mutate(feature, role, OverrideOp::Enable).await
    }

    /// Switch a feature off for `role` (default: the caller's own role).
    pub async fn disable_feature(
        &self,
        feature: FeatureId,
        role: Option<Role>,
    ) -> FeatureResult<MutationOutcome> {
        self.mutate(feature, role, OverrideOp::Disable).await
    }

    /// Flip a feature for `role` (default: the caller's own role).
    pub async fn toggle_feature(
        &self,
        feature: FeatureId,
        role: Option<Role>,
    ) -> FeatureResult<MutationOutcome> {
        self.mutate(feature, role, OverrideOp::Toggle).await
    }

    /// Set a role's override directly. Admin only.
    ///
    /// Unlike the toggle entry points this also works on beta features.
    #[instrument(skip(self), fields(actor = tracing::field::Empty))]
    pub async fn update_role_feature(
        &self,
        feature: FeatureId,
        role: Role,
        enabled: bool,
    ) -> FeatureResult<MutationOutcome> {
        let user = match self.require_admin() {
            Ok(user) => user,
            Err(denied) => return Ok(denied),
        };
        tracing::Span::current().record("actor", tracing::field::display(user.id));

        let mutation = OverrideMutation::new(feature, role, OverrideOp::Set(enabled));
        let outcome = self.store.apply(mutation, Some(user.id)).await?;
        log_outcome(&mutation, &outcome);
        Ok(outcome)
    }

    /// Flip a feature's global kill switch. Admin only.
    #[instrument(skip(self))]
    pub async fn set_globally_enabled(
        &self,
        feature: FeatureId,
        enabled: bool,
    ) -> FeatureResult<MutationOutcome> {
        let user = match self.require_admin() {
            Ok(user) => user,
            Err(denied) => return Ok(denied),
        };

        let outcome = self
            .store
            .set_globally_enabled(feature, enabled, Some(user.id))
            .await?;
        if outcome.is_changed() {
            info!(%feature, enabled, actor = %user.id, "Feature kill switch changed");
        }
        Ok(outcome)
    }

    #[instrument(skip(self), fields(operation = op.as_str()))]
    async fn mutate(
        &self,
        feature: FeatureId,
        role: Option<Role>,
        op: OverrideOp,
    ) -> FeatureResult<MutationOutcome> {
        let Some(user) = self.session.current_user() else {
            warn!(%feature, "Feature change attempted without a signed-in user");
            return Ok(MutationOutcome::denied(DenialReason::NotSignedIn));
        };

        let target = role.unwrap_or(user.role);
        if !user.role.can_manage_role(target) {
            warn!(
                %feature,
                caller_role = %user.role,
                target_role = %target,
                actor = %user.id,
                "Feature change for another role denied"
            );
            return Ok(MutationOutcome::denied(DenialReason::RoleMismatch));
        }

        let is_beta = self
            .store
            .snapshot()
            .await
            .registry
            .get(feature)
            .is_some_and(|f| f.beta);
        if is_beta {
            warn!(%feature, actor = %user.id, "Beta feature cannot be toggled");
            return Ok(MutationOutcome::denied(DenialReason::BetaFeature));
        }

        let mutation = OverrideMutation::new(feature, target, op);
        let outcome = self.store.apply(mutation, Some(user.id)).await?;
        log_outcome(&mutation, &outcome);
        Ok(outcome)
    }

    fn require_admin(&self) -> Result<SessionUser, MutationOutcome> {
        match self.session.current_user() {
            Some(user) if user.role.is_admin() => Ok(user),
            Some(user) => {
                warn!(caller_role = %user.role, actor = %user.id, "Admin-only feature change denied");
                Err(MutationOutcome::denied(DenialReason::AdminOnly))
            }
            None => {
                warn!("Admin-only feature change attempted without a signed-in user");
                Err(MutationOutcome::denied(DenialReason::NotSignedIn))
            }
        }
    }
}

fn log_outcome(mutation: &OverrideMutation, outcome: &MutationOutcome) {
    match outcome {
        MutationOutcome::Applied { enabled, changed: true } => info!(
            feature = %mutation.feature,
            role = %mutation.role,
            enabled,
            "Feature override changed"
        ),
        MutationOutcome::Applied { changed: false, .. } => debug!(
            feature = %mutation.feature,
            role = %mutation.role,
            "Feature override already in requested state"
        ),
        MutationOutcome::NotFound => warn!(
            feature = %mutation.feature,
            role = %mutation.role,
            "No override configured for feature, nothing changed"
        ),
        MutationOutcome::Denied { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryFeatureStore;
    use schoolhub_identity::StaticSession;

    fn context_for(role: Role) -> (FeatureContext, Arc<MemoryFeatureStore>) {
        let session = Arc::new(StaticSession::signed_in(SessionUser::new("user", role)));
        let store = Arc::new(MemoryFeatureStore::builtin());
        (FeatureContext::new(session, store.clone()), store)
    }

    async fn enabled_for(store: &MemoryFeatureStore, feature: FeatureId, role: Role) -> bool {
        store.snapshot().await.resolver().is_feature_enabled(feature, role)
    }

    #[tokio::test]
    async fn test_reads_use_session_role() {
        let (teacher, _) = context_for(Role::Teacher);
        assert!(teacher.is_feature_enabled(FeatureId::ClassManagement).await);
        assert!(!teacher.is_feature_enabled(FeatureId::UserManagement).await);
        assert!(teacher.is_feature_key_enabled("class-management").await);
        assert!(!teacher.is_feature_key_enabled("cafeteria").await);
    }

    #[tokio::test]
    async fn test_signed_out_fails_closed() {
        let session = Arc::new(StaticSession::signed_out());
        let ctx = FeatureContext::new(session, Arc::new(MemoryFeatureStore::builtin()));

        assert!(!ctx.is_feature_enabled(FeatureId::Dashboard).await);
        assert!(ctx.enabled_features().await.is_empty());
        assert!(ctx.navigation_features().await.is_empty());
        assert!(ctx.bottom_nav_features().await.is_empty());
        assert_eq!(
            ctx.toggle_feature(FeatureId::Dashboard, None).await.unwrap(),
            MutationOutcome::denied(DenialReason::NotSignedIn)
        );
    }

    #[tokio::test]
    async fn test_own_role_mutation_allowed() {
        let (student, store) = context_for(Role::Student);
        let outcome = student.disable_feature(FeatureId::Messages, None).await.unwrap();
        assert_eq!(outcome, MutationOutcome::Applied { enabled: false, changed: true });
        assert!(!enabled_for(&store, FeatureId::Messages, Role::Student).await);
        assert!(enabled_for(&store, FeatureId::Messages, Role::Teacher).await);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_touch_other_role() {
        let (teacher, store) = context_for(Role::Teacher);
        let before = store.snapshot().await.matrix.get(Role::Student, FeatureId::Grades);

        let outcome = teacher
            .toggle_feature(FeatureId::Grades, Some(Role::Student))
            .await
            .unwrap();

        assert_eq!(outcome, MutationOutcome::denied(DenialReason::RoleMismatch));
        assert_eq!(store.snapshot().await.matrix.get(Role::Student, FeatureId::Grades), before);
    }

    #[tokio::test]
    async fn test_admin_can_target_any_role() {
        let (admin, store) = context_for(Role::Admin);
        let outcome = admin
            .disable_feature(FeatureId::Attendance, Some(Role::Student))
            .await
            .unwrap();
        assert!(outcome.is_changed());
        assert!(!enabled_for(&store, FeatureId::Attendance, Role::Student).await);
    }

    #[tokio::test]
    async fn test_beta_features_not_toggleable() {
        let (admin, store) = context_for(Role::Admin);
        let outcome = admin
            .enable_feature(FeatureId::ParentPortal, None)
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::denied(DenialReason::BetaFeature));
        assert!(!store.snapshot().await.matrix.is_enabled(Role::Admin, FeatureId::ParentPortal));
    }

    #[tokio::test]
    async fn test_update_role_feature_is_admin_only() {
        let (teacher, _) = context_for(Role::Teacher);
        assert_eq!(
            teacher
                .update_role_feature(FeatureId::Attendance, Role::Teacher, false)
                .await
                .unwrap(),
            MutationOutcome::denied(DenialReason::AdminOnly)
        );

        let (admin, store) = context_for(Role::Admin);
        let outcome = admin
            .update_role_feature(FeatureId::ParentPortal, Role::Teacher, true)
            .await
            .unwrap();
        assert!(outcome.is_changed());
        // Beta override is honoured once set directly
        assert!(enabled_for(&store, FeatureId::ParentPortal, Role::Teacher).await);
    }

    #[tokio::test]
    async fn test_kill_switch_admin_only() {
        let (student, _) = context_for(Role::Student);
        assert!(student
            .set_globally_enabled(FeatureId::Messages, false)
            .await
            .unwrap()
            .is_denied());

        let (admin, store) = context_for(Role::Admin);
        admin.set_globally_enabled(FeatureId::Messages, false).await.unwrap();
        assert!(!enabled_for(&store, FeatureId::Messages, Role::Admin).await);
    }

    #[tokio::test]
    async fn test_missing_override_reports_not_found() {
        let (admin, _) = context_for(Role::Admin);
        let outcome = admin
            .enable_feature(FeatureId::UserManagement, Some(Role::Student))
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_feature_status_dump() {
        let (student, _) = context_for(Role::Student);
        let status = student.feature_status().await;
        assert_eq!(status.features.len(), FeatureId::all().len());
        assert!(status.role_config.is_enabled(Role::Student, FeatureId::Attendance));
    }

    #[tokio::test]
    async fn test_subscribe_sees_changes() {
        let (admin, _) = context_for(Role::Admin);
        let mut changes = admin.subscribe();
        admin.toggle_feature(FeatureId::Calendar, Some(Role::Teacher)).await.unwrap();
        let change = changes.recv().await.unwrap();
        assert_eq!(change.feature, FeatureId::Calendar);
        assert_eq!(change.role(), Some(Role::Teacher));
        assert!(!change.enabled);
    }
}
