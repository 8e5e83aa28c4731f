//! # SchoolHub Feature Gating
//!
//! Role-based feature toggles for SchoolHub. Navigation bars, dashboards and
//! page routers ask this crate what the signed-in user may see.
//!
//! ## Overview
//!
//! - **Registry**: ordered descriptors of every gated feature (name, icon,
//!   kill switch, allowed roles, beta flag)
//! - **Matrix**: per-role overrides saying whether a feature is switched on
//! - **Resolver**: pure lookups combining both
//! - **Store**: owns the live registry and matrix; in memory by default
//! - **Context**: binds a store to the signed-in user and enforces who may
//!   change what
//!
//! ## Architecture
//!
//! ```text
//! FeatureRegistry ─┐
//!                  ├─ FeatureSnapshot ─→ FeatureResolver (pure, fail closed)
//! RoleFeatureMatrix┘        │
//!                    FeatureStore (Arc snapshot, serialized writers, change feed)
//!                           │
//!       SessionProvider ─→ FeatureContext ─→ UI consumers
//! ```
//!
//! ## Resolution
//!
//! A feature is enabled for a role when it is globally enabled, the role is
//! in its allowed set, and the role's override is on. Anything missing
//! (unknown feature, no override, nobody signed in) means "disabled".
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use schoolhub_features::{FeatureContext, FeatureId, MemoryFeatureStore, MutationOutcome};
//! use schoolhub_identity::{Role, SessionUser, StaticSession};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = Arc::new(MemoryFeatureStore::builtin());
//! let admin = FeatureContext::new(
//!     Arc::new(StaticSession::signed_in(SessionUser::new("Principal", Role::Admin))),
//!     store.clone(),
//! );
//! let student = FeatureContext::new(
//!     Arc::new(StaticSession::signed_in(SessionUser::new("Amara", Role::Student))),
//!     store,
//! );
//!
//! assert!(student.is_feature_enabled(FeatureId::Attendance).await);
//!
//! let outcome = admin.disable_feature(FeatureId::Attendance, Some(Role::Student)).await.unwrap();
//! assert_eq!(outcome, MutationOutcome::Applied { enabled: false, changed: true });
//! assert!(!student.is_feature_enabled(FeatureId::Attendance).await);
//! # });
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod features;
pub mod icons;
pub mod matrix;
pub mod mutator;
pub mod navigation;
pub mod registry;
pub mod resolver;
pub mod snapshot;
pub mod store;

// Re-export main types for convenience
pub use config::FeatureConfig;
pub use context::FeatureContext;
pub use error::{FeatureError, FeatureResult};
pub use events::{ChangeScope, ChangeSubscription, FeatureChange};
pub use features::{FeatureDescriptor, FeatureId};
pub use icons::Icon;
pub use matrix::{RoleFeatureMatrix, RoleFeatureOverride};
pub use mutator::{
    apply_mutation, DenialReason, MissingOverridePolicy, MutationOutcome, OverrideMutation,
    OverrideOp,
};
pub use registry::FeatureRegistry;
pub use resolver::{FeatureResolver, Resolution};
pub use snapshot::{FeatureSnapshot, FeatureStatus};
pub use store::{FeatureStore, MemoryFeatureStore};
