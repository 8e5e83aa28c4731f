//! Feature change events
//!
//! Stores publish a [`FeatureChange`] after every mutation that changes state,
//! so UI layers can re-render gated screens without polling.

use chrono::{DateTime, Utc};
use schoolhub_identity::Role;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::{FeatureError, FeatureResult};
use crate::features::FeatureId;

/// Which switch a change touched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "scope", content = "role")]
pub enum ChangeScope {
    /// A per-role override.
    Role(Role),
    /// The global kill switch.
    Global,
}

/// A state change to one feature switch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureChange {
    /// Event ID
    pub id: Uuid,
    /// Feature affected
    pub feature: FeatureId,
    /// Which switch changed
    pub scope: ChangeScope,
    /// New state
    pub enabled: bool,
    /// User who made the change, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<Uuid>,
    /// When the change happened
    pub at: DateTime<Utc>,
}

impl FeatureChange {
    /// Create a change event stamped now.
    pub fn new(
        feature: FeatureId,
        scope: ChangeScope,
        enabled: bool,
        changed_by: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            feature,
            scope,
            enabled,
            changed_by,
            at: Utc::now(),
        }
    }

    /// Role affected, if the change was role-scoped.
    pub fn role(&self) -> Option<Role> {
        match self.scope {
            ChangeScope::Role(role) => Some(role),
            ChangeScope::Global => None,
        }
    }
}

/// Receiving end of a store's change feed.
#[derive(Debug)]
pub struct ChangeSubscription {
    receiver: broadcast::Receiver<FeatureChange>,
}

impl ChangeSubscription {
    pub(crate) fn new(receiver: broadcast::Receiver<FeatureChange>) -> Self {
        Self { receiver }
    }

    /// Wait for the next change.
    ///
    /// A subscriber that falls behind skips the missed events and receives
    /// the oldest one still buffered.
    pub async fn recv(&mut self) -> FeatureResult<FeatureChange> {
        loop {
            match self.receiver.recv().await {
                Ok(change) => return Ok(change),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Feature change subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(FeatureError::Store("change feed closed".to_string()));
                }
            }
        }
    }

    /// Take the next change if one is already buffered.
    pub fn try_recv(&mut self) -> Option<FeatureChange> {
        loop {
            match self.receiver.try_recv() {
                Ok(change) => return Some(change),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Feature change subscriber lagged");
                }
                Err(_) => return None,
            }
        }
    }
}
