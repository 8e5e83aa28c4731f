//! Signed-in session
//!
//! The rest of SchoolHub only needs to know who is signed in and under which
//! role. This module defines that view of the user and the provider trait the
//! authentication layer implements to hand it out.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roles::Role;

/// The authenticated user as exposed to application code.
///
/// # Examples
///
/// ```
/// use schoolhub_identity::{Role, SessionUser};
///
/// let user = SessionUser::new("Amara Diallo", Role::Student);
/// assert_eq!(user.role, Role::Student);
/// assert_eq!(user.name, "Amara Diallo");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    /// User ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Authorization class
    pub role: Role,

    /// When the session started
    pub signed_in_at: DateTime<Utc>,
}

impl SessionUser {
    /// Creates a session user with a fresh ID.
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self::with_id(Uuid::now_v7(), name, role)
    }

    /// Creates a session user for a known user ID.
    pub fn with_id(id: Uuid, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            signed_in_at: Utc::now(),
        }
    }
}

/// Supplies the currently signed-in user.
///
/// Implemented by whatever authenticates users. Returning `None` means nobody
/// is signed in, and callers must treat that as having no access.
pub trait SessionProvider: Send + Sync {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<SessionUser>;
}

impl<T: SessionProvider + ?Sized> SessionProvider for Arc<T> {
    fn current_user(&self) -> Option<SessionUser> {
        (**self).current_user()
    }
}

/// Session provider holding a single swappable user.
///
/// Useful for tests and for front ends that keep the session in memory.
///
/// # Examples
///
/// ```
/// use schoolhub_identity::{Role, SessionProvider, SessionUser, StaticSession};
///
/// let session = StaticSession::signed_out();
/// assert!(session.current_user().is_none());
///
/// session.sign_in(SessionUser::new("Admin", Role::Admin));
/// assert_eq!(session.current_user().map(|u| u.role), Some(Role::Admin));
///
/// session.sign_out();
/// assert!(session.current_user().is_none());
/// ```
#[derive(Debug, Default)]
pub struct StaticSession {
    user: RwLock<Option<SessionUser>>,
}

impl StaticSession {
    /// A session with `user` signed in.
    pub fn signed_in(user: SessionUser) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    /// A session with nobody signed in.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Replace the signed-in user.
    pub fn sign_in(&self, user: SessionUser) {
        let mut guard = self.user.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(user);
    }

    /// Clear the signed-in user.
    pub fn sign_out(&self) {
        let mut guard = self.user.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

impl SessionProvider for StaticSession {
    fn current_user(&self) -> Option<SessionUser> {
        self.user
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
