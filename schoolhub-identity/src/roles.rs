//! School roles
//!
//! A SchoolHub user belongs to exactly one authorization class. Roles are
//! not hierarchical the way organization roles are: a teacher does not
//! inherit what a student sees. Only `Admin` carries extra rights, namely
//! acting on behalf of other roles.

use serde::{Deserialize, Serialize};

/// Authorization class of a signed-in user.
///
/// # Examples
///
/// ```
/// use schoolhub_identity::Role;
///
/// assert!(Role::Admin.is_admin());
/// assert!(Role::Admin.can_manage_role(Role::Student));
/// assert!(!Role::Teacher.can_manage_role(Role::Student));
/// assert!(Role::Teacher.can_manage_role(Role::Teacher));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// School administrator
    Admin,

    /// Teaching staff
    Teacher,

    /// Enrolled student
    Student,
}

impl Role {
    /// Check if this role has admin privileges.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Check if a user holding this role may change settings scoped to `target`.
    ///
    /// Everyone may act on their own role; admins may act on any role.
    pub fn can_manage_role(&self, target: Role) -> bool {
        self.is_admin() || *self == target
    }

    /// All roles, in declaration order.
    pub fn all() -> [Role; 3] {
        [Role::Admin, Role::Teacher, Role::Student]
    }

    /// Parse role from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(Role)` if valid, `None` otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use schoolhub_identity::Role;
    ///
    /// assert_eq!(Role::parse("teacher"), Some(Role::Teacher));
    /// assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
    /// assert_eq!(Role::parse("parent"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Teacher => "Teacher",
            Role::Student => "Student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
