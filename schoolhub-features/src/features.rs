//! # Features
//!
//! Feature identifiers and descriptors. Every gated screen or capability of
//! the app has a [`FeatureId`]; the registry pairs each ID with a
//! [`FeatureDescriptor`] describing who may ever see it.

use std::collections::BTreeSet;

use schoolhub_identity::Role;
use serde::{Deserialize, Serialize};

use crate::error::FeatureError;
use crate::icons::Icon;

/// Identifier of a gated feature.
///
/// Feature IDs are a closed set so that a typo fails to compile instead of
/// quietly resolving to "disabled". String keys coming from the outside are
/// converted with [`FeatureId::parse`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeatureId {
    /// Role-specific home dashboard.
    Dashboard,
    /// Attendance taking and history.
    Attendance,
    /// Homework and assignments.
    Assignments,
    /// Grades and report cards.
    Grades,
    /// Class timetable.
    Timetable,
    /// Direct messaging.
    Messages,
    /// School-wide announcements.
    Announcements,
    /// Shared documents.
    Documents,
    /// School calendar and events.
    Calendar,
    /// Analytics and reports.
    Reports,
    /// Account administration.
    UserManagement,
    /// Class rosters and subjects.
    ClassManagement,
    /// App settings.
    Settings,
    /// Own profile page.
    Profile,
    /// AI study assistant (beta).
    AiTutor,
    /// Parent access portal (beta).
    ParentPortal,
}

impl FeatureId {
    /// Get the string representation of the feature ID.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureId::Dashboard => "dashboard",
            FeatureId::Attendance => "attendance",
            FeatureId::Assignments => "assignments",
            FeatureId::Grades => "grades",
            FeatureId::Timetable => "timetable",
            FeatureId::Messages => "messages",
            FeatureId::Announcements => "announcements",
            FeatureId::Documents => "documents",
            FeatureId::Calendar => "calendar",
            FeatureId::Reports => "reports",
            FeatureId::UserManagement => "user_management",
            FeatureId::ClassManagement => "class_management",
            FeatureId::Settings => "settings",
            FeatureId::Profile => "profile",
            FeatureId::AiTutor => "ai_tutor",
            FeatureId::ParentPortal => "parent_portal",
        }
    }

    /// Parse a feature ID from its string key.
    ///
    /// Accepts `snake_case` and `kebab-case`, case-insensitively.
    ///
    /// # Example
    ///
    /// ```
    /// use schoolhub_features::FeatureId;
    ///
    /// assert_eq!(FeatureId::parse("user_management"), Some(FeatureId::UserManagement));
    /// assert_eq!(FeatureId::parse("User-Management"), Some(FeatureId::UserManagement));
    /// assert_eq!(FeatureId::parse("cafeteria"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "dashboard" => Some(FeatureId::Dashboard),
            "attendance" => Some(FeatureId::Attendance),
            "assignments" => Some(FeatureId::Assignments),
            "grades" => Some(FeatureId::Grades),
            "timetable" => Some(FeatureId::Timetable),
            "messages" => Some(FeatureId::Messages),
            "announcements" => Some(FeatureId::Announcements),
            "documents" => Some(FeatureId::Documents),
            "calendar" => Some(FeatureId::Calendar),
            "reports" => Some(FeatureId::Reports),
            "user_management" => Some(FeatureId::UserManagement),
            "class_management" => Some(FeatureId::ClassManagement),
            "settings" => Some(FeatureId::Settings),
            "profile" => Some(FeatureId::Profile),
            "ai_tutor" => Some(FeatureId::AiTutor),
            "parent_portal" => Some(FeatureId::ParentPortal),
            _ => None,
        }
    }

    /// Get all feature IDs in catalogue order.
    pub fn all() -> Vec<Self> {
        vec![
            FeatureId::Dashboard,
            FeatureId::Attendance,
            FeatureId::Assignments,
            FeatureId::Grades,
            FeatureId::Timetable,
            FeatureId::Messages,
            FeatureId::Announcements,
            FeatureId::Documents,
            FeatureId::Calendar,
            FeatureId::Reports,
            FeatureId::UserManagement,
            FeatureId::ClassManagement,
            FeatureId::Settings,
            FeatureId::Profile,
            FeatureId::AiTutor,
            FeatureId::ParentPortal,
        ]
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeatureId {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| FeatureError::UnknownFeature(s.to_string()))
    }
}

/// Static description of a feature.
///
/// # Example
///
/// ```
/// use schoolhub_features::{FeatureDescriptor, FeatureId, Icon};
/// use schoolhub_identity::Role;
///
/// let grades = FeatureDescriptor::new(FeatureId::Grades, "Grades", Icon::Award)
///     .with_description("View and record grades")
///     .allow([Role::Teacher, Role::Student]);
///
/// assert!(grades.is_applicable_to(Role::Student));
/// assert!(!grades.is_applicable_to(Role::Admin));
/// assert!(grades.globally_enabled);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureDescriptor {
    /// Unique feature ID.
    pub id: FeatureId,
    /// Display name.
    pub name: String,
    /// Short description shown in settings screens.
    #[serde(default)]
    pub description: String,
    /// Icon key for the UI.
    pub icon: Icon,
    /// Kill switch independent of any role.
    pub globally_enabled: bool,
    /// Roles for which the feature applies at all.
    pub allowed_roles: BTreeSet<Role>,
    /// Beta features cannot be toggled by end users.
    #[serde(default)]
    pub beta: bool,
}

impl FeatureDescriptor {
    /// Create a globally enabled, non-beta descriptor with no allowed roles yet.
    pub fn new(id: FeatureId, name: impl Into<String>, icon: Icon) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            icon,
            globally_enabled: true,
            allowed_roles: BTreeSet::new(),
            beta: false,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add roles to the allowed set.
    pub fn allow<I>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        self.allowed_roles.extend(roles);
        self
    }

    /// Mark as beta.
    pub fn beta(mut self) -> Self {
        self.beta = true;
        self
    }

    /// Set the global kill switch.
    pub fn globally_enabled(mut self, enabled: bool) -> Self {
        self.globally_enabled = enabled;
        self
    }

    /// Check whether `role` is in the allowed set.
    pub fn is_applicable_to(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_id_parsing() {
        for id in FeatureId::all() {
            assert_eq!(FeatureId::parse(id.as_str()), Some(id));
        }
        assert_eq!(FeatureId::parse("AI-Tutor"), Some(FeatureId::AiTutor));
        assert_eq!(FeatureId::parse(""), None);
    }

    #[test]
    fn test_feature_id_from_str() {
        assert_eq!("grades".parse::<FeatureId>().unwrap(), FeatureId::Grades);
        let err = "cafeteria".parse::<FeatureId>().unwrap_err();
        assert!(matches!(err, FeatureError::UnknownFeature(ref key) if key == "cafeteria"));
    }

    #[test]
    fn test_all_features_count() {
        assert_eq!(FeatureId::all().len(), 16);
    }

    #[test]
    fn test_feature_id_serde_matches_as_str() {
        let json = serde_json::to_string(&FeatureId::ClassManagement).unwrap();
        assert_eq!(json, "\"class_management\"");
    }

    #[test]
    fn test_descriptor_builder() {
        let desc = FeatureDescriptor::new(FeatureId::AiTutor, "AI Tutor", Icon::Sparkles)
            .allow([Role::Student])
            .beta()
            .globally_enabled(false);

        assert!(desc.beta);
        assert!(!desc.globally_enabled);
        assert!(desc.is_applicable_to(Role::Student));
        assert!(!desc.is_applicable_to(Role::Teacher));
        assert!(desc.description.is_empty());
    }
}
