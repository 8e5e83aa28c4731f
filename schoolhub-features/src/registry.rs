//! Feature registry
//!
//! The ordered catalogue of feature descriptors. Registry order is the order
//! in which features appear in menus, so every listing preserves it.

use std::collections::HashSet;

use schoolhub_identity::Role;
use serde::{Deserialize, Serialize};

use crate::error::{FeatureError, FeatureResult};
use crate::features::{FeatureDescriptor, FeatureId};
use crate::icons::Icon;

/// Ordered, validated set of feature descriptors.
///
/// # Examples
///
/// ```
/// use schoolhub_features::{FeatureId, FeatureRegistry};
/// use schoolhub_identity::Role;
///
/// let registry = FeatureRegistry::builtin();
/// let user_mgmt = registry.get(FeatureId::UserManagement).unwrap();
/// assert!(user_mgmt.is_applicable_to(Role::Admin));
/// assert!(!user_mgmt.is_applicable_to(Role::Teacher));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Vec<FeatureDescriptor>", into = "Vec<FeatureDescriptor>")]
pub struct FeatureRegistry {
    features: Vec<FeatureDescriptor>,
}

impl FeatureRegistry {
    /// Build a registry, rejecting duplicate IDs and descriptors without roles.
    pub fn new(features: Vec<FeatureDescriptor>) -> FeatureResult<Self> {
        let mut seen = HashSet::new();
        for feature in &features {
            if !seen.insert(feature.id) {
                return Err(FeatureError::DuplicateFeature(feature.id));
            }
            if feature.allowed_roles.is_empty() {
                return Err(FeatureError::NoAllowedRoles(feature.id));
            }
        }
        Ok(Self { features })
    }

    /// The built-in SchoolHub catalogue.
    pub fn builtin() -> Self {
        use Role::{Admin, Student, Teacher};

        let features = vec![
            FeatureDescriptor::new(FeatureId::Dashboard, "Dashboard", Icon::Home)
                .with_description("Overview of today's classes, tasks and notices")
                .allow([Admin, Teacher, Student]),
            FeatureDescriptor::new(FeatureId::Attendance, "Attendance", Icon::CheckCircle)
                .with_description("Take and review class attendance")
                .allow([Admin, Teacher, Student]),
            FeatureDescriptor::new(FeatureId::Assignments, "Assignments", Icon::ClipboardList)
                .with_description("Create, submit and review assignments")
                .allow([Teacher, Student]),
            FeatureDescriptor::new(FeatureId::Grades, "Grades", Icon::Award)
                .with_description("Record and view grades")
                .allow([Admin, Teacher, Student]),
            FeatureDescriptor::new(FeatureId::Timetable, "Timetable", Icon::Clock)
                .with_description("Weekly class schedule")
                .allow([Teacher, Student]),
            FeatureDescriptor::new(FeatureId::Messages, "Messages", Icon::MessageSquare)
                .with_description("Direct messages between staff and students")
                .allow([Admin, Teacher, Student]),
            FeatureDescriptor::new(FeatureId::Announcements, "Announcements", Icon::Megaphone)
                .with_description("School-wide and class announcements")
                .allow([Admin, Teacher, Student]),
            FeatureDescriptor::new(FeatureId::Documents, "Documents", Icon::FileText)
                .with_description("Shared files and handouts")
                .allow([Admin, Teacher, Student]),
            FeatureDescriptor::new(FeatureId::Calendar, "Calendar", Icon::Calendar)
                .with_description("School events and exam dates")
                .allow([Admin, Teacher, Student]),
            FeatureDescriptor::new(FeatureId::Reports, "Reports", Icon::BarChart)
                .with_description("Attendance and performance analytics")
                .allow([Admin, Teacher, Student]),
            FeatureDescriptor::new(FeatureId::UserManagement, "User Management", Icon::Users)
                .with_description("Create and manage accounts")
                .allow([Admin]),
            FeatureDescriptor::new(FeatureId::ClassManagement, "Classes", Icon::BookOpen)
                .with_description("Class rosters and subjects")
                .allow([Admin, Teacher]),
            FeatureDescriptor::new(FeatureId::Settings, "Settings", Icon::Settings)
                .with_description("App preferences")
                .allow([Admin, Teacher, Student]),
            FeatureDescriptor::new(FeatureId::Profile, "Profile", Icon::User)
                .with_description("Your account details")
                .allow([Admin, Teacher, Student]),
            FeatureDescriptor::new(FeatureId::AiTutor, "AI Tutor", Icon::Sparkles)
                .with_description("Study assistant for homework questions")
                .allow([Teacher, Student])
                .beta()
                .globally_enabled(false),
            FeatureDescriptor::new(FeatureId::ParentPortal, "Parent Portal", Icon::UserPlus)
                .with_description("Read-only access for parents and guardians")
                .allow([Admin, Teacher])
                .beta(),
        ];

        Self { features }
    }

    /// Look up a descriptor.
    pub fn get(&self, id: FeatureId) -> Option<&FeatureDescriptor> {
        self.features.iter().find(|f| f.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: FeatureId) -> Option<&mut FeatureDescriptor> {
        self.features.iter_mut().find(|f| f.id == id)
    }

    /// Check whether the registry knows `id`.
    pub fn contains(&self, id: FeatureId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate descriptors in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &FeatureDescriptor> {
        self.features.iter()
    }

    /// Get the count of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<FeatureDescriptor>> for FeatureRegistry {
    type Error = FeatureError;

    fn try_from(features: Vec<FeatureDescriptor>) -> FeatureResult<Self> {
        Self::new(features)
    }
}

impl From<FeatureRegistry> for Vec<FeatureDescriptor> {
    fn from(registry: FeatureRegistry) -> Self {
        registry.features
    }
}
