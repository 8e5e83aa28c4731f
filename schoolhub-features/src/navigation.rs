//! Navigation allow-lists
//!
//! Which features may appear as navigation entries. The side menu uses one
//! shared list; the mobile bottom bar only has room for five entries, so each
//! role gets its own hand-picked shortlist.

use schoolhub_identity::Role;

use crate::features::FeatureId;

/// Features that can appear in the main navigation.
pub const NAVIGATION_FEATURES: &[FeatureId] = &[
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
];

const ADMIN_BOTTOM_NAV: &[FeatureId] = &[
    FeatureId::Dashboard,
    FeatureId::UserManagement,
    FeatureId::Reports,
    FeatureId::Announcements,
    FeatureId::Messages,
];

const TEACHER_BOTTOM_NAV: &[FeatureId] = &[
    FeatureId::Dashboard,
    FeatureId::Attendance,
    FeatureId::Assignments,
    FeatureId::Messages,
    FeatureId::ClassManagement,
];

const STUDENT_BOTTOM_NAV: &[FeatureId] = &[
    FeatureId::Dashboard,
    FeatureId::Assignments,
    FeatureId::Grades,
    FeatureId::Timetable,
    FeatureId::Messages,
];

/// Check whether a feature is navigable at all.
pub fn is_navigable(feature: FeatureId) -> bool {
    NAVIGATION_FEATURES.contains(&feature)
}

/// Bottom-bar shortlist for a role.
pub fn bottom_nav_allow_list(role: Role) -> &'static [FeatureId] {
    match role {
        Role::Admin => ADMIN_BOTTOM_NAV,
        Role::Teacher => TEACHER_BOTTOM_NAV,
        Role::Student => STUDENT_BOTTOM_NAV,
    }
}
