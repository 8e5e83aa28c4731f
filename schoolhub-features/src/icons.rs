//! # Icons
//!
//! Symbolic icon keys attached to feature descriptors. The presentation layer
//! maps each key to an actual glyph; this crate only carries the key.

use serde::{Deserialize, Serialize};

/// Icon reference for a feature, resolved by the UI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Home,
    CheckCircle,
    ClipboardList,
    Award,
    Clock,
    MessageSquare,
    Megaphone,
    FileText,
    Calendar,
    BarChart,
    Users,
    BookOpen,
    Settings,
    User,
    Sparkles,
    UserPlus,
}

impl Icon {
    /// Stable key for the presentation layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Home => "home",
            Icon::CheckCircle => "check-circle",
            Icon::ClipboardList => "clipboard-list",
            Icon::Award => "award",
            Icon::Clock => "clock",
            Icon::MessageSquare => "message-square",
            Icon::Megaphone => "megaphone",
            Icon::FileText => "file-text",
            Icon::Calendar => "calendar",
            Icon::BarChart => "bar-chart",
            Icon::Users => "users",
            Icon::BookOpen => "book-open",
            Icon::Settings => "settings",
            Icon::User => "user",
            Icon::Sparkles => "sparkles",
            Icon::UserPlus => "user-plus",
        }
    }

    /// Parse an icon key. Accepts `kebab-case` and `snake_case`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "home" => Some(Icon::Home),
            "check-circle" => Some(Icon::CheckCircle),
            "clipboard-list" => Some(Icon::ClipboardList),
            "award" => Some(Icon::Award),
            "clock" => Some(Icon::Clock),
            "message-square" => Some(Icon::MessageSquare),
            "megaphone" => Some(Icon::Megaphone),
            "file-text" => Some(Icon::FileText),
            "calendar" => Some(Icon::Calendar),
            "bar-chart" => Some(Icon::BarChart),
            "users" => Some(Icon::Users),
            "book-open" => Some(Icon::BookOpen),
            "settings" => Some(Icon::Settings),
            "user" => Some(Icon::User),
            "sparkles" => Some(Icon::Sparkles),
            "user-plus" => Some(Icon::UserPlus),
            _ => None,
        }
    }
}
