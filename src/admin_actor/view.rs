use crate::domain::User;
use crate::ui::Screen;

/// What the last status probe found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BackendStatus {
    /// No probe has finished yet.
    #[default]
    Unknown,
    Online(String),
    Offline(String),
}

impl BackendStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Online(_) => "Online",
            Self::Offline(_) => "Offline",
        }
    }
}

/// Which parts of the dashboard are switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardCapabilities {
    pub user_management: bool,
    pub sidebar: bool,
}

impl Default for DashboardCapabilities {
    fn default() -> Self {
        Self {
            user_management: true,
            sidebar: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarItem {
    pub label: &'static str,
    pub screen: Screen,
}

pub const SIDEBAR: [SidebarItem; 3] = [
    SidebarItem {
        label: "User Management",
        screen: Screen::UserManagement,
    },
    SidebarItem {
        label: "Admin Shop",
        screen: Screen::AdminShop,
    },
    SidebarItem {
        label: "Gen Analytics",
        screen: Screen::GenAnalytics,
    },
];

/// An open confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogView {
    Deactivate {
        user_id: String,
        user_name: String,
        reason: String,
        confirm_enabled: bool,
    },
    Delete {
        user_id: String,
        user_name: String,
        confirm_enabled: bool,
    },
}

/// Snapshot of the dashboard for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// A roster fetch is in flight.
    pub loading: bool,
    pub backend: BackendStatus,
    /// Roster rows after the deactivated filter.
    pub users: Vec<User>,
    pub total_users: usize,
    pub show_deactivated: bool,
    pub roster_error: Option<String>,
    pub dialog: Option<DialogView>,
    /// A mutation is in flight.
    pub busy: bool,
    pub capabilities: DashboardCapabilities,
    pub sidebar: Vec<SidebarItem>,
}

impl DashboardView {
    /// Retry is only offered after a failed probe.
    pub fn can_retry_status(&self) -> bool {
        matches!(self.backend, BackendStatus::Offline(_))
    }

    pub fn empty_text(&self) -> Option<&'static str> {
        (!self.loading && self.users.is_empty()).then_some("No users found.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(backend: BackendStatus) -> DashboardView {
        DashboardView {
            loading: false,
            backend,
            users: Vec::new(),
            total_users: 0,
            show_deactivated: true,
            roster_error: None,
            dialog: None,
            busy: false,
            capabilities: DashboardCapabilities::default(),
            sidebar: SIDEBAR.to_vec(),
        }
    }

    #[test]
    fn retry_only_when_offline() {
        assert!(!view(BackendStatus::Unknown).can_retry_status());
        assert!(!view(BackendStatus::Online("ok".into())).can_retry_status());
        assert!(view(BackendStatus::Offline("down".into())).can_retry_status());
    }

    #[test]
    fn empty_roster_text() {
        let mut v = view(BackendStatus::Unknown);
        assert_eq!(v.empty_text(), Some("No users found."));
        v.loading = true;
        assert_eq!(v.empty_text(), None);
    }
}
