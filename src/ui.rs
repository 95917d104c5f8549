//! Router and modal alerts, injected into the services as collaborators.

use std::fmt;

use mockall::automock;
use tracing::info;

/// Screens the workflows navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Login,
    /// Shown after a successful checkout.
    Confirmation,
    AdminDashboard,
    UserManagement,
    AdminShop,
    GenAnalytics,
}

impl Screen {
    pub fn route(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Confirmation => "/checkout",
            Self::AdminDashboard => "/admin",
            Self::UserManagement => "/admin/UserManage",
            Self::AdminShop => "/admin/AdminShop",
            Self::GenAnalytics => "/admin/GenAnalytics",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

/// A one-shot modal notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

#[automock]
pub trait Navigator: Send + Sync {
    /// Push a screen on top of the current one.
    fn navigate(&self, screen: Screen);

    /// Replace the current screen, so "back" cannot return to it.
    fn replace(&self, screen: Screen);
}

#[automock]
pub trait Notifier: Send + Sync {
    fn alert(&self, alert: Alert);
}

/// Navigator for headless use: records the route in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, screen: Screen) {
        info!(route = %screen, "navigate");
    }

    fn replace(&self, screen: Screen) {
        info!(route = %screen, "replace");
    }
}

/// Prints alerts to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, alert: Alert) {
        eprintln!("[{}] {}", alert.title, alert.message);
    }
}
