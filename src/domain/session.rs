use serde::{Deserialize, Serialize};

use super::Role;

/// The signed-in account as kept in local device storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "jwt_token")]
    pub token: String,
    #[serde(rename = "user_role")]
    pub role: Role,
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Where session resolution currently stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// Still reading local storage.
    #[default]
    Resolving,
    SignedIn(Session),
    SignedOut,
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(session) => Some(session),
            Self::Resolving | Self::SignedOut => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Resolving)
    }
}
