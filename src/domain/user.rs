use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account role as stored by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// "a user" / "an admin", for notices.
    pub fn with_article(self) -> &'static str {
        match self {
            Self::User => "a user",
            Self::Admin => "an admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

fn active_by_default() -> bool {
    true
}

/// A backend account as shown on the admin roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: Role::User,
            is_active: true,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// A validated request to deactivate an account. The reason is never blank.
#[derive(Debug, Clone, PartialEq)]
pub struct DeactivationRequest {
    user_id: String,
    reason: String,
}

impl DeactivationRequest {
    /// Returns `None` when the reason is blank.
    pub fn new(user_id: impl Into<String>, reason: impl Into<String>) -> Option<Self> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return None;
        }
        Some(Self {
            user_id: user_id.into(),
            reason,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Body of `GET /status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_decodes_backend_record() {
        let user: User = serde_json::from_str(
            r#"{"_id":"u1","name":"Ana","email":"ana@example.com","role":"admin","isActive":false}"#,
        )
        .unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.role, Role::Admin);
        assert!(!user.is_active);
    }

    #[test]
    fn user_defaults_to_active_standard_user() {
        let user: User = serde_json::from_str(r#"{"id":"u2","name":"Ben","email":"ben@example.com"}"#).unwrap();

        assert_eq!(user.role, Role::User);
        assert!(user.is_active);
    }

    #[test]
    fn deactivation_request_requires_reason() {
        assert!(DeactivationRequest::new("u1", "").is_none());
        assert!(DeactivationRequest::new("u1", "   ").is_none());

        let request = DeactivationRequest::new("u1", "Fraudulent orders").unwrap();
        assert_eq!(request.user_id(), "u1");
        assert_eq!(request.reason(), "Fraudulent orders");
    }
}
