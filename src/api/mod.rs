//! The remote shop backend, behind a mockable trait.

mod error;
pub mod http;

use async_trait::async_trait;
use mockall::automock;

use crate::domain::{CheckoutResult, OrderPayload, Role, StatusReport, User};

pub use error::*;
pub use http::{HttpShopApi, UsersPath};

/// Body returned by the account mutation endpoints.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct MutationResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl MutationResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[automock]
#[async_trait]
pub trait ShopApi: Send + Sync {
    /// Submit an order. `Ok` carries the body of any 2xx response, including `success: false`.
    async fn checkout(&self, order: OrderPayload) -> Result<CheckoutResult, ApiError>;

    /// Probe backend health.
    async fn status(&self) -> Result<StatusReport, ApiError>;

    /// Fetch the full roster.
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    async fn update_role(&self, user_id: String, role: Role) -> Result<MutationResult, ApiError>;

    /// The backend emails the affected user with the reason.
    async fn deactivate_user(&self, user_id: String, reason: String) -> Result<MutationResult, ApiError>;

    async fn activate_user(&self, user_id: String) -> Result<MutationResult, ApiError>;

    async fn delete_user(&self, user_id: String) -> Result<MutationResult, ApiError>;
}
