use thiserror::Error;

/// Errors that can occur on the admin dashboard.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AdminError {
    #[error("administrator access required")]
    AccessDenied,

    #[error("user management is disabled on this dashboard")]
    UserManagementDisabled,

    #[error("no user with id {0} on the roster")]
    UnknownUser(String),

    #[error("cannot {action} user {user_id}")]
    InvalidTransition { user_id: String, action: &'static str },

    #[error("a reason is required to deactivate a user")]
    EmptyReason,

    #[error("no confirmation is pending")]
    NoPendingConfirmation,

    #[error("another change is still in progress")]
    Busy,

    #[error("failed to {action}: {message}")]
    Failed { action: &'static str, message: String },

    #[error("session error: {0}")]
    Session(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
