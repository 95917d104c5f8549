use tokio::sync::oneshot;

use crate::admin_actor::{AdminError, DashboardView};
use crate::api::{ApiError, MutationResult};
use crate::checkout_actor::{CheckoutError, CheckoutView};
use crate::domain::{CheckoutResult, DeactivationRequest, PaymentMethod, Role, StatusReport, User};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed message enums for service communication. Each variant includes parameters
/// and a oneshot channel for responses. Variants under "continuations" are posted by the
/// service itself when a background remote call finishes.

#[derive(Debug)]
pub enum CheckoutRequest {
    SetAddress {
        address: String,
        respond_to: ServiceResponse<(), CheckoutError>,
    },
    SetPhone {
        phone: String,
        respond_to: ServiceResponse<(), CheckoutError>,
    },
    SetPaymentMethod {
        method: PaymentMethod,
        respond_to: ServiceResponse<(), CheckoutError>,
    },
    Submit {
        respond_to: ServiceResponse<CheckoutResult, CheckoutError>,
    },
    View {
        respond_to: ServiceResponse<CheckoutView, CheckoutError>,
    },
    Shutdown,

    // --- continuations ---
    Completed {
        outcome: Result<CheckoutResult, ApiError>,
        respond_to: ServiceResponse<CheckoutResult, CheckoutError>,
    },
}

/// Which account mutation a continuation belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    ChangeRole { user_id: String, role: Role },
    Deactivate { request: DeactivationRequest },
    Reactivate { user_id: String },
    Delete { user_id: String },
}

#[derive(Debug)]
pub enum AdminRequest {
    Load {
        respond_to: ServiceResponse<(), AdminError>,
    },
    RetryStatus {
        respond_to: ServiceResponse<(), AdminError>,
    },
    RefreshUsers {
        respond_to: ServiceResponse<(), AdminError>,
    },
    ChangeRole {
        user_id: String,
        role: Role,
        respond_to: ServiceResponse<(), AdminError>,
    },
    BeginDeactivation {
        user_id: String,
        respond_to: ServiceResponse<(), AdminError>,
    },
    SetDeactivationReason {
        reason: String,
        respond_to: ServiceResponse<(), AdminError>,
    },
    ConfirmDeactivation {
        respond_to: ServiceResponse<(), AdminError>,
    },
    Reactivate {
        user_id: String,
        respond_to: ServiceResponse<(), AdminError>,
    },
    BeginDelete {
        user_id: String,
        respond_to: ServiceResponse<(), AdminError>,
    },
    ConfirmDelete {
        respond_to: ServiceResponse<(), AdminError>,
    },
    DismissDialog {
        respond_to: ServiceResponse<(), AdminError>,
    },
    SetShowDeactivated {
        show: bool,
        respond_to: ServiceResponse<(), AdminError>,
    },
    View {
        respond_to: ServiceResponse<DashboardView, AdminError>,
    },
    Logout {
        respond_to: ServiceResponse<(), AdminError>,
    },
    Shutdown,

    // --- continuations ---
    StatusFetched {
        outcome: Result<StatusReport, ApiError>,
    },
    UsersFetched {
        seq: u64,
        outcome: Result<Vec<User>, ApiError>,
    },
    MutationFinished {
        mutation: Mutation,
        outcome: Result<MutationResult, ApiError>,
        respond_to: ServiceResponse<(), AdminError>,
    },
}
