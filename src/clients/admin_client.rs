use tokio::sync::mpsc;

use crate::admin_actor::{AdminError, DashboardView};
use crate::domain::Role;
use crate::messages::AdminRequest;

/// Client for the admin dashboard service.
#[derive(Clone)]
pub struct AdminClient {
    sender: mpsc::Sender<AdminRequest>,
}

impl_service_client!(AdminClient, AdminRequest);

client_method!(
    /// Check access, then fetch backend status and the roster.
    AdminClient => fn load() -> () as AdminRequest::Load, Error = AdminError
);
client_method!(AdminClient => fn retry_status() -> () as AdminRequest::RetryStatus, Error = AdminError);
client_method!(AdminClient => fn refresh_users() -> () as AdminRequest::RefreshUsers, Error = AdminError);
client_method!(AdminClient => fn change_role(user_id: String, role: Role) -> () as AdminRequest::ChangeRole, Error = AdminError);
client_method!(
    /// Open the deactivation confirmation for an active user.
    AdminClient => fn begin_deactivation(user_id: String) -> () as AdminRequest::BeginDeactivation, Error = AdminError
);
client_method!(AdminClient => fn set_deactivation_reason(reason: String) -> () as AdminRequest::SetDeactivationReason, Error = AdminError);
client_method!(AdminClient => fn confirm_deactivation() -> () as AdminRequest::ConfirmDeactivation, Error = AdminError);
client_method!(AdminClient => fn reactivate(user_id: String) -> () as AdminRequest::Reactivate, Error = AdminError);
client_method!(AdminClient => fn begin_delete(user_id: String) -> () as AdminRequest::BeginDelete, Error = AdminError);
client_method!(AdminClient => fn confirm_delete() -> () as AdminRequest::ConfirmDelete, Error = AdminError);
client_method!(AdminClient => fn dismiss_dialog() -> () as AdminRequest::DismissDialog, Error = AdminError);
client_method!(AdminClient => fn set_show_deactivated(show: bool) -> () as AdminRequest::SetShowDeactivated, Error = AdminError);
client_method!(AdminClient => fn view() -> DashboardView as AdminRequest::View, Error = AdminError);
client_method!(AdminClient => fn logout() -> () as AdminRequest::Logout, Error = AdminError);
