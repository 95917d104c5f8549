use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use super::error::AdminError;
use super::view::{BackendStatus, DashboardCapabilities, DashboardView, DialogView, SIDEBAR};
use crate::actor_framework::spawn_continuation;
use crate::api::{ApiError, MutationResult, ShopApi};
use crate::clients::AdminClient;
use crate::domain::{DeactivationRequest, Role, SessionState, StatusReport, User};
use crate::messages::{AdminRequest, Mutation, ServiceResponse, ServiceResult};
use crate::session::SessionProvider;
use crate::ui::{Alert, Navigator, Notifier, Screen};

const FETCH_USERS_FAILED: &str = "Failed to fetch users.";
const FETCH_STATUS_FAILED: &str = "Failed to fetch backend status.";

/// Collaborators the dashboard needs.
#[derive(Clone)]
pub struct AdminDeps {
    pub api: Arc<dyn ShopApi>,
    pub session: SessionProvider,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

impl Mutation {
    fn action(&self) -> &'static str {
        match self {
            Self::ChangeRole { .. } => "update role",
            Self::Deactivate { .. } => "deactivate user",
            Self::Reactivate { .. } => "reactivate user",
            Self::Delete { .. } => "delete user",
        }
    }

    fn user_id(&self) -> &str {
        match self {
            Self::ChangeRole { user_id, .. }
            | Self::Reactivate { user_id }
            | Self::Delete { user_id } => user_id,
            Self::Deactivate { request } => request.user_id(),
        }
    }

    fn success_text(&self) -> String {
        match self {
            Self::ChangeRole { role, .. } => format!("User is now {}.", role.with_article()),
            Self::Deactivate { .. } => {
                "User deactivated. A notification email will be sent.".to_string()
            }
            Self::Reactivate { .. } => "User reactivated.".to_string(),
            Self::Delete { .. } => "User deleted.".to_string(),
        }
    }

    fn failure_text(&self) -> &'static str {
        match self {
            Self::ChangeRole { .. } => "Failed to update role.",
            Self::Deactivate { .. } => "Failed to deactivate user.",
            Self::Reactivate { .. } => "Failed to reactivate user.",
            Self::Delete { .. } => "Failed to delete user.",
        }
    }

    /// A role change re-reads the roster even when it fails, so the picker snaps back.
    fn refetch_after(&self, succeeded: bool) -> bool {
        succeeded || matches!(self, Self::ChangeRole { .. })
    }
}

#[derive(Debug)]
enum Dialog {
    Deactivate { user_id: String, reason: String },
    Delete { user_id: String },
}

/// A caller waiting on a roster fetch. `outcome` is preset when the fetch only follows up
/// on a mutation whose result is already known.
#[derive(Debug)]
struct RosterWaiter {
    seq: u64,
    outcome: Option<ServiceResult<(), AdminError>>,
    respond_to: ServiceResponse<(), AdminError>,
}

/// Owns the roster cache and all dashboard state. Remote calls run in the background
/// and report back as continuation messages, so the dashboard stays responsive.
pub struct AdminDashboardService {
    receiver: mpsc::Receiver<AdminRequest>,
    sender: mpsc::WeakSender<AdminRequest>,
    deps: AdminDeps,
    capabilities: DashboardCapabilities,

    backend: BackendStatus,
    status_in_flight: bool,
    status_waiters: Vec<ServiceResponse<(), AdminError>>,

    roster: Vec<User>,
    roster_error: Option<String>,
    /// Sequence number of the newest fetch issued.
    issued_seq: u64,
    /// Sequence number of the fetch whose result is on screen.
    applied_seq: u64,
    fetches_in_flight: usize,
    roster_waiters: Vec<RosterWaiter>,

    show_deactivated: bool,
    dialog: Option<Dialog>,
    busy: bool,
}

impl AdminDashboardService {
    pub fn new(
        buffer_size: usize,
        deps: AdminDeps,
        capabilities: DashboardCapabilities,
    ) -> (Self, AdminClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            sender: sender.downgrade(),
            deps,
            capabilities,
            backend: BackendStatus::Unknown,
            status_in_flight: false,
            status_waiters: Vec::new(),
            roster: Vec::new(),
            roster_error: None,
            issued_seq: 0,
            applied_seq: 0,
            fetches_in_flight: 0,
            roster_waiters: Vec::new(),
            show_deactivated: true,
            dialog: None,
            busy: false,
        };
        (service, AdminClient::new(sender))
    }

    #[instrument(name = "admin_service", skip(self))]
    pub async fn run(mut self) {
        info!("AdminDashboardService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                AdminRequest::Load { respond_to } => self.handle_load(respond_to),
                AdminRequest::RetryStatus { respond_to } => {
                    match self.authorize() {
                        Ok(()) => self.fetch_status(Some(respond_to)),
                        Err(e) => {
                            let _ = respond_to.send(Err(e));
                        }
                    }
                }
                AdminRequest::RefreshUsers { respond_to } => {
                    match self.authorize().and_then(|()| self.user_management()) {
                        Ok(()) => self.fetch_users(None, respond_to, false),
                        Err(e) => {
                            let _ = respond_to.send(Err(e));
                        }
                    }
                }
                AdminRequest::ChangeRole {
                    user_id,
                    role,
                    respond_to,
                } => self.handle_change_role(user_id, role, respond_to),
                AdminRequest::BeginDeactivation {
                    user_id,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.begin_deactivation(user_id));
                }
                AdminRequest::SetDeactivationReason { reason, respond_to } => {
                    let _ = respond_to.send(self.set_reason(reason));
                }
                AdminRequest::ConfirmDeactivation { respond_to } => {
                    self.handle_confirm_deactivation(respond_to)
                }
                AdminRequest::Reactivate {
                    user_id,
                    respond_to,
                } => self.handle_reactivate(user_id, respond_to),
                AdminRequest::BeginDelete {
                    user_id,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.begin_delete(user_id));
                }
                AdminRequest::ConfirmDelete { respond_to } => self.handle_confirm_delete(respond_to),
                AdminRequest::DismissDialog { respond_to } => {
                    let result = if self.busy {
                        Err(AdminError::Busy)
                    } else {
                        self.dialog = None;
                        Ok(())
                    };
                    let _ = respond_to.send(result);
                }
                AdminRequest::SetShowDeactivated { show, respond_to } => {
                    debug!(show, "Toggling deactivated users");
                    self.show_deactivated = show;
                    let _ = respond_to.send(Ok(()));
                }
                AdminRequest::View { respond_to } => {
                    let _ = respond_to.send(Ok(self.view()));
                }
                AdminRequest::Logout { respond_to } => self.handle_logout(respond_to).await,
                AdminRequest::Shutdown => {
                    info!("AdminDashboardService shutting down");
                    break;
                }

                AdminRequest::StatusFetched { outcome } => self.handle_status_fetched(outcome),
                AdminRequest::UsersFetched { seq, outcome } => {
                    self.handle_users_fetched(seq, outcome)
                }
                AdminRequest::MutationFinished {
                    mutation,
                    outcome,
                    respond_to,
                } => self.handle_mutation_finished(mutation, outcome, respond_to),
            }
        }

        info!("AdminDashboardService stopped");
    }

    // --- access ---

    /// Only a resolved administrator session gets past this. Anyone else is sent away
    /// before any data is fetched.
    fn authorize(&self) -> Result<(), AdminError> {
        match self.deps.session.current() {
            SessionState::SignedIn(session) if session.is_admin() => Ok(()),
            SessionState::SignedIn(session) => {
                warn!(user_id = %session.user_id, "Non-admin on the dashboard, redirecting home");
                self.deps.navigator.replace(Screen::Home);
                Err(AdminError::AccessDenied)
            }
            SessionState::Resolving | SessionState::SignedOut => {
                warn!("No admin session, redirecting to login");
                self.deps.navigator.replace(Screen::Login);
                Err(AdminError::AccessDenied)
            }
        }
    }

    fn user_management(&self) -> Result<(), AdminError> {
        if self.capabilities.user_management {
            Ok(())
        } else {
            Err(AdminError::UserManagementDisabled)
        }
    }

    #[instrument(skip_all)]
    fn handle_load(&mut self, respond_to: ServiceResponse<(), AdminError>) {
        if let Err(e) = self.authorize() {
            let _ = respond_to.send(Err(e));
            return;
        }

        if self.capabilities.user_management {
            self.fetch_status(None);
            self.fetch_users(None, respond_to, false);
        } else {
            self.fetch_status(Some(respond_to));
        }
    }

    // --- backend status ---

    fn fetch_status(&mut self, waiter: Option<ServiceResponse<(), AdminError>>) {
        self.status_waiters.extend(waiter);
        if self.status_in_flight {
            debug!("Status probe already in flight");
            return;
        }
        self.status_in_flight = true;

        let api = self.deps.api.clone();
        spawn_continuation(
            self.sender.clone(),
            async move { api.status().await },
            ApiError::Task,
            |outcome| AdminRequest::StatusFetched { outcome },
        );
    }

    #[instrument(skip_all)]
    fn handle_status_fetched(&mut self, outcome: Result<StatusReport, ApiError>) {
        self.status_in_flight = false;

        let result = match outcome {
            Ok(report) => {
                info!(message = %report.message, "Backend online");
                self.backend = BackendStatus::Online(report.message);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Backend status probe failed");
                self.backend = BackendStatus::Offline(FETCH_STATUS_FAILED.to_string());
                self.alert_error(FETCH_STATUS_FAILED);
                Err(AdminError::Failed {
                    action: "fetch backend status",
                    message: e.to_string(),
                })
            }
        };

        for waiter in self.status_waiters.drain(..) {
            let _ = waiter.send(result.clone());
        }
    }

    // --- roster ---

    /// Issue a roster fetch, or join the one in flight when `force` is false.
    ///
    /// Every fetch gets a sequence number; waiters are answered by the first completed fetch
    /// at or after their own.
    fn fetch_users(
        &mut self,
        outcome: Option<ServiceResult<(), AdminError>>,
        respond_to: ServiceResponse<(), AdminError>,
        force: bool,
    ) {
        if !force && self.fetches_in_flight > 0 {
            debug!(seq = self.issued_seq, "Joining roster fetch in flight");
            self.roster_waiters.push(RosterWaiter {
                seq: self.issued_seq,
                outcome,
                respond_to,
            });
            return;
        }

        self.issued_seq += 1;
        let seq = self.issued_seq;
        self.fetches_in_flight += 1;
        self.roster_waiters.push(RosterWaiter {
            seq,
            outcome,
            respond_to,
        });
        debug!(seq, "Fetching roster");

        let api = self.deps.api.clone();
        spawn_continuation(
            self.sender.clone(),
            async move { api.list_users().await },
            ApiError::Task,
            move |outcome| AdminRequest::UsersFetched { seq, outcome },
        );
    }

    #[instrument(skip(self, outcome))]
    fn handle_users_fetched(&mut self, seq: u64, outcome: Result<Vec<User>, ApiError>) {
        self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);

        let result = if seq < self.applied_seq {
            // A newer roster is already on screen, whatever this one says.
            debug!(applied = self.applied_seq, failed = outcome.is_err(), "Discarding stale roster");
            Ok(())
        } else {
            self.apply_roster(seq, outcome)
        };

        let (ready, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.roster_waiters)
            .into_iter()
            .partition(|waiter| waiter.seq <= seq);
        self.roster_waiters = pending;
        for waiter in ready {
            let _ = waiter
                .respond_to
                .send(waiter.outcome.unwrap_or_else(|| result.clone()));
        }
    }

    fn apply_roster(
        &mut self,
        seq: u64,
        outcome: Result<Vec<User>, ApiError>,
    ) -> ServiceResult<(), AdminError> {
        match outcome {
            Ok(users) => {
                info!(count = users.len(), "Roster loaded");
                self.roster = users;
                self.roster_error = None;
                self.applied_seq = seq;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch users");
                self.roster_error = Some(FETCH_USERS_FAILED.to_string());
                self.alert_error(FETCH_USERS_FAILED);
                Err(AdminError::Failed {
                    action: "fetch users",
                    message: e.to_string(),
                })
            }
        }
    }

    fn find_user(&self, user_id: &str) -> Result<&User, AdminError> {
        self.roster
            .iter()
            .find(|user| user.id == user_id)
            .ok_or_else(|| AdminError::UnknownUser(user_id.to_string()))
    }

    /// Shared preconditions for every account change.
    fn ready_for_change(&self) -> Result<(), AdminError> {
        self.user_management()?;
        if self.busy {
            return Err(AdminError::Busy);
        }
        self.authorize()
    }

    // --- mutations ---

    #[instrument(skip(self, respond_to))]
    fn handle_change_role(
        &mut self,
        user_id: String,
        role: Role,
        respond_to: ServiceResponse<(), AdminError>,
    ) {
        let checked = self.ready_for_change().and_then(|()| {
            let user = self.find_user(&user_id)?;
            if !user.is_active {
                return Err(AdminError::InvalidTransition {
                    user_id: user_id.clone(),
                    action: "change the role of deactivated",
                });
            }
            Ok(user.role == role)
        });

        match checked {
            Ok(true) => {
                debug!("Role unchanged, nothing to send");
                let _ = respond_to.send(Ok(()));
            }
            Ok(false) => self.start_mutation(Mutation::ChangeRole { user_id, role }, respond_to),
            Err(e) => {
                let _ = respond_to.send(Err(e));
            }
        }
    }

    fn begin_deactivation(&mut self, user_id: String) -> Result<(), AdminError> {
        self.ready_for_change()?;
        let user = self.find_user(&user_id)?;
        if !user.is_active {
            return Err(AdminError::InvalidTransition {
                user_id,
                action: "deactivate already deactivated",
            });
        }
        self.dialog = Some(Dialog::Deactivate {
            user_id,
            reason: String::new(),
        });
        Ok(())
    }

    fn set_reason(&mut self, reason: String) -> Result<(), AdminError> {
        match &mut self.dialog {
            Some(Dialog::Deactivate { reason: current, .. }) => {
                *current = reason;
                Ok(())
            }
            _ => Err(AdminError::NoPendingConfirmation),
        }
    }

    #[instrument(skip_all)]
    fn handle_confirm_deactivation(&mut self, respond_to: ServiceResponse<(), AdminError>) {
        let request = match &self.dialog {
            Some(Dialog::Deactivate { user_id, reason }) => {
                DeactivationRequest::new(user_id.clone(), reason.clone())
            }
            _ => {
                let _ = respond_to.send(Err(AdminError::NoPendingConfirmation));
                return;
            }
        };

        let result = self.ready_for_change().and_then(|()| {
            request.ok_or_else(|| {
                warn!("Deactivation confirmed without a reason");
                self.deps.notifier.alert(Alert::new(
                    "Reason Required",
                    "Please provide a reason for deactivation.",
                ));
                AdminError::EmptyReason
            })
        });

        match result {
            Ok(request) => self.start_mutation(Mutation::Deactivate { request }, respond_to),
            Err(e) => {
                let _ = respond_to.send(Err(e));
            }
        }
    }

    #[instrument(skip(self, respond_to))]
    fn handle_reactivate(&mut self, user_id: String, respond_to: ServiceResponse<(), AdminError>) {
        let checked = self.ready_for_change().and_then(|()| {
            if self.find_user(&user_id)?.is_active {
                return Err(AdminError::InvalidTransition {
                    user_id: user_id.clone(),
                    action: "reactivate active",
                });
            }
            Ok(())
        });

        match checked {
            Ok(()) => self.start_mutation(Mutation::Reactivate { user_id }, respond_to),
            Err(e) => {
                let _ = respond_to.send(Err(e));
            }
        }
    }

    fn begin_delete(&mut self, user_id: String) -> Result<(), AdminError> {
        self.ready_for_change()?;
        self.find_user(&user_id)?;
        self.dialog = Some(Dialog::Delete { user_id });
        Ok(())
    }

    #[instrument(skip_all)]
    fn handle_confirm_delete(&mut self, respond_to: ServiceResponse<(), AdminError>) {
        let user_id = match &self.dialog {
            Some(Dialog::Delete { user_id }) => user_id.clone(),
            _ => {
                let _ = respond_to.send(Err(AdminError::NoPendingConfirmation));
                return;
            }
        };

        match self.ready_for_change() {
            Ok(()) => self.start_mutation(Mutation::Delete { user_id }, respond_to),
            Err(e) => {
                let _ = respond_to.send(Err(e));
            }
        }
    }

    fn start_mutation(&mut self, mutation: Mutation, respond_to: ServiceResponse<(), AdminError>) {
        info!(action = mutation.action(), user_id = mutation.user_id(), "Sending account change");
        self.busy = true;

        let api = self.deps.api.clone();
        let call = mutation.clone();
        spawn_continuation(
            self.sender.clone(),
            async move {
                match call {
                    Mutation::ChangeRole { user_id, role } => api.update_role(user_id, role).await,
                    Mutation::Deactivate { request } => {
                        api.deactivate_user(request.user_id().to_string(), request.reason().to_string())
                            .await
                    }
                    Mutation::Reactivate { user_id } => api.activate_user(user_id).await,
                    Mutation::Delete { user_id } => api.delete_user(user_id).await,
                }
            },
            ApiError::Task,
            |outcome| AdminRequest::MutationFinished {
                mutation,
                outcome,
                respond_to,
            },
        );
    }

    #[instrument(skip(self, outcome, respond_to), fields(action = mutation.action()))]
    fn handle_mutation_finished(
        &mut self,
        mutation: Mutation,
        outcome: Result<MutationResult, ApiError>,
        respond_to: ServiceResponse<(), AdminError>,
    ) {
        self.busy = false;
        // The confirmation closes whatever happened.
        self.dialog = None;

        let result = match outcome {
            Ok(body) if body.success => {
                info!("Account change applied");
                self.deps
                    .notifier
                    .alert(Alert::new("Success", mutation.success_text()));
                Ok(())
            }
            Ok(body) => {
                let message = body
                    .error
                    .unwrap_or_else(|| mutation.failure_text().to_string());
                warn!(%message, "Account change refused");
                self.alert_error(&message);
                Err(AdminError::Failed {
                    action: mutation.action(),
                    message,
                })
            }
            Err(e) => {
                error!(error = %e, "Account change failed");
                let message = e.backend_message().unwrap_or(mutation.failure_text()).to_string();
                self.alert_error(&message);
                Err(AdminError::Failed {
                    action: mutation.action(),
                    message,
                })
            }
        };

        if mutation.refetch_after(result.is_ok()) {
            self.fetch_users(Some(result), respond_to, true);
        } else {
            let _ = respond_to.send(result);
        }
    }

    // --- session ---

    #[instrument(skip_all)]
    async fn handle_logout(&mut self, respond_to: ServiceResponse<(), AdminError>) {
        let result = match self.deps.session.logout().await {
            Ok(()) => {
                self.roster.clear();
                self.dialog = None;
                self.deps
                    .notifier
                    .alert(Alert::new("Logged Out", "You have been logged out."));
                self.deps.navigator.replace(Screen::Home);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Logout failed");
                self.alert_error("Failed to log out.");
                Err(AdminError::Session(e.to_string()))
            }
        };
        let _ = respond_to.send(result);
    }

    // --- rendering ---

    fn view(&self) -> DashboardView {
        let users = self
            .roster
            .iter()
            .filter(|user| self.show_deactivated || user.is_active)
            .cloned()
            .collect();

        let confirm_enabled = !self.busy;
        let name_of = |user_id: &str| {
            self.roster
                .iter()
                .find(|user| user.id == user_id)
                .map(|user| user.name.clone())
                .unwrap_or_default()
        };
        let dialog = self.dialog.as_ref().map(|dialog| match dialog {
            Dialog::Deactivate { user_id, reason } => DialogView::Deactivate {
                user_id: user_id.clone(),
                user_name: name_of(user_id),
                reason: reason.clone(),
                confirm_enabled,
            },
            Dialog::Delete { user_id } => DialogView::Delete {
                user_id: user_id.clone(),
                user_name: name_of(user_id),
                confirm_enabled,
            },
        });

        DashboardView {
            loading: self.fetches_in_flight > 0,
            backend: self.backend.clone(),
            users,
            total_users: self.roster.len(),
            show_deactivated: self.show_deactivated,
            roster_error: self.roster_error.clone(),
            dialog,
            busy: self.busy,
            capabilities: self.capabilities,
            sidebar: if self.capabilities.sidebar {
                SIDEBAR.to_vec()
            } else {
                Vec::new()
            },
        }
    }

    fn alert_error(&self, message: &str) {
        self.deps.notifier.alert(Alert::new("Error", message));
    }
}
