use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use super::error::{CheckoutError, GENERIC_CHECKOUT_FAILURE};
use crate::actor_framework::spawn_continuation;
use crate::api::{ApiError, ShopApi};
use crate::clients::{CartClient, CheckoutClient};
use crate::domain::{CheckoutResult, OrderPayload, PaymentMethod, SessionState};
use crate::messages::{CheckoutRequest, ServiceResponse};
use crate::session::watch::WatchGuard;
use crate::session::{spawn_login_redirect, SessionProvider};
use crate::ui::{Alert, Navigator, Notifier, Screen};

/// Shortest phone number the form accepts.
pub const MIN_PHONE_LEN: usize = 10;

/// Delivery details as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutForm {
    pub address: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
}

/// What the checkout screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutView {
    pub form: CheckoutForm,
    pub busy: bool,
    /// Session resolution has not finished yet.
    pub loading_user: bool,
}

impl CheckoutView {
    pub fn button_label(&self) -> &'static str {
        if self.busy || self.loading_user {
            "Processing..."
        } else {
            "Continue"
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.busy && !self.loading_user
    }
}

/// Collaborators the checkout screen needs.
#[derive(Clone)]
pub struct CheckoutDeps {
    pub api: Arc<dyn ShopApi>,
    pub cart: CartClient,
    pub session: SessionProvider,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

/// Owns the checkout form and the busy flag; submits orders one at a time.
pub struct CheckoutService {
    receiver: mpsc::Receiver<CheckoutRequest>,
    sender: mpsc::WeakSender<CheckoutRequest>,
    deps: CheckoutDeps,
    form: CheckoutForm,
    busy: bool,
}

impl CheckoutService {
    pub fn new(buffer_size: usize, deps: CheckoutDeps) -> (Self, CheckoutClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            sender: sender.downgrade(),
            deps,
            form: CheckoutForm::default(),
            busy: false,
        };
        (service, CheckoutClient::new(sender))
    }

    #[instrument(name = "checkout_service", skip(self))]
    pub async fn run(mut self) {
        info!("CheckoutService starting");
        let _redirect = WatchGuard(spawn_login_redirect(
            self.deps.session.subscribe(),
            self.deps.navigator.clone(),
        ));

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CheckoutRequest::SetAddress { address, respond_to } => {
                    self.form.address = address;
                    let _ = respond_to.send(Ok(()));
                }
                CheckoutRequest::SetPhone { phone, respond_to } => {
                    self.form.phone = phone;
                    let _ = respond_to.send(Ok(()));
                }
                CheckoutRequest::SetPaymentMethod { method, respond_to } => {
                    self.form.payment_method = method;
                    let _ = respond_to.send(Ok(()));
                }
                CheckoutRequest::Submit { respond_to } => {
                    self.handle_submit(respond_to).await;
                }
                CheckoutRequest::View { respond_to } => {
                    let _ = respond_to.send(Ok(self.view()));
                }
                CheckoutRequest::Completed { outcome, respond_to } => {
                    self.handle_completed(outcome, respond_to).await;
                }
                CheckoutRequest::Shutdown => {
                    info!("CheckoutService shutting down");
                    break;
                }
            }
        }

        info!("CheckoutService stopped");
    }

    fn view(&self) -> CheckoutView {
        CheckoutView {
            form: self.form.clone(),
            busy: self.busy,
            loading_user: !self.deps.session.current().is_resolved(),
        }
    }

    /// Checks run in a fixed order and the first failure wins; the network is only touched
    /// once all of them pass.
    async fn prepare_order(&self) -> Result<OrderPayload, CheckoutError> {
        let CheckoutForm {
            address,
            phone,
            payment_method,
        } = &self.form;

        if address.trim().is_empty() || phone.trim().is_empty() {
            return Err(CheckoutError::MissingInformation);
        }
        if phone.chars().count() < MIN_PHONE_LEN {
            return Err(CheckoutError::InvalidPhone);
        }

        let email = match self.deps.session.current() {
            SessionState::SignedIn(session) => session.email.filter(|email| !email.trim().is_empty()),
            SessionState::Resolving | SessionState::SignedOut => None,
        }
        .ok_or(CheckoutError::LoginRequired)?;

        let items = self.deps.cart.items().await?;
        if items.is_empty() {
            return Err(CheckoutError::CartEmpty);
        }

        Ok(OrderPayload::from_cart(
            email,
            &items,
            address.clone(),
            phone.clone(),
            *payment_method,
        ))
    }

    #[instrument(skip(self, respond_to), fields(payment_method = %self.form.payment_method))]
    async fn handle_submit(&mut self, respond_to: ServiceResponse<CheckoutResult, CheckoutError>) {
        if self.busy {
            debug!("Submission already in flight");
            let _ = respond_to.send(Err(CheckoutError::Busy));
            return;
        }

        let order = match self.prepare_order().await {
            Ok(order) => order,
            Err(e) => {
                warn!(error = %e, "Checkout rejected before submission");
                self.notify(e.alert());
                let _ = respond_to.send(Err(e));
                return;
            }
        };

        info!(items = order.items.len(), total = order.total, "Submitting order");
        self.busy = true;

        let api = self.deps.api.clone();
        spawn_continuation(
            self.sender.clone(),
            async move { api.checkout(order).await },
            ApiError::Task,
            |outcome| CheckoutRequest::Completed { outcome, respond_to },
        );
    }

    #[instrument(skip_all)]
    async fn handle_completed(
        &mut self,
        outcome: Result<CheckoutResult, ApiError>,
        respond_to: ServiceResponse<CheckoutResult, CheckoutError>,
    ) {
        self.busy = false;

        let result = match outcome {
            Ok(result) if result.success => {
                self.finish_order().await;
                Ok(result)
            }
            Ok(result) => {
                let message = result
                    .error
                    .or(result.message)
                    .unwrap_or_else(|| GENERIC_CHECKOUT_FAILURE.to_string());
                error!(%message, "Checkout refused by backend");
                Err(CheckoutError::Rejected(message))
            }
            Err(e) => {
                error!(error = %e, "Checkout request failed");
                let message = e.backend_message().unwrap_or(GENERIC_CHECKOUT_FAILURE);
                Err(CheckoutError::Rejected(message.to_string()))
            }
        };

        if let Err(e) = &result {
            self.notify(e.alert());
        }
        let _ = respond_to.send(result);
    }

    /// Empty the cart first so backing out of the confirmation screen never shows a stale cart.
    async fn finish_order(&self) {
        info!("Order confirmed");
        if let Err(e) = self.deps.cart.clear().await {
            error!(error = %e, "Failed to clear cart after checkout");
        }
        self.deps.notifier.alert(Alert::new(
            "Order Confirmed",
            "A confirmation email has been sent.",
        ));
        self.deps.navigator.navigate(Screen::Confirmation);
    }

    fn notify(&self, alert: Option<Alert>) {
        if let Some(alert) = alert {
            self.deps.notifier.alert(alert);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::ResourceActor;
    use crate::api::MockShopApi;
    use crate::domain::{CartItem, Role, Session};
    use crate::session::MockSessionStore;
    use crate::ui::{MockNavigator, MockNotifier};
    use mockall::Sequence;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn buyer() -> Session {
        Session {
            token: "jwt".to_string(),
            role: Role::User,
            user_id: "u1".to_string(),
            name: "Ana".to_string(),
            email: Some("ana@example.com".to_string()),
        }
    }

    fn start_cart() -> CartClient {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("line_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = ResourceActor::<CartItem>::new(16, next_id);
        tokio::spawn(actor.run());
        CartClient::new(client)
    }

    async fn session_with(stored: Option<Session>) -> SessionProvider {
        let mut store = MockSessionStore::new();
        store.expect_load().returning(move || Ok(stored.clone()));
        let provider = SessionProvider::new(Arc::new(store));
        provider.resolve().await;
        provider
    }

    fn quiet_navigator() -> MockNavigator {
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().never();
        navigator
    }

    fn expect_alert(notifier: &mut MockNotifier, title: &'static str) {
        notifier
            .expect_alert()
            .withf(move |alert| alert.title == title)
            .times(1)
            .return_const(());
    }

    async fn start(
        api: MockShopApi,
        cart: CartClient,
        session: SessionProvider,
        navigator: MockNavigator,
        notifier: MockNotifier,
    ) -> CheckoutClient {
        let deps = CheckoutDeps {
            api: Arc::new(api),
            cart,
            session,
            navigator: Arc::new(navigator),
            notifier: Arc::new(notifier),
        };
        let (service, client) = CheckoutService::new(16, deps);
        tokio::spawn(service.run());
        client
    }

    async fn fill(client: &CheckoutClient, address: &str, phone: &str) {
        client.set_address(address.to_string()).await.unwrap();
        client.set_phone(phone.to_string()).await.unwrap();
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_first() {
        let mut api = MockShopApi::new();
        api.expect_checkout().never();
        let mut notifier = MockNotifier::new();
        expect_alert(&mut notifier, "Missing Information");

        // No session and no cart either: the missing-field check still wins.
        let client = start(api, start_cart(), session_with(None).await, MockNavigator::new().tap_login(), notifier).await;
        fill(&client, "   ", "09171234567").await;

        assert_eq!(client.submit().await, Err(CheckoutError::MissingInformation));
    }

    #[tokio::test]
    async fn short_phone_never_reaches_the_network() {
        let mut api = MockShopApi::new();
        api.expect_checkout().never();
        let mut notifier = MockNotifier::new();
        notifier
            .expect_alert()
            .withf(|alert| alert.title == "Invalid Phone Number")
            .times(3)
            .return_const(());

        let cart = start_cart();
        cart.add_item("D24".into(), 50.0, 1).await.unwrap();
        let client = start(api, cart, session_with(Some(buyer())).await, quiet_navigator(), notifier).await;

        for phone in ["1", "091712", "091712345"] {
            fill(&client, "12 Jalan Durian", phone).await;
            assert_eq!(client.submit().await, Err(CheckoutError::InvalidPhone));
        }
    }

    #[tokio::test]
    async fn user_without_email_must_log_in() {
        let mut api = MockShopApi::new();
        api.expect_checkout().never();
        let mut notifier = MockNotifier::new();
        expect_alert(&mut notifier, "Login Required");

        let no_email = Session {
            email: None,
            ..buyer()
        };
        let client = start(api, start_cart(), session_with(Some(no_email)).await, quiet_navigator(), notifier).await;
        fill(&client, "12 Jalan Durian", "09171234567").await;

        assert_eq!(client.submit().await, Err(CheckoutError::LoginRequired));
    }

    #[tokio::test]
    async fn empty_cart_is_rejected() {
        let mut api = MockShopApi::new();
        api.expect_checkout().never();
        let mut notifier = MockNotifier::new();
        expect_alert(&mut notifier, "Cart Empty");

        let client = start(api, start_cart(), session_with(Some(buyer())).await, quiet_navigator(), notifier).await;
        fill(&client, "12 Jalan Durian", "09171234567").await;

        assert_eq!(client.submit().await, Err(CheckoutError::CartEmpty));
    }

    #[tokio::test]
    async fn success_clears_cart_then_alerts_then_navigates() {
        let mut api = MockShopApi::new();
        api.expect_checkout()
            .once()
            .withf(|order| {
                order.total == 250.0
                    && order.email == "ana@example.com"
                    && order.payment_method == PaymentMethod::Card
                    && order.items.len() == 2
            })
            .returning(|_| Ok(CheckoutResult::succeeded()));

        let mut seq = Sequence::new();
        let mut notifier = MockNotifier::new();
        notifier
            .expect_alert()
            .withf(|alert| alert.title == "Order Confirmed")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .withf(|screen| *screen == Screen::Confirmation)
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let cart = start_cart();
        cart.add_item("Musang King".into(), 100.0, 2).await.unwrap();
        cart.add_item("D24".into(), 50.0, 1).await.unwrap();

        let client = start(api, cart.clone(), session_with(Some(buyer())).await, navigator, notifier).await;
        fill(&client, "12 Jalan Durian", "09171234567").await;
        client.set_payment_method(PaymentMethod::Card).await.unwrap();

        let result = client.submit().await.unwrap();
        assert!(result.success);
        assert!(cart.items().await.unwrap().is_empty());
        assert!(!client.view().await.unwrap().busy);
    }

    #[tokio::test]
    async fn backend_refusal_keeps_cart_and_shows_message() {
        let mut api = MockShopApi::new();
        api.expect_checkout()
            .once()
            .returning(|_| Ok(CheckoutResult::failed("Out of stock")));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_alert()
            .withf(|alert| *alert == Alert::new("Error", "Out of stock"))
            .times(1)
            .return_const(());

        let cart = start_cart();
        cart.add_item("D24".into(), 50.0, 3).await.unwrap();
        let client = start(api, cart.clone(), session_with(Some(buyer())).await, quiet_navigator(), notifier).await;
        fill(&client, "12 Jalan Durian", "09171234567").await;

        assert_eq!(
            client.submit().await,
            Err(CheckoutError::Rejected("Out of stock".to_string()))
        );
        let items = cart.items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
        assert!(!client.view().await.unwrap().busy);
    }

    #[tokio::test]
    async fn http_failure_surfaces_error_field_or_generic_message() {
        let mut api = MockShopApi::new();
        let mut calls = 0;
        api.expect_checkout().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(ApiError::Status {
                    status: 400,
                    error: Some("Missing data".to_string()),
                    message: None,
                })
            } else {
                Err(ApiError::Task("connection reset".to_string()))
            }
        });
        let mut seq = Sequence::new();
        let mut notifier = MockNotifier::new();
        notifier
            .expect_alert()
            .withf(|alert| alert.message == "Missing data")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        notifier
            .expect_alert()
            .withf(|alert| alert.message == GENERIC_CHECKOUT_FAILURE)
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let cart = start_cart();
        cart.add_item("D24".into(), 50.0, 1).await.unwrap();
        let client = start(api, cart, session_with(Some(buyer())).await, quiet_navigator(), notifier).await;
        fill(&client, "12 Jalan Durian", "09171234567").await;

        assert_eq!(
            client.submit().await,
            Err(CheckoutError::Rejected("Missing data".to_string()))
        );
        assert_eq!(
            client.submit().await,
            Err(CheckoutError::Rejected(GENERIC_CHECKOUT_FAILURE.to_string()))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn second_submit_while_in_flight_is_refused() {
        let (release, gate) = std::sync::mpsc::channel::<()>();
        let mut api = MockShopApi::new();
        api.expect_checkout().times(1).returning(move |_| {
            let _ = gate.recv_timeout(std::time::Duration::from_secs(5));
            Ok(CheckoutResult::succeeded())
        });
        let mut notifier = MockNotifier::new();
        expect_alert(&mut notifier, "Order Confirmed");
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .withf(|screen| *screen == Screen::Confirmation)
            .times(1)
            .return_const(());

        let cart = start_cart();
        cart.add_item("D24".into(), 50.0, 1).await.unwrap();
        let client = start(api, cart, session_with(Some(buyer())).await, navigator, notifier).await;
        fill(&client, "12 Jalan Durian", "09171234567").await;

        let first = {
            let client = client.clone();
            tokio::spawn(async move { client.submit().await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let view = client.view().await.unwrap();
        assert!(view.busy);
        assert!(!view.can_submit());
        assert_eq!(view.button_label(), "Processing...");
        assert_eq!(client.submit().await, Err(CheckoutError::Busy));

        release.send(()).unwrap();
        assert!(first.await.unwrap().unwrap().success);
        let view = client.view().await.unwrap();
        assert!(!view.busy);
        assert_eq!(view.button_label(), "Continue");
    }

    #[tokio::test]
    async fn signed_out_session_redirects_to_login() {
        let mut api = MockShopApi::new();
        api.expect_checkout().never();
        let navigator = MockNavigator::new().tap_login();

        let client = start(api, start_cart(), session_with(None).await, navigator, MockNotifier::new()).await;
        let view = client.view().await.unwrap();
        assert!(!view.loading_user);
        assert_eq!(view.button_label(), "Continue");

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        client.shutdown().await.unwrap();
    }

    trait TapLogin {
        fn tap_login(self) -> Self;
    }

    impl TapLogin for MockNavigator {
        /// Accept the login redirect a signed-out session triggers.
        fn tap_login(mut self) -> Self {
            self.expect_navigate()
                .withf(|screen| *screen == Screen::Login)
                .return_const(());
            self
        }
    }
}
