use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::config::Config;
use crate::actor_framework::ResourceActor;
use crate::admin_actor::{AdminDashboardService, AdminDeps, DashboardCapabilities};
use crate::api::{HttpShopApi, ShopApi};
use crate::checkout_actor::{CheckoutDeps, CheckoutService};
use crate::clients::{AdminClient, CartClient, CheckoutClient};
use crate::domain::CartItem;
use crate::session::{FileSessionStore, SessionProvider, SessionStore};
use crate::ui::{ConsoleNotifier, LoggingNavigator, Navigator, Notifier};

const QUEUE_SIZE: usize = 32;

/// External collaborators the services are wired to.
pub struct Collaborators {
    pub api: Arc<dyn ShopApi>,
    pub store: Arc<dyn SessionStore>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub capabilities: DashboardCapabilities,
}

impl Collaborators {
    /// HTTP backend, file session store, log-only router and console alerts.
    pub fn from_config(config: &Config) -> Result<Self, String> {
        let api = HttpShopApi::new(config.api_url()?, config.users_path);
        Ok(Self {
            api: Arc::new(api),
            store: Arc::new(FileSessionStore::new(&config.session_file)),
            navigator: Arc::new(LoggingNavigator),
            notifier: Arc::new(ConsoleNotifier),
            capabilities: DashboardCapabilities::default(),
        })
    }
}

/// The main application system that orchestrates all services.
///
/// Starts the cart actor and the two screen services, shares one session provider
/// between them, and stops everything on shutdown.
pub struct ShopSystem {
    pub cart_client: CartClient,
    pub checkout_client: CheckoutClient,
    pub admin_client: AdminClient,
    pub session: SessionProvider,
    handles: Vec<JoinHandle<()>>,
}

impl ShopSystem {
    pub fn new(collaborators: Collaborators) -> Self {
        let Collaborators {
            api,
            store,
            navigator,
            notifier,
            capabilities,
        } = collaborators;

        let session = SessionProvider::new(store);

        // 1. Cart
        let line_counter = Arc::new(AtomicU64::new(1));
        let next_line_id = move || {
            let id = line_counter.fetch_add(1, Ordering::SeqCst);
            format!("line_{}", id)
        };
        let (cart_actor, cart_resource_client) = ResourceActor::<CartItem>::new(QUEUE_SIZE, next_line_id);
        let cart_client = CartClient::new(cart_resource_client);
        let cart_handle = tokio::spawn(cart_actor.run());

        // 2. Checkout
        let (checkout_service, checkout_client) = CheckoutService::new(
            QUEUE_SIZE,
            CheckoutDeps {
                api: api.clone(),
                cart: cart_client.clone(),
                session: session.clone(),
                navigator: navigator.clone(),
                notifier: notifier.clone(),
            },
        );
        let checkout_handle = tokio::spawn(checkout_service.run());

        // 3. Admin dashboard
        let (admin_service, admin_client) = AdminDashboardService::new(
            QUEUE_SIZE,
            AdminDeps {
                api,
                session: session.clone(),
                navigator,
                notifier,
            },
            capabilities,
        );
        let admin_handle = tokio::spawn(admin_service.run());

        Self {
            cart_client,
            checkout_client,
            admin_client,
            session,
            handles: vec![cart_handle, checkout_handle, admin_handle],
        }
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        if let Err(e) = self.checkout_client.shutdown().await {
            debug!(error = %e, "Checkout service already stopped");
        }
        if let Err(e) = self.admin_client.shutdown().await {
            debug!(error = %e, "Admin service already stopped");
        }
        // The cart actor stops once every sender is gone.
        drop(self.cart_client);
        drop(self.checkout_client);
        drop(self.admin_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Service task failed: {:?}", e);
                return Err(format!("Service task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
