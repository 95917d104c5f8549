//! Local session persistence and the shared session provider.

pub mod store;
pub mod watch;

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch as watch_channel;
use tracing::{info, instrument, warn};

use crate::domain::{Session, SessionState};

pub use store::{FileSessionStore, MockSessionStore, SessionStore};
pub use watch::spawn_login_redirect;

/// Errors that can occur while reading or writing the local session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session record is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Owns the session store and broadcasts every change in [`SessionState`].
#[derive(Clone)]
pub struct SessionProvider {
    store: Arc<dyn SessionStore>,
    state: Arc<watch_channel::Sender<SessionState>>,
}

impl SessionProvider {
    /// Starts in [`SessionState::Resolving`]; call [`SessionProvider::resolve`] to load.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch_channel::channel(SessionState::Resolving);
        Self {
            store,
            state: Arc::new(state),
        }
    }

    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch_channel::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Read local storage and settle on signed-in or signed-out.
    ///
    /// A malformed record counts as signed out.
    #[instrument(skip(self))]
    pub async fn resolve(&self) -> SessionState {
        let state = match self.store.load().await {
            Ok(Some(session)) => SessionState::SignedIn(session),
            Ok(None) => SessionState::SignedOut,
            Err(e) => {
                warn!(error = %e, "Could not read stored session");
                SessionState::SignedOut
            }
        };
        info!(signed_in = state.session().is_some(), "Session resolved");
        self.state.send_replace(state.clone());
        state
    }

    #[instrument(skip(self, session), fields(user_id = %session.user_id, role = %session.role))]
    pub async fn sign_in(&self, session: Session) -> Result<(), SessionError> {
        self.store.save(&session).await?;
        self.state.send_replace(SessionState::SignedIn(session));
        info!("Signed in");
        Ok(())
    }

    /// Remove every stored key and broadcast the signed-out state.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.store.clear().await?;
        self.state.send_replace(SessionState::SignedOut);
        info!("Signed out");
        Ok(())
    }
}
