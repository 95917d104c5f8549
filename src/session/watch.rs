use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::domain::SessionState;
use crate::ui::{Navigator, Screen};

/// Watch session resolution and send the user to the login screen whenever it settles on
/// "no user". Re-evaluated on every state change; fires once per transition into
/// [`SessionState::SignedOut`].
pub fn spawn_login_redirect(
    mut session: watch::Receiver<SessionState>,
    navigator: Arc<dyn Navigator>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut signed_out = false;
        loop {
            let now_signed_out = *session.borrow_and_update() == SessionState::SignedOut;
            if now_signed_out && !signed_out {
                info!("No signed-in user, redirecting to login");
                navigator.navigate(Screen::Login);
            }
            signed_out = now_signed_out;

            if session.changed().await.is_err() {
                debug!("Session provider gone, stopping login redirect");
                break;
            }
        }
    })
}

/// Aborts the wrapped task when dropped, tying a watcher to its owner's lifetime.
#[derive(Debug)]
pub(crate) struct WatchGuard(pub(crate) JoinHandle<()>);

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}
