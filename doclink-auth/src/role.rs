//! Role-claim resolution keyed by principal identity.

use crate::client::IdentityClient;
use doclink_types::Principal;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// The one role value recognized as administrative.
pub const ADMIN_ROLE: &str = "admin";

/// Re-resolves the role claim whenever the principal changes.
///
/// Each [`RoleWatcher::refresh`] call aborts any in-flight resolution and
/// starts a new one for the given principal, so a stale lookup can never
/// publish over a newer one. Results arrive on the watch channel handed out
/// by [`RoleWatcher::new`]; a lookup failure publishes `None` rather than
/// surfacing an error, since a missing role and an unresolvable role grant
/// the same (absent) privileges.
pub struct RoleWatcher {
    client: Arc<IdentityClient>,
    sender: watch::Sender<Option<String>>,
    in_flight: Option<JoinHandle<()>>,
}

impl RoleWatcher {
    pub fn new(client: Arc<IdentityClient>) -> (Self, watch::Receiver<Option<String>>) {
        let (sender, receiver) = watch::channel(None);
        (
            Self {
                client,
                sender,
                in_flight: None,
            },
            receiver,
        )
    }

    /// Supersedes any in-flight resolution with one for this principal.
    ///
    /// `None` (signed out) publishes an absent role immediately.
    pub fn refresh(&mut self, principal: Option<&Principal>) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }

        let Some(principal) = principal else {
            let _ = self.sender.send(None);
            return;
        };

        debug!("Resolving role for {}", principal.uid);
        let client = self.client.clone();
        let sender = self.sender.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let role = client.resolve_role().await.unwrap_or(None);
            let _ = sender.send(role);
        }));
    }

    /// Whether a resolved role value is the recognized admin role.
    #[must_use]
    pub fn is_admin(role: Option<&str>) -> bool {
        role == Some(ADMIN_ROLE)
    }
}

impl Drop for RoleWatcher {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}
