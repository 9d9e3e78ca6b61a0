use std::time::Duration;

use tracing::{debug, warn};

use shared_models::auth::Role;
use shared_utils::platform::{Page, Toast};

use crate::services::session::SessionManager;

impl SessionManager {
    /// The single role gate for pages.
    ///
    /// Signed-out users go to the login page. Signed-in users whose role is
    /// not in `allowed_roles` are told so and sent home. An empty list admits
    /// any signed-in user. Storage is never modified here.
    pub async fn require_auth(&self, allowed_roles: &[Role]) -> bool {
        if !self.check_auth().await {
            debug!("No session, redirecting to login");
            self.navigator().navigate(Page::Login, Duration::ZERO);
            return false;
        }

        if allowed_roles.is_empty() {
            return true;
        }

        match self.current_role().await {
            Some(role) if allowed_roles.contains(&role) => true,
            role => {
                warn!("Access denied for role {:?}, allowed {:?}", role, allowed_roles);
                self.notifier().notify(Toast::error(
                    "Access Denied",
                    "You do not have permission to access this page.",
                ));
                self.navigator()
                    .navigate(Page::Home, self.delays().access_denied);
                false
            }
        }
    }
}
