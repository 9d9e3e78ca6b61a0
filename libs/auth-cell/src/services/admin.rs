use std::sync::Arc;

use tracing::{error, info};

use shared_models::auth::{Role, UserProfile, UserUpdate};
use shared_models::error::ApiError;
use shared_utils::platform::Toast;

use crate::services::session::SessionManager;

/// Admin portal user management. Every operation is gated on the admin role.
pub struct UserAdministration {
    session: Arc<SessionManager>,
}

impl UserAdministration {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    pub async fn list_users(&self) -> Option<Vec<UserProfile>> {
        if !self.session.require_auth(&[Role::Admin]).await {
            return None;
        }

        self.report(self.session.api().list_users().await, "Could not load users")
    }

    /// Marks a doctor (or any user) as verified.
    pub async fn verify_user(&self, user_id: i64) -> Option<UserProfile> {
        if !self.session.require_auth(&[Role::Admin]).await {
            return None;
        }

        let update = UserUpdate {
            is_verified: Some(true),
            ..Default::default()
        };
        let user = self.report(
            self.session.api().update_user(user_id, &update).await,
            "Could not verify user",
        )?;

        info!("User {} verified", user_id);
        self.session
            .notifier()
            .notify(Toast::success("Success", format!("{} verified", user.display_name())));
        Some(user)
    }

    pub async fn delete_user(&self, user_id: i64) -> bool {
        if !self.session.require_auth(&[Role::Admin]).await {
            return false;
        }

        match self.session.api().delete_user(user_id).await {
            Ok(()) => {
                info!("User {} deleted", user_id);
                self.session
                    .notifier()
                    .notify(Toast::success("Success", "User deleted"));
                true
            }
            Err(err) => {
                error!("Error deleting user {}: {}", user_id, err);
                self.session
                    .notifier()
                    .notify(Toast::error("Delete Failed", err.user_message()));
                false
            }
        }
    }

    fn report<T>(&self, result: Result<T, ApiError>, fallback: &str) -> Option<T> {
        result
            .map_err(|err| {
                error!("{}: {}", fallback, err);
                self.session
                    .notifier()
                    .notify(Toast::error("Error", fallback));
            })
            .ok()
    }
}
