use std::time::Duration;

use shared_config::ClientConfig;
use shared_models::auth::UserProfile;

/// What the session knows right now, as last derived from storage.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Anonymous,
    Authenticated(UserProfile),
}

/// How long a toast stays readable before the page changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectDelays {
    pub login: Duration,
    pub register: Duration,
    pub access_denied: Duration,
}

impl From<&ClientConfig> for RedirectDelays {
    fn from(config: &ClientConfig) -> Self {
        Self {
            login: config.login_redirect_delay,
            register: config.register_redirect_delay,
            access_denied: config.access_denied_redirect_delay,
        }
    }
}
