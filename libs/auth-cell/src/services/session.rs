use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use shared_api::ApiClient;
use shared_config::ClientConfig;
use shared_models::auth::{RegistrationRequest, Role, UserProfile};
use shared_models::error::ApiError;
use shared_storage::{keys, KeyValueStore};
use shared_utils::platform::{Navigator, Notifier, Page, Toast};

use crate::models::{AuthState, RedirectDelays};

/// Session context handed to every view-level handler.
///
/// Holds at most one signed-in user in memory. Storage stays the source of
/// truth: the in-memory copy is re-derived from it by `check_auth`.
pub struct SessionManager {
    api: Arc<ApiClient>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    delays: RedirectDelays,
    current_user: RwLock<Option<UserProfile>>,
}

struct SavedTokens {
    access: Option<String>,
    refresh: Option<String>,
}

impl SessionManager {
    pub fn new(
        config: &ClientConfig,
        api: Arc<ApiClient>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            navigator,
            notifier,
            delays: RedirectDelays::from(config),
            current_user: RwLock::new(None),
        }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub(crate) fn delays(&self) -> RedirectDelays {
        self.delays
    }

    fn store(&self) -> &Arc<dyn KeyValueStore> {
        self.api.store()
    }

    pub async fn current_user(&self) -> Option<UserProfile> {
        self.current_user.read().await.clone()
    }

    pub async fn state(&self) -> AuthState {
        match self.current_user().await {
            Some(user) => AuthState::Authenticated(user),
            None => AuthState::Anonymous,
        }
    }

    pub async fn current_role(&self) -> Option<Role> {
        self.current_user.read().await.as_ref().map(|user| user.role)
    }

    /// Header label: full name, email, or `Guest` when signed out.
    pub async fn display_name(&self) -> String {
        match self.current_user.read().await.as_ref() {
            Some(user) => user.display_name(),
            None => "Guest".to_string(),
        }
    }

    /// Signs in, notifies the user and schedules the role's landing page.
    /// Failures are reported through the notifier and yield `false`.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.login_with_outcome(email, password).await.is_ok()
    }

    pub async fn login_with_outcome(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        match self.establish_session(email, password).await {
            Ok(user) => {
                info!("User {} signed in as {}", user.id, user.role);
                self.notifier.notify(Toast::success("Success", "Login successful!"));
                self.navigator
                    .navigate(Page::landing_for(user.role), self.delays.login);
                Ok(user)
            }
            Err(err) => {
                error!("Login error: {}", err);
                let message = match err.user_message() {
                    m if m.is_empty() => "Invalid email or password".to_string(),
                    m => m,
                };
                self.notifier.notify(Toast::error("Login Failed", message));
                Err(err)
            }
        }
    }

    async fn establish_session(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let saved = self.save_tokens().await?;

        // login may have written one token before failing, so every error
        // past this point undoes both
        let outcome = match self.api.login(email, password).await {
            Ok(_) => self.persist_profile().await,
            Err(err) => Err(err),
        };
        let user = match outcome {
            Ok(user) => user,
            Err(err) => {
                self.restore_tokens(saved).await;
                return Err(err);
            }
        };

        *self.current_user.write().await = Some(user.clone());
        Ok(user)
    }

    async fn persist_profile(&self) -> Result<UserProfile, ApiError> {
        let user = self.api.get_profile().await?;
        let serialized = serde_json::to_string(&user)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.store().set(keys::USER, &serialized).await?;
        Ok(user)
    }

    async fn save_tokens(&self) -> Result<SavedTokens, ApiError> {
        Ok(SavedTokens {
            access: self.store().get(self.api.token_key()).await?,
            refresh: self.store().get(keys::REFRESH_TOKEN).await?,
        })
    }

    async fn restore_tokens(&self, saved: SavedTokens) {
        let restores = [
            (self.api.token_key(), saved.access),
            (keys::REFRESH_TOKEN, saved.refresh),
        ];

        for (key, previous) in restores {
            let result = match previous {
                Some(value) => self.store().set(key, &value).await,
                None => self.store().remove(key).await,
            };
            if let Err(err) = result {
                warn!("Could not roll back {} after failed login: {}", key, err);
            }
        }
    }

    /// Creates a patient account. The role is always `patient`, whatever the
    /// caller supplied.
    pub async fn register(&self, data: RegistrationRequest) -> Result<UserProfile, ApiError> {
        let request = RegistrationRequest {
            role: Some(Role::Patient),
            ..data
        };

        match self.api.register(&request).await {
            Ok(user) => {
                info!("Registered new patient account {}", user.id);
                self.notifier.notify(Toast::success(
                    "Success",
                    "Registration successful! Please login.",
                ));
                self.navigator.navigate(Page::Login, self.delays.register);
                Ok(user)
            }
            Err(err) => {
                error!("Registration error: {}", err);
                self.notifier
                    .notify(Toast::error("Registration Failed", err.user_message()));
                Err(err)
            }
        }
    }

    /// Drops both tokens and the cached user, then goes home. No server call.
    pub async fn logout(&self) {
        for key in [self.api.token_key(), keys::REFRESH_TOKEN, keys::USER] {
            if let Err(err) = self.store().remove(key).await {
                warn!("Failed to clear {} during logout: {}", key, err);
            }
        }

        *self.current_user.write().await = None;
        debug!("Session cleared");

        self.navigator.navigate(Page::Home, Duration::ZERO);
    }

    /// True iff storage holds both a token and a readable cached user.
    ///
    /// The in-memory user follows the answer: it is replaced on success and
    /// cleared otherwise. A corrupted cache reads as signed out and is left
    /// in place.
    pub async fn check_auth(&self) -> bool {
        let user = self.read_stored_user().await;
        let signed_in = user.is_some();
        *self.current_user.write().await = user;
        signed_in
    }

    async fn read_stored_user(&self) -> Option<UserProfile> {
        let token = match self.store().get(self.api.token_key()).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(err) => {
                warn!("Could not read access token: {}", err);
                return None;
            }
        };

        let cached = match self.store().get(keys::USER).await {
            Ok(cached) => cached.filter(|u| !u.is_empty()),
            Err(err) => {
                warn!("Could not read cached user: {}", err);
                return None;
            }
        };

        let (Some(_), Some(raw)) = (token, cached) else {
            return None;
        };

        serde_json::from_str::<UserProfile>(&raw)
            .map_err(|err| error!("Error parsing user data: {}", err))
            .ok()
    }
}
