use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TOKEN_KEY: &str = "access_token";
pub const DEFAULT_STORAGE_PATH: &str = ".medicare/storage.json";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub token_key: String,
    pub storage_path: PathBuf,
    pub login_redirect_delay: Duration,
    pub register_redirect_delay: Duration,
    pub access_denied_redirect_delay: Duration,
    pub booking_redirect_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            login_redirect_delay: Duration::from_millis(1000),
            register_redirect_delay: Duration::from_millis(1500),
            access_denied_redirect_delay: Duration::from_millis(2000),
            booking_redirect_delay: Duration::from_millis(1500),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            api_base_url: env::var("MEDICARE_API_BASE_URL")
                .map(|url| trim_base_url(&url))
                .unwrap_or_else(|_| {
                    warn!("MEDICARE_API_BASE_URL not set, using default");
                    defaults.api_base_url.clone()
                }),
            token_key: env::var("MEDICARE_TOKEN_KEY")
                .unwrap_or_else(|_| defaults.token_key.clone()),
            storage_path: env::var("MEDICARE_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    warn!("MEDICARE_STORAGE_PATH not set, using {}", DEFAULT_STORAGE_PATH);
                    defaults.storage_path.clone()
                }),
            login_redirect_delay: delay_from_env(
                "MEDICARE_LOGIN_REDIRECT_MS",
                defaults.login_redirect_delay,
            ),
            register_redirect_delay: delay_from_env(
                "MEDICARE_REGISTER_REDIRECT_MS",
                defaults.register_redirect_delay,
            ),
            access_denied_redirect_delay: delay_from_env(
                "MEDICARE_DENIED_REDIRECT_MS",
                defaults.access_denied_redirect_delay,
            ),
            booking_redirect_delay: delay_from_env(
                "MEDICARE_BOOKING_REDIRECT_MS",
                defaults.booking_redirect_delay,
            ),
        };

        if !config.is_configured() {
            warn!("Client not fully configured - API base URL is empty");
        }

        config
    }

    /// Points the client at another API root. A trailing slash is dropped so
    /// endpoint paths can be appended verbatim.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.api_base_url = trim_base_url(url);
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Zeroes every redirect delay.
    pub fn without_redirect_delays(mut self) -> Self {
        self.login_redirect_delay = Duration::ZERO;
        self.register_redirect_delay = Duration::ZERO;
        self.access_denied_redirect_delay = Duration::ZERO;
        self.booking_redirect_delay = Duration::ZERO;
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty() && !self.token_key.is_empty()
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn delay_from_env(var: &str, default: Duration) -> Duration {
    match env::var(var) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!("{} is not a number of milliseconds ({}), using default", var, raw);
                default
            }
        },
        Err(_) => default,
    }
}
