use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::warn;

use shared_models::error::ApiError;
use shared_storage::{keys, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// Display preferences kept next to the session in durable storage.
pub struct PreferenceService {
    store: Arc<dyn KeyValueStore>,
}

impl PreferenceService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn theme(&self) -> Theme {
        match self.store.get(keys::THEME).await {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|err| {
                warn!("Ignoring stored theme: {}", err);
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(err) => {
                warn!("Could not read theme preference: {}", err);
                Theme::default()
            }
        }
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<(), ApiError> {
        self.store.set(keys::THEME, theme.as_str()).await?;
        Ok(())
    }

    pub async fn toggle_theme(&self) -> Result<Theme, ApiError> {
        let next = self.theme().await.toggled();
        self.set_theme(next).await?;
        Ok(next)
    }
}
