pub mod models;
pub mod services;

pub use models::{AuthState, RedirectDelays};
pub use services::admin::UserAdministration;
pub use services::preferences::{PreferenceService, Theme};
pub use services::session::SessionManager;
