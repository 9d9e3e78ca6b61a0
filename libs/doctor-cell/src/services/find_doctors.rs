use std::sync::Arc;

use tracing::debug;

use auth_cell::SessionManager;
use shared_models::auth::Role;

use crate::models::{DoctorDetailsView, DoctorListView};
use crate::services::directory::DoctorDirectory;

/// The find-doctors page. Only patients get past the gate; everyone else is
/// redirected by `require_auth` and nothing is fetched.
pub struct FindDoctorsPage {
    session: Arc<SessionManager>,
    directory: DoctorDirectory,
}

impl FindDoctorsPage {
    pub fn new(session: Arc<SessionManager>) -> Self {
        let directory = DoctorDirectory::new(session.api().clone(), session.notifier().clone());
        Self { session, directory }
    }

    pub async fn load(&self) -> Option<DoctorListView> {
        if !self.session.require_auth(&[Role::Patient]).await {
            debug!("Find-doctors page closed to this session");
            return None;
        }

        Some(self.directory.load_doctors().await)
    }

    pub async fn view_details(&self, doctor_id: i64) -> Option<DoctorDetailsView> {
        if !self.session.require_auth(&[Role::Patient]).await {
            return None;
        }

        self.directory.view_details(doctor_id).await
    }
}
