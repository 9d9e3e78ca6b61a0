use std::sync::Arc;

use tracing::{error, info};

use auth_cell::SessionManager;
use shared_models::{Appointment, AppointmentStatus, AppointmentUpdate};
use shared_utils::platform::Toast;

use crate::models::{AppointmentRowView, AppointmentScope};

/// The appointments page of a signed-in patient or doctor.
pub struct AppointmentBook {
    session: Arc<SessionManager>,
}

impl AppointmentBook {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// Rows for the current user, or `None` when signed out or the
    /// listing failed. Both cases have already been surfaced to the user.
    pub async fn load(&self, scope: AppointmentScope) -> Option<Vec<AppointmentRowView>> {
        if !self.session.require_auth(&[]).await {
            return None;
        }

        let result = match scope {
            AppointmentScope::All => self.session.api().list_appointments().await,
            AppointmentScope::Mine => self.session.api().list_my_appointments().await,
        };

        match result {
            Ok(appointments) => {
                let viewer = self.session.current_role().await;
                Some(
                    appointments
                        .iter()
                        .map(|appointment| AppointmentRowView::for_viewer(appointment, viewer))
                        .collect(),
                )
            }
            Err(err) => {
                error!("Error loading appointments: {}", err);
                self.session
                    .notifier()
                    .notify(Toast::error("Error", "Could not load appointments"));
                None
            }
        }
    }

    pub async fn set_status(&self, appointment_id: i64, status: AppointmentStatus) -> Option<Appointment> {
        if !self.session.require_auth(&[]).await {
            return None;
        }

        let update = AppointmentUpdate::status(status);
        match self.session.api().update_appointment(appointment_id, &update).await {
            Ok(appointment) => {
                info!("Appointment {} is now {}", appointment_id, status.as_str());
                self.session.notifier().notify(Toast::success(
                    "Success",
                    format!("Appointment {}", status.as_str()),
                ));
                Some(appointment)
            }
            Err(err) => {
                error!("Error updating appointment {}: {}", appointment_id, err);
                self.session
                    .notifier()
                    .notify(Toast::error("Update Failed", err.user_message()));
                None
            }
        }
    }

    pub async fn cancel(&self, appointment_id: i64) -> bool {
        self.set_status(appointment_id, AppointmentStatus::Cancelled)
            .await
            .is_some()
    }
}
