use std::sync::Arc;

use tracing::{debug, error, info};

use shared_api::ApiClient;
use shared_models::Doctor;
use shared_utils::platform::{Notifier, Toast};

use crate::models::{DoctorDetailsView, DoctorListView};

/// Doctor listing and single-doctor lookups, without any role gate.
/// Pages put their own gate in front of it.
pub struct DoctorDirectory {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
}

impl DoctorDirectory {
    pub fn new(api: Arc<ApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    /// Loads the listing. Never fails: an unreachable or erroring server
    /// yields `Unavailable`, which renders with a Retry action.
    pub async fn load_doctors(&self) -> DoctorListView {
        self.notifier.notify(Toast::info("Loading", "Fetching doctors..."));

        match self.api.fetch_doctors().await {
            Ok(doctors) if doctors.is_empty() => {
                debug!("Doctor listing is empty");
                DoctorListView::Empty
            }
            Ok(doctors) => {
                info!("Loaded {} doctors", doctors.len());
                self.notifier.notify(Toast::success(
                    "Success",
                    format!("Loaded {} doctors", doctors.len()),
                ));
                DoctorListView::from_doctors(&doctors)
            }
            Err(err) => {
                error!("Error loading doctors: {}", err);
                self.notifier.notify(Toast::error(
                    "Error",
                    "Could not load doctors. Please try again.",
                ));
                DoctorListView::Unavailable
            }
        }
    }

    /// Fetches one doctor. A failure is reported to the user and read as `None`.
    pub async fn get_doctor(&self, doctor_id: i64) -> Option<Doctor> {
        match self.api.get_doctor(doctor_id).await {
            Ok(doctor) => Some(doctor),
            Err(err) => {
                error!("Error fetching doctor {}: {}", doctor_id, err);
                self.notifier
                    .notify(Toast::error("Error", "Could not load doctor details"));
                None
            }
        }
    }

    pub async fn view_details(&self, doctor_id: i64) -> Option<DoctorDetailsView> {
        self.get_doctor(doctor_id)
            .await
            .map(|doctor| DoctorDetailsView::from(&doctor))
    }
}
