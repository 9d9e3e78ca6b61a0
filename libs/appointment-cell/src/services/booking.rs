use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracing::{debug, error, info};

use auth_cell::SessionManager;
use doctor_cell::DoctorDirectory;
use shared_config::ClientConfig;
use shared_models::auth::Role;
use shared_models::Appointment;
use shared_utils::platform::{Page, Toast};

use crate::models::{BookingError, BookingForm, BookingModalView};

/// Booking modal: opened from a doctor card, submitted as a pending
/// appointment.
pub struct BookingService {
    session: Arc<SessionManager>,
    doctors: DoctorDirectory,
    redirect_delay: Duration,
}

impl BookingService {
    pub fn new(config: &ClientConfig, session: Arc<SessionManager>) -> Self {
        let doctors = DoctorDirectory::new(session.api().clone(), session.notifier().clone());

        Self {
            session,
            doctors,
            redirect_delay: config.booking_redirect_delay,
        }
    }

    pub async fn open_booking(&self, doctor_id: i64) -> Option<BookingModalView> {
        let doctor = self.doctors.get_doctor(doctor_id).await?;
        Some(BookingModalView::new(&doctor, today()))
    }

    /// Books against the local calendar date.
    pub async fn submit(&self, form: &BookingForm) -> Result<Appointment, BookingError> {
        self.submit_on(form, today()).await
    }

    /// No availability or conflict check happens here; the server decides.
    pub async fn submit_on(&self, form: &BookingForm, today: NaiveDate) -> Result<Appointment, BookingError> {
        if !self.session.check_auth().await {
            self.session.notifier().notify(Toast::error(
                "Authentication Required",
                "Please login to book an appointment",
            ));
            self.session.navigator().navigate(Page::Login, Duration::ZERO);
            return Err(BookingError::Unauthenticated);
        }

        let draft = match form.to_draft(today) {
            Ok(draft) => draft,
            Err(err) => {
                debug!("Rejected booking form: {}", err);
                self.session
                    .notifier()
                    .notify(Toast::error("Booking Failed", err.to_string()));
                return Err(err);
            }
        };

        match self.session.api().create_appointment(&draft).await {
            Ok(appointment) => {
                info!(
                    "Booked appointment {} with doctor {} on {}",
                    appointment.id, draft.doctor, draft.date
                );
                self.session.notifier().notify(Toast::success(
                    "Success",
                    "Appointment booked successfully!",
                ));
                if self.session.current_role().await == Some(Role::Patient) {
                    self.session
                        .navigator()
                        .navigate(Page::PatientAppointments, self.redirect_delay);
                }
                Ok(appointment)
            }
            Err(err) => {
                error!("Booking error: {}", err);
                let message = match err.user_message() {
                    m if m.is_empty() => "Could not book appointment".to_string(),
                    m => m,
                };
                self.session
                    .notifier()
                    .notify(Toast::error("Booking Failed", message));
                Err(err.into())
            }
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
