use chrono::{NaiveDate, NaiveTime};

use shared_models::auth::{Role, UserProfile};
use shared_models::error::ApiError;
use shared_models::{Appointment, AppointmentDraft, Doctor};
use shared_utils::format::{format_naive_date, format_naive_time};

use doctor_cell::models::NormalizedDoctor;

/// Bookable start times offered by the booking form.
pub const TIME_SLOTS: [&str; 6] = ["09:00", "10:00", "11:00", "14:00", "15:00", "16:00"];

// ==============================================================================
// BOOKING
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Please login to book an appointment")]
    Unauthenticated,

    #[error("{0}")]
    InvalidForm(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Raw booking form input, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingForm {
    pub doctor_id: i64,
    pub date: String,
    pub time: String,
    pub reason: String,
    pub notes: String,
}

impl BookingForm {
    /// Applies the form's own constraints: a date no earlier than `today`,
    /// one of the offered slots, and a non-empty reason.
    pub fn to_draft(&self, today: NaiveDate) -> Result<AppointmentDraft, BookingError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| BookingError::InvalidForm("Please choose a valid date".to_string()))?;
        if date < today {
            return Err(BookingError::InvalidForm(
                "Appointment date cannot be in the past".to_string(),
            ));
        }

        let slot = self.time.trim();
        if !TIME_SLOTS.iter().any(|offered| *offered == slot) {
            return Err(BookingError::InvalidForm("Please select a time".to_string()));
        }
        let time = NaiveTime::parse_from_str(slot, "%H:%M")
            .map_err(|_| BookingError::InvalidForm("Please select a time".to_string()))?;

        if self.reason.trim().is_empty() {
            return Err(BookingError::InvalidForm(
                "Please enter a reason for the visit".to_string(),
            ));
        }

        Ok(AppointmentDraft::new(
            self.doctor_id,
            date,
            time,
            compose_notes(&self.reason, &self.notes),
        ))
    }
}

/// Reason first, then the free-text notes after a blank line.
pub fn compose_notes(reason: &str, notes: &str) -> String {
    match (reason.is_empty(), notes.is_empty()) {
        (true, _) => notes.to_string(),
        (false, true) => reason.to_string(),
        (false, false) => format!("{}\n\n{}", reason, notes),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlotOption {
    pub value: &'static str,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingModalView {
    pub doctor_id: i64,
    pub doctor_last_name: String,
    pub fee: String,
    pub min_date: String,
    pub slots: Vec<TimeSlotOption>,
}

impl BookingModalView {
    pub fn new(doctor: &Doctor, today: NaiveDate) -> Self {
        let normalized = NormalizedDoctor::from_doctor(doctor);

        Self {
            doctor_id: normalized.id,
            doctor_last_name: normalized.last_name,
            fee: normalized.consultation_fee,
            min_date: today.format("%Y-%m-%d").to_string(),
            slots: TIME_SLOTS
                .iter()
                .map(|&value| TimeSlotOption {
                    value,
                    label: slot_label(value),
                })
                .collect(),
        }
    }
}

/// `14:00` → `02:00 PM`.
fn slot_label(value: &str) -> String {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|time| time.format("%I:%M %p").to_string())
        .unwrap_or_else(|_| value.to_string())
}

// ==============================================================================
// APPOINTMENT LIST
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentScope {
    /// `/appointments/`, which the server already narrows to the caller.
    All,
    /// `/appointments/my-appointments/`.
    Mine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentRowView {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub status: &'static str,
    pub with_whom: String,
    pub notes: String,
}

impl AppointmentRowView {
    pub fn for_viewer(appointment: &Appointment, viewer: Option<Role>) -> Self {
        let with_whom = match viewer {
            Some(Role::Patient) => {
                counterpart("Dr. ", appointment.doctor_details.as_ref(), appointment.doctor)
            }
            _ => counterpart(
                "",
                appointment.patient_details.as_ref(),
                appointment.patient.unwrap_or_default(),
            ),
        };

        Self {
            id: appointment.id,
            date: format_naive_date(appointment.date),
            time: format_naive_time(appointment.time),
            status: appointment.status.as_str(),
            with_whom,
            notes: appointment.notes.clone().unwrap_or_default(),
        }
    }
}

fn counterpart(prefix: &str, profile: Option<&UserProfile>, id: i64) -> String {
    match profile.map(UserProfile::full_name).filter(|name| !name.is_empty()) {
        Some(name) => format!("{}{}", prefix, name),
        None => format!("#{}", id),
    }
}
