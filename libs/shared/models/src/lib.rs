pub mod appointment;
pub mod auth;
pub mod doctor;
pub mod error;
pub mod serde_helpers;

pub use appointment::{Appointment, AppointmentDraft, AppointmentStatus, AppointmentUpdate, MedicalProfile};
pub use auth::{Credentials, RegistrationRequest, Role, TokenPair, UserProfile, UserUpdate};
pub use doctor::Doctor;
pub use error::ApiError;
