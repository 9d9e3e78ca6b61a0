pub mod models;
pub mod services;
pub mod views;

pub use models::{
    AppointmentRowView, AppointmentScope, BookingError, BookingForm, BookingModalView, TIME_SLOTS,
};
pub use services::{AppointmentBook, BookingService};
