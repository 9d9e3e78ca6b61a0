use askama::Template;

use crate::models::{AppointmentRowView, BookingModalView};

#[derive(Template)]
#[template(path = "appointments/booking.html")]
pub struct BookingModalTemplate<'a> {
    pub modal: &'a BookingModalView,
}

#[derive(Template)]
#[template(path = "appointments/list.html")]
pub struct AppointmentListTemplate<'a> {
    pub rows: &'a [AppointmentRowView],
}

pub fn render_booking_modal(modal: &BookingModalView) -> askama::Result<String> {
    BookingModalTemplate { modal }.render()
}

pub fn render_appointments(rows: &[AppointmentRowView]) -> askama::Result<String> {
    AppointmentListTemplate { rows }.render()
}
