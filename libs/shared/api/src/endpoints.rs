//! Path table for the MediCare REST API, relative to the configured base URL.

pub const LOGIN: &str = "/auth/login/";
pub const USERS: &str = "/users/";
pub const DOCTORS: &str = "/users/doctors/";
pub const PROFILE: &str = "/users/profile/";
pub const APPOINTMENTS: &str = "/appointments/";
pub const MY_APPOINTMENTS: &str = "/appointments/my-appointments/";
pub const MEDICAL_PROFILE: &str = "/my-medical-profile/";

pub fn user(id: i64) -> String {
    format!("/users/{}/", id)
}

pub fn appointment(id: i64) -> String {
    format!("/appointments/{}/", id)
}
