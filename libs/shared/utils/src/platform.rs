//! Host services the client drives but does not own: page navigation and
//! transient notifications.

use std::fmt;
use std::time::Duration;

use shared_models::auth::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Login,
    FindDoctors,
    DoctorDashboard,
    AdminPortal,
    PatientAppointments,
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "index.html",
            Page::Login => "login.html",
            Page::FindDoctors => "find-doctors.html",
            Page::DoctorDashboard => "doctor-dashboard.html",
            Page::AdminPortal => "admin-portal.html",
            Page::PatientAppointments => "patient-appointments.html",
        }
    }

    /// Where a freshly signed-in user lands.
    pub fn landing_for(role: Role) -> Page {
        match role {
            Role::Patient => Page::FindDoctors,
            Role::Doctor => Page::DoctorDashboard,
            Role::Admin => Page::AdminPortal,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    pub fn new(kind: ToastKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, title, message)
    }
}

/// Moves the user to another page. A non-zero delay schedules the move; it
/// cannot be cancelled once requested.
pub trait Navigator: Send + Sync {
    fn navigate(&self, page: Page, delay: Duration);
}

pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}
