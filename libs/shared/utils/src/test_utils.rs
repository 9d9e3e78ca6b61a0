use std::sync::Mutex;
use std::time::Duration;

use serde_json::json;

use shared_config::ClientConfig;
use shared_models::auth::{Role, UserProfile};

use crate::platform::{Navigator, Notifier, Page, Toast, ToastKind};

pub struct TestConfig {
    pub api_base_url: String,
    pub token_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            token_key: "access_token".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_base_url(url: &str) -> Self {
        Self {
            api_base_url: url.to_string(),
            ..Default::default()
        }
    }

    /// Client config aimed at a mock server, with redirects undelayed.
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            token_key: self.token_key.clone(),
            ..ClientConfig::default().without_redirect_delays()
        }
        .with_base_url(&self.api_base_url)
    }
}

pub struct TestUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new(1, "test@example.com", Role::Patient)
    }
}

impl TestUser {
    pub fn new(id: i64, email: &str, role: Role) -> Self {
        Self {
            id,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn doctor(id: i64, email: &str) -> Self {
        Self::new(id, email, Role::Doctor)
    }

    pub fn patient(id: i64, email: &str) -> Self {
        Self::new(id, email, Role::Patient)
    }

    pub fn admin(id: i64, email: &str) -> Self {
        Self::new(id, email, Role::Admin)
    }

    pub fn profile_json(&self) -> serde_json::Value {
        MockApiResponses::profile_response(self.id, &self.first_name, &self.last_name, &self.email, self.role)
    }

    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            role: self.role,
            specialization: None,
            consultation_fee: None,
            rating: None,
            bio: None,
            experience: None,
            phone: None,
            address: None,
            age: None,
            is_verified: None,
        }
    }

    /// JSON as the session stores it under the `user` key.
    pub fn cached_json(&self) -> String {
        serde_json::to_string(&self.to_profile()).unwrap_or_default()
    }
}

/// Response bodies shaped like the MediCare REST API's.
pub struct MockApiResponses;

impl MockApiResponses {
    pub fn token_response(access: &str, refresh: &str) -> serde_json::Value {
        json!({
            "access": access,
            "refresh": refresh
        })
    }

    pub fn profile_response(
        id: i64,
        first_name: &str,
        last_name: &str,
        email: &str,
        role: Role,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "username": email,
            "email": email,
            "first_name": first_name,
            "last_name": last_name,
            "role": role.as_str(),
            "specialization": "",
            "experience": 0,
            "consultation_fee": "0.00",
            "rating": "0.0",
            "is_verified": false,
            "address": null,
            "phone": "",
            "bio": "",
            "age": null
        })
    }

    pub fn doctor_response(id: i64, first_name: &str, last_name: &str, specialization: &str) -> serde_json::Value {
        json!({
            "id": id,
            "username": format!("{}@example.com", first_name.to_lowercase()),
            "email": format!("{}@example.com", first_name.to_lowercase()),
            "first_name": first_name,
            "last_name": last_name,
            "role": "doctor",
            "specialization": specialization,
            "experience": 12,
            "consultation_fee": "150.00",
            "rating": "4.8",
            "is_verified": true,
            "bio": "Board certified.",
            "address": "12 Clinic Road",
            "phone": "555-0100",
            "age": 45
        })
    }

    /// A doctor row with every optional column blank.
    pub fn sparse_doctor_response(id: i64, first_name: &str, last_name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "email": format!("{}@example.com", first_name.to_lowercase()),
            "first_name": first_name,
            "last_name": last_name,
            "role": "doctor",
            "specialization": "",
            "experience": 0,
            "consultation_fee": "0.00",
            "rating": "0.0",
            "is_verified": false,
            "bio": ""
        })
    }

    pub fn appointment_response(id: i64, patient: i64, doctor: i64, date: &str, time: &str) -> serde_json::Value {
        json!({
            "id": id,
            "patient": patient,
            "patient_details": null,
            "doctor": doctor,
            "doctor_details": null,
            "date": date,
            "time": format!("{}:00", time),
            "status": "pending",
            "notes": "",
            "consultation_fee": "0.00",
            "created_at": "2025-01-01T00:00:00Z"
        })
    }

    pub fn medical_profile_response() -> serde_json::Value {
        json!({
            "date_of_birth": "1990-05-17",
            "blood_group": "O+",
            "address": "4 Elm Street",
            "allergies": "Penicillin",
            "medical_history": null
        })
    }

    pub fn detail_error(message: &str) -> serde_json::Value {
        json!({ "detail": message })
    }

    pub fn message_error(message: &str) -> serde_json::Value {
        json!({ "message": message })
    }

    pub fn field_errors(field: &str, message: &str) -> serde_json::Value {
        json!({ field: [message] })
    }
}

/// Navigator that only remembers where it was told to go.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<(Page, Duration)>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<(Page, Duration)> {
        self.visits.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last_page(&self) -> Option<Page> {
        self.visits().last().map(|(page, _)| *page)
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, page: Page, delay: Duration) {
        self.visits
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((page, delay));
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts().last().cloned()
    }

    pub fn of_kind(&self, kind: ToastKind) -> Vec<Toast> {
        self.toasts().into_iter().filter(|t| t.kind == kind).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(toast);
    }
}
