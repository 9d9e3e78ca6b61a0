use std::sync::Arc;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, Method, Response,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use shared_config::ClientConfig;
use shared_models::{
    Appointment, AppointmentDraft, AppointmentUpdate, ApiError, Credentials, Doctor,
    MedicalProfile, RegistrationRequest, TokenPair, UserProfile, UserUpdate,
};
use shared_storage::{keys, KeyValueStore};

use crate::endpoints;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Bearer,
    Anonymous,
}

/// Thin wrapper over the MediCare REST API.
///
/// The bearer token is read from storage on every call, never cached, so a
/// login or logout in another process takes effect on the next request.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token_key: String,
    store: Arc<dyn KeyValueStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.clone(),
            token_key: config.token_key.clone(),
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    async fn get_headers(&self, auth: Auth) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();

        if auth == Auth::Bearer {
            let token = self
                .store
                .get(&self.token_key)
                .await?
                .filter(|t| !t.is_empty());

            if let Some(token) = token {
                let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                    ApiError::InvalidRequest("stored access token is not a valid header value".to_string())
                })?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        Ok(headers)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
        body: Option<Value>,
        fallback: &str,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let headers = self.get_headers(auth).await?;

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);

            return Err(ApiError::http(
                status.as_u16(),
                error_message(&error_text, fallback),
            ));
        }

        Ok(response)
    }

    async fn decode<T>(response: Response) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }

    /// Authenticated request returning the decoded JSON body.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        fallback: &str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, Auth::Bearer, body, fallback).await?;
        Self::decode(response).await
    }

    /// Authenticated request whose response body is ignored.
    pub async fn request_empty(&self, method: Method, path: &str, fallback: &str) -> Result<(), ApiError> {
        self.send(method, path, Auth::Bearer, None, fallback).await?;
        Ok(())
    }

    /// Exchanges credentials for a token pair and stores both tokens before
    /// returning them.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        let body = to_body(&Credentials::new(email, password))?;
        let response = self
            .send(Method::POST, endpoints::LOGIN, Auth::Anonymous, Some(body), "Login failed")
            .await?;
        let tokens: TokenPair = Self::decode(response).await?;

        self.store.set(&self.token_key, &tokens.access).await?;
        self.store.set(keys::REFRESH_TOKEN, &tokens.refresh).await?;
        info!("Stored access and refresh tokens for {}", email);

        Ok(tokens)
    }

    pub async fn register(&self, data: &RegistrationRequest) -> Result<UserProfile, ApiError> {
        let response = self
            .send(
                Method::POST,
                endpoints::USERS,
                Auth::Anonymous,
                Some(to_body(data)?),
                "Registration failed",
            )
            .await?;
        Self::decode(response).await
    }

    /// Doctor listing that reports failures to the caller.
    pub async fn fetch_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        self.request(Method::GET, endpoints::DOCTORS, None, "Failed to fetch doctors")
            .await
    }

    /// Doctor listing that degrades to an empty list on any failure.
    pub async fn list_doctors(&self) -> Vec<Doctor> {
        match self.fetch_doctors().await {
            Ok(doctors) => doctors,
            Err(err) => {
                error!("Error fetching doctors: {}", err);
                Vec::new()
            }
        }
    }

    pub async fn get_user(&self, id: i64) -> Result<UserProfile, ApiError> {
        self.request(Method::GET, &endpoints::user(id), None, "Failed to fetch user")
            .await
    }

    pub async fn get_doctor(&self, id: i64) -> Result<Doctor, ApiError> {
        self.request(Method::GET, &endpoints::user(id), None, "Failed to fetch doctor")
            .await
    }

    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        self.request(Method::GET, endpoints::PROFILE, None, "Failed to fetch profile")
            .await
    }

    pub async fn update_profile(&self, update: &UserUpdate) -> Result<UserProfile, ApiError> {
        self.request(
            Method::PATCH,
            endpoints::PROFILE,
            Some(to_body(update)?),
            "Failed to update profile",
        )
        .await
    }

    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.request(Method::GET, endpoints::APPOINTMENTS, None, "Failed to fetch appointments")
            .await
    }

    pub async fn list_my_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.request(Method::GET, endpoints::MY_APPOINTMENTS, None, "Failed to fetch appointments")
            .await
    }

    pub async fn create_appointment(&self, draft: &AppointmentDraft) -> Result<Appointment, ApiError> {
        self.request(
            Method::POST,
            endpoints::APPOINTMENTS,
            Some(to_body(draft)?),
            "Failed to create appointment",
        )
        .await
    }

    pub async fn update_appointment(
        &self,
        id: i64,
        update: &AppointmentUpdate,
    ) -> Result<Appointment, ApiError> {
        self.request(
            Method::PATCH,
            &endpoints::appointment(id),
            Some(to_body(update)?),
            "Failed to update appointment",
        )
        .await
    }

    pub async fn delete_appointment(&self, id: i64) -> Result<(), ApiError> {
        self.request_empty(Method::DELETE, &endpoints::appointment(id), "Failed to delete appointment")
            .await
    }

    pub async fn list_users(&self) -> Result<Vec<UserProfile>, ApiError> {
        self.request(Method::GET, endpoints::USERS, None, "Failed to fetch users")
            .await
    }

    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<UserProfile, ApiError> {
        self.request(
            Method::PATCH,
            &endpoints::user(id),
            Some(to_body(update)?),
            "Failed to update user",
        )
        .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.request_empty(Method::DELETE, &endpoints::user(id), "Failed to delete user")
            .await
    }

    pub async fn get_medical_profile(&self) -> Result<MedicalProfile, ApiError> {
        self.request(Method::GET, endpoints::MEDICAL_PROFILE, None, "Failed to fetch medical profile")
            .await
    }

    pub async fn update_medical_profile(&self, profile: &MedicalProfile) -> Result<MedicalProfile, ApiError> {
        self.request(
            Method::PATCH,
            endpoints::MEDICAL_PROFILE,
            Some(to_body(profile)?),
            "Failed to update medical profile",
        )
        .await
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::InvalidRequest(e.to_string()))
}

/// Server message from a JSON error body (`detail`, then `message`), else
/// the caller's fallback.
fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            ["detail", "message"].iter().find_map(|field| {
                json.get(field)
                    .and_then(Value::as_str)
                    .filter(|msg| !msg.is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| fallback.to_string())
}
