use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::{AuthState, SessionManager};
use shared_api::ApiClient;
use shared_config::ClientConfig;
use shared_models::{ApiError, RegistrationRequest, Role};
use shared_storage::{keys, FileStore, KeyValueStore, MemoryStore, StorageError};
use shared_utils::platform::{Page, ToastKind};
use shared_utils::test_utils::{MockApiResponses, RecordingNavigator, RecordingNotifier, TestConfig, TestUser};

struct Harness {
    session: SessionManager,
    store: Arc<MemoryStore>,
    navigator: Arc<RecordingNavigator>,
    notifier: Arc<RecordingNotifier>,
}

fn harness_with(config: ClientConfig, store: Arc<MemoryStore>) -> Harness {
    let navigator = Arc::new(RecordingNavigator::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let api = Arc::new(ApiClient::new(&config, store.clone()));
    let session = SessionManager::new(&config, api, navigator.clone(), notifier.clone());

    Harness {
        session,
        store,
        navigator,
        notifier,
    }
}

fn harness(server: &MockServer, store: Arc<MemoryStore>) -> Harness {
    harness_with(TestConfig::with_base_url(&server.uri()).to_client_config(), store)
}

fn signed_in_store(user: &TestUser) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_entries([
        ("access_token".to_string(), "token".to_string()),
        (keys::REFRESH_TOKEN.to_string(), "refresh".to_string()),
        (keys::USER.to_string(), user.cached_json()),
    ]))
}

async fn mount_login(server: &MockServer, access: &str, refresh: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::token_response(access, refresh)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_doctor_login_scenario() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server, Arc::new(MemoryStore::new()));

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .and(body_partial_json(json!({ "email": "doc@x.com", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::token_response("A", "B")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/profile/"))
        .and(header("Authorization", "Bearer A"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "first_name": "Jo",
            "last_name": "Doe",
            "role": "doctor"
        })))
        .mount(&mock_server)
        .await;

    assert!(h.session.login("doc@x.com", "pw").await);

    assert_eq!(h.store.get("access_token").await.unwrap().as_deref(), Some("A"));
    assert_eq!(h.store.get(keys::REFRESH_TOKEN).await.unwrap().as_deref(), Some("B"));
    let cached: serde_json::Value =
        serde_json::from_str(&h.store.get(keys::USER).await.unwrap().unwrap()).unwrap();
    assert_eq!(cached["role"], "doctor");

    assert_matches!(h.session.state().await, AuthState::Authenticated(ref user) if user.first_name == "Jo");
    assert!(h.session.check_auth().await);

    assert_eq!(
        h.navigator.visits(),
        vec![(Page::DoctorDashboard, Duration::ZERO)]
    );
    assert_eq!(h.notifier.last().unwrap().message, "Login successful!");
}

#[tokio::test]
async fn test_login_redirect_uses_configured_delay() {
    let mock_server = MockServer::start().await;
    let mut config = TestConfig::with_base_url(&mock_server.uri()).to_client_config();
    config.login_redirect_delay = Duration::from_millis(1000);
    let h = harness_with(config, Arc::new(MemoryStore::new()));
    let patient = TestUser::patient(2, "pat@example.com");

    mount_login(&mock_server, "A", "B").await;
    Mock::given(method("GET"))
        .and(path("/users/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(patient.profile_json()))
        .mount(&mock_server)
        .await;

    assert!(h.session.login("pat@example.com", "pw").await);
    assert_eq!(
        h.navigator.visits(),
        vec![(Page::FindDoctors, Duration::from_millis(1000))]
    );
}

#[tokio::test]
async fn test_invalid_credentials_leave_state_untouched() {
    let mock_server = MockServer::start().await;
    let previous = TestUser::patient(3, "old@example.com");
    let h = harness(&mock_server, signed_in_store(&previous));
    let before = h.store.snapshot().await;

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(MockApiResponses::detail_error(
            "No active account found with the given credentials",
        )))
        .mount(&mock_server)
        .await;

    assert!(!h.session.login("doc@x.com", "bad").await);

    assert_eq!(h.store.snapshot().await, before);
    assert_eq!(h.session.state().await, AuthState::Anonymous);
    assert!(h.navigator.visits().is_empty());

    let toast = h.notifier.last().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.title, "Login Failed");
    assert_eq!(toast.message, "No active account found with the given credentials");
}

#[tokio::test]
async fn test_profile_failure_rolls_back_tokens() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server, Arc::new(MemoryStore::new()));

    mount_login(&mock_server, "A", "B").await;
    Mock::given(method("GET"))
        .and(path("/users/profile/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = h.session.login_with_outcome("doc@x.com", "pw").await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch profile");
    assert!(h.store.snapshot().await.is_empty());
    assert!(!h.session.check_auth().await);
}

#[tokio::test]
async fn test_profile_failure_restores_previous_session_tokens() {
    let mock_server = MockServer::start().await;
    let previous = TestUser::patient(3, "old@example.com");
    let h = harness(&mock_server, signed_in_store(&previous));
    let before = h.store.snapshot().await;

    mount_login(&mock_server, "A", "B").await;
    Mock::given(method("GET"))
        .and(path("/users/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let err = h.session.login_with_outcome("doc@x.com", "pw").await.unwrap_err();

    assert_matches!(err, ApiError::MalformedResponse(_));
    assert_eq!(h.store.snapshot().await, before);
}

/// Memory-backed store that refuses to write the refresh token.
struct RefreshWriteFails {
    inner: MemoryStore,
}

#[async_trait]
impl KeyValueStore for RefreshWriteFails {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == keys::REFRESH_TOKEN {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

#[tokio::test]
async fn test_refresh_token_write_failure_leaves_no_access_token() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_base_url(&mock_server.uri()).to_client_config();
    let store = Arc::new(RefreshWriteFails {
        inner: MemoryStore::new(),
    });
    let navigator = Arc::new(RecordingNavigator::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let api = Arc::new(ApiClient::new(&config, store.clone()));
    let session = SessionManager::new(&config, api, navigator.clone(), notifier.clone());

    mount_login(&mock_server, "A", "B").await;
    Mock::given(method("GET"))
        .and(path("/users/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(TestUser::doctor(4, "doc@x.com").profile_json()))
        .expect(0)
        .mount(&mock_server)
        .await;

    assert!(!session.login("doc@x.com", "pw").await);

    assert_eq!(store.get("access_token").await.unwrap(), None);
    assert!(store.inner.snapshot().await.is_empty());
    assert_eq!(session.state().await, AuthState::Anonymous);
    assert!(navigator.visits().is_empty());
    assert_eq!(notifier.last().unwrap().title, "Login Failed");
}

#[tokio::test]
async fn test_check_auth_requires_token_and_user() {
    let user = TestUser::patient(5, "pat@example.com");
    let config = TestConfig::default().to_client_config();

    let only_token = harness_with(
        config.clone(),
        Arc::new(MemoryStore::with_entries([("access_token", "token")])),
    );
    assert!(!only_token.session.check_auth().await);

    let only_user = harness_with(
        config.clone(),
        Arc::new(MemoryStore::with_entries([(keys::USER.to_string(), user.cached_json())])),
    );
    assert!(!only_user.session.check_auth().await);

    let empty_token = harness_with(
        config.clone(),
        Arc::new(MemoryStore::with_entries([
            ("access_token".to_string(), String::new()),
            (keys::USER.to_string(), user.cached_json()),
        ])),
    );
    assert!(!empty_token.session.check_auth().await);

    let both = harness_with(config, signed_in_store(&user));
    assert!(both.session.check_auth().await);
    assert_eq!(both.session.current_user().await.unwrap().email, "pat@example.com");
}

#[tokio::test]
async fn test_corrupted_cached_user_reads_as_signed_out() {
    let store = Arc::new(MemoryStore::with_entries([
        ("access_token", "token"),
        (keys::USER, "{definitely not json"),
    ]));
    let h = harness_with(TestConfig::default().to_client_config(), store);

    assert!(!h.session.check_auth().await);

    // storage is left as it was
    assert_eq!(
        h.store.get(keys::USER).await.unwrap().as_deref(),
        Some("{definitely not json")
    );
    assert_eq!(h.session.state().await, AuthState::Anonymous);
}

#[tokio::test]
async fn test_check_auth_forgets_user_once_storage_is_cleared() {
    let user = TestUser::doctor(9, "doc@example.com");
    let h = harness_with(TestConfig::default().to_client_config(), signed_in_store(&user));

    assert!(h.session.check_auth().await);
    assert_eq!(h.session.current_role().await, Some(Role::Doctor));

    h.store.remove("access_token").await.unwrap();
    h.store.remove(keys::USER).await.unwrap();

    assert!(!h.session.check_auth().await);
    assert_eq!(h.session.state().await, AuthState::Anonymous);
    assert_eq!(h.session.current_role().await, None);
    assert_eq!(h.session.display_name().await, "Guest");
}

#[tokio::test]
async fn test_check_auth_forgets_user_when_cache_turns_corrupt() {
    let user = TestUser::patient(10, "pat@example.com");
    let h = harness_with(TestConfig::default().to_client_config(), signed_in_store(&user));

    assert!(h.session.check_auth().await);

    h.store.set(keys::USER, "{broken").await.unwrap();

    assert!(!h.session.check_auth().await);
    assert_eq!(h.session.current_user().await, None);
    assert_eq!(h.session.display_name().await, "Guest");
}

#[tokio::test]
async fn test_logout_clears_everything_and_goes_home() {
    let user = TestUser::doctor(8, "doc@example.com");
    let store = signed_in_store(&user);
    store.set(keys::THEME, "dark").await.unwrap();
    let h = harness_with(TestConfig::default().to_client_config(), store);

    assert!(h.session.check_auth().await);
    h.session.logout().await;

    let remaining = h.store.snapshot().await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining.get(keys::THEME).map(String::as_str), Some("dark"));
    assert_eq!(h.session.state().await, AuthState::Anonymous);
    assert_eq!(h.navigator.last_page(), Some(Page::Home));
    assert!(!h.session.check_auth().await);
}

#[tokio::test]
async fn test_register_forces_patient_role() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server, Arc::new(MemoryStore::new()));
    let created = TestUser::patient(30, "eve@example.com");

    Mock::given(method("POST"))
        .and(path("/users/"))
        .and(body_partial_json(json!({ "email": "eve@example.com", "role": "patient" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(created.profile_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = RegistrationRequest {
        email: "eve@example.com".into(),
        password: "password123".into(),
        first_name: "Eve".into(),
        last_name: "Stone".into(),
        role: Some(Role::Admin),
        ..Default::default()
    };

    let user = h.session.register(request).await.unwrap();

    assert_eq!(user.role, Role::Patient);
    assert_eq!(h.navigator.last_page(), Some(Page::Login));
    assert_eq!(h.notifier.last().unwrap().kind, ToastKind::Success);
    // registering never signs the user in
    assert!(h.store.snapshot().await.is_empty());
}

#[tokio::test]
async fn test_register_failure_notifies_and_returns_error() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server, Arc::new(MemoryStore::new()));

    Mock::given(method("POST"))
        .and(path("/users/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(MockApiResponses::field_errors(
            "email",
            "user with this email already exists.",
        )))
        .mount(&mock_server)
        .await;

    let request = RegistrationRequest {
        email: "dup@example.com".into(),
        password: "password123".into(),
        first_name: "Dup".into(),
        last_name: "Licate".into(),
        ..Default::default()
    };

    let err = h.session.register(request).await.unwrap_err();

    assert_eq!(err.to_string(), "Registration failed");
    let toast = h.notifier.last().unwrap();
    assert_eq!(toast.title, "Registration Failed");
    assert!(h.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_session_survives_process_restart_with_file_store() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = TestConfig::with_base_url(&mock_server.uri())
        .to_client_config()
        .with_storage_path(dir.path().join("storage.json"));
    let admin = TestUser::admin(1, "admin@example.com");

    mount_login(&mock_server, "A", "B").await;
    Mock::given(method("GET"))
        .and(path("/users/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(admin.profile_json()))
        .mount(&mock_server)
        .await;

    let build = |config: &ClientConfig| {
        let store = Arc::new(FileStore::new(config.storage_path.clone()));
        let api = Arc::new(ApiClient::new(config, store));
        SessionManager::new(
            config,
            api,
            Arc::new(RecordingNavigator::new()),
            Arc::new(RecordingNotifier::new()),
        )
    };

    let first_run = build(&config);
    assert!(first_run.login("admin@example.com", "pw").await);

    let second_run = build(&config);
    assert_eq!(second_run.state().await, AuthState::Anonymous);
    assert!(second_run.check_auth().await);
    assert_eq!(second_run.current_role().await, Some(Role::Admin));
    assert_eq!(second_run.display_name().await, "Test User");
}
