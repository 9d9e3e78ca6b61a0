use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::{AuthState, SessionManager};
use shared_api::ApiClient;
use shared_models::Role;
use shared_storage::{keys, KeyValueStore, MemoryStore, StorageError};
use shared_utils::platform::{Page, ToastKind};
use shared_utils::test_utils::{MockApiResponses, RecordingNavigator, RecordingNotifier, TestConfig, TestUser};

mock! {
    pub Store {}

    #[async_trait]
    impl KeyValueStore for Store {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
        async fn remove(&self, key: &str) -> Result<(), StorageError>;
    }
}

fn session_for(
    store: Arc<dyn KeyValueStore>,
    denied_delay: Duration,
) -> (SessionManager, Arc<RecordingNavigator>, Arc<RecordingNotifier>) {
    let mut config = TestConfig::default().to_client_config();
    config.access_denied_redirect_delay = denied_delay;

    let navigator = Arc::new(RecordingNavigator::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let api = Arc::new(ApiClient::new(&config, store));
    let session = SessionManager::new(&config, api, navigator.clone(), notifier.clone());
    (session, navigator, notifier)
}

fn store_for(user: &TestUser) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_entries([
        ("access_token".to_string(), "token".to_string()),
        (keys::USER.to_string(), user.cached_json()),
    ]))
}

#[tokio::test]
async fn test_patient_denied_doctor_page() {
    let store = store_for(&TestUser::patient(4, "pat@example.com"));
    let before = store.snapshot().await;
    let (session, navigator, notifier) = session_for(store.clone(), Duration::from_millis(2000));

    assert!(!session.require_auth(&[Role::Doctor]).await);

    // the session is kept, only the page is refused
    assert_eq!(store.snapshot().await, before);
    assert_eq!(session.current_role().await, Some(Role::Patient));

    let toast = notifier.last().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.title, "Access Denied");
    assert_eq!(toast.message, "You do not have permission to access this page.");
    assert_eq!(
        navigator.visits(),
        vec![(Page::Home, Duration::from_millis(2000))]
    );
}

#[tokio::test]
async fn test_allowed_role_passes_silently() {
    let (session, navigator, notifier) =
        session_for(store_for(&TestUser::doctor(9, "doc@example.com")), Duration::ZERO);

    assert!(session.require_auth(&[Role::Doctor, Role::Admin]).await);
    assert!(navigator.visits().is_empty());
    assert!(notifier.toasts().is_empty());
}

#[tokio::test]
async fn test_empty_role_list_admits_any_signed_in_user() {
    let (session, _, _) = session_for(store_for(&TestUser::admin(1, "admin@example.com")), Duration::ZERO);
    assert!(session.require_auth(&[]).await);
}

#[tokio::test]
async fn test_signed_out_user_goes_to_login() {
    let (session, navigator, notifier) = session_for(Arc::new(MemoryStore::new()), Duration::ZERO);

    assert!(!session.require_auth(&[Role::Patient]).await);
    assert_eq!(navigator.visits(), vec![(Page::Login, Duration::ZERO)]);
    assert!(notifier.toasts().is_empty());
}

#[tokio::test]
async fn test_unreadable_storage_reads_as_signed_out() {
    let mut store = MockStore::new();
    store
        .expect_get()
        .returning(|_| Err(StorageError::Io(std::io::Error::other("disk gone"))));

    let (session, navigator, _) = session_for(Arc::new(store), Duration::ZERO);

    assert!(!session.require_auth(&[]).await);
    assert_eq!(navigator.last_page(), Some(Page::Login));
}

#[tokio::test]
async fn test_login_fails_cleanly_when_tokens_cannot_be_saved() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockApiResponses::token_response("A", "B")))
        .mount(&mock_server)
        .await;

    let mut store = MockStore::new();
    store.expect_get().returning(|_| Ok(None));
    store.expect_set().returning(|key, _| match key {
        "access_token" => Err(StorageError::Io(std::io::Error::other("read-only"))),
        _ => Ok(()),
    });
    store.expect_remove().returning(|_| Ok(()));

    let config = TestConfig::with_base_url(&mock_server.uri()).to_client_config();
    let navigator = Arc::new(RecordingNavigator::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let api = Arc::new(ApiClient::new(&config, Arc::new(store)));
    let session = SessionManager::new(&config, api, navigator.clone(), notifier.clone());

    assert!(!session.login("doc@x.com", "pw").await);
    assert_eq!(session.state().await, AuthState::Anonymous);
    assert!(navigator.visits().is_empty());
    assert_eq!(notifier.of_kind(ToastKind::Error).len(), 1);
}
