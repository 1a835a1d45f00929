//! Backend selection: which failures are rerouted to local storage.

mod common;

use common::{unreachable_base_url, MockBackend};
use fitness_tracker::api::{ApiClient, Backend, HttpClient, LocalApi};
use fitness_tracker::error::ClientError;
use fitness_tracker::models::SignupRequest;
use fitness_tracker::pages::WorkoutsPage;
use fitness_tracker::storage::MemoryStore;
use std::sync::Arc;

fn fallback_client(base_url: &str) -> ApiClient {
    ApiClient::new(Backend::RemoteWithFallback {
        remote: HttpClient::new(base_url),
        local: LocalApi::new(Arc::new(MemoryStore::new())),
    })
}

#[tokio::test]
async fn test_unreachable_backend_serves_local_data() {
    let client = fallback_client(&unreachable_base_url().await);

    let exercises = client.get_exercises().await.unwrap();
    assert_eq!(exercises.len(), 8);
    assert_eq!(exercises[0].name, "Bench Press");

    let user = client.get_user(1).await.unwrap();
    assert_eq!(user.name, "John Doe");

    // Pages work unchanged on top of the fallback
    let mut page = WorkoutsPage::new(client, 1);
    page.load().await;
    let data = page.state().data().expect("loaded from local storage");
    assert!(data.workouts.is_empty());
    assert_eq!(data.exercises.len(), 8);
}

#[tokio::test]
async fn test_server_errors_are_not_rerouted() {
    let backend = MockBackend::start().await;
    let client = fallback_client(&backend.base_url);

    // A 404 is an answer, not an outage
    let err = client.get_user(99).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 404, .. }));
    assert_eq!(err.user_message(), "User not found");

    backend.set_failing(true);
    let err = client.get_exercises().await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 500, .. }));
    assert_eq!(backend.hits("GET /exercises"), 1);
}

#[tokio::test]
async fn test_reachable_backend_is_preferred() {
    let backend = MockBackend::start().await;
    let client = fallback_client(&backend.base_url);

    // The mock has two exercises, local storage eight
    let exercises = client.get_exercises().await.unwrap();
    assert_eq!(exercises.len(), 2);
    assert_eq!(client.health().await.unwrap().status, "healthy");
}

#[tokio::test]
async fn test_local_mode_has_no_auth() {
    let client = ApiClient::new(Backend::Local(LocalApi::new(Arc::new(MemoryStore::new()))));
    let request = SignupRequest {
        username: "jane".to_string(),
        email: "jane@example.com".to_string(),
        password: "secret".to_string(),
    };
    let err = client.signup(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 501, .. }));
}
