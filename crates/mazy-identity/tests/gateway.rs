//! Gateway integration tests against a mocked auth backend.

use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mazy_config::BackendConfig;
use mazy_core::UserMetadata;
use mazy_identity::{AuthEventKind, IdentityError, IdentityGateway, TokenCache};

const ANON_KEY: &str = "anon-test-key";
const SERVICE_KEY: &str = "service-test-key";

fn backend_config(server: &MockServer) -> BackendConfig {
    BackendConfig {
        url: server.uri(),
        anon_key: ANON_KEY.into(),
        service_key: SERVICE_KEY.into(),
    }
}

fn gateway(server: &MockServer, tmp: &TempDir) -> IdentityGateway {
    gateway_with_timeout(server, tmp, Duration::from_secs(5))
}

fn gateway_with_timeout(server: &MockServer, tmp: &TempDir, timeout: Duration) -> IdentityGateway {
    let cache = TokenCache::file_only(tmp.path().join("session"));
    IdentityGateway::with_options(&backend_config(server), cache, timeout)
}

fn identity_json(id: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "email": email,
        "email_confirmed": true,
        "user_metadata": { "name": "Maija", "phone": "+358 40 123" },
    })
}

#[tokio::test]
async fn sign_in_stores_session_and_publishes_event() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let gateway = gateway(&server, &tmp);
    let mut events = gateway.subscribe();

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", ANON_KEY))
        .and(body_json(serde_json::json!({
            "email": "maija@example.com",
            "password": "hunter2",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "jwt-1",
            "user": identity_json("uid-1", "maija@example.com"),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = gateway
        .sign_in("maija@example.com", "hunter2", Some(7))
        .await
        .unwrap();
    assert_eq!(session.access_token, "jwt-1");
    assert_eq!(session.identity.email, "maija@example.com");

    assert_eq!(gateway.get_session().await, Some(session.clone()));

    let event = events.recv().await.unwrap();
    assert_eq!(event.correlation, Some(7));
    match event.kind {
        AuthEventKind::SignedIn(published) => assert_eq!(published, session),
        AuthEventKind::SignedOut => panic!("expected SignedIn"),
    }
}

#[tokio::test]
async fn sign_in_maps_invalid_credentials() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let gateway = gateway(&server, &tmp);

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error_code": "invalid_credentials",
            "msg": "Invalid login credentials",
        })))
        .mount(&server)
        .await;

    let err = gateway
        .sign_in("maija@example.com", "wrong", None)
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::InvalidCredentials));
    assert!(gateway.get_session().await.is_none());
}

/// The abandoned side of the timeout race keeps running: the late response
/// still installs the session, and a re-check finds it.
#[tokio::test]
async fn timed_out_sign_in_can_still_land_a_session() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let gateway = gateway_with_timeout(&server, &tmp, Duration::from_millis(50));
    let mut events = gateway.subscribe();

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(150))
                .set_body_json(serde_json::json!({
                    "access_token": "jwt-late",
                    "user": identity_json("uid-1", "maija@example.com"),
                })),
        )
        .mount(&server)
        .await;

    let err = gateway
        .sign_in("maija@example.com", "hunter2", Some(3))
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::Timeout));
    assert!(gateway.get_session().await.is_none());

    tokio::time::sleep(Duration::from_millis(300)).await;

    let session = gateway.get_session().await.expect("late session installed");
    assert_eq!(session.access_token, "jwt-late");

    // The late event still carries the original call's correlation id.
    let event = events.recv().await.unwrap();
    assert_eq!(event.correlation, Some(3));
}

#[tokio::test]
async fn sign_up_maps_already_registered() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let gateway = gateway(&server, &tmp);

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "error_code": "user_already_exists",
            "msg": "User already registered",
        })))
        .mount(&server)
        .await;

    let err = gateway
        .sign_up("maija@example.com", "hunter2", &UserMetadata::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::AlreadyRegistered));
}

#[tokio::test]
async fn sign_up_with_auto_session_installs_and_correlates_it() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let gateway = gateway(&server, &tmp);
    let mut events = gateway.subscribe();

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_json(serde_json::json!({
            "email": "uusi@example.com",
            "password": "hunter2",
            "data": { "name": "Uusi", "phone": "" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "jwt-new",
            "user": identity_json("uid-2", "uusi@example.com"),
        })))
        .mount(&server)
        .await;

    let metadata = UserMetadata {
        name: "Uusi".into(),
        phone: String::new(),
    };
    let identity = gateway
        .sign_up("uusi@example.com", "hunter2", &metadata, Some(11))
        .await
        .unwrap();
    assert_eq!(identity.id, "uid-2");

    let session = gateway.get_session().await.expect("auto session");
    assert_eq!(session.access_token, "jwt-new");

    let event = events.recv().await.unwrap();
    assert_eq!(event.correlation, Some(11));
}

#[tokio::test]
async fn sign_up_without_auto_session_returns_identity_only() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let gateway = gateway(&server, &tmp);

    // Confirmation-required flow: the signup response is the bare identity.
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(identity_json("uid-3", "odottaa@example.com")),
        )
        .mount(&server)
        .await;

    let identity = gateway
        .sign_up("odottaa@example.com", "hunter2", &UserMetadata::default(), None)
        .await
        .unwrap();
    assert_eq!(identity.id, "uid-3");
    assert!(gateway.get_session().await.is_none());
}

#[tokio::test]
async fn sign_out_clears_session_even_when_backend_rejects() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let gateway = gateway(&server, &tmp);

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "jwt-1",
            "user": identity_json("uid-1", "maija@example.com"),
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    gateway
        .sign_in("maija@example.com", "hunter2", None)
        .await
        .unwrap();
    let mut events = gateway.subscribe();

    assert!(gateway.sign_out(Some(5)).await, "a live session was cleared");

    assert!(gateway.get_session().await.is_none());
    let cache = TokenCache::file_only(tmp.path().join("session"));
    assert!(cache.load().is_none(), "cached token should be cleared");

    let event = events.recv().await.unwrap();
    assert!(matches!(event.kind, AuthEventKind::SignedOut));
    assert_eq!(event.correlation, Some(5));
}

#[tokio::test]
async fn sign_out_without_session_is_silent() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let gateway = gateway(&server, &tmp);
    let mut events = gateway.subscribe();

    assert!(
        !gateway.sign_out(None).await,
        "nothing to clear must be reported so callers can withdraw tokens"
    );

    assert!(
        matches!(
            events.try_recv(),
            Err(tokio::sync::broadcast::error::TryRecvError::Empty)
        ),
        "no event without a session to clear"
    );
}

#[tokio::test]
async fn restore_session_validates_cached_token() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let cache = TokenCache::file_only(tmp.path().join("session"));
    cache.store("jwt-cached").unwrap();
    let gateway = IdentityGateway::with_options(
        &backend_config(&server),
        cache,
        Duration::from_secs(5),
    );
    let mut events = gateway.subscribe();

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("Authorization", "Bearer jwt-cached"))
        .and(header("apikey", ANON_KEY))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(identity_json("uid-1", "maija@example.com")),
        )
        .mount(&server)
        .await;

    let session = gateway.restore_session(Some(1)).await.expect("restored");
    assert_eq!(session.access_token, "jwt-cached");
    assert_eq!(session.identity.email, "maija@example.com");

    let event = events.recv().await.unwrap();
    assert_eq!(event.correlation, Some(1));
}

#[tokio::test]
async fn restore_session_drops_stale_token() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let cache = TokenCache::file_only(tmp.path().join("session"));
    cache.store("jwt-stale").unwrap();
    let gateway = IdentityGateway::with_options(
        &backend_config(&server),
        cache,
        Duration::from_secs(5),
    );

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert!(gateway.restore_session(None).await.is_none());

    let cache = TokenCache::file_only(tmp.path().join("session"));
    assert!(cache.load().is_none(), "stale token should be dropped");
}

#[tokio::test]
async fn admin_operations_require_a_service_key() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let config = BackendConfig {
        url: server.uri(),
        anon_key: ANON_KEY.into(),
        service_key: String::new(),
    };
    let cache = TokenCache::file_only(tmp.path().join("session"));
    let gateway = IdentityGateway::with_token_cache(&config, cache);

    let err = gateway.admin_delete_user("uid-1").await.unwrap_err();
    assert!(matches!(err, IdentityError::MisconfiguredBackend));

    let err = gateway
        .admin_update_password("uid-1", "new-pass")
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::MisconfiguredBackend));
}

#[tokio::test]
async fn admin_delete_user_hits_the_admin_surface() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let gateway = gateway(&server, &tmp);

    Mock::given(method("DELETE"))
        .and(path("/auth/v1/admin/users/uid-9"))
        .and(header("apikey", SERVICE_KEY))
        .and(header("Authorization", format!("Bearer {SERVICE_KEY}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    gateway.admin_delete_user("uid-9").await.unwrap();
}

#[tokio::test]
async fn admin_update_password_sends_the_new_password() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let gateway = gateway(&server, &tmp);

    Mock::given(method("PUT"))
        .and(path("/auth/v1/admin/users/uid-9"))
        .and(header("apikey", SERVICE_KEY))
        .and(body_json(serde_json::json!({ "password": "rotated" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    gateway.admin_update_password("uid-9", "rotated").await.unwrap();
}
