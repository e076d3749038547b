#![allow(clippy::unwrap_used)]
// Integration tests for `ControllerClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use apctl_api::{
    AuthError, Band, ControllerClient, Error, LedMode, MacAddress, PowerLevel, RadioEntry,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn client_for(base: &str, http: reqwest::Client) -> ControllerClient {
    ControllerClient::with_client(
        http,
        Url::parse(base).unwrap(),
        "default".into(),
        "admin".into(),
        "hunter2".to_string().into(),
    )
}

async fn setup() -> (MockServer, ControllerClient) {
    let server = MockServer::start().await;
    let http = reqwest::Client::builder().cookie_store(true).build().unwrap();
    let client = client_for(&server.uri(), http);
    (server, client)
}

fn site_path(suffix: &str) -> String {
    format!("/api/s/default/{suffix}")
}

async fn mount_login_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" },
            "data": []
        })))
        .mount(server)
        .await;
}

fn device_list() -> Value {
    json!({
        "meta": { "rc": "ok" },
        "data": [
            {
                "_id": "ap-1",
                "mac": "AA:BB:CC:DD:EE:01",
                "type": "uap",
                "name": "Office",
                "model": "U6LR",
                "led_override": "on",
                "radio_table": [
                    { "name": "ra0", "radio": "ng", "tx_power_mode": "high", "channel": 6 },
                    { "name": "rai0", "radio": "na", "tx_power_mode": "low", "channel": 44 }
                ]
            },
            {
                "_id": "sw-1",
                "mac": "aa:bb:cc:dd:ee:02",
                "type": "usw",
                "name": "Core Switch"
            },
            {
                "_id": "ap-2",
                "mac": "aa:bb:cc:dd:ee:03",
                "type": "uap",
                "radio_table": []
            }
        ]
    })
}

fn radio_table(value: Value) -> Vec<RadioEntry> {
    serde_json::from_value(value).unwrap()
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({ "username": "admin", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" },
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.login().await.unwrap();
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_login_rejected_with_http_200() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.Invalid" },
            "data": []
        })))
        .mount(&server)
        .await;

    let result = client.login().await;

    match result {
        Err(Error::Auth(AuthError::RejectedCredentials { message })) => {
            assert_eq!(message, "api.err.Invalid");
        }
        other => panic!("expected RejectedCredentials, got: {other:?}"),
    }
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_login_without_meta_is_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let result = client.login().await;
    assert!(
        matches!(
            result,
            Err(Error::Auth(AuthError::RejectedCredentials { ref message })) if message == "Unknown error"
        ),
        "expected RejectedCredentials, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_http_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let result = client.login().await;
    assert!(
        matches!(
            result,
            Err(Error::Auth(AuthError::HttpError { status: 500, .. }))
        ),
        "expected HttpError, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_unparseable_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = client.login().await;
    assert!(
        matches!(result, Err(Error::Auth(AuthError::InvalidResponse { .. }))),
        "expected InvalidResponse, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_connection_failed() {
    // Nothing listens on port 1.
    let client = client_for("http://127.0.0.1:1", reqwest::Client::new());

    let result = client.login().await;
    assert!(
        matches!(result, Err(Error::Auth(AuthError::ConnectionFailed { .. }))),
        "expected ConnectionFailed, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_timeout() {
    let server = MockServer::start().await;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let client = client_for(&server.uri(), http);

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "meta": { "rc": "ok" } }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let result = client.login().await;
    assert!(
        matches!(result, Err(Error::Auth(AuthError::Timeout { .. }))),
        "expected Timeout, got: {result:?}"
    );
}

#[tokio::test]
async fn test_test_connection() {
    let (server, client) = setup().await;
    mount_login_ok(&server).await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/device")))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_list()))
        .mount(&server)
        .await;

    assert!(client.test_connection().await);
}

#[tokio::test]
async fn test_test_connection_with_bad_credentials() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.Invalid" }
        })))
        .mount(&server)
        .await;

    assert!(!client.test_connection().await);
}

// ── Device listing tests ────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_access_points_filters_non_radio_devices() {
    let (server, client) = setup().await;
    mount_login_ok(&server).await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/device")))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_list()))
        .mount(&server)
        .await;

    let aps = client.fetch_access_points().await.unwrap();

    assert_eq!(aps.len(), 1);
    let ap = &aps[0];
    assert_eq!(ap.id, "ap-1");
    assert_eq!(ap.mac.as_str(), "aa:bb:cc:dd:ee:01");
    assert_eq!(ap.name, "Office");
    assert_eq!(ap.led_override, LedMode::On);
    assert_eq!(ap.raw_radio_table.len(), 2);
    assert_eq!(ap.radio(Band::Ghz2_4).unwrap().power, PowerLevel::High);
    assert_eq!(ap.radio(Band::Ghz5).unwrap().power, PowerLevel::Low);
    assert!(ap.radio(Band::Ghz6).is_none());
}

#[tokio::test]
async fn test_fetch_logs_in_once_per_session() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "meta": { "rc": "ok" } })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/device")))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_list()))
        .expect(2)
        .mount(&server)
        .await;

    client.fetch_access_points().await.unwrap();
    client.fetch_access_points().await.unwrap();
}

#[tokio::test]
async fn test_fetch_failure_invalidates_session() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "meta": { "rc": "ok" } })))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/device")))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/device")))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_list()))
        .mount(&server)
        .await;

    let first = client.fetch_access_points().await;
    assert!(
        matches!(first, Err(Error::Http { status: 401, .. })),
        "expected Http 401, got: {first:?}"
    );
    assert!(!client.is_authenticated());

    let aps = client.fetch_access_points().await.unwrap();
    assert_eq!(aps.len(), 1);
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_fetch_envelope_error() {
    let (server, client) = setup().await;
    mount_login_ok(&server).await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/device")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.LoginRequired" },
            "data": []
        })))
        .mount(&server)
        .await;

    let result = client.fetch_access_points().await;
    assert!(
        matches!(result, Err(Error::Api { ref message }) if message == "api.err.LoginRequired"),
        "expected Api error, got: {result:?}"
    );
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_fetch_propagates_login_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(site_path("stat/device")))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_list()))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.fetch_access_points().await;
    assert!(result.as_ref().is_err_and(Error::is_auth), "got: {result:?}");
}

// ── Write tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_radio_power_sends_full_table() {
    let (server, client) = setup().await;
    mount_login_ok(&server).await;

    Mock::given(method("PUT"))
        .and(path(site_path("rest/device/ap-1")))
        .and(body_json(json!({
            "radio_table": [
                { "name": "ra0", "tx_power_mode": "high" },
                { "name": "rai0", "tx_power_mode": "medium" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" },
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let table = radio_table(json!([
        { "name": "ra0", "tx_power_mode": "high" },
        { "name": "rai0", "tx_power_mode": "low" }
    ]));
    let mac = MacAddress::new("aa:bb:cc:dd:ee:01");

    let ok = client
        .set_radio_power("ap-1", &mac, &table, Band::Ghz5, PowerLevel::Medium)
        .await
        .unwrap();
    assert!(ok);
}

#[tokio::test]
async fn test_set_radio_power_without_matching_radio() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "meta": { "rc": "ok" } })))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(site_path("rest/device/ap-1")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let table = radio_table(json!([{ "name": "ra0", "tx_power_mode": "high" }]));
    let mac = MacAddress::new("aa:bb:cc:dd:ee:01");

    let ok = client
        .set_radio_power("ap-1", &mac, &table, Band::Ghz6, PowerLevel::Low)
        .await
        .unwrap();
    assert!(!ok);
}

#[tokio::test]
async fn test_set_radio_power_rejects_unknown_level() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(site_path("rest/device/ap-1")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let table = radio_table(json!([{ "name": "ra0", "tx_power_mode": "high" }]));
    let mac = MacAddress::new("aa:bb:cc:dd:ee:01");

    let ok = client
        .set_radio_power("ap-1", &mac, &table, Band::Ghz2_4, PowerLevel::Unknown)
        .await
        .unwrap();
    assert!(!ok);
}

#[tokio::test]
async fn test_set_led_override_sends_only_led_field() {
    let (server, client) = setup().await;
    mount_login_ok(&server).await;

    Mock::given(method("PUT"))
        .and(path(site_path("rest/device/ap-1")))
        .and(body_json(json!({ "led_override": "off" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" },
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mac = MacAddress::new("aa:bb:cc:dd:ee:01");
    let ok = client
        .set_led_override("ap-1", &mac, LedMode::Off)
        .await
        .unwrap();
    assert!(ok);
}

#[tokio::test]
async fn test_write_non_2xx_returns_false() {
    let (server, client) = setup().await;
    mount_login_ok(&server).await;

    Mock::given(method("PUT"))
        .and(path(site_path("rest/device/ap-1")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.InvalidPayload" }
        })))
        .mount(&server)
        .await;

    let mac = MacAddress::new("aa:bb:cc:dd:ee:01");
    let ok = client
        .set_led_override("ap-1", &mac, LedMode::Default)
        .await
        .unwrap();
    assert!(!ok);
}

#[tokio::test]
async fn test_write_transport_failure_invalidates_session() {
    let server = MockServer::start().await;
    let http = reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let client = client_for(&server.uri(), http);
    mount_login_ok(&server).await;

    Mock::given(method("PUT"))
        .and(path(site_path("rest/device/ap-1")))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    client.login().await.unwrap();
    assert!(client.is_authenticated());

    let mac = MacAddress::new("aa:bb:cc:dd:ee:01");
    let result = client.set_led_override("ap-1", &mac, LedMode::Off).await;
    assert!(
        matches!(result, Err(Error::Transport(ref e)) if e.is_timeout()),
        "expected a transport timeout, got: {result:?}"
    );
    assert!(result.unwrap_err().is_timeout());
    assert!(!client.is_authenticated());
}
