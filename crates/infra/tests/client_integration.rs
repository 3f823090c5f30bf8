//! End-to-end tests: facade, executor, reqwest transport and SQLite storage
//! against a wiremock server.

mod support;

use serde_json::json;
use support::TestClient;
use workbase_domain::{ApiError, Durability, EntityKind, LoginCredentials, ResponsePayload, Signal};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn login(test: &TestClient) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": "tok-123", "tenant_id": "acme"})),
        )
        .mount(&test.server)
        .await;

    test.client
        .api()
        .login(&LoginCredentials::new("ops@example.com", "secret"), Durability::Persistent)
        .await
        .expect("login should succeed");
}

#[tokio::test]
async fn test_login_then_requests_carry_session_headers() {
    let test = TestClient::start().await;
    login(&test).await;

    Mock::given(method("GET"))
        .and(path("/api/employees/42"))
        .and(header("authorization", "Bearer tok-123"))
        .and(header("x-tenant-id", "acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&test.server)
        .await;

    let payload = test.client.api().get_entity(EntityKind::Employees, "42").await.unwrap();
    assert_eq!(payload.as_json(), Some(&json!({"id": 42})));
}

#[tokio::test]
async fn test_response_keys_are_camel_cased() {
    let test = TestClient::start().await;

    Mock::given(method("GET"))
        .and(path("/api/employees/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "first_name": "Ada",
            "home-address": {"zip_code": "10115"},
            "leave_balances": [{"days_left": 12}]
        })))
        .mount(&test.server)
        .await;

    let payload = test.client.api().get_entity(EntityKind::Employees, "7").await.unwrap();
    assert_eq!(
        payload.as_json(),
        Some(&json!({
            "firstName": "Ada",
            "homeAddress": {"zipCode": "10115"},
            "leaveBalances": [{"daysLeft": 12}]
        }))
    );
}

#[tokio::test]
async fn test_query_parameters_are_encoded_in_order() {
    let test = TestClient::start().await;

    Mock::given(method("GET"))
        .and(path("/api/candidates"))
        .and(query_param("search", "a b&c"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&test.server)
        .await;

    test.client
        .api()
        .list_entities(EntityKind::Candidates, &[("search", "a b&c"), ("page", "2")])
        .await
        .unwrap();

    let requests = test.received().await;
    assert_eq!(requests[0].url.query(), Some("search=a+b%26c&page=2"));
}

#[tokio::test]
async fn test_unauthorized_tears_down_session_and_signals() {
    let test = TestClient::start().await;
    login(&test).await;
    let mut signals = test.client.signals().subscribe();

    Mock::given(method("GET"))
        .and(path("/api/departments"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&test.server)
        .await;

    let err = test.client.api().list_entities(EntityKind::Departments, &[]).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));

    let session = test.client.api().current_session();
    assert!(session.token.is_none());
    assert!(session.tenant_id.is_none());

    match signals.try_recv().expect("a signal should be published") {
        Signal::SessionInvalidated { tenant_id, .. } => assert_eq!(tenant_id.as_deref(), Some("acme")),
        other => panic!("unexpected signal: {other:?}"),
    }

    // Nothing persisted survives a restart either.
    let restarted = workbase_infra::WorkbaseClient::from_config(&test.config).unwrap();
    assert!(restarted.api().current_session().token.is_none());
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let test = TestClient::start().await;

    Mock::given(method("GET"))
        .and(path("/api/payroll-runs"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&test.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/payroll-runs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"run_id": "r1"}])))
        .mount(&test.server)
        .await;

    let payload = test.client.api().list_entities(EntityKind::PayrollRuns, &[]).await.unwrap();
    assert_eq!(payload.as_json(), Some(&json!([{"runId": "r1"}])));
    assert_eq!(test.received().await.len(), 2);
}

#[tokio::test]
async fn test_remote_errors_exhaust_attempts() {
    let test = TestClient::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/candidates/9"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&test.server)
        .await;

    let err = test.client.api().delete_entity(EntityKind::Candidates, "9").await.unwrap_err();
    assert_eq!(err, ApiError::Remote { status: 500, body: "boom".into() });
}

#[tokio::test]
async fn test_settings_write_and_read_fall_back_to_local_storage() {
    let test = TestClient::start().await;

    Mock::given(path("/api/settings/feature-flags"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&test.server)
        .await;

    let flags = json!({"darkMode": true, "betaPayroll": false});
    let written = test.client.api().update_feature_flags(flags.clone()).await.unwrap();
    assert_eq!(written, flags);

    let read = test.client.api().get_feature_flags().await.unwrap();
    assert_eq!(read, flags);

    // The local record lives in the SQLite file and outlives the client.
    let restarted = workbase_infra::WorkbaseClient::from_config(&test.config).unwrap();
    let read_again = restarted.api().get_feature_flags().await.unwrap();
    assert_eq!(read_again, flags);
}

#[tokio::test]
async fn test_registry_create_falls_back_with_local_id() {
    let test = TestClient::start().await;

    Mock::given(path("/api/settings/webhooks"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&test.server)
        .await;

    let created = test
        .client
        .api()
        .create_webhook(json!({"url": "https://hooks.example.com/payroll"}))
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();
    assert!(id.starts_with("local-"));

    let listed = test.client.api().list_webhooks().await.unwrap();
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["url"], "https://hooks.example.com/payroll");
}

#[tokio::test]
async fn test_governance_denial_never_reaches_the_network() {
    let test = TestClient::start().await;
    let mut signals = test.client.signals().subscribe();

    let err = test.client.api().submit_payroll_run("2026-10").await.unwrap_err();
    assert!(matches!(err, ApiError::GovernanceBlocked { .. }));
    assert!(test.received().await.is_empty());

    match signals.try_recv().expect("governance signal") {
        Signal::GovernanceIngested(signal) => {
            assert!(signal.intercepted);
            assert_eq!(signal.origin, "payroll");
        }
        other => panic!("unexpected signal: {other:?}"),
    }
}

#[tokio::test]
async fn test_restricted_origin_from_config() {
    let test = TestClient::start_with(|config| {
        config.governance.restricted_origins = vec!["recruiting".into()];
    })
    .await;

    let err = test
        .client
        .api()
        .save_entity(EntityKind::Candidates, None, json!({"name": "Grace"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::GovernanceBlocked { .. }));
    assert!(test.received().await.is_empty());
}

#[tokio::test]
async fn test_binary_upload_skips_json_content_type() {
    let test = TestClient::start().await;

    Mock::given(method("POST"))
        .and(path("/api/employees/7/attachments"))
        .and(header("content-type", "application/pdf"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"attachment_id": "a1"})))
        .expect(1)
        .mount(&test.server)
        .await;

    let bytes = b"%PDF-1.7 fake".to_vec();
    let payload = test
        .client
        .api()
        .upload_attachment(EntityKind::Employees, "7", bytes.clone(), Some("application/pdf".into()))
        .await
        .unwrap();
    assert_eq!(payload.as_json(), Some(&json!({"attachmentId": "a1"})));

    let requests = test.received().await;
    assert_eq!(requests[0].body, bytes);
    let content_types: Vec<_> = requests[0].headers.get_all("content-type").iter().collect();
    assert_eq!(content_types.len(), 1);
}

#[tokio::test]
async fn test_binary_download_is_returned_raw() {
    let test = TestClient::start().await;

    Mock::given(method("GET"))
        .and(path("/api/employees/7/attachments/cv.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x25, 0x50, 0xff], "application/pdf"))
        .mount(&test.server)
        .await;

    let payload =
        test.client.api().download_attachment(EntityKind::Employees, "7", "cv.pdf").await.unwrap();
    assert_eq!(payload, ResponsePayload::Binary(vec![0x25, 0x50, 0xff]));
}

#[tokio::test]
async fn test_save_entity_sends_json_body() {
    let test = TestClient::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/employees/42"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"firstName": "Ada"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&test.server)
        .await;

    let payload = test
        .client
        .api()
        .save_entity(EntityKind::Employees, Some("42"), json!({"firstName": "Ada"}))
        .await
        .unwrap();
    assert_eq!(payload, ResponsePayload::Empty);
}

#[tokio::test]
async fn test_health_check() {
    let test = TestClient::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .up_to_n_times(1)
        .mount(&test.server)
        .await;
    assert!(test.client.api().health_check().await.unwrap());

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&test.server)
        .await;
    assert!(!test.client.api().health_check().await.unwrap());
}

#[tokio::test]
async fn test_rate_limit_rejects_without_network() {
    let test = TestClient::start_with(|config| {
        config.rate_limit.max_requests = 1;
        config.rate_limit.window_ms = 60_000;
    })
    .await;

    Mock::given(method("GET"))
        .and(path("/api/departments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&test.server)
        .await;

    test.client.api().list_entities(EntityKind::Departments, &[]).await.unwrap();
    let err = test.client.api().list_entities(EntityKind::Departments, &[]).await.unwrap_err();

    match err {
        ApiError::RateLimitExceeded { wait_ms } => assert!(wait_ms > 0 && wait_ms <= 60_000),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(test.received().await.len(), 1);
}

#[tokio::test]
async fn test_rate_limit_on_settings_read_is_not_masked_by_fallback() {
    let test = TestClient::start_with(|config| {
        config.rate_limit.max_requests = 1;
        config.rate_limit.window_ms = 60_000;
    })
    .await;

    Mock::given(method("GET"))
        .and(path("/api/settings/feature-flags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"beta_payroll": true})))
        .mount(&test.server)
        .await;

    let flags = test.client.api().get_feature_flags().await.unwrap();
    assert_eq!(flags, json!({"betaPayroll": true}));

    let err = test.client.api().get_feature_flags().await.unwrap_err();
    assert!(matches!(err, ApiError::RateLimitExceeded { .. }));
    assert_eq!(test.received().await.len(), 1);
}
