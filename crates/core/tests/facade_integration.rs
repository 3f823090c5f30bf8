//! Facade behaviour against a scripted gateway
//!
//! Covers the governance veto, the settings fallback round trip, and the
//! guarantee that domain data never falls back silently.

mod support;

use serde_json::json;
use support::{Harness, ScriptedGateway};
use workbase_core::GovernancePolicy;
use workbase_domain::{
    ApiError, Durability, EntityKind, HttpMethod, LoginCredentials, RequestBody, ResponsePayload,
    RiskLevel, Signal,
};

fn network_down() -> ApiError {
    ApiError::Network("connection refused".into())
}

// ============================================================================
// Governance
// ============================================================================

#[tokio::test]
async fn test_governance_denial_makes_no_network_call() {
    let harness = Harness::new(ScriptedGateway::new(Vec::new()));

    let err = harness.api.submit_payroll_run("run-2024-06").await.unwrap_err();

    let ApiError::GovernanceBlocked { reason, remediation } = &err else {
        panic!("expected governance block, got {err:?}");
    };
    assert!(err.to_string().contains(reason.as_str()));
    assert!(err.to_string().contains(remediation.as_str()));
    assert_eq!(harness.gateway.calls(), 0);

    let signals = harness.signals.signals();
    assert_eq!(signals.len(), 1);
    let Signal::GovernanceIngested(signal) = &signals[0] else {
        panic!("expected governance signal, got {:?}", signals[0]);
    };
    assert!(signal.intercepted);
    assert_eq!(signal.risk, RiskLevel::Critical);
    assert_eq!(signal.origin, "payroll");
    assert_eq!(signal.action, "submit_payroll_run");
    assert_eq!(&signal.message, reason);
}

#[tokio::test]
async fn test_restricted_origin_blocks_settings_write_before_fallback() {
    let policy = GovernancePolicy::default().restrict_origin("settings");
    let harness = Harness::with_policy(ScriptedGateway::failing(network_down()), policy);

    let err = harness.api.update_feature_flags(json!({"beta": true})).await.unwrap_err();

    assert!(matches!(err, ApiError::GovernanceBlocked { .. }));
    assert_eq!(harness.gateway.calls(), 0);
    assert!(harness.durable.is_empty());
}

#[tokio::test]
async fn test_allowed_mutation_emits_no_signal() {
    let harness = Harness::new(ScriptedGateway::new(vec![Ok(ResponsePayload::Empty)]));

    harness.api.delete_entity(EntityKind::Employees, "42").await.unwrap();

    assert!(harness.signals.signals().is_empty());
    let requests = harness.gateway.requests();
    assert_eq!(requests[0].method(), HttpMethod::Delete);
    assert_eq!(requests[0].path(), "/employees/42");
}

// ============================================================================
// Settings fallback
// ============================================================================

#[tokio::test]
async fn test_settings_write_then_read_round_trip_when_remote_down() {
    let harness = Harness::new(ScriptedGateway::failing(network_down()));
    let config = json!({"emailEnabled": false, "pushEnabled": true, "digest": "weekly"});

    let written = harness.api.update_notification_config(config.clone()).await.unwrap();
    let read = harness.api.get_notification_config().await.unwrap();

    assert_eq!(written, config);
    assert_eq!(read, config);
    assert_eq!(harness.gateway.calls(), 2);
}

#[tokio::test]
async fn test_settings_read_defaults_without_local_record() {
    let harness = Harness::new(ScriptedGateway::failing(ApiError::Timeout { timeout_ms: 50 }));

    assert_eq!(harness.api.get_feature_flags().await.unwrap(), json!({}));
    assert_eq!(
        harness.api.get_ai_config().await.unwrap(),
        json!({"provider": "none", "enabled": false})
    );
    assert_eq!(harness.api.list_webhooks().await.unwrap(), json!([]));
}

#[tokio::test]
async fn test_registry_create_is_listed_after_fallback() {
    let harness = Harness::new(ScriptedGateway::failing(ApiError::Remote {
        status: 503,
        body: "maintenance".into(),
    }));

    let created = harness.api.create_webhook(json!({"url": "https://hooks.example/pay"})).await.unwrap();
    let listed = harness.api.list_webhooks().await.unwrap();

    assert_eq!(listed, json!([created.clone()]));
    assert_eq!(created["url"], "https://hooks.example/pay");
    assert!(created["id"].is_string());
}

#[tokio::test]
async fn test_settings_success_does_not_touch_local_storage() {
    let remote = json!({"newPayroll": true});
    let harness = Harness::new(ScriptedGateway::new(vec![Ok(ResponsePayload::Json(remote.clone()))]));

    assert_eq!(harness.api.get_feature_flags().await.unwrap(), remote);
    assert!(harness.durable.is_empty());
}

#[tokio::test]
async fn test_unauthorized_never_falls_back() {
    let harness = Harness::new(ScriptedGateway::failing(ApiError::Unauthorized("expired".into())));

    let write = harness.api.update_ai_config(json!({"provider": "local"})).await.unwrap_err();
    let read = harness.api.get_ai_config().await.unwrap_err();

    assert!(write.is_unauthorized());
    assert!(read.is_unauthorized());
    assert!(harness.durable.is_empty());
}

#[tokio::test]
async fn test_rate_limit_rejection_propagates_from_settings_operations() {
    let rejection = ApiError::RateLimitExceeded { wait_ms: 750 };
    let harness = Harness::new(ScriptedGateway::failing(rejection.clone()));

    let write = harness.api.update_feature_flags(json!({"beta": true})).await.unwrap_err();
    let read = harness.api.get_feature_flags().await.unwrap_err();
    let create = harness.api.create_webhook(json!({"url": "https://hooks.example/hr"})).await;

    assert_eq!(write, rejection);
    assert_eq!(read, rejection);
    assert_eq!(create.unwrap_err(), rejection);
    assert!(harness.durable.is_empty());
}

#[tokio::test]
async fn test_local_fault_propagates_from_settings_read() {
    let fault = ApiError::Config("invalid request URL".into());
    let harness = Harness::new(ScriptedGateway::failing(fault.clone()));

    assert_eq!(harness.api.get_notification_config().await.unwrap_err(), fault);
    assert!(harness.durable.is_empty());
}

// ============================================================================
// Domain data
// ============================================================================

#[tokio::test]
async fn test_entity_failure_propagates_without_local_write() {
    let failure = ApiError::Remote { status: 500, body: "{\"error\":\"boom\"}".into() };
    let harness = Harness::new(ScriptedGateway::failing(failure.clone()));

    let err = harness
        .api
        .save_entity(EntityKind::Candidates, None, json!({"fullName": "Ada"}))
        .await
        .unwrap_err();

    assert_eq!(err, failure);
    assert!(harness.durable.is_empty());
}

#[tokio::test]
async fn test_save_entity_chooses_method_by_id() {
    let harness = Harness::new(ScriptedGateway::new(Vec::new()));

    harness.api.save_entity(EntityKind::Departments, None, json!({"name": "Ops"})).await.unwrap();
    harness.api.save_entity(EntityKind::Departments, Some("d1"), json!({"name": "Ops"})).await.unwrap();

    let requests = harness.gateway.requests();
    assert_eq!((requests[0].method(), requests[0].path()), (HttpMethod::Post, "/departments"));
    assert_eq!((requests[1].method(), requests[1].path()), (HttpMethod::Put, "/departments/d1"));
    assert_eq!(requests[1].body(), &RequestBody::Json(json!({"name": "Ops"})));
}

#[tokio::test]
async fn test_list_keeps_query_order() {
    let harness = Harness::new(ScriptedGateway::new(Vec::new()));

    harness
        .api
        .list_entities(EntityKind::LeaveRequests, &[("status", "pending"), ("page", "2")])
        .await
        .unwrap();

    let request = &harness.gateway.requests()[0];
    assert_eq!(
        request.query(),
        &[("status".to_owned(), "pending".to_owned()), ("page".to_owned(), "2".to_owned())]
    );
}

#[tokio::test]
async fn test_upload_sends_binary_body() {
    let harness = Harness::new(ScriptedGateway::new(Vec::new()));

    harness
        .api
        .upload_attachment(EntityKind::Employees, "7", vec![0x25, 0x50], Some("application/pdf".into()))
        .await
        .unwrap();

    let request = &harness.gateway.requests()[0];
    assert_eq!(request.path(), "/employees/7/attachments");
    assert!(request.body().is_binary());
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_login_stores_token_and_tenant() {
    let harness = Harness::new(ScriptedGateway::new(vec![Ok(ResponsePayload::Json(
        json!({"accessToken": "tok-1", "tenantId": "acme"}),
    ))]));

    let session = harness
        .api
        .login(&LoginCredentials::new("ops@acme.test", "pw"), Durability::Persistent)
        .await
        .unwrap();

    assert_eq!(session.token.as_deref(), Some("tok-1"));
    assert_eq!(session.tenant_id.as_deref(), Some("acme"));
    assert_eq!(session.durability, Durability::Persistent);
    assert!(!harness.durable.is_empty());
}

#[tokio::test]
async fn test_login_without_token_is_unauthorized() {
    let harness = Harness::new(ScriptedGateway::new(vec![Ok(ResponsePayload::Json(json!({})))]));

    let err = harness
        .api
        .login(&LoginCredentials::new("ops@acme.test", "pw"), Durability::Ephemeral)
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!harness.api.current_session().is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_even_when_remote_fails() {
    let harness = Harness::new(ScriptedGateway::failing(network_down()));
    harness.credentials.set_token("tok", Durability::Persistent).unwrap();
    harness.api.switch_tenant(Some("acme")).unwrap();

    let previous = harness.api.logout().await;

    assert_eq!(previous.tenant_id.as_deref(), Some("acme"));
    assert!(!harness.api.current_session().is_authenticated());
    assert_eq!(harness.gateway.requests()[0].path(), "/auth/logout");
    assert!(harness.durable.is_empty());
}

#[tokio::test]
async fn test_health_check_maps_remote_status_to_false() {
    let harness = Harness::new(ScriptedGateway::new(vec![
        Ok(ResponsePayload::Text("ok".into())),
        Err(ApiError::Remote { status: 503, body: String::new() }),
        Err(network_down()),
    ]));

    assert!(harness.api.health_check().await.unwrap());
    assert!(!harness.api.health_check().await.unwrap());
    assert!(harness.api.health_check().await.is_err());
}
