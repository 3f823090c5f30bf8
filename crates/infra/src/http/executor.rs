//! Resilient request executor
//!
//! The production [`RemoteGateway`]. For each call it:
//!
//! 1. asks the sliding-window limiter for admission and fails fast with a
//!    wait hint when refused (never retried here);
//! 2. snapshots the session headers once and lets descriptor headers win on
//!    collision;
//! 3. runs up to `max_attempts` attempts, each racing the transport against a
//!    per-attempt timer, sleeping `base_delay * 2^attempt` between attempts;
//! 4. treats `401` as terminal: the session is torn down and a
//!    session-invalidated signal is published before returning;
//! 5. decodes and key-normalizes successful bodies.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};
use url::Url;
use workbase_common::resilience::{Clock, RetryPolicy, SlidingWindowLimiter, SystemClock};
use workbase_core::{CredentialStore, RemoteGateway, ResponseNormalizer, SignalSink};
use workbase_domain::{
    ApiError, Config, RequestDescriptor, ResponsePayload, Signal, WorkbaseError,
};

use super::transport::{build_url, Transport, TransportRequest, TransportResponse};

/// Per-attempt result before retry classification
enum Attempt {
    Success(ResponsePayload),
    Unauthorized(TransportResponse),
    Failed(ApiError),
}

/// Executes [`RequestDescriptor`]s against the remote service
pub struct RequestExecutor<C: Clock = SystemClock> {
    base_url: Url,
    transport: Arc<dyn Transport>,
    limiter: SlidingWindowLimiter<C>,
    policy: RetryPolicy,
    credentials: Arc<CredentialStore>,
    signals: Arc<dyn SignalSink>,
    normalizer: ResponseNormalizer,
}

impl RequestExecutor<SystemClock> {
    /// Build an executor from configuration with the system clock.
    pub fn from_config(
        config: &Config,
        transport: Arc<dyn Transport>,
        credentials: Arc<CredentialStore>,
        signals: Arc<dyn SignalSink>,
    ) -> Result<Self, WorkbaseError> {
        let limiter = SlidingWindowLimiter::new(
            config.rate_limit.max_requests,
            Duration::from_millis(config.rate_limit.window_ms),
        )
        .map_err(|err| WorkbaseError::Config(err.to_string()))?;
        let policy = RetryPolicy::builder()
            .max_attempts(config.retry.max_attempts)
            .base_delay(Duration::from_millis(config.retry.base_delay_ms))
            .per_attempt_timeout(Duration::from_millis(config.retry.per_attempt_timeout_ms))
            .build()
            .map_err(|err| WorkbaseError::Config(err.to_string()))?;
        let base_url = Url::parse(&config.api.base_url).map_err(|err| {
            WorkbaseError::Config(format!("invalid api.base_url '{}': {err}", config.api.base_url))
        })?;

        Ok(Self::new(base_url, transport, limiter, policy, credentials, signals))
    }
}

impl<C: Clock> RequestExecutor<C> {
    pub fn new(
        base_url: Url,
        transport: Arc<dyn Transport>,
        limiter: SlidingWindowLimiter<C>,
        policy: RetryPolicy,
        credentials: Arc<CredentialStore>,
        signals: Arc<dyn SignalSink>,
    ) -> Self {
        Self {
            base_url,
            transport,
            limiter,
            policy,
            credentials,
            signals,
            normalizer: ResponseNormalizer,
        }
    }

    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub const fn limiter(&self) -> &SlidingWindowLimiter<C> {
        &self.limiter
    }

    /// Run one logical call through admission, retries and normalization.
    #[instrument(
        skip(self, request),
        fields(method = request.method().as_str(), path = request.path())
    )]
    pub async fn execute(&self, request: RequestDescriptor) -> Result<ResponsePayload, ApiError> {
        if !self.limiter.try_admit() {
            let wait_ms = self.limiter.remaining_wait_ms();
            warn!(wait_ms, "Rate limit exceeded, rejecting call");
            return Err(ApiError::RateLimitExceeded { wait_ms });
        }

        let transport_request = TransportRequest {
            method: request.method(),
            url: build_url(&self.base_url, request.path(), request.query())?,
            headers: merge_headers(
                self.credentials.compose_headers(request.body()),
                request.headers(),
            ),
            body: request.body().clone(),
        };

        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;
        loop {
            let started = Instant::now();
            let outcome = self.attempt_once(transport_request.clone()).await;
            let elapsed_ms = elapsed_millis(started);

            let err = match outcome {
                Attempt::Success(payload) => {
                    debug!(attempt = attempt + 1, max_attempts, elapsed_ms, outcome = "success", "Attempt finished");
                    return Ok(payload);
                }
                Attempt::Unauthorized(response) => {
                    debug!(attempt = attempt + 1, max_attempts, elapsed_ms, outcome = "unauthorized", "Attempt finished");
                    return Err(self.invalidate_session(&transport_request, &response));
                }
                Attempt::Failed(err) => err,
            };

            let final_attempt = self.policy.is_final_attempt(attempt);
            warn!(
                attempt = attempt + 1,
                max_attempts,
                elapsed_ms,
                outcome = outcome_label(&err),
                error = %err,
                final_attempt,
                "Attempt failed"
            );

            if final_attempt || !err.is_retryable() {
                return Err(err);
            }

            let delay = self.policy.backoff_after(attempt);
            debug!(delay_ms = duration_millis(delay), next_attempt = attempt + 2, "Backing off");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Race one transport exchange against the per-attempt timer.
    ///
    /// Whichever finishes first wins; the loser is dropped, which abandons
    /// local waiting on the in-flight exchange.
    async fn attempt_once(&self, request: TransportRequest) -> Attempt {
        let timeout = self.policy.per_attempt_timeout();
        let exchange = self.transport.send(request);

        let result = tokio::select! {
            result = exchange => result,
            () = tokio::time::sleep(timeout) => {
                return Attempt::Failed(ApiError::Timeout { timeout_ms: duration_millis(timeout) });
            }
        };

        match result {
            Ok(response) if response.status == 401 => Attempt::Unauthorized(response),
            Ok(response) if response.is_success() => {
                Attempt::Success(self.normalizer.normalize(decode_body(response)))
            }
            Ok(response) => Attempt::Failed(ApiError::Remote {
                status: response.status,
                body: response.body_text(),
            }),
            Err(err) => Attempt::Failed(err),
        }
    }

    fn invalidate_session(&self, request: &TransportRequest, response: &TransportResponse) -> ApiError {
        let previous = self.credentials.logout();
        let reason = format!("{} {} returned 401", request.method.as_str(), request.url.path());
        warn!(tenant_id = ?previous.tenant_id, %reason, "Session invalidated by remote");
        self.signals.publish(Signal::session_invalidated(reason.clone(), previous.tenant_id));

        let body = response.body_text();
        if body.trim().is_empty() {
            ApiError::Unauthorized(reason)
        } else {
            ApiError::Unauthorized(format!("{reason}: {body}"))
        }
    }
}

#[async_trait]
impl<C: Clock> RemoteGateway for RequestExecutor<C> {
    async fn execute(&self, request: RequestDescriptor) -> Result<ResponsePayload, ApiError> {
        Self::execute(self, request).await
    }
}

impl<C: Clock> std::fmt::Debug for RequestExecutor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url.as_str())
            .field("policy", &self.policy)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

/// Session headers overlaid with descriptor overrides.
///
/// Header names compare case-insensitively; an override replaces the session
/// value in place.
fn merge_headers(
    mut base: Vec<(String, String)>,
    overrides: &[(String, String)],
) -> Vec<(String, String)> {
    for (name, value) in overrides {
        match base.iter_mut().find(|(existing, _)| existing.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1.clone_from(value),
            None => base.push((name.clone(), value.clone())),
        }
    }
    base
}

/// Decode a successful body by content type.
///
/// JSON that fails to parse is kept as text. Unlabelled bodies are text when
/// they are valid UTF-8 and binary otherwise.
fn decode_body(response: TransportResponse) -> ResponsePayload {
    if response.body.is_empty() {
        return ResponsePayload::Empty;
    }

    let content_type = response.content_type.as_deref().unwrap_or_default().to_ascii_lowercase();
    if content_type.contains("json") {
        return match serde_json::from_slice(&response.body) {
            Ok(value) => ResponsePayload::Json(value),
            Err(err) => {
                debug!(error = %err, "JSON body did not parse, passing through as text");
                ResponsePayload::Text(response.body_text())
            }
        };
    }

    if content_type.starts_with("text/") {
        return ResponsePayload::Text(response.body_text());
    }

    if content_type.is_empty() {
        return match String::from_utf8(response.body) {
            Ok(text) => ResponsePayload::Text(text),
            Err(err) => ResponsePayload::Binary(err.into_bytes()),
        };
    }

    ResponsePayload::Binary(response.body)
}

const fn outcome_label(err: &ApiError) -> &'static str {
    match err {
        ApiError::Timeout { .. } => "timeout",
        ApiError::Network(_) => "network_error",
        ApiError::Remote { .. } => "remote_error",
        _ => "error",
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn elapsed_millis(started: Instant) -> u64 {
    duration_millis(started.elapsed())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::json;
    use workbase_common::resilience::MockClock;
    use workbase_core::{MemoryStore, SignalBus};
    use workbase_domain::{Durability, HttpMethod};

    use super::*;

    /// Scripted step: respond after `delay` with `result`
    type Step = (Duration, Result<TransportResponse, ApiError>);

    #[derive(Default)]
    struct ScriptedTransport {
        steps: Mutex<VecDeque<Step>>,
        seen: Mutex<Vec<(TransportRequest, Instant)>>,
    }

    impl ScriptedTransport {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self { steps: Mutex::new(steps.into()), seen: Mutex::default() })
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }

        fn call_gaps(&self) -> Vec<Duration> {
            let seen = self.seen.lock().unwrap();
            seen.windows(2).map(|pair| pair[1].1 - pair[0].1).collect()
        }

        fn request(&self, index: usize) -> TransportRequest {
            self.seen.lock().unwrap()[index].0.clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: TransportRequest) -> Result<TransportResponse, ApiError> {
            self.seen.lock().unwrap().push((request, Instant::now()));
            let step = self.steps.lock().unwrap().pop_front();
            let (delay, result) =
                step.unwrap_or((Duration::ZERO, Err(ApiError::Network("script exhausted".into()))));
            tokio::time::sleep(delay).await;
            result
        }
    }

    fn ok_json(body: serde_json::Value) -> Step {
        (Duration::ZERO, Ok(TransportResponse::new(200, Some("application/json"), body.to_string())))
    }

    fn network_error() -> Step {
        (Duration::ZERO, Err(ApiError::Network("connection reset".into())))
    }

    fn status(code: u16, body: &str) -> Step {
        (Duration::ZERO, Ok(TransportResponse::new(code, Some("application/json"), body)))
    }

    struct Fixture {
        executor: RequestExecutor<MockClock>,
        transport: Arc<ScriptedTransport>,
        credentials: Arc<CredentialStore>,
        bus: SignalBus,
        clock: MockClock,
    }

    fn fixture(steps: Vec<Step>, max_attempts: u32, max_requests: usize) -> Fixture {
        let transport = ScriptedTransport::new(steps);
        let credentials = Arc::new(CredentialStore::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        ));
        let bus = SignalBus::new(8);
        let clock = MockClock::new();
        let limiter =
            SlidingWindowLimiter::with_clock(max_requests, Duration::from_secs(1), clock.clone())
                .unwrap();
        let policy = RetryPolicy::new(max_attempts, Duration::from_millis(100), Duration::from_secs(1));
        let executor = RequestExecutor::new(
            Url::parse("https://hr.example.com/api").unwrap(),
            transport.clone(),
            limiter,
            policy,
            credentials.clone(),
            Arc::new(bus.clone()),
        );
        Fixture { executor, transport, credentials, bus, clock }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_transient_failures_uses_doubling_backoff() {
        let fx = fixture(vec![network_error(), network_error(), ok_json(json!({"ok": true}))], 4, 10);

        let payload = fx.executor.execute(RequestDescriptor::get("/employees").build()).await.unwrap();

        assert_eq!(payload, ResponsePayload::Json(json!({"ok": true})));
        assert_eq!(fx.transport.calls(), 3);
        assert_eq!(
            fx.transport.call_gaps(),
            vec![Duration::from_millis(100), Duration::from_millis(200)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_attempts_fail_surfaces_last_error_after_300ms() {
        let fx = fixture(vec![network_error(), network_error(), network_error()], 3, 10);
        let started = Instant::now();

        let err = fx.executor.execute(RequestDescriptor::get("/departments").build()).await.unwrap_err();

        assert_eq!(err, ApiError::Network("connection reset".into()));
        assert_eq!(fx.transport.calls(), 3);
        assert_eq!(started.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_error_exhausts_retries() {
        let fx = fixture(
            vec![status(503, "{}"), status(500, "{\"error\":\"db down\"}")],
            2,
            10,
        );

        let err = fx.executor.execute(RequestDescriptor::get("/candidates").build()).await.unwrap_err();

        assert_eq!(err, ApiError::Remote { status: 500, body: "{\"error\":\"db down\"}".into() });
        assert_eq!(fx.transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_attempts_time_out_and_retry() {
        let slow = (Duration::from_secs(5), Ok(TransportResponse::new(200, None, "late")));
        let fx = fixture(vec![slow.clone(), slow, ok_json(json!([]))], 3, 10);
        let started = Instant::now();

        let payload = fx.executor.execute(RequestDescriptor::get("/payroll-runs").build()).await.unwrap();

        assert_eq!(payload, ResponsePayload::Json(json!([])));
        // Two 1s timeouts plus 100ms and 200ms of backoff.
        assert_eq!(started.elapsed(), Duration::from_millis(2_300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_final_timeout_is_reported_as_timeout() {
        let slow = (Duration::from_secs(5), Ok(TransportResponse::new(200, None, "late")));
        let fx = fixture(vec![slow], 1, 10);

        let err = fx.executor.execute(RequestDescriptor::get("/health").build()).await.unwrap_err();

        assert_eq!(err, ApiError::Timeout { timeout_ms: 1_000 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_unauthorized_tears_down_session_without_retry() {
        let fx = fixture(vec![status(401, ""), ok_json(json!({}))], 3, 10);
        fx.credentials.set_token("stale", Durability::Persistent).unwrap();
        fx.credentials.set_tenant_id(Some("acme")).unwrap();
        let mut signals = fx.bus.subscribe();

        let err = fx.executor.execute(RequestDescriptor::get("/employees").build()).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(fx.transport.calls(), 1);
        assert!(!fx.credentials.session().is_authenticated());
        assert_eq!(fx.credentials.get_tenant_id(), None);
        match signals.recv().await.unwrap() {
            Signal::SessionInvalidated { tenant_id, .. } => assert_eq!(tenant_id.as_deref(), Some("acme")),
            other => panic!("expected session invalidated, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unauthorized_on_later_attempt_stops_retries() {
        let fx = fixture(vec![network_error(), status(401, "{\"error\":\"expired\"}")], 5, 10);
        fx.credentials.set_token("stale", Durability::Ephemeral).unwrap();

        let err = fx.executor.execute(RequestDescriptor::get("/employees").build()).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("expired"));
        assert_eq!(fx.transport.calls(), 2);
        assert_eq!(fx.credentials.get_token(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_rejects_without_network_call() {
        let fx = fixture(vec![ok_json(json!({})), ok_json(json!({}))], 3, 1);

        fx.executor.execute(RequestDescriptor::get("/a").build()).await.unwrap();
        let err = fx.executor.execute(RequestDescriptor::get("/b").build()).await.unwrap_err();

        let ApiError::RateLimitExceeded { wait_ms } = err else {
            panic!("expected rate limit, got {err:?}");
        };
        assert!(wait_ms > 0);
        assert_eq!(fx.transport.calls(), 1);

        fx.clock.advance_millis(1_001);
        fx.executor.execute(RequestDescriptor::get("/c").build()).await.unwrap();
        assert_eq!(fx.transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_body_is_normalized() {
        let fx = fixture(vec![ok_json(json!({"first_name": "Ada", "cost-center": {"cc_code": 7}}))], 1, 10);

        let payload = fx.executor.execute(RequestDescriptor::get("/employees/1").build()).await.unwrap();

        assert_eq!(
            payload,
            ResponsePayload::Json(json!({"firstName": "Ada", "costCenter": {"ccCode": 7}}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_headers_snapshot_and_overrides() {
        let fx = fixture(vec![ok_json(json!({}))], 1, 10);
        fx.credentials.set_token("tok", Durability::Ephemeral).unwrap();
        fx.credentials.set_tenant_id(Some("acme")).unwrap();

        let request = RequestDescriptor::builder(HttpMethod::Patch, "/employees/1")
            .header("x-tenant-id", "globex")
            .header("X-Request-Source", "import")
            .json(json!({"title": "CTO"}))
            .build();
        fx.executor.execute(request).await.unwrap();

        let sent = fx.transport.request(0);
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.url.as_str(), "https://hr.example.com/api/employees/1");
        assert!(sent.headers.contains(&("Authorization".into(), "Bearer tok".into())));
        assert!(sent.headers.contains(&("X-Tenant-ID".into(), "globex".into())));
        assert!(sent.headers.contains(&("X-Request-Source".into(), "import".into())));
        assert_eq!(sent.headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case("x-tenant-id")).count(), 1);
    }

    #[test]
    fn test_decode_body_variants() {
        assert_eq!(decode_body(TransportResponse::new(204, None, Vec::new())), ResponsePayload::Empty);
        assert_eq!(
            decode_body(TransportResponse::new(200, Some("application/json"), "not json")),
            ResponsePayload::Text("not json".into())
        );
        assert_eq!(
            decode_body(TransportResponse::new(200, Some("application/problem+json"), "{\"a_b\":1}")),
            ResponsePayload::Json(json!({"a_b": 1}))
        );
        assert_eq!(
            decode_body(TransportResponse::new(200, Some("text/csv"), "a_b,c")),
            ResponsePayload::Text("a_b,c".into())
        );
        assert_eq!(
            decode_body(TransportResponse::new(200, Some("application/pdf"), vec![0x25, 0x50])),
            ResponsePayload::Binary(vec![0x25, 0x50])
        );
        assert_eq!(
            decode_body(TransportResponse::new(200, None, vec![0xff, 0xfe])),
            ResponsePayload::Binary(vec![0xff, 0xfe])
        );
    }

    #[test]
    fn test_merge_headers_is_case_insensitive() {
        let merged = merge_headers(
            vec![("Content-Type".into(), "application/json".into())],
            &[("content-type".into(), "application/merge-patch+json".into())],
        );
        assert_eq!(merged, vec![("Content-Type".into(), "application/merge-patch+json".into())]);
    }
}
