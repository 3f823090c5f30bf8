//! Shared fixtures for infra integration tests.

#![allow(dead_code)]

use tempfile::TempDir;
use workbase_domain::Config;
use workbase_infra::WorkbaseClient;
use wiremock::MockServer;

/// A client wired against a mock server, with its database in a temp dir.
pub struct TestClient {
    pub client: WorkbaseClient,
    pub server: MockServer,
    pub config: Config,
    _temp_dir: TempDir,
}

impl TestClient {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start a mock server and build a client, letting the test adjust the
    /// configuration first.
    pub async fn start_with(adjust: impl FnOnce(&mut Config)) -> Self {
        let server = MockServer::start().await;
        let temp_dir = TempDir::new().expect("temp dir should be created");

        let mut config = Config::default();
        config.api.base_url = format!("{}/api", server.uri());
        config.retry.max_attempts = 3;
        config.retry.base_delay_ms = 10;
        config.retry.per_attempt_timeout_ms = 2_000;
        config.storage.database_path =
            temp_dir.path().join("workbase.db").display().to_string();
        adjust(&mut config);

        let client = WorkbaseClient::from_config(&config).expect("client should build");
        Self { client, server, config, _temp_dir: temp_dir }
    }

    /// Requests the mock server has seen so far.
    pub async fn received(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}
