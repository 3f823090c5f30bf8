//! Transport seam
//!
//! A [`Transport`] performs exactly one HTTP exchange and reports the raw
//! status and body. Retries, timeouts and status classification belong to the
//! executor, so a transport never retries on its own.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as ReqwestClient, Method};
use tracing::trace;
use url::Url;
use workbase_domain::{ApiError, HttpMethod, RequestBody, WorkbaseError};

use crate::errors::conversions::transport_error;
use crate::errors::InfraError;

/// One fully resolved outbound request
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

/// Raw response as received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self { status, content_type: content_type.map(str::to_owned), body: body.into() }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Body as text, replacing invalid UTF-8
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Performs a single HTTP exchange.
///
/// Only failures that prevent a status line from arriving are errors;
/// every received status, including `401` and `5xx`, is a successful return.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, ApiError>;
}

/// Build the absolute URL for `path` under `base`.
///
/// `path` is appended to the base path rather than resolved against it, so a
/// base of `https://host/api` keeps its `/api` prefix. Query pairs keep their
/// order and are percent-encoded.
pub fn build_url(base: &Url, path: &str, query: &[(String, String)]) -> Result<Url, ApiError> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined)
        .map_err(|err| ApiError::Config(format!("invalid request URL '{joined}': {err}")))?;

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

/// reqwest-backed transport.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    /// Build a transport; `user_agent` is sent on every request when set.
    pub fn new(user_agent: Option<&str>) -> Result<Self, WorkbaseError> {
        let mut builder = ReqwestClient::builder().no_proxy().connect_timeout(Duration::from_secs(10));

        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent.to_owned());
        }

        let client = builder.build().map_err(|err| WorkbaseError::from(InfraError::from(err)))?;
        Ok(Self { client })
    }

    pub fn from_client(client: ReqwestClient) -> Self {
        Self { client }
    }
}

const fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, ApiError> {
        let mut builder = self.client.request(reqwest_method(request.method), request.url.clone());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(value.to_string()),
            RequestBody::Binary { bytes, content_type } => {
                let builder = match content_type {
                    Some(content_type) => builder.header(CONTENT_TYPE, content_type),
                    None => builder,
                };
                builder.body(bytes)
            }
        };

        let response = builder.send().await.map_err(|err| transport_error(&err))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await.map_err(|err| transport_error(&err))?.to_vec();

        trace!(status, bytes = body.len(), url = %request.url, "HTTP exchange complete");
        Ok(TransportResponse { status, content_type, body })
    }
}
