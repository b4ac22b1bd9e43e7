//! Request dispatch
//!
//! [`Dispatcher`] builds a single request, runs it through the bound
//! [`Transport`] (or plain HTTP when unbound) and folds transport and
//! authentication failures into [`ApiError`]. Status codes other than 401 are
//! left for the caller to interpret.

use reqwest::header::{CONTENT_TYPE, USER_AGENT as USER_AGENT_HEADER};
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::transport::Transport;
use crate::error::{ApiError, Result};

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("atlasctl/", env!("CARGO_PKG_VERSION"));

/// Timeout for metadata calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for log downloads
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

const JSON_CONTENT_TYPE: &str = "application/json";

/// Sends requests, optionally through an authenticating transport
#[derive(Debug, Clone)]
pub struct Dispatcher {
    http: Client,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl Dispatcher {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            transport: None,
        }
    }

    /// Same HTTP client, different transport
    pub fn with_transport(&self, transport: Arc<dyn Transport>) -> Self {
        Self {
            http: self.http.clone(),
            transport: Some(transport),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.transport.is_some()
    }

    /// Send one request and return the raw response
    ///
    /// `timeout` of `None` or zero selects [`DEFAULT_TIMEOUT`].
    pub async fn dispatch(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        auth_required: bool,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        if auth_required && self.transport.is_none() {
            return Err(ApiError::AuthContextMissing);
        }

        let timeout = effective_timeout(timeout);
        debug!("{} {} (timeout {:?})", method, url, timeout);

        let mut builder = self
            .http
            .request(method, url)
            .header(USER_AGENT_HEADER, USER_AGENT)
            .timeout(timeout);

        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(body.to_string());
        }

        let request = builder.build().map_err(|e| {
            debug!("Failed to build request: {}", e);
            ApiError::CommonServerError
        })?;

        let sent = match &self.transport {
            Some(transport) => transport.execute(&self.http, request).await,
            None => self.http.execute(request).await,
        };

        let response = sent.map_err(|e| {
            debug!("Transport failure: {}", e);
            ApiError::CommonServerError
        })?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("Server rejected credentials for {}", url);
            return Err(ApiError::AuthenticationFailed);
        }

        debug!("Response status: {}", response.status());
        Ok(response)
    }
}

fn effective_timeout(timeout: Option<Duration>) -> Duration {
    match timeout {
        Some(t) if !t.is_zero() => t,
        _ => DEFAULT_TIMEOUT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::DigestTransport;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_effective_timeout() {
        assert_eq!(effective_timeout(None), DEFAULT_TIMEOUT);
        assert_eq!(effective_timeout(Some(Duration::ZERO)), DEFAULT_TIMEOUT);
        assert_eq!(effective_timeout(Some(DOWNLOAD_TIMEOUT)), DOWNLOAD_TIMEOUT);
    }

    #[test]
    fn test_user_agent_identifies_client() {
        assert!(USER_AGENT.starts_with("atlasctl/"));
    }

    #[tokio::test]
    async fn test_auth_required_without_transport_sends_nothing() {
        let server = MockServer::start().await;
        let dispatcher = Dispatcher::default();

        let err = dispatcher
            .dispatch(Method::GET, &server.uri(), None, true, None)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::AuthContextMissing));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unauthenticated_request_allowed_when_not_required() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let response = Dispatcher::default()
            .dispatch(Method::GET, &server.uri(), None, false, None)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_json_body_sets_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"name": "dev"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let body = json!({"name": "dev"});
        let response = Dispatcher::default()
            .dispatch(
                Method::POST,
                &format!("{}/echo", server.uri()),
                Some(&body),
                false,
                None,
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_401_is_authentication_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"id": "o1"})))
            .mount(&server)
            .await;

        let dispatcher =
            Dispatcher::default().with_transport(Arc::new(DigestTransport::bind("alice", "key")));
        let err = dispatcher
            .dispatch(Method::GET, &server.uri(), None, true, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_connection_failure_is_common_server_error() {
        // Nothing listens on the discard port of localhost
        let err = Dispatcher::default()
            .dispatch(Method::GET, "http://127.0.0.1:9/", None, false, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::CommonServerError));
    }

    #[tokio::test]
    async fn test_invalid_url_is_common_server_error() {
        let err = Dispatcher::default()
            .dispatch(Method::GET, "not a url", None, false, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::CommonServerError));
    }

    #[tokio::test]
    async fn test_timeout_is_common_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let err = Dispatcher::default()
            .dispatch(
                Method::GET,
                &server.uri(),
                None,
                false,
                Some(Duration::from_millis(100)),
            )
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
