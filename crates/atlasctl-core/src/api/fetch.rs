//! Typed JSON fetch shared by every façade read

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::dispatch::Dispatcher;
use crate::error::{ApiError, Result};

/// Map a response status to success or the matching [`ApiError`]
///
/// Only 200 counts as success. On failure the response is dropped so its
/// connection is released.
pub(crate) fn check_status(
    response: Response,
    not_found_message: &str,
    failure_message: &str,
) -> Result<Response> {
    match response.status() {
        StatusCode::OK => Ok(response),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound {
            message: not_found_message.to_string(),
        }),
        status => Err(ApiError::RequestFailed {
            message: failure_message.to_string(),
            status: status.to_string(),
        }),
    }
}

impl Dispatcher {
    /// Authenticated GET of `url`, decoding a 200 body as `T`
    ///
    /// `T` is either a bare resource or an [`Envelope`](crate::models::Envelope)
    /// around a list of them.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        not_found_message: &str,
        failure_message: &str,
    ) -> Result<T> {
        let response = self.dispatch(Method::GET, url, None, true, None).await?;
        let response = check_status(response, not_found_message, failure_message)?;

        let bytes = response.bytes().await.map_err(|e| {
            debug!("Failed to read response body from {}: {}", url, e);
            ApiError::CommonServerError
        })?;
        trace!("Decoding {} bytes from {}", bytes.len(), url);

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::DigestTransport;
    use serde::Deserialize;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const NOT_FOUND: &str = "failed to find Thing [t1]";
    const FAILED: &str = "failed to fetch Thing [t1]";

    #[derive(Debug, Deserialize)]
    struct Thing {
        id: String,
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::default().with_transport(Arc::new(DigestTransport::bind("alice", "key")))
    }

    async fn serve(status: u16, body: &str) -> (MockServer, String) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/things/t1"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        let url = format!("{}/things/t1", server.uri());
        (server, url)
    }

    #[tokio::test]
    async fn test_fetch_decodes_ok_body() {
        let (_server, url) = serve(200, r#"{"id":"t1","extra":true}"#).await;

        let thing: Thing = dispatcher().fetch(&url, NOT_FOUND, FAILED).await.unwrap();
        assert_eq!(thing.id, "t1");
    }

    #[tokio::test]
    async fn test_fetch_404_uses_not_found_message() {
        let (_server, url) = serve(404, "").await;

        let err = dispatcher()
            .fetch::<Thing>(&url, NOT_FOUND, FAILED)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fetch_other_status_carries_status_line() {
        let (_server, url) = serve(503, "").await;

        let err = dispatcher()
            .fetch::<Thing>(&url, NOT_FOUND, FAILED)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some("503 Service Unavailable"));
        assert_eq!(
            err.to_string(),
            "failed to fetch Thing [t1]: 503 Service Unavailable"
        );
    }

    #[tokio::test]
    async fn test_fetch_201_is_not_success() {
        let (_server, url) = serve(201, r#"{"id":"t1"}"#).await;

        let err = dispatcher()
            .fetch::<Thing>(&url, NOT_FOUND, FAILED)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some("201 Created"));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_decode_error() {
        let (_server, url) = serve(200, "{not json").await;

        let err = dispatcher()
            .fetch::<Thing>(&url, NOT_FOUND, FAILED)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
