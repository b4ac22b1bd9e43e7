//! Digest-authentication transport
//!
//! The Atlas API authenticates with HTTP digest: the first request is
//! answered with `401` and a `WWW-Authenticate: Digest ...` challenge, and the
//! client re-issues the request with an `Authorization` header computed from
//! the challenge. [`DigestTransport`] performs that handshake for every
//! request it executes.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue, WWW_AUTHENTICATE};
use reqwest::{Client, Request, Response, StatusCode};
use std::fmt;
use tracing::{debug, trace};

/// Executes requests on behalf of the dispatcher
///
/// Implementations may issue more than one HTTP exchange per call (e.g. to
/// answer an authentication challenge) but must hand back exactly one final
/// response.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn execute(&self, http: &Client, request: Request) -> reqwest::Result<Response>;
}

/// API username and secret
#[derive(Clone)]
pub struct Credentials {
    username: String,
    secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Transport answering digest challenges with bound credentials
#[derive(Debug, Clone)]
pub struct DigestTransport {
    credentials: Credentials,
}

impl DigestTransport {
    pub fn bind(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(username, secret),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Compute the `Authorization` value answering `challenge` for `request`
    fn authorization(&self, challenge: &str, request: &Request) -> Option<HeaderValue> {
        let mut prompt = match digest_auth::parse(challenge) {
            Ok(prompt) => prompt,
            Err(e) => {
                debug!("Ignoring unparseable digest challenge: {}", e);
                return None;
            }
        };

        let url = request.url();
        let uri = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        let context = digest_auth::AuthContext::new_with_method(
            self.credentials.username.as_str(),
            self.credentials.secret.as_str(),
            uri.as_str(),
            // Only consulted for qop="auth-int"
            request.body().and_then(|body| body.as_bytes()),
            digest_auth::HttpMethod::from(request.method().as_str()),
        );

        let answer = match prompt.respond(&context) {
            Ok(answer) => answer,
            Err(e) => {
                debug!("Failed to answer digest challenge: {}", e);
                return None;
            }
        };

        HeaderValue::from_str(&answer.to_header_string()).ok()
    }
}

#[async_trait]
impl Transport for DigestTransport {
    async fn execute(&self, http: &Client, request: Request) -> reqwest::Result<Response> {
        // Keep a copy for the authenticated retry before `request` is consumed
        let retry = request.try_clone();

        let response = http.execute(request).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Some(mut retry) = retry else {
            debug!("Request body cannot be replayed, returning challenge response");
            return Ok(response);
        };

        let Some(challenge) = digest_challenge(&response) else {
            trace!("401 without a digest challenge");
            return Ok(response);
        };

        let Some(authorization) = self.authorization(&challenge, &retry) else {
            return Ok(response);
        };

        trace!(
            "Answering digest challenge for {} {}",
            retry.method(),
            retry.url()
        );
        retry.headers_mut().insert(AUTHORIZATION, authorization);
        drop(response);

        http.execute(retry).await
    }
}

/// First `WWW-Authenticate` header using the digest scheme
fn digest_challenge(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(WWW_AUTHENTICATE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| {
            value
                .get(..6)
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("digest"))
        })
        .map(str::to_string)
}
