//! Error handling for Atlas API access
//!
//! Every failure surfaced by [`AtlasClient`](crate::AtlasClient) is one of a
//! small, fixed set of variants. The CLI decides how to present them; the core
//! never retries or recovers locally.
//!
//! # Example
//!
//! ```rust
//! use atlasctl_core::ApiError;
//!
//! fn describe(err: &ApiError) -> &'static str {
//!     if err.is_not_found() {
//!         "missing"
//!     } else if err.is_unauthorized() {
//!         "check your API key"
//!     } else {
//!         "failed"
//!     }
//! }
//!
//! let err = ApiError::NotFound {
//!     message: "failed to find Org by ID [o2]".to_string(),
//! };
//! assert_eq!(describe(&err), "missing");
//! assert_eq!(err.to_string(), "failed to find Org by ID [o2]");
//! ```

use thiserror::Error;

/// Errors returned by the Atlas API core
#[derive(Error, Debug)]
pub enum ApiError {
    /// An authenticated call was attempted on a client with no credentials bound.
    /// Nothing was sent over the wire.
    #[error("expected to have auth context")]
    AuthContextMissing,

    /// The server answered 401
    #[error("failed to authenticate with the Atlas API")]
    AuthenticationFailed,

    /// The server answered 404
    #[error("{message}")]
    NotFound { message: String },

    /// Any other unexpected status
    #[error("{message}: {status}")]
    RequestFailed { message: String, status: String },

    /// Connection, DNS, TLS or timeout failure
    #[error("an unexpected server error has occurred")]
    CommonServerError,

    /// Response body did not match the expected JSON shape
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local file creation or write failure during a download
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Returns true if credentials were missing or rejected
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::AuthContextMissing | ApiError::AuthenticationFailed
        )
    }

    /// Returns true if the request never produced an HTTP response
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::CommonServerError)
    }

    /// Status line of the failed response, when there was one
    pub fn status(&self) -> Option<&str> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(status),
            _ => None,
        }
    }
}
