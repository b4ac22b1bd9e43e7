//! Authenticated access to the Atlas admin API
//!
//! Layering, bottom up:
//!
//! - [`transport`]: the digest-auth handshake behind the [`Transport`] trait
//! - [`dispatch`]: one request, headers, timeouts, 401 handling
//! - [`fetch`] and [`download`]: status classification plus JSON decoding or
//!   streaming to disk
//! - [`client`]: [`AtlasClient`], one method per resource operation

pub mod client;
pub mod dispatch;
pub mod download;
pub mod fetch;
pub mod transport;

pub use client::{AtlasClient, DEFAULT_BASE_URL, log_file_name};
pub use dispatch::{DEFAULT_TIMEOUT, DOWNLOAD_TIMEOUT, Dispatcher, USER_AGENT};
pub use transport::{Credentials, DigestTransport, Transport};
