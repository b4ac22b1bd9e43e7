//! # atlasctl-core
//!
//! Authenticated access to the MongoDB Atlas admin API, shared by the
//! `atlasctl` CLI.
//!
//! - [`api`]: digest-auth transport, request dispatch, typed fetch, streaming
//!   download and the [`AtlasClient`] façade
//! - [`models`]: organizations, projects, clusters, database users, processes
//!   and platform users as returned by the API
//! - [`workflows`]: operations spanning several API calls
//! - [`config`]: named profiles stored as TOML, with optional keyring storage
//!
//! ```no_run
//! use atlasctl_core::{AtlasClient, Config};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let name = config.resolve_profile(None)?;
//! let creds = config.profile(&name)?.resolve_credentials(true)?;
//!
//! let client = AtlasClient::new(&creds.base_url).with_auth(&creds.username, &creds.api_key);
//! for project in client.projects().await? {
//!     println!("{} {}", project.id, project.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod workflows;

pub use api::{AtlasClient, Dispatcher};
pub use config::{Config, ConfigError, Profile};
pub use error::{ApiError, Result};
