//! Configuration and profile management
//!
// Nested config module mirrors the file layout
#![allow(clippy::module_inception)]
//!
//! # Features
//!
//! - Multiple named profiles, one per Atlas API key
//! - Optional OS keyring storage for API keys
//! - Environment variable expansion in config files
//! - Platform-specific config file locations

pub mod config;
pub mod credential;
pub mod error;

pub use config::{
    Config, ENV_API_KEY, ENV_BASE_URL, ENV_USERNAME, Profile, ResolvedCredentials,
};
pub use credential::{CredentialStorage, CredentialStore};
pub use error::{ConfigError, Result};
