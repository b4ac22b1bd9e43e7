//! Connection management for Atlas API clients

use crate::error::{CliError, Result as CliResult};
use anyhow::Context;
use atlasctl_core::api::DEFAULT_BASE_URL;
use atlasctl_core::config::{ENV_API_KEY, ENV_BASE_URL, ENV_USERNAME, ResolvedCredentials};
use atlasctl_core::{AtlasClient, Config};
use std::path::PathBuf;
use tracing::{debug, info, trace};

/// Creates authenticated clients from profiles and the environment
#[derive(Clone)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl ConnectionManager {
    /// Connection manager with a custom config path
    ///
    /// An explicit path also switches off environment variable overrides.
    pub fn with_config_path(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Save the configuration to the appropriate location
    pub fn save_config(&self) -> CliResult<()> {
        if let Some(ref path) = self.config_path {
            self.config
                .save_to_path(path)
                .context("Failed to save configuration")?;
        } else {
            self.config.save().context("Failed to save configuration")?;
        }
        Ok(())
    }

    /// Path of the configuration file in use
    pub fn config_file(&self) -> Option<PathBuf> {
        self.config_path
            .clone()
            .or_else(|| Config::config_path().ok())
    }

    /// Resolve credentials for `profile_name`
    ///
    /// When --config-file is given explicitly, environment variables are
    /// ignored so that the file alone decides. Otherwise `ATLAS_USERNAME`
    /// and `ATLAS_API_KEY` together stand in for a profile, and each
    /// `ATLAS_*` variable overrides the matching profile value.
    pub fn resolve_credentials(&self, profile_name: Option<&str>) -> CliResult<ResolvedCredentials> {
        trace!("Profile name: {:?}", profile_name);

        let use_env_vars = self.config_path.is_none();
        debug!(
            "Config path: {:?}, use_env_vars: {}",
            self.config_path, use_env_vars
        );
        if !use_env_vars {
            info!("--config-file specified explicitly, ignoring environment variables");
        }

        if use_env_vars
            && profile_name.is_none()
            && let (Ok(username), Ok(api_key)) =
                (std::env::var(ENV_USERNAME), std::env::var(ENV_API_KEY))
        {
            info!("Using Atlas credentials from environment variables");
            let base_url =
                std::env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
            return Ok(ResolvedCredentials {
                username,
                api_key,
                base_url,
            });
        }

        let resolved_profile_name = self.config.resolve_profile(profile_name)?;
        info!("Using profile: {}", resolved_profile_name);

        let creds = self
            .config
            .profile(&resolved_profile_name)?
            .resolve_credentials(use_env_vars)?;

        if creds.username.is_empty() || creds.api_key.is_empty() {
            return Err(CliError::MissingCredentials {
                name: resolved_profile_name,
            });
        }

        Ok(creds)
    }

    /// Authenticated client for `profile_name`
    pub fn create_client(&self, profile_name: Option<&str>) -> CliResult<AtlasClient> {
        let creds = self.resolve_credentials(profile_name)?;
        Ok(client_for(&creds))
    }
}

/// Bind resolved credentials to a client
pub fn client_for(creds: &ResolvedCredentials) -> AtlasClient {
    info!("Connecting to Atlas API: {}", creds.base_url);
    AtlasClient::new(&creds.base_url).with_auth(&creds.username, &creds.api_key)
}
