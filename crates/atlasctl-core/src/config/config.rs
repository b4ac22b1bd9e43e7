//! Profile configuration for atlasctl
//!
//! Profiles are stored as TOML. Each names an Atlas API username, its API key
//! (plaintext or a `keyring:` reference) and the base URL to talk to.

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::credential::CredentialStore;
use super::error::{ConfigError, Result};
use crate::api::DEFAULT_BASE_URL;

/// Environment variable overriding the profile username
pub const ENV_USERNAME: &str = "ATLAS_USERNAME";
/// Environment variable overriding the profile API key
pub const ENV_API_KEY: &str = "ATLAS_API_KEY";
/// Environment variable overriding the profile base URL
pub const ENV_BASE_URL: &str = "ATLAS_BASE_URL";

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Profile used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Individual profile configuration
#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct Profile {
    /// Atlas API username (the public key of a programmatic API key)
    pub username: String,
    /// API key, plaintext or `keyring:<key>`
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Profile values after keyring and environment resolution
#[derive(Clone, PartialEq)]
pub struct ResolvedCredentials {
    pub username: String,
    pub api_key: String,
    pub base_url: String,
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keyring references name an entry, not the secret itself
        let api_key = if self.uses_keyring() {
            self.api_key.as_str()
        } else {
            "<redacted>"
        };
        f.debug_struct("Profile")
            .field("username", &self.username)
            .field("api_key", &api_key)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl std::fmt::Debug for ResolvedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredentials")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Profile {
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
            base_url: default_base_url(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether the API key is held in the OS keyring
    pub fn uses_keyring(&self) -> bool {
        CredentialStore::is_keyring_reference(&self.api_key)
    }

    /// Resolve keyring references and, when `env_override` is set, the
    /// `ATLAS_*` environment variables
    pub fn resolve_credentials(&self, env_override: bool) -> Result<ResolvedCredentials> {
        let store = CredentialStore::default();
        let env = |var: &'static str| env_override.then_some(var);

        let username = store
            .get_credential(&self.username, env(ENV_USERNAME))
            .map_err(|e| {
                ConfigError::CredentialError(format!("Failed to resolve username: {}", e))
            })?;
        let api_key = store
            .get_credential(&self.api_key, env(ENV_API_KEY))
            .map_err(|e| {
                ConfigError::CredentialError(format!("Failed to resolve API key: {}", e))
            })?;
        let base_url = store
            .get_credential(&self.base_url, env(ENV_BASE_URL))
            .map_err(|e| {
                ConfigError::CredentialError(format!("Failed to resolve base URL: {}", e))
            })?;

        Ok(ResolvedCredentials {
            username,
            api_key,
            base_url,
        })
    }
}

impl Config {
    /// Resolve the profile name to use
    ///
    /// Order: `explicit_profile`, then `default_profile`, then the first
    /// profile alphabetically.
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<String> {
        if let Some(profile_name) = explicit_profile {
            return Ok(profile_name.to_string());
        }

        if let Some(ref default) = self.default_profile {
            return Ok(default.clone());
        }

        self.list_profiles()
            .first()
            .map(|(name, _)| name.to_string())
            .ok_or_else(|| ConfigError::NoProfiles {
                suggestion: "Use 'atlasctl profile set' to create a profile.".to_string(),
            })
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// A missing file yields an empty configuration.
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        let expanded_content = Self::expand_env_vars(&content);
        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Save configuration to the standard location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path, creating parent directories
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Set or update a profile
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Remove a profile, clearing the default if it pointed at it
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// List all profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Get the path to the configuration file
    ///
    /// On Linux: `~/.config/atlasctl/config.toml`. On macOS the same
    /// Linux-style path is used when it (or its directory) exists, otherwise
    /// `~/Library/Application Support/com.mongodb.atlasctl/config.toml`.
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_path = base_dirs
                    .home_dir()
                    .join(".config")
                    .join("atlasctl")
                    .join("config.toml");

                if linux_style_path.exists()
                    || linux_style_path.parent().is_some_and(|p| p.exists())
                {
                    return Ok(linux_style_path);
                }
            }
        }

        let proj_dirs =
            ProjectDirs::from("com", "mongodb", "atlasctl").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand `${VAR}` and `${VAR:-default}` references
    ///
    /// Unset variables without a default are left as written, so profiles
    /// that are never used do not need their variables set.
    ///
    /// ```toml
    /// [profiles.prod]
    /// username = "${ATLAS_PROD_USER}"
    /// api_key = "${ATLAS_PROD_KEY}"
    /// base_url = "${ATLAS_PROD_URL:-https://cloud.mongodb.com}"
    /// ```
    fn expand_env_vars(content: &str) -> String {
        shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok()).to_string()
    }
}
