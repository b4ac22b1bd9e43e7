//! Profile management command implementations

use crate::cli::{OutputFormat, ProfileCommands};
use crate::commands::utils::DetailRow;
use crate::connection::ConnectionManager;
use crate::error::{CliError, Result as CliResult};
use crate::output;
use anyhow::Context;
use atlasctl_core::Profile;
use atlasctl_core::config::CredentialStore;
use serde::Serialize;
use tabled::Tabled;
use tracing::{debug, info, trace};

/// Profile as shown to users; the API key is never printed
#[derive(Debug, Serialize)]
struct ProfileSummary {
    name: String,
    username: String,
    base_url: String,
    api_key: &'static str,
    is_default: bool,
}

impl ProfileSummary {
    fn new(name: &str, profile: &Profile, default: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            username: profile.username.clone(),
            base_url: profile.base_url.clone(),
            api_key: if profile.uses_keyring() {
                "keyring"
            } else {
                "plaintext"
            },
            is_default: default == Some(name),
        }
    }
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "USERNAME")]
    username: String,
    #[tabled(rename = "BASE URL")]
    base_url: String,
    #[tabled(rename = "KEY STORAGE")]
    storage: String,
}

/// Handle profile management commands
pub async fn handle_profile_command(
    profile_cmd: &ProfileCommands,
    conn_mgr: &mut ConnectionManager,
    output_format: OutputFormat,
) -> CliResult<()> {
    use ProfileCommands::*;

    match profile_cmd {
        List => handle_list(conn_mgr, output_format),
        Path => handle_path(conn_mgr, output_format),
        Show { name } => handle_show(conn_mgr, name, output_format),
        Set {
            name,
            username,
            api_key,
            base_url,
            #[cfg(feature = "secure-storage")]
            use_keyring,
        } => {
            #[cfg(feature = "secure-storage")]
            let use_keyring = *use_keyring;
            #[cfg(not(feature = "secure-storage"))]
            let use_keyring = false;

            handle_set(
                conn_mgr,
                name,
                username,
                api_key.as_deref(),
                base_url,
                use_keyring,
            )
        }
        Remove { name } => handle_remove(conn_mgr, name),
        Default { name } => handle_default(conn_mgr, name),
    }
}

fn handle_list(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    debug!("Listing all configured profiles");
    let default = conn_mgr.config.default_profile.as_deref();
    let profiles: Vec<ProfileSummary> = conn_mgr
        .config
        .list_profiles()
        .into_iter()
        .map(|(name, profile)| ProfileSummary::new(name, profile, default))
        .collect();
    trace!("Found {} profiles", profiles.len());

    let format = output_format.resolve();
    if !format.is_table() {
        let output_data = serde_json::json!({
            "config_path": conn_mgr.config_file(),
            "profiles": profiles,
            "count": profiles.len(),
        });
        output::print_output(&output_data, format)?;
        return Ok(());
    }

    if let Some(path) = conn_mgr.config_file() {
        println!("Configuration file: {}", path.display());
        println!();
    }

    if profiles.is_empty() {
        info!("No profiles configured");
        println!("No profiles configured.");
        println!("Use 'atlasctl profile set' to create a profile.");
        return Ok(());
    }

    let rows = profiles
        .into_iter()
        .map(|p| ProfileRow {
            name: if p.is_default {
                format!("{}*", p.name)
            } else {
                p.name
            },
            username: p.username,
            base_url: p.base_url,
            storage: p.api_key.to_string(),
        })
        .collect();
    output::print_rows(rows, "");
    Ok(())
}

fn handle_path(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    let path = conn_mgr
        .config_file()
        .ok_or_else(|| CliError::Configuration("Failed to determine config directory".into()))?;

    let format = output_format.resolve();
    if format.is_table() {
        println!("{}", path.display());
    } else {
        output::print_output(serde_json::json!({ "config_path": path }), format)?;
    }
    Ok(())
}

fn handle_show(
    conn_mgr: &ConnectionManager,
    name: &str,
    output_format: OutputFormat,
) -> CliResult<()> {
    let profile = conn_mgr.config.profile(name)?;
    let summary = ProfileSummary::new(
        name,
        profile,
        conn_mgr.config.default_profile.as_deref(),
    );

    let format = output_format.resolve();
    if !format.is_table() {
        output::print_output(&summary, format)?;
        return Ok(());
    }

    output::print_rows(
        vec![
            DetailRow::new("Profile", &summary.name),
            DetailRow::new("Username", &summary.username),
            DetailRow::new("API key", format!("<{}>", summary.api_key)),
            DetailRow::new("Base URL", &summary.base_url),
            DetailRow::new("Default", summary.is_default),
        ],
        "",
    );
    Ok(())
}

fn handle_set(
    conn_mgr: &mut ConnectionManager,
    name: &str,
    username: &str,
    api_key: Option<&str>,
    base_url: &str,
    use_keyring: bool,
) -> CliResult<()> {
    debug!("Setting profile {}", name);

    let api_key = match api_key {
        Some(key) => key.to_string(),
        None => rpassword::prompt_password("Enter API key: ")
            .context("Failed to read API key")?,
    };
    if api_key.trim().is_empty() {
        return Err(CliError::InvalidInput {
            message: "API key must not be empty".to_string(),
        });
    }

    let stored_key = if use_keyring {
        #[cfg(feature = "secure-storage")]
        {
            let reference = CredentialStore::keyring()
                .store_credential(&format!("{}-api-key", name), &api_key)
                .context("Failed to store API key in keyring")?;
            println!("API key stored securely in OS keyring");
            reference
        }
        #[cfg(not(feature = "secure-storage"))]
        {
            api_key
        }
    } else {
        CredentialStore::plaintext()
            .store_credential(&format!("{}-api-key", name), &api_key)
            .context("Failed to store API key")?
    };

    // Drop any keyring entry the previous version of this profile owned
    if let Some(previous) = conn_mgr.config.profiles.get(name)
        && previous.api_key != stored_key
    {
        CredentialStore::default()
            .delete_credential(&previous.api_key)
            .context("Failed to remove previous API key from keyring")?;
    }

    let profile = Profile::new(username, stored_key).with_base_url(base_url);
    conn_mgr.config.set_profile(name.to_string(), profile);
    if conn_mgr.config.default_profile.is_none() {
        conn_mgr.config.default_profile = Some(name.to_string());
    }
    conn_mgr.save_config()?;

    info!("Profile '{}' saved", name);
    println!("Profile '{}' saved successfully.", name);
    Ok(())
}

fn handle_remove(conn_mgr: &mut ConnectionManager, name: &str) -> CliResult<()> {
    let removed = conn_mgr
        .config
        .remove_profile(name)
        .ok_or_else(|| CliError::ProfileNotFound {
            name: name.to_string(),
        })?;

    CredentialStore::default()
        .delete_credential(&removed.api_key)
        .context("Failed to remove API key from keyring")?;
    conn_mgr.save_config()?;

    println!("Profile '{}' removed.", name);
    Ok(())
}

fn handle_default(conn_mgr: &mut ConnectionManager, name: &str) -> CliResult<()> {
    conn_mgr.config.profile(name)?;
    conn_mgr.config.default_profile = Some(name.to_string());
    conn_mgr.save_config()?;

    println!("Default profile set to '{}'.", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlasctl_core::Config;
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> ConnectionManager {
        ConnectionManager::with_config_path(
            Config::default(),
            Some(dir.path().join("config.toml")),
        )
    }

    #[test]
    fn test_set_then_remove_profile() {
        let dir = TempDir::new().unwrap();
        let mut conn_mgr = manager(&dir);

        handle_set(
            &mut conn_mgr,
            "local",
            "dev",
            Some("dev-key"),
            "http://localhost:8080",
            false,
        )
        .unwrap();

        let saved = Config::load_from_path(&dir.path().join("config.toml")).unwrap();
        assert_eq!(saved.default_profile.as_deref(), Some("local"));
        assert_eq!(saved.profiles["local"].api_key, "dev-key");
        assert_eq!(saved.profiles["local"].base_url, "http://localhost:8080");

        handle_remove(&mut conn_mgr, "local").unwrap();
        let saved = Config::load_from_path(&dir.path().join("config.toml")).unwrap();
        assert!(saved.profiles.is_empty());
        assert!(saved.default_profile.is_none());
    }

    #[test]
    fn test_set_rejects_blank_key() {
        let dir = TempDir::new().unwrap();
        let err = handle_set(
            &mut manager(&dir),
            "local",
            "dev",
            Some("  "),
            "http://localhost:8080",
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidInput { .. }));
    }

    #[test]
    fn test_default_requires_existing_profile() {
        let dir = TempDir::new().unwrap();
        let err = handle_default(&mut manager(&dir), "missing").unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { .. }));
    }

    #[test]
    fn test_summary_hides_key() {
        let profile = Profile::new("dev", "keyring:local-api-key");
        let summary = ProfileSummary::new("local", &profile, Some("local"));
        let rendered = serde_json::to_string(&summary).unwrap();
        assert!(!rendered.contains("local-api-key"));
        assert!(summary.is_default);
        assert_eq!(summary.api_key, "keyring");
    }
}
