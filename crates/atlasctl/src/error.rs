//! Error types for atlasctl
//!
//! Every failure that reaches `main` is a [`CliError`], printed as a
//! cargo-style diagnostic with suggestions for fixing it.

use atlasctl_core::{ApiError, ConfigError};
use colored::Colorize;
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: Profile 'prod' not found
///
///   tip: List available profiles: atlasctl profile list
/// ```
pub struct CliDiagnostic {
    message: String,
    detail: Option<String>,
    tips: Vec<(String, Vec<String>)>,
}

impl CliDiagnostic {
    /// Start a new error diagnostic with the given message.
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            detail: None,
            tips: Vec::new(),
        }
    }

    /// Add a detail line below the error message.
    pub fn detail(mut self, text: &str) -> Self {
        self.detail = Some(text.to_string());
        self
    }

    /// Add a tip with optional example commands.
    pub fn tip(mut self, description: &str, commands: &[&str]) -> Self {
        self.tips.push((
            description.to_string(),
            commands.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        if let Some(detail) = &self.detail {
            eprintln!("  {}", detail);
        }

        for (description, commands) in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
            for cmd in commands {
                eprintln!("      {}", cmd);
            }
        }
    }
}

/// Main error type for the atlasctl application
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("No profile configured. Use 'atlasctl profile set' to configure a profile.")]
    NoProfileConfigured,

    #[error("Missing credentials for profile '{name}'")]
    MissingCredentials { name: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("API error: {message}")]
    ApiError { message: String },

    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("File error for '{path}': {message}")]
    FileError { path: String, message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for atlasctl operations
pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            CliError::ProfileNotFound { name } => vec![
                "List available profiles: atlasctl profile list".to_string(),
                format!(
                    "Create profile '{}': atlasctl profile set {} --username <user>",
                    name, name
                ),
            ],
            CliError::NoProfileConfigured => vec![
                "Create a profile: atlasctl profile set <name> --username <user> --api-key <key>"
                    .to_string(),
                "Or export ATLAS_USERNAME and ATLAS_API_KEY".to_string(),
            ],
            CliError::MissingCredentials { name } => vec![
                format!("Update profile credentials: atlasctl profile set {}", name),
                format!("Check profile details: atlasctl profile show {}", name),
            ],
            CliError::AuthenticationFailed { .. } => vec![
                "Check your credentials: atlasctl profile show <profile>".to_string(),
                "Verify the API key is enabled and your IP is on its access list".to_string(),
            ],
            CliError::NotFound { .. } => vec![
                "Verify the resource ID is correct".to_string(),
                "Check that you're using the correct profile".to_string(),
            ],
            CliError::ConnectionError { .. } => vec![
                "Check network connectivity".to_string(),
                "Verify the base URL: atlasctl profile show <profile>".to_string(),
                "Run again with -vv to see the underlying cause".to_string(),
            ],
            CliError::InvalidInput { .. } => {
                vec!["Check the command syntax: atlasctl <command> --help".to_string()]
            }
            CliError::FileError { path, .. } => vec![
                format!("Check that the directory exists: {}", path),
                "Verify file permissions are correct".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&self.to_string());

        if let CliError::MissingCredentials { .. } = self {
            diag = diag.detail("Both a username and an API key are required.");
        }

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion, &[]);
        }

        diag.print();
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        match err {
            ApiError::AuthContextMissing | ApiError::AuthenticationFailed => {
                CliError::AuthenticationFailed { message }
            }
            ApiError::NotFound { .. } => CliError::NotFound { message },
            ApiError::CommonServerError => CliError::ConnectionError { message },
            ApiError::RequestFailed { .. } | ApiError::Decode(_) | ApiError::Io(_) => {
                CliError::ApiError { message }
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound { name },
            ConfigError::NoProfiles { .. } => CliError::NoProfileConfigured,
            other => CliError::Configuration(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::OutputError {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Configuration(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_not_found_keeps_message() {
        let err: CliError = ApiError::NotFound {
            message: "failed to find Org by ID [o2]".to_string(),
        }
        .into();
        assert!(matches!(err, CliError::NotFound { .. }));
        assert_eq!(err.to_string(), "failed to find Org by ID [o2]");
    }

    #[test]
    fn test_auth_errors_map_to_authentication_failed() {
        let err: CliError = ApiError::AuthenticationFailed.into();
        assert_eq!(
            err.to_string(),
            "Authentication failed: failed to authenticate with the Atlas API"
        );
        assert!(!err.suggestions().is_empty());

        let err: CliError = ApiError::AuthContextMissing.into();
        assert!(matches!(err, CliError::AuthenticationFailed { .. }));
    }

    #[test]
    fn test_transport_error_is_connection_error() {
        let err: CliError = ApiError::CommonServerError.into();
        assert!(matches!(err, CliError::ConnectionError { .. }));
        assert!(err.to_string().contains("an unexpected server error"));
    }

    #[test]
    fn test_request_failed_is_api_error() {
        let err: CliError = ApiError::RequestFailed {
            message: "error deleting database user 'app'".to_string(),
            status: "404 Not Found".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "API error: error deleting database user 'app': 404 Not Found"
        );
    }

    #[test]
    fn test_config_errors() {
        let err: CliError = ConfigError::ProfileNotFound {
            name: "prod".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Profile 'prod' not found");
        assert!(err.suggestions()[0].contains("atlasctl profile list"));

        let err: CliError = ConfigError::NoProfiles {
            suggestion: String::new(),
        }
        .into();
        assert!(matches!(err, CliError::NoProfileConfigured));
    }
}
