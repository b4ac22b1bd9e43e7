//! CLI structure and command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::output;

/// Command-line client for the MongoDB Atlas admin API
#[derive(Parser, Debug)]
#[command(name = "atlasctl")]
#[command(version, about = "Command-line client for the MongoDB Atlas admin API")]
#[command(long_about = "
Command-line client for the MongoDB Atlas admin API

Requests are authenticated with an Atlas programmatic API key using HTTP
digest authentication.

EXAMPLES:
    # Store an API key in a profile
    atlasctl profile set prod --username abcdefgh --api-key 01234567-89ab-cdef-0123-456789abcdef

    # List organizations and their projects
    atlasctl org list
    atlasctl org projects 5a0a1e7e0f2912c554080adc

    # Clusters of a project, as JSON
    atlasctl cluster list --project-id 5a0a1e7e0f2912c554080ae6 -o json

    # Download the mongod log of a process
    atlasctl process log --project-id 5a0a1e7e0f2912c554080ae6 \\
        --process-id cluster0-shard-00-00.example.net --log-type mongodb

For more help on a specific command, run:
    atlasctl <command> --help
")]
pub struct Cli {
    /// Profile to use for this command
    #[arg(long, short, global = true, env = "ATLASCTL_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, global = true, env = "ATLASCTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table for humans
    Auto,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Human-readable table format
    Table,
}

impl OutputFormat {
    /// Resolve `auto` to a concrete rendering
    pub fn resolve(self) -> output::OutputFormat {
        match self {
            OutputFormat::Json => output::OutputFormat::Json,
            OutputFormat::Yaml => output::OutputFormat::Yaml,
            OutputFormat::Auto | OutputFormat::Table => output::OutputFormat::Table,
        }
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Profile management
    #[command(subcommand, visible_alias = "prof")]
    Profile(ProfileCommands),

    /// Organizations
    #[command(subcommand, visible_alias = "orgs")]
    Org(OrgCommands),

    /// Projects (groups)
    #[command(subcommand, visible_alias = "group")]
    Project(ProjectCommands),

    /// Clusters of a project
    #[command(subcommand)]
    Cluster(ClusterCommands),

    /// Atlas platform users
    #[command(subcommand)]
    User(UserCommands),

    /// Database users of a project
    #[command(subcommand)]
    DbUser(DbUserCommands),

    /// Processes of a project and their logs
    #[command(subcommand)]
    Process(ProcessCommands),

    /// Version information
    #[command(visible_alias = "ver")]
    Version,

    /// Generate shell completions
    #[command(visible_alias = "comp")]
    #[command(after_help = "EXAMPLES:
    # Bash
    atlasctl completions bash > ~/.local/share/bash-completion/completions/atlasctl

    # Zsh
    atlasctl completions zsh > ~/.zfunc/_atlasctl
")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion generation
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bourne Again Shell
    Bash,
    /// Z Shell
    Zsh,
    /// Friendly Interactive Shell
    Fish,
    /// PowerShell
    #[value(name = "powershell", alias = "power-shell")]
    PowerShell,
    /// Elvish
    Elvish,
}

/// Profile management commands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List all configured profiles
    #[command(visible_alias = "ls")]
    List,

    /// Show the path to the configuration file
    Path,

    /// Show details of a specific profile
    #[command(visible_alias = "get")]
    Show {
        /// Profile name to show
        name: String,
    },

    /// Set or create a profile
    #[command(visible_alias = "add")]
    #[command(after_help = "EXAMPLES:
    # API key given on the command line
    atlasctl profile set prod --username abcdefgh --api-key 01234567-89ab-cdef-0123-456789abcdef

    # API key prompted for, then stored in the OS keyring
    atlasctl profile set prod --username abcdefgh --use-keyring

    # Point a profile at another Atlas endpoint
    atlasctl profile set local --username dev --api-key dev --base-url http://localhost:8080
")]
    Set {
        /// Profile name
        name: String,

        /// Atlas API username (public key)
        #[arg(long)]
        username: String,

        /// Atlas API key (private key); prompted for when omitted
        #[arg(long)]
        api_key: Option<String>,

        /// Atlas base URL
        #[arg(long, default_value = atlasctl_core::api::DEFAULT_BASE_URL)]
        base_url: String,

        /// Store the API key in the OS keyring
        #[cfg(feature = "secure-storage")]
        #[arg(long)]
        use_keyring: bool,
    },

    /// Remove a profile
    #[command(visible_alias = "rm")]
    Remove {
        /// Profile name to remove
        name: String,
    },

    /// Make a profile the default
    Default {
        /// Profile name
        name: String,
    },
}

/// Organization commands
#[derive(Subcommand, Debug)]
pub enum OrgCommands {
    /// List all organizations visible to the API key
    #[command(visible_alias = "ls")]
    List,

    /// Show one organization
    Get {
        /// Organization ID
        org_id: String,
    },

    /// List the projects of an organization
    Projects {
        /// Organization ID
        org_id: String,
    },

    /// Organizations where the profile user holds an ORG_* role
    Mine {
        /// Username to look up (defaults to the profile username)
        #[arg(long)]
        username: Option<String>,
    },
}

/// Project commands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List projects
    #[command(visible_alias = "ls")]
    List {
        /// Only projects of this organization
        #[arg(long)]
        org_id: Option<String>,
    },

    /// Show a project by ID
    Get {
        /// Project ID
        project_id: String,
    },

    /// Show a project by name
    GetByName {
        /// Project name
        name: String,
    },
}

/// Cluster commands
#[derive(Subcommand, Debug)]
pub enum ClusterCommands {
    /// List the clusters of a project
    #[command(visible_alias = "ls")]
    List {
        /// Project ID
        #[arg(long)]
        project_id: String,
    },
}

/// Platform user commands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Show a user and their roles
    Show {
        /// Username (defaults to the profile username)
        username: Option<String>,
    },
}

/// Database user commands
#[derive(Subcommand, Debug)]
pub enum DbUserCommands {
    /// List the database users of a project
    #[command(visible_alias = "ls")]
    List {
        /// Project ID
        #[arg(long)]
        project_id: String,
    },

    /// Delete a database user from the admin database
    #[command(visible_alias = "rm")]
    Delete {
        /// Project ID
        #[arg(long)]
        project_id: String,

        /// Database username
        username: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

/// Process commands
#[derive(Subcommand, Debug)]
pub enum ProcessCommands {
    /// List the processes of a project
    #[command(visible_alias = "ls")]
    List {
        /// Project ID
        #[arg(long)]
        project_id: String,
    },

    /// Download the compressed log of a process
    Log {
        /// Project ID
        #[arg(long)]
        project_id: String,

        /// Process hostname
        #[arg(long)]
        process_id: String,

        /// Log to download
        #[arg(long, value_enum)]
        log_type: LogType,

        /// Directory to write the log into (defaults to the current directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

/// Log files Atlas serves per process
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogType {
    Mongodb,
    Mongos,
    Mongosqld,
    MongodbAuditLog,
    MongosAuditLog,
}

impl LogType {
    /// Name of the compressed log file on the server
    pub fn file_name(self) -> String {
        let name = match self {
            LogType::Mongodb => "mongodb",
            LogType::Mongos => "mongos",
            LogType::Mongosqld => "mongosqld",
            LogType::MongodbAuditLog => "mongodb-audit-log",
            LogType::MongosAuditLog => "mongos-audit-log",
        };
        format!("{}.gz", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_auto_resolves_to_table() {
        assert_eq!(OutputFormat::Auto.resolve(), output::OutputFormat::Table);
        assert_eq!(OutputFormat::Json.resolve(), output::OutputFormat::Json);
    }

    #[test]
    fn test_log_type_file_names() {
        assert_eq!(LogType::Mongodb.file_name(), "mongodb.gz");
        assert_eq!(LogType::MongosAuditLog.file_name(), "mongos-audit-log.gz");
    }

    #[test]
    fn test_parse_process_log() {
        let cli = Cli::try_parse_from([
            "atlasctl",
            "process",
            "log",
            "--project-id",
            "p1",
            "--process-id",
            "host-00",
            "--log-type",
            "mongodb-audit-log",
        ])
        .unwrap();

        match cli.command {
            Commands::Process(ProcessCommands::Log { log_type, .. }) => {
                assert_eq!(log_type, LogType::MongodbAuditLog)
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_db_user_delete_requires_project() {
        let result = Cli::try_parse_from(["atlasctl", "db-user", "delete", "app"]);
        assert!(result.is_err());
    }
}
