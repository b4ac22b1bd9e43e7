use atlasctl_core::Config;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, shells};
use tracing::{debug, error, info, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod connection;
mod error;
mod output;

use cli::{Cli, Commands};
use connection::ConnectionManager;
use error::Result as CliResult;

fn init_tracing(verbose: u8) {
    // RUST_LOG wins over the verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "atlasctl=warn,atlasctl_core=warn",
            1 => "atlasctl=info,atlasctl_core=info",
            2 => "atlasctl=debug,atlasctl_core=debug",
            _ => "atlasctl=trace,atlasctl_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

fn load_connection_manager(config_file: Option<&str>) -> CliResult<ConnectionManager> {
    let (config, config_path) = if let Some(config_file) = config_file {
        let path = std::path::PathBuf::from(config_file);
        debug!("Loading config from explicit path: {:?}", path);
        (Config::load_from_path(&path)?, Some(path))
    } else {
        debug!("Loading config from default location");
        (Config::load()?, None)
    };
    Ok(ConnectionManager::with_config_path(config, config_path))
}

async fn execute_command(cli: &Cli, conn_mgr: &mut ConnectionManager) -> CliResult<()> {
    let command = format_command(&cli.command);
    trace!(
        "Executing command: {} (profile: {:?}, output: {:?})",
        command, cli.profile, cli.output
    );
    info!("Command: {}", command);

    let profile = cli.profile.as_deref();
    let start = std::time::Instant::now();
    let result = match &cli.command {
        Commands::Version => {
            debug!("Showing version information");
            let format = cli.output.resolve();
            if format.is_table() {
                println!("atlasctl {}", env!("CARGO_PKG_VERSION"));
            } else {
                let output_data = serde_json::json!({
                    "version": env!("CARGO_PKG_VERSION"),
                    "name": env!("CARGO_PKG_NAME"),
                });
                output::print_output(&output_data, format)?;
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            debug!("Generating completions for {:?}", shell);
            generate_completions(*shell);
            Ok(())
        }
        Commands::Profile(cmd) => {
            commands::profile::handle_profile_command(cmd, conn_mgr, cli.output).await
        }
        Commands::Org(cmd) => {
            commands::org::handle_org_command(cmd, conn_mgr, profile, cli.output).await
        }
        Commands::Project(cmd) => {
            commands::project::handle_project_command(cmd, conn_mgr, profile, cli.output).await
        }
        Commands::Cluster(cmd) => {
            commands::cluster::handle_cluster_command(cmd, conn_mgr, profile, cli.output).await
        }
        Commands::User(cmd) => {
            commands::user::handle_user_command(cmd, conn_mgr, profile, cli.output).await
        }
        Commands::DbUser(cmd) => {
            commands::db_user::handle_db_user_command(cmd, conn_mgr, profile, cli.output).await
        }
        Commands::Process(cmd) => {
            commands::process::handle_process_command(cmd, conn_mgr, profile, cli.output).await
        }
    };

    let duration = start.elapsed();
    match &result {
        Ok(_) => info!("Command completed successfully in {:?}", duration),
        Err(e) => error!("Command failed after {:?}: {}", duration, e),
    }

    result
}

/// Generate shell completions
fn generate_completions(shell: cli::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    match shell {
        cli::Shell::Bash => generate(shells::Bash, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Zsh => generate(shells::Zsh, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Fish => generate(shells::Fish, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::PowerShell => {
            generate(shells::PowerShell, &mut cmd, name, &mut std::io::stdout())
        }
        cli::Shell::Elvish => generate(shells::Elvish, &mut cmd, name, &mut std::io::stdout()),
    }
}

/// Format command for human-readable logging (without sensitive data)
fn format_command(command: &Commands) -> String {
    match command {
        Commands::Version => "version".to_string(),
        Commands::Completions { shell } => format!("completions {:?}", shell),
        Commands::Profile(cmd) => {
            use cli::ProfileCommands::*;
            match cmd {
                List => "profile list".to_string(),
                Path => "profile path".to_string(),
                Show { name } => format!("profile show {}", name),
                Set { name, .. } => format!("profile set {} [credentials redacted]", name),
                Remove { name } => format!("profile remove {}", name),
                Default { name } => format!("profile default {}", name),
            }
        }
        Commands::Org(cmd) => format!("org {:?}", cmd),
        Commands::Project(cmd) => format!("project {:?}", cmd),
        Commands::Cluster(cmd) => format!("cluster {:?}", cmd),
        Commands::User(cmd) => format!("user {:?}", cmd),
        Commands::DbUser(cmd) => format!("db-user {:?}", cmd),
        Commands::Process(cmd) => format!("process {:?}", cmd),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match load_connection_manager(cli.config_file.as_deref()) {
        Ok(mut conn_mgr) => execute_command(&cli, &mut conn_mgr).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        e.print_diagnostic();
        std::process::exit(1);
    }
}
