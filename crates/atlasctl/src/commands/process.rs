//! Process commands

use atlasctl_core::ApiError;
use atlasctl_core::models::Process;
use chrono::Utc;
use std::io;
use std::path::Path;
use tabled::Tabled;
use tracing::info;

use crate::cli::{OutputFormat, ProcessCommands};
use crate::commands::utils::{format_date, spinner};
use crate::connection::ConnectionManager;
use crate::error::{CliError, Result as CliResult};
use crate::output;

#[derive(Tabled)]
struct ProcessRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "REPLICA SET")]
    replica_set: String,
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "TYPE")]
    type_name: String,
    #[tabled(rename = "LAST PING")]
    last_ping: String,
}

impl ProcessRow {
    fn new(process: &Process, now: chrono::DateTime<Utc>) -> Self {
        Self {
            id: process.id.clone(),
            replica_set: process
                .replica_set_name
                .clone()
                .unwrap_or_else(|| "-".to_string()),
            version: process.version.clone(),
            type_name: process.type_name.clone(),
            last_ping: format_date(process.last_ping, now),
        }
    }
}

pub async fn handle_process_command(
    cmd: &ProcessCommands,
    conn_mgr: &ConnectionManager,
    profile: Option<&str>,
    output_format: OutputFormat,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile)?;
    let format = output_format.resolve();

    match cmd {
        ProcessCommands::List { project_id } => {
            let processes = client.processes_by_project(project_id).await?;
            if format.is_table() {
                let now = Utc::now();
                output::print_rows(
                    processes.iter().map(|p| ProcessRow::new(p, now)).collect(),
                    "No processes found",
                );
            } else {
                output::print_output(&processes, format)?;
            }
        }
        ProcessCommands::Log {
            project_id,
            process_id,
            log_type,
            output_dir,
        } => {
            let dir = output_dir.as_deref().unwrap_or(Path::new("."));
            let log_name = log_type.file_name();

            let pb = spinner(format!("Downloading {} from {}", log_name, process_id));
            let result = client
                .log_by_process_into(dir, project_id, process_id, &log_name)
                .await;
            pb.finish_and_clear();
            let path = result.map_err(|e| download_error(e, dir))?;
            info!("Wrote {} to {}", log_name, path.display());

            if format.is_table() {
                println!("Log written to {}", path.display());
            } else {
                output::print_output(serde_json::json!({ "path": path }), format)?;
            }
        }
    }

    Ok(())
}

/// Blame the output directory only for local file failures
fn download_error(err: ApiError, dir: &Path) -> CliError {
    match err {
        ApiError::Io(err) if err.kind() == io::ErrorKind::ConnectionAborted => {
            CliError::ConnectionError {
                message: format!("log download interrupted: {}", err),
            }
        }
        ApiError::Io(err) => CliError::FileError {
            path: dir.display().to_string(),
            message: err.to_string(),
        },
        other => other.into(),
    }
}
