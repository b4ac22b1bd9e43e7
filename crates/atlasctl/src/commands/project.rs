//! Project commands

use atlasctl_core::models::Project;

use crate::cli::{OutputFormat, ProjectCommands};
use crate::commands::org::print_projects;
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;
use crate::output;

pub async fn handle_project_command(
    cmd: &ProjectCommands,
    conn_mgr: &ConnectionManager,
    profile: Option<&str>,
    output_format: OutputFormat,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile)?;
    let format = output_format.resolve();

    match cmd {
        ProjectCommands::List { org_id: None } => {
            print_projects(&client.projects().await?, format)?;
        }
        ProjectCommands::List {
            org_id: Some(org_id),
        } => {
            print_projects(&client.projects_by_organization(org_id).await?, format)?;
        }
        ProjectCommands::Get { project_id } => {
            print_project(client.project_by_id(project_id).await?, format)?;
        }
        ProjectCommands::GetByName { name } => {
            print_project(client.project_by_name(name).await?, format)?;
        }
    }

    Ok(())
}

fn print_project(project: Project, format: output::OutputFormat) -> CliResult<()> {
    if format.is_table() {
        print_projects(&[project], format)
    } else {
        output::print_output(&project, format)?;
        Ok(())
    }
}
