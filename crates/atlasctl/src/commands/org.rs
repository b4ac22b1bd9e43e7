//! Organization commands

use atlasctl_core::models::{Organization, Project};
use atlasctl_core::workflows::{OrgRoleListing, organization_roles};
use tabled::Tabled;
use tracing::debug;

use crate::cli::{OrgCommands, OutputFormat};
use crate::commands::utils::print_warning;
use crate::connection::{ConnectionManager, client_for};
use crate::error::Result as CliResult;
use crate::output;

#[derive(Tabled)]
struct OrgRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
}

impl From<&Organization> for OrgRow {
    fn from(org: &Organization) -> Self {
        Self {
            id: org.id.clone(),
            name: org.name.clone(),
        }
    }
}

#[derive(Tabled)]
struct OrgRoleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ROLE")]
    role: String,
}

pub async fn handle_org_command(
    cmd: &OrgCommands,
    conn_mgr: &ConnectionManager,
    profile: Option<&str>,
    output_format: OutputFormat,
) -> CliResult<()> {
    let format = output_format.resolve();

    match cmd {
        OrgCommands::List => {
            let client = conn_mgr.create_client(profile)?;
            let orgs = client.organizations().await?;
            if format.is_table() {
                output::print_rows(
                    orgs.iter().map(OrgRow::from).collect(),
                    "No organizations found",
                );
            } else {
                output::print_output(&orgs, format)?;
            }
        }
        OrgCommands::Get { org_id } => {
            let client = conn_mgr.create_client(profile)?;
            let org = client.organization_by_id(org_id).await?;
            if format.is_table() {
                output::print_rows(vec![OrgRow::from(&org)], "");
            } else {
                output::print_output(&org, format)?;
            }
        }
        OrgCommands::Projects { org_id } => {
            let client = conn_mgr.create_client(profile)?;
            let projects = client.projects_by_organization(org_id).await?;
            print_projects(&projects, format)?;
        }
        OrgCommands::Mine { username } => {
            let creds = conn_mgr.resolve_credentials(profile)?;
            let username = username.as_deref().unwrap_or(&creds.username);
            debug!("Listing organization roles of {}", username);

            let listing = organization_roles(&client_for(&creds), username).await?;
            print_org_roles(&listing, format)?;
        }
    }

    Ok(())
}

/// Projects table shared with the project commands
pub fn print_projects(projects: &[Project], format: output::OutputFormat) -> CliResult<()> {
    #[derive(Tabled)]
    struct ProjectRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "ORG ID")]
        org_id: String,
        #[tabled(rename = "REPLICA SETS")]
        replica_sets: i64,
        #[tabled(rename = "SHARDS")]
        shards: i64,
    }

    if !format.is_table() {
        output::print_output(projects, format)?;
        return Ok(());
    }

    let rows = projects
        .iter()
        .map(|p| ProjectRow {
            id: p.id.clone(),
            name: p.name.clone(),
            org_id: p.org_id.clone(),
            replica_sets: p.replica_set_count,
            shards: p.shard_count,
        })
        .collect();
    output::print_rows(rows, "No projects found");
    Ok(())
}

fn print_org_roles(listing: &OrgRoleListing, format: output::OutputFormat) -> CliResult<()> {
    if !format.is_table() {
        output::print_output(listing, format)?;
        return Ok(());
    }

    let rows = listing
        .entries
        .iter()
        .map(|entry| OrgRoleRow {
            id: entry.organization.id.clone(),
            name: entry.organization.name.clone(),
            role: entry.role_name.clone(),
        })
        .collect();
    output::print_rows(rows, "No organization roles found");

    for warning in &listing.warnings {
        print_warning(&warning.message);
    }
    Ok(())
}
