//! Database user commands

use atlasctl_core::models::{DatabaseRole, DatabaseUser};
use tabled::Tabled;
use tracing::info;

use crate::cli::{DbUserCommands, OutputFormat};
use crate::commands::utils::confirm_action;
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;
use crate::output;

#[derive(Tabled)]
struct DbUserRow {
    #[tabled(rename = "USERNAME")]
    username: String,
    #[tabled(rename = "DATABASE")]
    database: String,
    #[tabled(rename = "ROLES")]
    roles: String,
}

impl From<&DatabaseUser> for DbUserRow {
    fn from(user: &DatabaseUser) -> Self {
        Self {
            username: user.username.clone(),
            database: user.database_name.clone(),
            roles: user
                .roles
                .iter()
                .map(format_role)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// `role@db` or `role@db.collection`
fn format_role(role: &DatabaseRole) -> String {
    match &role.collection_name {
        Some(collection) => format!("{}@{}.{}", role.role_name, role.database_name, collection),
        None => format!("{}@{}", role.role_name, role.database_name),
    }
}

pub async fn handle_db_user_command(
    cmd: &DbUserCommands,
    conn_mgr: &ConnectionManager,
    profile: Option<&str>,
    output_format: OutputFormat,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile)?;
    let format = output_format.resolve();

    match cmd {
        DbUserCommands::List { project_id } => {
            let users = client.database_users_by_project(project_id).await?;
            if format.is_table() {
                output::print_rows(
                    users.iter().map(DbUserRow::from).collect(),
                    "No database users found",
                );
            } else {
                output::print_output(&users, format)?;
            }
        }
        DbUserCommands::Delete {
            project_id,
            username,
            force,
        } => {
            if !force
                && !confirm_action(&format!(
                    "delete database user '{}' from project {}",
                    username, project_id
                ))?
            {
                println!("Operation cancelled");
                return Ok(());
            }

            client.delete_database_user(project_id, username).await?;
            info!("Deleted database user {} from {}", username, project_id);

            if format.is_table() {
                println!("Database user '{}' deleted.", username);
            } else {
                output::print_output(
                    serde_json::json!({
                        "project_id": project_id,
                        "username": username,
                        "deleted": true,
                    }),
                    format,
                )?;
            }
        }
    }

    Ok(())
}
