//! Atlas platform user commands

use atlasctl_core::models::User;
use tabled::Tabled;

use crate::cli::{OutputFormat, UserCommands};
use crate::commands::utils::DetailRow;
use crate::connection::{ConnectionManager, client_for};
use crate::error::Result as CliResult;
use crate::output;

#[derive(Tabled)]
struct RoleRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ORG ID")]
    org_id: String,
    #[tabled(rename = "PROJECT ID")]
    project_id: String,
}

pub async fn handle_user_command(
    cmd: &UserCommands,
    conn_mgr: &ConnectionManager,
    profile: Option<&str>,
    output_format: OutputFormat,
) -> CliResult<()> {
    match cmd {
        UserCommands::Show { username } => {
            let creds = conn_mgr.resolve_credentials(profile)?;
            let username = username.as_deref().unwrap_or(&creds.username);
            let user = client_for(&creds).user_by_name(username).await?;

            let format = output_format.resolve();
            if format.is_table() {
                print_user(&user);
            } else {
                output::print_output(&user, format)?;
            }
        }
    }

    Ok(())
}

fn print_user(user: &User) {
    output::print_rows(
        vec![
            DetailRow::new("ID", &user.id),
            DetailRow::new("Username", &user.username),
            DetailRow::new("Name", format!("{} {}", user.first_name, user.last_name)),
            DetailRow::new("Email", &user.email_address),
        ],
        "",
    );

    println!();
    output::print_rows(
        user.roles
            .iter()
            .map(|role| RoleRow {
                name: role.role_name.clone(),
                org_id: role.org_id.clone().unwrap_or_else(|| "-".to_string()),
                project_id: role.group_id.clone().unwrap_or_else(|| "-".to_string()),
            })
            .collect(),
        "No roles assigned",
    );
}
