//! Cluster commands

use atlasctl_core::models::Cluster;
use tabled::Tabled;

use crate::cli::{ClusterCommands, OutputFormat};
use crate::commands::utils::{format_state, spinner};
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;
use crate::output;

#[derive(Tabled)]
struct ClusterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "STATE")]
    state: String,
    #[tabled(rename = "PAUSED")]
    paused: bool,
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "PROVIDER")]
    provider: String,
    #[tabled(rename = "SIZE")]
    instance_size: String,
    #[tabled(rename = "REGION")]
    region: String,
}

impl From<&Cluster> for ClusterRow {
    fn from(cluster: &Cluster) -> Self {
        let provider = &cluster.provider_settings;
        Self {
            id: cluster.id.clone(),
            name: cluster.name.clone(),
            state: format_state(&cluster.state_name),
            paused: cluster.paused,
            version: cluster.mongo_db_version.clone(),
            // Shared-tier clusters report TENANT and name the real provider separately
            provider: if provider.backing_provider_name.is_empty() {
                provider.provider_name.clone()
            } else {
                provider.backing_provider_name.clone()
            },
            instance_size: provider.instance_size_name.clone(),
            region: provider.region_name.clone(),
        }
    }
}

pub async fn handle_cluster_command(
    cmd: &ClusterCommands,
    conn_mgr: &ConnectionManager,
    profile: Option<&str>,
    output_format: OutputFormat,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile)?;
    let format = output_format.resolve();

    match cmd {
        ClusterCommands::List { project_id } => {
            let pb = spinner(format!("Fetching clusters of project {}", project_id));
            let result = client.clusters_by_project(project_id).await;
            pb.finish_and_clear();
            let clusters = result?;

            if format.is_table() {
                output::print_rows(
                    clusters.iter().map(ClusterRow::from).collect(),
                    "No clusters found",
                );
            } else {
                output::print_output(&clusters, format)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlasctl_core::models::ProviderSettings;

    #[test]
    fn test_row_prefers_backing_provider() {
        let cluster = Cluster {
            id: "c1".to_string(),
            name: "Cluster0".to_string(),
            state_name: "PAUSED".to_string(),
            paused: true,
            provider_settings: ProviderSettings {
                provider_name: "TENANT".to_string(),
                backing_provider_name: "AWS".to_string(),
                instance_size_name: "M0".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let row = ClusterRow::from(&cluster);
        assert_eq!(row.provider, "AWS");
        assert_eq!(row.instance_size, "M0");
        assert!(row.paused);
    }

    #[test]
    fn test_row_dedicated_provider() {
        let cluster = Cluster {
            provider_settings: ProviderSettings {
                provider_name: "GCP".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(ClusterRow::from(&cluster).provider, "GCP");
    }
}
