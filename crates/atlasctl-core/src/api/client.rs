//! Atlas API client
//!
//! [`AtlasClient`] is the entry point for every resource operation. Each
//! method builds one URL, issues one request through the [`Dispatcher`] and
//! hands back typed models or an [`ApiError`](crate::ApiError) carrying a
//! message that names the resource that was asked for.
//!
//! ```no_run
//! use atlasctl_core::AtlasClient;
//!
//! # async fn run() -> atlasctl_core::Result<()> {
//! let client = AtlasClient::new("https://cloud.mongodb.com").with_auth("alice", "api-key");
//! for org in client.organizations().await? {
//!     println!("{} {}", org.id, org.name);
//! }
//! # Ok(())
//! # }
//! ```

use reqwest::{Method, StatusCode};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::dispatch::Dispatcher;
use super::transport::DigestTransport;
use crate::error::{ApiError, Result};
use crate::models::{Cluster, DatabaseUser, Envelope, Organization, Process, Project, User};

/// Default Atlas base URL
pub const DEFAULT_BASE_URL: &str = "https://cloud.mongodb.com";

const ATLAS_API: &str = "/api/atlas/v1.0";
const PUBLIC_API: &str = "/api/public/v1.0";

/// Authentication database every Atlas database user lives in
const ADMIN_DATABASE: &str = "admin";

/// Client for the Atlas admin API
///
/// Cheap to clone. Credentials are bound with [`with_auth`](Self::with_auth),
/// which returns a new client and leaves this one untouched.
#[derive(Debug, Clone)]
pub struct AtlasClient {
    base_url: String,
    dispatcher: Dispatcher,
}

impl Default for AtlasClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl AtlasClient {
    /// Unauthenticated client for `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_dispatcher(base_url, Dispatcher::default())
    }

    /// Client sharing an existing dispatcher (and its HTTP connection pool)
    pub fn with_dispatcher(base_url: impl Into<String>, dispatcher: Dispatcher) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            dispatcher,
        }
    }

    /// Copy of this client that answers digest challenges as `username`
    pub fn with_auth(&self, username: impl Into<String>, secret: impl Into<String>) -> Self {
        let transport = DigestTransport::bind(username, secret);
        Self {
            base_url: self.base_url.clone(),
            dispatcher: self.dispatcher.with_transport(Arc::new(transport)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.dispatcher.is_authenticated()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    fn atlas_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, ATLAS_API, path)
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, PUBLIC_API, path)
    }

    // --- Organizations ---

    /// All organizations visible to the bound credentials
    pub async fn organizations(&self) -> Result<Vec<Organization>> {
        let envelope: Envelope<Organization> = self
            .dispatcher
            .fetch(
                &self.atlas_url("/orgs"),
                "failed to find Organizations",
                "failed to fetch available Organization IDs",
            )
            .await?;
        Ok(envelope.into_results())
    }

    pub async fn organization_by_id(&self, org_id: &str) -> Result<Organization> {
        self.dispatcher
            .fetch(
                &self.atlas_url(&format!("/orgs/{}", encode(org_id))),
                &format!("failed to find Org by ID [{}]", org_id),
                &format!("failed to fetch Org by ID [{}]", org_id),
            )
            .await
    }

    // --- Projects ---

    pub async fn projects(&self) -> Result<Vec<Project>> {
        let envelope: Envelope<Project> = self
            .dispatcher
            .fetch(
                &self.public_url("/groups"),
                "failed to find Projects",
                "failed to fetch available Project IDs",
            )
            .await?;
        Ok(envelope.into_results())
    }

    pub async fn projects_by_organization(&self, org_id: &str) -> Result<Vec<Project>> {
        let envelope: Envelope<Project> = self
            .dispatcher
            .fetch(
                &self.atlas_url(&format!("/orgs/{}/groups", encode(org_id))),
                &format!("failed to find Projects using Org ID [{}]", org_id),
                &format!("failed to fetch Projects using Org ID [{}]", org_id),
            )
            .await?;
        Ok(envelope.into_results())
    }

    pub async fn project_by_id(&self, project_id: &str) -> Result<Project> {
        self.dispatcher
            .fetch(
                &self.public_url(&format!("/groups/{}", encode(project_id))),
                &format!("failed to find information for ProjectID [{}]", project_id),
                &format!("failed to fetch ProjectID [{}]", project_id),
            )
            .await
    }

    pub async fn project_by_name(&self, name: &str) -> Result<Project> {
        self.dispatcher
            .fetch(
                &self.public_url(&format!("/groups/byName/{}", encode(name))),
                &format!("failed to find Project by name [{}]", name),
                &format!("failed to fetch Project by name [{}]", name),
            )
            .await
    }

    // --- Project resources ---

    pub async fn clusters_by_project(&self, project_id: &str) -> Result<Vec<Cluster>> {
        let envelope: Envelope<Cluster> = self
            .dispatcher
            .fetch(
                &self.atlas_url(&format!("/groups/{}/clusters", encode(project_id))),
                &format!("failed to find Clusters using Project ID [{}]", project_id),
                &format!("failed to fetch Clusters using Project ID [{}]", project_id),
            )
            .await?;
        Ok(envelope.into_results())
    }

    pub async fn database_users_by_project(&self, project_id: &str) -> Result<Vec<DatabaseUser>> {
        let envelope: Envelope<DatabaseUser> = self
            .dispatcher
            .fetch(
                &self.atlas_url(&format!("/groups/{}/databaseUsers", encode(project_id))),
                &format!("failed to find DB users using Project ID [{}]", project_id),
                &format!("failed to fetch DB users using Project ID [{}]", project_id),
            )
            .await?;
        Ok(envelope.into_results())
    }

    /// Delete a database user from the `admin` authentication database
    ///
    /// Atlas acknowledges deletion with `202 Accepted`; every other status,
    /// including other 2xx codes, is an error.
    pub async fn delete_database_user(&self, project_id: &str, username: &str) -> Result<()> {
        let url = self.atlas_url(&format!(
            "/groups/{}/databaseUsers/{}/{}",
            encode(project_id),
            ADMIN_DATABASE,
            encode(username)
        ));

        let response = self
            .dispatcher
            .dispatch(Method::DELETE, &url, None, true, None)
            .await?;

        let status = response.status();
        if status != StatusCode::ACCEPTED {
            return Err(ApiError::RequestFailed {
                message: format!("error deleting database user '{}'", username),
                status: status.to_string(),
            });
        }

        info!("Deleted database user {} from project {}", username, project_id);
        Ok(())
    }

    pub async fn processes_by_project(&self, project_id: &str) -> Result<Vec<Process>> {
        let envelope: Envelope<Process> = self
            .dispatcher
            .fetch(
                &self.atlas_url(&format!("/groups/{}/processes", encode(project_id))),
                &format!("failed to find processes using Project ID [{}]", project_id),
                &format!("failed to fetch processes using Project ID [{}]", project_id),
            )
            .await?;
        Ok(envelope.into_results())
    }

    // --- Logs ---

    /// Download a process log into the current directory
    ///
    /// The file is named `log_<processId>_<logType>`; the written path is
    /// returned.
    pub async fn log_by_process(
        &self,
        project_id: &str,
        process_id: &str,
        log_type: &str,
    ) -> Result<PathBuf> {
        self.log_by_process_into(Path::new("."), project_id, process_id, log_type)
            .await
    }

    /// Download a process log into `dir`
    pub async fn log_by_process_into(
        &self,
        dir: &Path,
        project_id: &str,
        process_id: &str,
        log_type: &str,
    ) -> Result<PathBuf> {
        let url = self.atlas_url(&format!(
            "/groups/{}/clusters/{}/logs/{}",
            encode(project_id),
            encode(process_id),
            encode(log_type)
        ));
        let destination = dir.join(log_file_name(process_id, log_type));

        let written = self
            .dispatcher
            .download(
                &url,
                &format!("failed to find log using Process ID [{}]", process_id),
                &format!("failed to fetch log using Process ID [{}]", process_id),
                &destination,
            )
            .await?;

        debug!("Downloaded {} bytes of {} log", written, log_type);
        Ok(destination)
    }

    // --- Users ---

    pub async fn user_by_name(&self, name: &str) -> Result<User> {
        self.dispatcher
            .fetch(
                &self.atlas_url(&format!("/users/byName/{}", encode(name))),
                &format!("failed to find User by name [{}]", name),
                &format!("failed to fetch User by name [{}]", name),
            )
            .await
    }
}

/// Local file name for a downloaded process log
pub fn log_file_name(process_id: &str, log_type: &str) -> String {
    format!("log_{}_{}", process_id, log_type).replace(['/', '\\'], "_")
}

fn encode(segment: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = AtlasClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.atlas_url("/orgs"),
            "http://localhost:8080/api/atlas/v1.0/orgs"
        );
        assert_eq!(
            client.public_url("/groups"),
            "http://localhost:8080/api/public/v1.0/groups"
        );
    }

    #[test]
    fn test_with_auth_leaves_template_unbound() {
        let template = AtlasClient::default();
        let bound = template.with_auth("alice", "key");

        assert!(!template.is_authenticated());
        assert!(bound.is_authenticated());
        assert_eq!(bound.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_log_file_name() {
        assert_eq!(
            log_file_name("host-00-00.example.net:27017", "mongodb.gz"),
            "log_host-00-00.example.net:27017_mongodb.gz"
        );
        assert_eq!(log_file_name("a/b", "mongos.gz"), "log_a_b_mongos.gz");
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode("my project"), "my%20project");
        assert_eq!(encode("o1"), "o1");
    }
}
