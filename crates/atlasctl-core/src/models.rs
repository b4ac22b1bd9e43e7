//! Resources returned by the Atlas API
//!
//! Wire names are camelCase. Fields the API omits or sends as `null` fall
//! back to their zero value, so partial documents still decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Role name prefix granting organization-level access
pub const ORG_ROLE_PREFIX: &str = "ORG_";

/// Decode an explicit `null` as the zero value, like an omitted field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// `{ "results": [...] }` wrapper used by every list endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub results: Vec<T>,
}

impl<T> Envelope<T> {
    pub fn into_results(self) -> Vec<T> {
        self.results
    }
}

/// An Atlas organization, root of the access hierarchy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Organization {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// An Atlas project (the API also calls it a group)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub org_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub replica_set_count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub shard_count: i64,
}

/// A cluster deployed in a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cluster {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Parent project
    #[serde(deserialize_with = "null_as_default")]
    pub group_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub paused: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub cluster_type: String,
    #[serde(rename = "mongoDBVersion")]
    #[serde(deserialize_with = "null_as_default")]
    pub mongo_db_version: String,
    #[serde(rename = "mongoDBMajorVersion", alias = "MongoDBMajorVersion")]
    #[serde(deserialize_with = "null_as_default")]
    pub mongo_db_major_version: String,
    #[serde(rename = "mongoURI")]
    #[serde(deserialize_with = "null_as_default")]
    pub mongo_uri: String,
    #[serde(rename = "mongoURIUpdated")]
    #[serde(deserialize_with = "null_as_default")]
    pub mongo_uri_updated: String,
    #[serde(rename = "mongoURIWithOptions")]
    #[serde(deserialize_with = "null_as_default")]
    pub mongo_uri_with_options: String,
    #[serde(rename = "diskSizeGB")]
    #[serde(deserialize_with = "null_as_default")]
    pub disk_size_gb: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub num_shards: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub replication_factor: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub encryption_at_rest_provider: String,
    #[serde(deserialize_with = "null_as_default")]
    pub backup_enabled: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub provider_backup_enabled: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub auto_scaling: ClusterAutoScaling,
    #[serde(deserialize_with = "null_as_default")]
    pub bi_connector: BiConnector,
    #[serde(deserialize_with = "null_as_default")]
    pub provider_settings: ProviderSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterAutoScaling {
    #[serde(rename = "diskGBEnabled")]
    #[serde(deserialize_with = "null_as_default")]
    pub disk_gb_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BiConnector {
    #[serde(deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub read_preference: String,
}

/// Cloud provider, region and instance settings of a cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderSettings {
    #[serde(deserialize_with = "null_as_default")]
    pub provider_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub backing_provider_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub instance_size_name: String,
    #[serde(rename = "diskIOPS")]
    #[serde(deserialize_with = "null_as_default")]
    pub disk_iops: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub disk_type_name: String,
    #[serde(rename = "encryptEBSVolume")]
    #[serde(deserialize_with = "null_as_default")]
    pub encrypt_ebs_volume: bool,
}

/// A database user scoped to one project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatabaseUser {
    /// Authentication database
    #[serde(deserialize_with = "null_as_default")]
    pub database_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub roles: Vec<DatabaseRole>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatabaseRole {
    #[serde(deserialize_with = "null_as_default")]
    pub database_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub role_name: String,
}

/// A mongod/mongos process running in a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Process {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hostname: String,
    #[serde(deserialize_with = "null_as_default")]
    pub port: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replica_set_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    pub created: Option<DateTime<Utc>>,
    pub last_ping: Option<DateTime<Utc>>,
}

/// The authenticated platform user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub roles: Vec<UserRole>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserRole {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// Project ID for project-level roles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub role_name: String,
}

impl UserRole {
    /// Organization-level roles are named `ORG_*`
    pub fn is_org_role(&self) -> bool {
        self.role_name.starts_with(ORG_ROLE_PREFIX)
    }
}

impl User {
    pub fn org_roles(&self) -> impl Iterator<Item = &UserRole> {
        self.roles.iter().filter(|r| r.is_org_role())
    }
}
