//! Workflows - multi-step operations
//!
//! These compose several [`AtlasClient`] calls. Steps run one after another;
//! nothing is issued concurrently.

use serde::Serialize;
use tracing::{debug, warn};

use crate::api::AtlasClient;
use crate::error::Result;
use crate::models::Organization;

/// An organization the user reaches through an `ORG_*` role
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgRoleEntry {
    pub organization: Organization,
    pub role_name: String,
}

/// An `ORG_*` role whose organization could not be looked up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgLookupWarning {
    pub org_id: String,
    pub role_name: String,
    pub message: String,
}

/// Result of [`organization_roles`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrgRoleListing {
    pub entries: Vec<OrgRoleEntry>,
    pub warnings: Vec<OrgLookupWarning>,
}

impl OrgRoleListing {
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// List the organizations a user holds `ORG_*` roles in
///
/// This workflow:
/// 1. Fetches the user by name
/// 2. Resolves each organization-level role with
///    [`AtlasClient::organization_by_id`], in role order
///
/// A failed lookup in step 2 is recorded as a warning and the listing
/// continues. Failing to fetch the user is returned as an error.
///
/// # Example
///
/// ```rust,no_run
/// use atlasctl_core::{AtlasClient, workflows::organization_roles};
///
/// # async fn run() -> atlasctl_core::Result<()> {
/// let client = AtlasClient::default().with_auth("jane@example.com", "api-key");
/// let listing = organization_roles(&client, "jane@example.com").await?;
/// for entry in &listing.entries {
///     println!("{} {}", entry.organization.name, entry.role_name);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn organization_roles(client: &AtlasClient, username: &str) -> Result<OrgRoleListing> {
    let user = client.user_by_name(username).await?;
    let mut listing = OrgRoleListing::default();

    for role in user.org_roles() {
        let Some(org_id) = role.org_id.as_deref() else {
            warn!("Role {} has no organization ID, skipping", role.role_name);
            listing.warnings.push(OrgLookupWarning {
                org_id: String::new(),
                role_name: role.role_name.clone(),
                message: format!("role {} has no organization ID", role.role_name),
            });
            continue;
        };

        match client.organization_by_id(org_id).await {
            Ok(organization) => {
                debug!("Resolved organization {} for role {}", org_id, role.role_name);
                listing.entries.push(OrgRoleEntry {
                    organization,
                    role_name: role.role_name.clone(),
                });
            }
            Err(e) => {
                warn!("Skipping organization {}: {}", org_id, e);
                listing.warnings.push(OrgLookupWarning {
                    org_id: org_id.to_string(),
                    role_name: role.role_name.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(listing)
}
