use async_trait::async_trait;
use forge_gate_api::ForgeClient;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::summary::Summary;
use super::{ConfirmableAction, labelled, site_endpoint};
use crate::types::{ResourceId, ToolError};

/// Create a site on a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSite {
    #[schemars(description = "Server id from list_servers.")]
    pub server_id: ResourceId,
    #[schemars(description = "Primary domain of the site.")]
    pub domain: String,
    #[schemars(description = "Project type: php or html. See list_project_types.")]
    pub project_type: String,
    #[schemars(description = "Web directory relative to the site root, for example /public.")]
    pub directory: Option<String>,
    #[schemars(description = "Run the site as its own isolated user.")]
    pub isolated: Option<bool>,
    pub wildcard_subdomains: Option<bool>,
    #[schemars(description = "PHP version from list_php_versions.")]
    pub php_version: Option<String>,
    #[schemars(description = "Database to create for the site.")]
    pub database: Option<String>,
    pub repository: Option<String>,
    pub branch: Option<String>,
    pub composer: Option<bool>,
    pub install_dependencies: Option<bool>,
    pub enable_quick_deploy: Option<bool>,
    pub enable_auto_deploy: Option<bool>,
    #[schemars(description = "Source control provider, for example github.")]
    pub provider: Option<String>,
    #[schemars(description = "Server ids allowed to reach this site over the private network.")]
    pub network: Option<Vec<ResourceId>>,
    #[schemars(description = "Environment file contents.")]
    pub environment: Option<String>,
    #[schemars(description = "Recipe id to run after provisioning.")]
    pub recipe_id: Option<ResourceId>,
}

impl CreateSite {
    fn payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("domain".into(), json!(self.domain));
        payload.insert("project_type".into(), json!(self.project_type));
        let optional_text = [
            ("directory", &self.directory),
            ("php_version", &self.php_version),
            ("database", &self.database),
            ("repository", &self.repository),
            ("branch", &self.branch),
            ("provider", &self.provider),
            ("environment", &self.environment),
        ];
        for (key, value) in optional_text {
            if let Some(value) = value.as_deref().filter(|value| !value.is_empty()) {
                payload.insert(key.into(), json!(value));
            }
        }
        let optional_flags = [
            ("isolated", self.isolated),
            ("wildcard_subdomains", self.wildcard_subdomains),
            ("composer", self.composer),
            ("install_dependencies", self.install_dependencies),
            ("quick_deploy", self.enable_quick_deploy),
            ("auto_deploy", self.enable_auto_deploy),
        ];
        for (key, value) in optional_flags {
            if let Some(value) = value {
                payload.insert(key.into(), json!(value));
            }
        }
        if let Some(network) = self.network.as_ref().filter(|network| !network.is_empty()) {
            payload.insert("network".into(), network.iter().map(ResourceId::to_json).collect());
        }
        if let Some(recipe_id) = &self.recipe_id {
            payload.insert("recipe_id".into(), recipe_id.to_json());
        }
        Value::Object(payload)
    }
}

#[async_trait]
impl ConfirmableAction for CreateSite {
    const KIND: &'static str = "site creation";
    const PROPOSE_TOOL: &'static str = "confirm_site_creation";
    const EXECUTE_TOOL: &'static str = "create_site";

    fn summary(&self) -> String {
        Summary::new("Please confirm the site creation with the following settings:")
            .field("Server ID", &self.server_id)
            .field("Domain", &self.domain)
            .field("Project Type", &self.project_type)
            .optional("Directory", self.directory.as_ref())
            .flag("Isolated", self.isolated)
            .flag("Wildcard Subdomains", self.wildcard_subdomains)
            .optional("PHP Version", self.php_version.as_ref())
            .optional("Database", self.database.as_ref())
            .optional("Repository", self.repository.as_ref())
            .optional("Branch", self.branch.as_ref())
            .flag("Composer", self.composer)
            .flag("Install Dependencies", self.install_dependencies)
            .flag("Quick Deploy", self.enable_quick_deploy)
            .flag("Auto Deploy", self.enable_auto_deploy)
            .optional("Provider", self.provider.as_ref())
            .optional(
                "Network",
                self.network
                    .as_ref()
                    .filter(|network| !network.is_empty())
                    .map(|network| network.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")),
            )
            .optional("Environment", self.environment.as_ref().map(|_| "provided"))
            .optional("Recipe ID", self.recipe_id.as_ref())
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        let payload = self.payload();
        Ok(client.post(format!("/servers/{}/sites", self.server_id), Some(payload)).await?)
    }
}

/// Switch the PHP version a site runs on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSitePhpVersion {
    pub server_id: ResourceId,
    pub site_id: ResourceId,
    #[schemars(description = "Installed PHP version from list_php_versions, for example php83.")]
    pub php_version: String,
}

#[async_trait]
impl ConfirmableAction for ChangeSitePhpVersion {
    const KIND: &'static str = "site PHP version change";
    const PROPOSE_TOOL: &'static str = "confirm_change_site_php_version";
    const EXECUTE_TOOL: &'static str = "change_site_php_version";

    fn summary(&self) -> String {
        Summary::new("Are you sure you want to change the PHP version of this site?")
            .field("Server ID", &self.server_id)
            .field("Site ID", &self.site_id)
            .field("New PHP Version", &self.php_version)
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        let endpoint = format!("{}/php", site_endpoint(&self.server_id, &self.site_id));
        Ok(client.post(endpoint, Some(json!({ "version": self.php_version }))).await?)
    }
}

/// Add domain aliases to a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddSiteAliases {
    pub server_id: ResourceId,
    pub site_id: ResourceId,
    #[schemars(description = "Alias domains, in order.")]
    pub aliases: Vec<String>,
}

#[async_trait]
impl ConfirmableAction for AddSiteAliases {
    const KIND: &'static str = "site aliases";
    const PROPOSE_TOOL: &'static str = "confirm_add_site_aliases";
    const EXECUTE_TOOL: &'static str = "add_site_aliases";

    fn summary(&self) -> String {
        Summary::new("Are you sure you want to add these aliases to the site?")
            .field("Server ID", &self.server_id)
            .field("Site ID", &self.site_id)
            .list("Aliases", &self.aliases)
            .finish()
    }

    fn check(&self) -> Result<(), ToolError> {
        if self.aliases.iter().any(|alias| alias.trim().is_empty()) {
            return Err(ToolError::invalid("Aliases must not be empty."));
        }
        Ok(())
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        let endpoint = format!("{}/aliases", site_endpoint(&self.server_id, &self.site_id));
        Ok(client.post(endpoint, Some(json!({ "aliases": self.aliases }))).await?)
    }
}

/// Truncate a site's log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearSiteLog {
    pub server_id: ResourceId,
    pub site_id: ResourceId,
}

#[async_trait]
impl ConfirmableAction for ClearSiteLog {
    const KIND: &'static str = "site log clear";
    const PROPOSE_TOOL: &'static str = "confirm_clear_site_log";
    const EXECUTE_TOOL: &'static str = "clear_site_log";

    fn summary(&self) -> String {
        Summary::new("Are you sure you want to clear the log of this site?")
            .field("Server ID", &self.server_id)
            .field("Site ID", &self.site_id)
            .note("Existing log entries are discarded.")
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        let endpoint = format!("{}/logs", site_endpoint(&self.server_id, &self.site_id));
        Ok(client.delete(endpoint).await?)
    }
}

/// Delete a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSite {
    pub server_id: ResourceId,
    pub site_id: ResourceId,
}

#[async_trait]
impl ConfirmableAction for DeleteSite {
    const KIND: &'static str = "site deletion";
    const PROPOSE_TOOL: &'static str = "confirm_site_deletion";
    const EXECUTE_TOOL: &'static str = "delete_site";

    fn summary(&self) -> String {
        Summary::new("Please confirm deletion of site:")
            .warning("This permanently deletes the site and its files from the server. It cannot be undone.")
            .field("Server ID", &self.server_id)
            .field("Site ID", &self.site_id)
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        Ok(client.delete(site_endpoint(&self.server_id, &self.site_id)).await?)
    }
}

/// Attach or replace the Git repository of a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallOrUpdateSiteGit {
    pub server_id: ResourceId,
    pub site_id: ResourceId,
    #[schemars(description = "Source control provider: github, gitlab, gitlab-custom, bitbucket or custom.")]
    pub provider: String,
    #[schemars(description = "Repository in owner/name form, or a clone URL for custom providers.")]
    pub repository: String,
    pub branch: String,
    #[schemars(description = "Run composer install after cloning.")]
    pub composer: Option<bool>,
    pub database: Option<String>,
}

#[async_trait]
impl ConfirmableAction for InstallOrUpdateSiteGit {
    const KIND: &'static str = "site git install";
    const PROPOSE_TOOL: &'static str = "confirm_install_or_update_site_git";
    const EXECUTE_TOOL: &'static str = "install_or_update_site_git";

    fn summary(&self) -> String {
        Summary::new("Please confirm the Git installation/update for the site with the following settings:")
            .field("Server ID", &self.server_id)
            .field("Site ID", &self.site_id)
            .field("Provider", &self.provider)
            .field("Repository", &self.repository)
            .field("Branch", &self.branch)
            .flag("Composer", self.composer)
            .optional("Database", self.database.as_ref())
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        let mut payload = json!({
            "provider": self.provider,
            "repository": self.repository,
            "branch": self.branch,
        });
        if let Some(composer) = self.composer {
            payload["composer"] = json!(composer);
        }
        if let Some(database) = self.database.as_deref().filter(|database| !database.is_empty()) {
            payload["database"] = json!(database);
        }
        let endpoint = format!("{}/git", site_endpoint(&self.server_id, &self.site_id));
        Ok(client.post(endpoint, Some(payload)).await?)
    }
}

/// Detach the Git repository from a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveSiteGit {
    pub server_id: ResourceId,
    pub site_id: ResourceId,
    pub server_name: String,
    pub site_name: String,
}

#[async_trait]
impl ConfirmableAction for RemoveSiteGit {
    const KIND: &'static str = "site git removal";
    const PROPOSE_TOOL: &'static str = "confirm_remove_site_git";
    const EXECUTE_TOOL: &'static str = "remove_site_git";

    fn summary(&self) -> String {
        Summary::new("Are you sure you want to remove the Git project from this site?")
            .warning("The repository link and deployment script are removed and cannot be recovered.")
            .field("Server", labelled(&self.server_name, &self.server_id))
            .field("Site", labelled(&self.site_name, &self.site_id))
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        let endpoint = format!("{}/git", site_endpoint(&self.server_id, &self.site_id));
        Ok(client.delete(endpoint).await?)
    }
}
