//! Confirmed actions: every mutating Forge operation as a propose/execute pair.
//!
//! An action kind is a typed parameter record implementing
//! [`ConfirmableAction`]. The record's derived `PartialEq` is the binding: an
//! execute call is accepted only when its parameters equal the snapshot stored
//! at proposal time, field by field and in list order.

mod certificates;
mod commands;
mod databases;
mod deployments;
#[cfg(test)]
mod fake_forge;
mod servers;
mod sites;
mod summary;
mod wordpress;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use forge_gate_api::ForgeClient;
use forge_gate_util::{redact_sensitive, token_prefix};
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::confirmation::{ConfirmationStore, DEFAULT_CONFIRMATION_TTL};
use crate::envelope;
use crate::types::ToolError;

pub use certificates::{ActivateCertificate, CreateLetsEncryptCertificate, DeleteCertificate, DnsProvider, DnsProviderType};
pub use commands::ExecuteSiteCommand;
pub use databases::{CreateDatabase, CreateDatabaseUser, DeleteDatabase, DeleteDatabaseUser, SyncDatabase};
pub use deployments::{DeployNow, DisableQuickDeployment, EnableQuickDeployment};
pub use servers::{CreateServer, DeleteServer, RebootServer, RestartService, ServerService};
pub use sites::{
    AddSiteAliases, ChangeSitePhpVersion, ClearSiteLog, CreateSite, DeleteSite, InstallOrUpdateSiteGit, RemoveSiteGit,
};
pub use summary::Summary;
pub use wordpress::{InstallWordPress, UninstallWordPress};

/// A mutating Forge operation guarded by a confirmation.
#[async_trait]
pub trait ConfirmableAction: Clone + PartialEq + Send + Sync + 'static {
    /// Human-readable kind, used in logs.
    const KIND: &'static str;
    const PROPOSE_TOOL: &'static str;
    const EXECUTE_TOOL: &'static str;

    /// Deterministic multi-line summary shown to the human before approval.
    fn summary(&self) -> String;

    /// Rules the schema cannot express. Checked before a token is issued.
    fn check(&self) -> Result<(), ToolError> {
        Ok(())
    }

    /// Issue the remote call(s). Only reached with a freshly consumed token.
    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError>;
}

/// Parameters of an execute tool: the proposal's parameters plus the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest<P> {
    #[serde(flatten)]
    pub params: P,
    /// Token returned by the matching propose tool.
    #[schemars(
        description = "confirmationId returned by the matching confirm_* tool after the user explicitly approved the summary. Every other field must be identical to the proposal."
    )]
    pub confirmation_id: String,
}

/// What a propose tool returns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalReceipt {
    pub summary: String,
    pub confirmation_id: String,
    pub expires_at: DateTime<Utc>,
    pub execute_tool: &'static str,
}

/// Propose and execute halves of one action kind, sharing one store.
pub struct ActionPair<A: ConfirmableAction> {
    store: ConfirmationStore<A>,
}

impl<A: ConfirmableAction> ActionPair<A> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: ConfirmationStore::with_ttl(A::KIND, ttl),
        }
    }

    pub fn store(&self) -> &ConfirmationStore<A> {
        &self.store
    }

    /// Snapshot the parameters, issue a token and return the summary.
    ///
    /// Never calls Forge.
    pub fn propose(&self, params: A) -> CallToolResult {
        if let Err(error) = params.check() {
            return envelope::failure(&error);
        }
        let summary = params.summary();
        let entry = self.store.create(params);
        info!(
            kind = A::KIND,
            tool = A::PROPOSE_TOOL,
            token = token_prefix(entry.token()),
            "confirmation issued"
        );
        let receipt = ProposalReceipt {
            summary,
            confirmation_id: entry.token().to_string(),
            expires_at: entry.expires_at(self.store.ttl()),
            execute_tool: A::EXECUTE_TOOL,
        };
        envelope::success(serde_json::to_value(receipt).unwrap_or(Value::Null))
    }

    /// Claim the token against the supplied parameters, then perform the action.
    ///
    /// The token is consumed before Forge is called, so a failed call needs a
    /// fresh proposal.
    pub async fn execute(&self, client: &ForgeClient, request: ExecuteRequest<A>) -> CallToolResult {
        let ExecuteRequest { params, confirmation_id } = request;
        if self.store.claim(&confirmation_id, |stored| stored == &params).is_none() {
            info!(
                kind = A::KIND,
                tool = A::EXECUTE_TOOL,
                token = token_prefix(&confirmation_id),
                "confirmation rejected, action not performed"
            );
            return envelope::rejected(A::PROPOSE_TOOL);
        }

        info!(kind = A::KIND, tool = A::EXECUTE_TOOL, "confirmation accepted, calling Forge");
        match params.perform(client).await {
            Ok(payload) => envelope::success(payload),
            Err(error) => {
                warn!(
                    kind = A::KIND,
                    tool = A::EXECUTE_TOOL,
                    code = error.code(),
                    error = %redact_sensitive(&error.to_string()),
                    "confirmed action failed"
                );
                envelope::failure(&error)
            }
        }
    }
}

impl<A: ConfirmableAction> Default for ActionPair<A> {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRMATION_TTL)
    }
}

/// One [`ActionPair`] per action kind, built once and shared by all sessions.
pub struct ActionRegistry {
    pub server_creation: ActionPair<CreateServer>,
    pub server_reboot: ActionPair<RebootServer>,
    pub service_restart: ActionPair<RestartService>,
    pub server_deletion: ActionPair<DeleteServer>,
    pub site_creation: ActionPair<CreateSite>,
    pub site_php_version: ActionPair<ChangeSitePhpVersion>,
    pub site_aliases: ActionPair<AddSiteAliases>,
    pub site_log_clear: ActionPair<ClearSiteLog>,
    pub site_deletion: ActionPair<DeleteSite>,
    pub site_git_install: ActionPair<InstallOrUpdateSiteGit>,
    pub site_git_removal: ActionPair<RemoveSiteGit>,
    pub quick_deploy_enable: ActionPair<EnableQuickDeployment>,
    pub quick_deploy_disable: ActionPair<DisableQuickDeployment>,
    pub deploy_now: ActionPair<DeployNow>,
    pub database_creation: ActionPair<CreateDatabase>,
    pub database_sync: ActionPair<SyncDatabase>,
    pub database_deletion: ActionPair<DeleteDatabase>,
    pub database_user_creation: ActionPair<CreateDatabaseUser>,
    pub database_user_deletion: ActionPair<DeleteDatabaseUser>,
    pub lets_encrypt_certificate: ActionPair<CreateLetsEncryptCertificate>,
    pub certificate_activation: ActionPair<ActivateCertificate>,
    pub certificate_deletion: ActionPair<DeleteCertificate>,
    pub wordpress_install: ActionPair<InstallWordPress>,
    pub wordpress_uninstall: ActionPair<UninstallWordPress>,
    pub site_command: ActionPair<ExecuteSiteCommand>,
}

impl ActionRegistry {
    /// Fresh, empty stores that expire confirmations after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            server_creation: ActionPair::new(ttl),
            server_reboot: ActionPair::new(ttl),
            service_restart: ActionPair::new(ttl),
            server_deletion: ActionPair::new(ttl),
            site_creation: ActionPair::new(ttl),
            site_php_version: ActionPair::new(ttl),
            site_aliases: ActionPair::new(ttl),
            site_log_clear: ActionPair::new(ttl),
            site_deletion: ActionPair::new(ttl),
            site_git_install: ActionPair::new(ttl),
            site_git_removal: ActionPair::new(ttl),
            quick_deploy_enable: ActionPair::new(ttl),
            quick_deploy_disable: ActionPair::new(ttl),
            deploy_now: ActionPair::new(ttl),
            database_creation: ActionPair::new(ttl),
            database_sync: ActionPair::new(ttl),
            database_deletion: ActionPair::new(ttl),
            database_user_creation: ActionPair::new(ttl),
            database_user_deletion: ActionPair::new(ttl),
            lets_encrypt_certificate: ActionPair::new(ttl),
            certificate_activation: ActionPair::new(ttl),
            certificate_deletion: ActionPair::new(ttl),
            wordpress_install: ActionPair::new(ttl),
            wordpress_uninstall: ActionPair::new(ttl),
            site_command: ActionPair::new(ttl),
        }
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRMATION_TTL)
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry").finish_non_exhaustive()
    }
}

/// Endpoint of a site below its server.
pub(crate) fn site_endpoint(server_id: &impl std::fmt::Display, site_id: &impl std::fmt::Display) -> String {
    format!("/servers/{server_id}/sites/{site_id}")
}

/// `name (ID: id)` label used throughout summaries.
pub(crate) fn labelled(name: &str, id: &impl std::fmt::Display) -> String {
    format!("{name} (ID: {id})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResourceId;
    use serde_json::json;

    #[test]
    fn execute_request_flattens_params_next_to_the_token() {
        let request: ExecuteRequest<DeleteDatabase> = serde_json::from_value(json!({
            "serverId": 1,
            "serverName": "web-1",
            "databaseId": "9",
            "databaseName": "prod",
            "confirmationId": "abc"
        }))
        .unwrap();
        assert_eq!(request.confirmation_id, "abc");
        assert_eq!(request.params.server_id, ResourceId::from(1));
        assert_eq!(request.params.database_name, "prod");
    }

    #[test]
    fn execute_request_requires_a_confirmation_id() {
        let parsed = serde_json::from_value::<ExecuteRequest<DeleteDatabase>>(json!({
            "serverId": "1",
            "serverName": "web-1",
            "databaseId": "9",
            "databaseName": "prod"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn proposal_receipt_uses_camel_case() {
        let pair: ActionPair<DeleteDatabase> = ActionPair::default();
        let result = pair.propose(DeleteDatabase {
            server_id: ResourceId::from(1),
            server_name: "web-1".into(),
            database_id: ResourceId::from(9),
            database_name: "prod".into(),
        });
        let rendered = serde_json::to_value(&result).unwrap();
        let receipt = &rendered["structuredContent"];
        assert!(receipt["confirmationId"].is_string());
        assert!(receipt["expiresAt"].is_string());
        assert_eq!(receipt["executeTool"], "delete_database");
        assert!(receipt["summary"].as_str().unwrap().starts_with("WARNING:"));
    }
}
