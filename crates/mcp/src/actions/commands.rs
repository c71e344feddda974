use std::time::Duration;

use async_trait::async_trait;
use forge_gate_api::ForgeClient;
use forge_gate_util::{PollOutcome, PollPolicy, poll_until};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::summary::Summary;
use super::{ConfirmableAction, site_endpoint};
use crate::types::{ResourceId, ToolError};

const COMMAND_POLL: PollPolicy = PollPolicy::fixed(30, Duration::from_secs(2));
const TERMINAL_STATUSES: [&str; 3] = ["finished", "failed", "error"];
const STATUS_NOTE: &str = "Use get_site_command to check status and retrieve output";

/// Run a shell command in a site's directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteSiteCommand {
    #[schemars(description = "Server id from list_servers.")]
    pub server_id: ResourceId,
    #[schemars(description = "Site id from list_sites.")]
    pub site_id: ResourceId,
    #[schemars(description = "Shell command, run from the site directory.")]
    pub command: String,
    #[schemars(description = "Poll until the command finishes and return its output. Defaults to true.")]
    pub wait_for_completion: Option<bool>,
}

impl ExecuteSiteCommand {
    fn waits(&self) -> bool {
        self.wait_for_completion.unwrap_or(true)
    }

    fn commands_endpoint(&self) -> String {
        format!("{}/commands", site_endpoint(&self.server_id, &self.site_id))
    }
}

fn command_status(response: &Value) -> Option<&str> {
    response.pointer("/command/status").and_then(Value::as_str)
}

#[async_trait]
impl ConfirmableAction for ExecuteSiteCommand {
    const KIND: &'static str = "site command";
    const PROPOSE_TOOL: &'static str = "confirm_execute_site_command";
    const EXECUTE_TOOL: &'static str = "execute_site_command";

    fn summary(&self) -> String {
        Summary::new("Are you sure you want to execute this command on the site?")
            .warning("Shell commands have full access to the site's files and cannot be undone.")
            .field("Server ID", &self.server_id)
            .field("Site ID", &self.site_id)
            .field("Command", &self.command)
            .field("Wait For Completion", if self.waits() { "yes" } else { "no" })
            .finish()
    }

    fn check(&self) -> Result<(), ToolError> {
        if self.command.trim().is_empty() {
            return Err(ToolError::invalid("Command must not be empty."));
        }
        Ok(())
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        self.run(client, &COMMAND_POLL).await
    }
}

impl ExecuteSiteCommand {
    async fn run(&self, client: &ForgeClient, poll: &PollPolicy) -> Result<Value, ToolError> {
        let endpoint = self.commands_endpoint();
        let started = client
            .post(endpoint.as_str(), Some(json!({ "command": &self.command })))
            .await?;
        let command_id = started
            .pointer("/command/id")
            .filter(|id| !id.is_null())
            .cloned()
            .ok_or_else(|| ToolError::unexpected("Failed to execute command: No command ID returned"))?;

        if !self.waits() {
            return Ok(json!({
                "success": true,
                "message": "Command execution started",
                "commandId": command_id,
                "status": command_status(&started),
                "note": STATUS_NOTE,
            }));
        }

        let status_endpoint = match &command_id {
            Value::String(id) => format!("{endpoint}/{id}"),
            other => format!("{endpoint}/{other}"),
        };
        let outcome = poll_until(
            poll,
            |_| client.get(status_endpoint.clone()),
            |response: &Value| command_status(response).is_some_and(|status| TERMINAL_STATUSES.contains(&status)),
        )
        .await;

        match outcome {
            PollOutcome::Done { value, .. } => {
                let status = command_status(&value).unwrap_or_default().to_string();
                Ok(json!({
                    "success": status == "finished",
                    "message": format!("Command execution {status}"),
                    "commandId": command_id,
                    "status": status,
                    "output": value.get("output").cloned().unwrap_or(Value::Null),
                }))
            }
            PollOutcome::Pending { .. } => Ok(json!({
                "success": false,
                "message": "Command execution timed out. The command may still be running.",
                "commandId": command_id,
                "note": STATUS_NOTE,
            })),
        }
    }
}
